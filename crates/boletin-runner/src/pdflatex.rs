//! pdflatex-style engine driver.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{CompileError, LatexCompiler};

/// How much of the engine log to surface when compilation fails.
const LOG_TAIL_CHARS: usize = 500;

/// Driver for pdflatex (or any engine with a compatible CLI, e.g. xelatex).
pub struct PdfLatex {
    engine: String,
    timeout: Duration,
    keep_tex: bool,
}

impl PdfLatex {
    pub fn new(engine: impl Into<String>, timeout: Duration) -> Self {
        Self {
            engine: engine.into(),
            timeout,
            keep_tex: false,
        }
    }

    /// Leave the `.tex` source in place after a successful compile.
    pub fn keep_tex(mut self, keep: bool) -> Self {
        self.keep_tex = keep;
        self
    }

    /// Remove the engine's auxiliary files. Only called after a successful
    /// compile; on failure everything stays in place so the `.log` can be
    /// inspected.
    fn cleanup(&self, stem: &Path) {
        for ext in ["aux", "log"] {
            let path = stem.with_extension(ext);
            if path.exists() {
                if let Err(e) = std::fs::remove_file(&path) {
                    tracing::warn!(path = %path.display(), error = %e, "could not remove auxiliary file");
                }
            }
        }
        if !self.keep_tex {
            let tex = stem.with_extension("tex");
            if let Err(e) = std::fs::remove_file(&tex) {
                tracing::warn!(path = %tex.display(), error = %e, "could not remove tex source");
            }
        }
    }
}

#[async_trait]
impl LatexCompiler for PdfLatex {
    async fn compile(&self, tex_path: &Path) -> Result<PathBuf, CompileError> {
        let work_dir = tex_path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = tex_path
            .file_name()
            .ok_or_else(|| CompileError::Io(std::io::Error::other("tex path has no file name")))?;

        tracing::info!(engine = %self.engine, tex = %tex_path.display(), "compiling");

        let mut cmd = Command::new(&self.engine);
        cmd.arg("-interaction=nonstopmode")
            .arg(file_name)
            .current_dir(work_dir)
            // Dropping the output future on timeout must take the engine
            // down with it, or a hung pdflatex outlives the run.
            .kill_on_drop(true)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(CompileError::Spawn {
                    engine: self.engine.clone(),
                    source,
                })
            }
            Err(_) => return Err(CompileError::Timeout(self.timeout.as_secs())),
        };

        // The exit status is not authoritative: nonstopmode engines exit
        // non-zero on recoverable warnings yet still emit a usable PDF.
        // The artifact on disk is what decides.
        let pdf_path = tex_path.with_extension("pdf");
        let pdf_ok = std::fs::metadata(&pdf_path).map(|m| m.len() > 0).unwrap_or(false);

        if pdf_ok {
            self.cleanup(tex_path);
            tracing::info!(pdf = %pdf_path.display(), "compiled");
            Ok(pdf_path)
        } else {
            let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                log.push('\n');
                log.push_str(&stderr);
            }
            Err(CompileError::MissingArtifact {
                log_tail: tail(&log, LOG_TAIL_CHARS).to_string(),
            })
        }
    }
}

/// Last `n` characters of `s`, on a char boundary.
fn tail(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    let (idx, _) = s.char_indices().nth(count - n).unwrap_or((0, ' '));
    &s[idx..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_respects_char_boundaries() {
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("ab", 5), "ab");
        // Multi-byte chars must not be split.
        assert_eq!(tail("añño", 2), "ño");
    }

    #[tokio::test]
    async fn missing_engine_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("doc.tex");
        std::fs::write(&tex, "\\documentclass{article}\\begin{document}x\\end{document}").unwrap();

        let runner = PdfLatex::new("definitely-not-a-latex-engine", Duration::from_secs(5));
        let err = runner.compile(&tex).await.unwrap_err();
        assert!(matches!(err, CompileError::Spawn { .. }));
    }

    #[tokio::test]
    async fn engine_without_pdf_output_is_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("doc.tex");
        std::fs::write(&tex, "x").unwrap();

        // `true` exits zero but writes nothing.
        let runner = PdfLatex::new("true", Duration::from_secs(5));
        let err = runner.compile(&tex).await.unwrap_err();
        assert!(matches!(err, CompileError::MissingArtifact { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn fake_engine_producing_pdf_succeeds_and_cleans_up() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("doc.tex");
        std::fs::write(&tex, "x").unwrap();

        // Shell script standing in for pdflatex: emits pdf + aux + log.
        let engine = dir.path().join("fakelatex.sh");
        std::fs::write(
            &engine,
            "#!/bin/sh\nprintf pdf > doc.pdf\ntouch doc.aux doc.log\n",
        )
        .unwrap();
        std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runner = PdfLatex::new(engine.to_string_lossy().to_string(), Duration::from_secs(5));
        let pdf = runner.compile(&tex).await.unwrap();

        assert_eq!(pdf, dir.path().join("doc.pdf"));
        assert!(pdf.exists());
        assert!(!dir.path().join("doc.aux").exists());
        assert!(!dir.path().join("doc.log").exists());
        assert!(!tex.exists(), "tex source removed unless keep_tex is set");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn keep_tex_preserves_the_source() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("doc.tex");
        std::fs::write(&tex, "x").unwrap();

        let engine = dir.path().join("fakelatex.sh");
        std::fs::write(&engine, "#!/bin/sh\nprintf pdf > doc.pdf\n").unwrap();
        std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runner = PdfLatex::new(engine.to_string_lossy().to_string(), Duration::from_secs(5))
            .keep_tex(true);
        runner.compile(&tex).await.unwrap();
        assert!(tex.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failure_leaves_intermediates_for_diagnosis() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("doc.tex");
        std::fs::write(&tex, "x").unwrap();

        // Writes aux + log but no PDF, the shape of a real failed compile.
        let engine = dir.path().join("brokenlatex.sh");
        std::fs::write(&engine, "#!/bin/sh\ntouch doc.aux doc.log\n").unwrap();
        std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runner = PdfLatex::new(engine.to_string_lossy().to_string(), Duration::from_secs(5));
        let err = runner.compile(&tex).await.unwrap_err();
        assert!(matches!(err, CompileError::MissingArtifact { .. }));

        // The .log is the diagnostic the error points at; nothing may be
        // removed on failure.
        assert!(dir.path().join("doc.log").exists());
        assert!(dir.path().join("doc.aux").exists());
        assert!(tex.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failure_tail_includes_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("doc.tex");
        std::fs::write(&tex, "x").unwrap();

        let engine = dir.path().join("noisylatex.sh");
        std::fs::write(
            &engine,
            "#!/bin/sh\necho 'entering extended mode'\necho 'Fatal error occurred' >&2\n",
        )
        .unwrap();
        std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runner = PdfLatex::new(engine.to_string_lossy().to_string(), Duration::from_secs(5));
        let err = runner.compile(&tex).await.unwrap_err();
        let CompileError::MissingArtifact { log_tail } = err else {
            panic!("expected MissingArtifact, got {err:?}");
        };
        assert!(log_tail.contains("entering extended mode"));
        assert!(log_tail.contains("Fatal error occurred"));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn timeout_kills_the_engine() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("doc.tex");
        std::fs::write(&tex, "x").unwrap();

        let engine = dir.path().join("hunglatex.sh");
        std::fs::write(&engine, "#!/bin/sh\necho $$ > engine.pid\nsleep 30\n").unwrap();
        std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runner =
            PdfLatex::new(engine.to_string_lossy().to_string(), Duration::from_millis(100));
        let err = runner.compile(&tex).await.unwrap_err();
        assert!(matches!(err, CompileError::Timeout(_)));

        let pid: u32 = std::fs::read_to_string(dir.path().join("engine.pid"))
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        // Dead or zombie (not yet reaped) both count as terminated.
        let mut terminated = false;
        for _ in 0..40 {
            terminated = match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
                Ok(stat) => stat.contains(") Z "),
                Err(_) => true,
            };
            if terminated {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(terminated, "engine still running after timeout");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_engine_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("doc.tex");
        std::fs::write(&tex, "x").unwrap();

        let engine = dir.path().join("slowlatex.sh");
        std::fs::write(&engine, "#!/bin/sh\nsleep 30\n").unwrap();
        std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runner =
            PdfLatex::new(engine.to_string_lossy().to_string(), Duration::from_millis(100));
        let err = runner.compile(&tex).await.unwrap_err();
        assert!(matches!(err, CompileError::Timeout(_)));
    }
}
