//! Subcommand implementations.

pub mod export;
pub mod grades;
pub mod init;
pub mod testing;

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};

use boletin_core::config::BoletinConfig;
use boletin_runner::PdfLatex;

/// Student id from an input file name: the stem, with a known report prefix
/// stripped (`calificaciones_msc25abc.json` and `msc25abc.json` both map to
/// `msc25abc`).
pub(crate) fn student_id_from(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("cannot derive a student id from {}", path.display()))?;
    let id = stem
        .strip_prefix("calificaciones_")
        .or_else(|| stem.strip_prefix("evaluation_results_"))
        .unwrap_or(stem);
    Ok(id.to_string())
}

/// LaTeX driver configured from `[latex]`.
pub(crate) fn compiler_from(config: &BoletinConfig) -> PdfLatex {
    PdfLatex::new(
        config.latex.engine.clone(),
        Duration::from_secs(config.latex.timeout_secs),
    )
    .keep_tex(config.latex.keep_tex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn student_id_strips_known_prefixes() {
        assert_eq!(
            student_id_from(&PathBuf::from("scores/msc25abc.json")).unwrap(),
            "msc25abc"
        );
        assert_eq!(
            student_id_from(&PathBuf::from("calificaciones_msc25abc.json")).unwrap(),
            "msc25abc"
        );
        assert_eq!(
            student_id_from(&PathBuf::from("evaluation_results_msc25abc.json")).unwrap(),
            "msc25abc"
        );
    }
}
