//! boletin-runner — LaTeX engine invocation and PDF artifact handling.
//!
//! Compiles a `.tex` file to PDF by shelling out to an installed engine
//! (pdflatex by default), with a hard timeout and auxiliary-file cleanup.

pub mod pdflatex;

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

pub use pdflatex::PdfLatex;

/// Errors from a LaTeX compilation attempt.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("LaTeX compilation exceeded {0}s timeout")]
    Timeout(u64),
    #[error("engine finished but produced no PDF:\n{log_tail}")]
    MissingArtifact { log_tail: String },
    #[error("failed to start `{engine}` (is it installed?)")]
    Spawn {
        engine: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A LaTeX-to-PDF compiler.
///
/// Implementations run the engine in the `.tex` file's directory and return
/// the path of the produced PDF.
#[async_trait]
pub trait LatexCompiler: Send + Sync {
    async fn compile(&self, tex_path: &Path) -> Result<PathBuf, CompileError>;
}
