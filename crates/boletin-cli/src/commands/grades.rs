//! The `boletin grades` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use boletin_core::config::load_config_from;
use boletin_core::parser::load_grade_book;
use boletin_runner::LatexCompiler;
use boletin_tex::grades::render_grade_report;

use super::{compiler_from, student_id_from};

pub async fn execute(
    input: PathBuf,
    output_dir: PathBuf,
    tex_only: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let student_id = student_id_from(&input)?;
    let book = load_grade_book(&input)?;

    tracing::info!(student = %student_id, programs = book.entries.len(), "rendering grade report");

    let tex = render_grade_report(&book, &student_id, &config);

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let tex_path = output_dir.join(format!("calificaciones_{student_id}.tex"));
    std::fs::write(&tex_path, tex)
        .with_context(|| format!("failed to write {}", tex_path.display()))?;

    if tex_only {
        println!("LaTeX source written: {}", tex_path.display());
        return Ok(());
    }

    let pdf = compiler_from(&config)
        .compile(&tex_path)
        .await
        .context("LaTeX compilation failed")?;
    println!("Grade report generated: {}", pdf.display());
    Ok(())
}
