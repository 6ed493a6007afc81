//! The `boletin testing` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use boletin_core::config::load_config_from;
use boletin_core::parser::load_results;
use boletin_core::scoring::aggregate;
use boletin_core::summary::EvaluationReport;
use boletin_runner::LatexCompiler;
use boletin_tex::testing::render_testing_report;

use super::{compiler_from, student_id_from};

pub async fn execute(
    input: PathBuf,
    output_dir: PathBuf,
    tex_only: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let student_id = student_id_from(&input)?;
    let records = load_results(&input)?;

    tracing::info!(student = %student_id, records = records.len(), "aggregating test results");

    let board = aggregate(
        &records,
        &config.evaluation.expected_programs,
        config.evaluation.points_per_test,
    );
    let report = EvaluationReport::from_board(&student_id, &board);

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let json_path = output_dir.join(format!("evaluation_results_{student_id}.json"));
    report.save_json(&json_path)?;

    let tex = render_testing_report(&records, &board, &student_id, &config);
    let tex_path = output_dir.join(format!("testing_{student_id}.tex"));
    std::fs::write(&tex_path, tex)
        .with_context(|| format!("failed to write {}", tex_path.display()))?;

    print_summary(&report);
    println!("Summary JSON written: {}", json_path.display());

    if tex_only {
        println!("LaTeX source written: {}", tex_path.display());
        return Ok(());
    }

    let pdf = compiler_from(&config)
        .compile(&tex_path)
        .await
        .context("LaTeX compilation failed")?;
    println!("Testing report generated: {}", pdf.display());
    Ok(())
}

/// Console table mirroring the PDF's general summary.
fn print_summary(report: &EvaluationReport) {
    use comfy_table::Table;

    let mut table = Table::new();
    table.set_header(vec![
        "Program",
        "Score",
        "Percentage",
        "Passed",
        "Failed",
        "Compile Errors",
    ]);

    for (program, detail) in &report.program_details {
        let score = if detail.exists {
            format!("{}/{}", detail.total_score, detail.max_score)
        } else {
            "missing".to_string()
        };
        table.add_row(vec![
            program.clone(),
            score,
            format!("{:.1}%", detail.percentage),
            detail.passed.to_string(),
            detail.failed.to_string(),
            detail.compilation_errors.to_string(),
        ]);
    }

    println!("\n{table}\n");

    let summary = &report.summary;
    println!(
        "Total: {}/{} ({:.1}% base, {:.1}% final) — {}",
        summary.total_score,
        summary.max_score,
        summary.base_percentage,
        summary.overall_percentage,
        summary.grade,
    );
    if !summary.missing_programs.is_empty() {
        println!(
            "Missing programs: {} (penalty factor {:.3})",
            summary.missing_programs.join(", "),
            summary.penalty_factor,
        );
    }
}
