//! The `boletin export` command.
//!
//! Folds a directory of per-student score JSONs (evaluator grade books and
//! `evaluation_results_*.json` harness summaries) into two CSVs: a merged
//! one-row-per-student file with every metric, and a compact summary.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use boletin_core::config::{load_config_from, BoletinConfig};
use boletin_core::model::{GradeBook, GradeEntry};
use boletin_core::parser::load_grade_book;
use boletin_core::summary::EvaluationReport;

use super::student_id_from;

#[derive(Default)]
struct StudentExport {
    book: Option<GradeBook>,
    report: Option<EvaluationReport>,
}

pub fn execute(scores_dir: PathBuf, output_dir: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    if !scores_dir.is_dir() {
        bail!("scores directory not found: {}", scores_dir.display());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(&scores_dir)
        .with_context(|| format!("failed to read {}", scores_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    let mut students: BTreeMap<String, StudentExport> = BTreeMap::new();
    for path in &files {
        let student_id = student_id_from(path)?;
        let is_report = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("evaluation_results_"));
        let slot = students.entry(student_id).or_default();

        if is_report {
            match EvaluationReport::load_json(path) {
                Ok(report) => slot.report = Some(report),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable summary"),
            }
        } else {
            match load_grade_book(path) {
                Ok(book) => slot.book = Some(book),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable grade book"),
            }
        }
    }
    students.retain(|_, s| s.book.is_some() || s.report.is_some());

    if students.is_empty() {
        bail!("no readable JSON score files in {}", scores_dir.display());
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let merged_path = output_dir.join("all_scores_merged.csv");
    write_csv(&merged_path, merged_header(&config), |id, student| {
        merged_row(&config, id, student)
    }, &students)?;
    println!("Merged CSV written: {}", merged_path.display());

    let summary_path = output_dir.join("scores_summary.csv");
    write_csv(&summary_path, summary_header(&config), |id, student| {
        summary_row(&config, id, student)
    }, &students)?;
    println!("Summary CSV written: {}", summary_path.display());

    println!(
        "Processed {} files, {} students",
        files.len(),
        students.len()
    );
    Ok(())
}

fn write_csv(
    path: &std::path::Path,
    header: Vec<String>,
    row: impl Fn(&str, &StudentExport) -> Vec<String>,
    students: &BTreeMap<String, StudentExport>,
) -> Result<()> {
    let mut out = String::new();
    out.push_str(&to_csv_line(&header));
    for (id, student) in students {
        out.push_str(&to_csv_line(&row(id, student)));
    }
    std::fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Program stem used in CSV column names, with the one known legacy
/// misspelling normalized.
fn column_stem(program: &str) -> String {
    let stem = program.strip_suffix(".c").unwrap_or(program);
    normalize_stem(stem)
}

fn normalize_stem(stem: &str) -> String {
    if stem == "conversionSegHMS" {
        "conversionSegsHMS".to_string()
    } else {
        stem.to_string()
    }
}

/// Grade-book entry for a program, also trying the legacy misspelled name
/// found in older score files.
fn book_entry<'a>(book: &'a GradeBook, program: &str) -> Option<&'a GradeEntry> {
    if let Some(entry) = book.get(program) {
        return Some(entry);
    }
    if program.contains("conversionSegsHMS") {
        let legacy = program.replace("conversionSegsHMS", "conversionSegHMS");
        return book.get(&legacy);
    }
    None
}

fn merged_header(config: &BoletinConfig) -> Vec<String> {
    let mut header: Vec<String> = [
        "student_id",
        "total_score",
        "max_score",
        "base_percentage",
        "overall_percentage",
        "grade",
        "programs_evaluated",
        "programs_expected",
        "penalty_factor",
        "missing_programs",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    for program in &config.evaluation.expected_programs {
        let stem = column_stem(program);
        for suffix in [
            "score",
            "max_score",
            "percentage",
            "tests",
            "passed",
            "failed",
            "compilation_errors",
            "evaluator_score",
            "comments",
        ] {
            header.push(format!("{stem}_{suffix}"));
        }
    }
    header
}

fn merged_row(config: &BoletinConfig, student_id: &str, student: &StudentExport) -> Vec<String> {
    let mut row = vec![student_id.to_string()];

    match &student.report {
        Some(report) => {
            let s = &report.summary;
            row.extend([
                s.total_score.to_string(),
                s.max_score.to_string(),
                format!("{:.2}", s.base_percentage),
                format!("{:.2}", s.overall_percentage),
                s.grade.to_string(),
                s.programs_evaluated.to_string(),
                s.programs_expected.to_string(),
                format!("{:.3}", s.penalty_factor),
                s.missing_programs.join(", "),
            ]);
        }
        None => {
            // Evaluator-only student: the book's total is the only score.
            let total = student
                .book
                .as_ref()
                .and_then(|b| b.total)
                .map(|t| t.to_string())
                .unwrap_or_default();
            row.push(total);
            row.extend(std::iter::repeat(String::new()).take(8));
        }
    }

    for program in &config.evaluation.expected_programs {
        match student
            .report
            .as_ref()
            .and_then(|r| r.program_details.get(program))
        {
            Some(d) => row.extend([
                d.total_score.to_string(),
                d.max_score.to_string(),
                format!("{:.2}", d.percentage),
                d.tests.to_string(),
                d.passed.to_string(),
                d.failed.to_string(),
                d.compilation_errors.to_string(),
            ]),
            None => row.extend(std::iter::repeat(String::new()).take(7)),
        }
        match &student.book {
            Some(book) => match book_entry(book, program) {
                Some(entry) => row.extend([
                    entry.calificacion.to_string(),
                    entry.comentarios.clone(),
                ]),
                None => row.extend(["0".to_string(), "Not found".to_string()]),
            },
            None => row.extend([String::new(), String::new()]),
        }
    }
    row
}

fn summary_header(config: &BoletinConfig) -> Vec<String> {
    let mut header: Vec<String> = [
        "student_id",
        "total_score",
        "max_score",
        "overall_percentage",
        "grade",
        "programs_evaluated",
        "programs_expected",
        "missing_programs",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    for program in &config.evaluation.expected_programs {
        header.push(format!("{}_score", column_stem(program)));
    }
    header
}

fn summary_row(config: &BoletinConfig, student_id: &str, student: &StudentExport) -> Vec<String> {
    let mut row = vec![student_id.to_string()];
    match &student.report {
        Some(report) => {
            let s = &report.summary;
            row.extend([
                s.total_score.to_string(),
                s.max_score.to_string(),
                format!("{:.2}", s.overall_percentage),
                s.grade.to_string(),
                s.programs_evaluated.to_string(),
                s.programs_expected.to_string(),
                s.missing_programs.join(", "),
            ]);
        }
        None => {
            let total = student
                .book
                .as_ref()
                .and_then(|b| b.total)
                .map(|t| t.to_string())
                .unwrap_or_default();
            row.push(total);
            row.extend(std::iter::repeat(String::new()).take(6));
        }
    }
    for program in &config.evaluation.expected_programs {
        let score = match student
            .report
            .as_ref()
            .and_then(|r| r.program_details.get(program))
        {
            Some(d) => d.total_score.to_string(),
            None => student
                .book
                .as_ref()
                .and_then(|b| book_entry(b, program))
                .map(|e| e.calificacion.to_string())
                .unwrap_or_default(),
        };
        row.push(score);
    }
    row
}

fn to_csv_line(fields: &[String]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_escape(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Quote a field when it contains a delimiter, quote, or newline; embedded
/// quotes are doubled.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
