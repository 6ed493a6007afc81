//! The machine-readable evaluation summary with JSON persistence.
//!
//! This is the fixed schema the testing pipeline writes next to the PDF and
//! that `boletin export` reads back; save→load must reproduce identical
//! numbers (the only lossy step is the 2-decimal rounding at compute time).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{round2, EvaluationSummary, ProgramScore, ScoreBoard};

/// A complete per-student evaluation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub student_id: String,
    pub evaluation_date: DateTime<Utc>,
    pub summary: EvaluationSummary,
    pub program_details: BTreeMap<String, ProgramDetail>,
}

/// Per-program slice of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramDetail {
    pub exists: bool,
    pub total_score: i64,
    pub max_score: i64,
    /// Two decimals.
    pub percentage: f64,
    pub tests: u32,
    pub passed: u32,
    pub failed: u32,
    pub compilation_errors: u32,
}

impl From<&ProgramScore> for ProgramDetail {
    fn from(score: &ProgramScore) -> Self {
        ProgramDetail {
            exists: score.exists,
            total_score: score.total_score,
            max_score: score.max_score,
            percentage: round2(score.percentage()),
            tests: score.tests,
            passed: score.passed,
            failed: score.failed,
            compilation_errors: score.compilation_errors,
        }
    }
}

impl EvaluationReport {
    /// Build a report from an aggregated score board, stamped with the
    /// current time.
    pub fn from_board(student_id: &str, board: &ScoreBoard) -> Self {
        EvaluationReport {
            student_id: student_id.to_string(),
            evaluation_date: Utc::now(),
            summary: EvaluationSummary::compute(board),
            program_details: board
                .programs
                .iter()
                .map(|(name, score)| (name.clone(), ProgramDetail::from(score)))
                .collect(),
        }
    }

    /// Save the report as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: EvaluationReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
