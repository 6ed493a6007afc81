//! Score aggregation: per-program accumulators, run metadata, and the
//! penalty-adjusted evaluation summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{CompilationStatus, Grade, TestRecord, TestStatus};

/// Running totals for one program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramScore {
    /// Points awarded across all tests.
    pub total_score: i64,
    /// Maximum attainable points; accrues a fixed per-test increment
    /// regardless of outcome.
    pub max_score: i64,
    /// Number of tests executed.
    pub tests: u32,
    pub passed: u32,
    pub failed: u32,
    pub compilation_errors: u32,
    /// False until a non-`NO_FILE` record is seen for this program.
    pub exists: bool,
}

impl ProgramScore {
    /// total/max × 100; defined as 0 when no points were attainable.
    pub fn percentage(&self) -> f64 {
        if self.max_score > 0 {
            self.total_score as f64 / self.max_score as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Run-level facts about the record set as a whole, kept separate from the
/// per-program accumulators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Programs the assignment expects, in canonical order.
    pub expected_programs: Vec<String>,
    /// Expected programs with no submitted file, in expected order.
    pub missing_programs: Vec<String>,
    /// Expected programs that were actually submitted.
    pub programs_found: usize,
    pub total_expected: usize,
    /// programs_found / total_expected, in [0, 1]. 1.0 when nothing was
    /// expected.
    pub penalty_factor: f64,
}

/// The result of folding a record set: per-program scores plus run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub programs: BTreeMap<String, ProgramScore>,
    pub metadata: RunMetadata,
}

impl ScoreBoard {
    /// Sum of awarded and attainable points across all programs.
    pub fn totals(&self) -> (i64, i64) {
        self.programs.values().fold((0, 0), |(total, max), p| {
            (total + p.total_score, max + p.max_score)
        })
    }

    /// Number of programs with a submitted file.
    pub fn programs_evaluated(&self) -> usize {
        self.programs.values().filter(|p| p.exists).count()
    }
}

/// Fold test records into per-program scores and run metadata.
///
/// `NO_FILE` records create the program's entry (so it shows up in the
/// details) but accumulate nothing and leave `exists` false. Every expected
/// program gets an entry even when no record mentions it.
pub fn aggregate(records: &[TestRecord], expected: &[String], points_per_test: i64) -> ScoreBoard {
    let mut programs: BTreeMap<String, ProgramScore> = BTreeMap::new();

    for record in records {
        let entry = programs.entry(record.program.clone()).or_default();
        if record.compilation == CompilationStatus::NoFile {
            continue;
        }

        entry.exists = true;
        entry.tests += 1;
        entry.total_score += record.score;
        entry.max_score += points_per_test;

        match record.status {
            TestStatus::Pass => entry.passed += 1,
            TestStatus::Fail => entry.failed += 1,
        }
        if record.compilation == CompilationStatus::CompileError {
            entry.compilation_errors += 1;
        }
    }

    let missing_programs: Vec<String> = expected
        .iter()
        .filter(|p| !programs.entry((*p).clone()).or_default().exists)
        .cloned()
        .collect();

    let total_expected = expected.len();
    let programs_found = total_expected - missing_programs.len();
    let penalty_factor = if total_expected > 0 {
        programs_found as f64 / total_expected as f64
    } else {
        1.0
    };

    ScoreBoard {
        programs,
        metadata: RunMetadata {
            expected_programs: expected.to_vec(),
            missing_programs,
            programs_found,
            total_expected,
            penalty_factor,
        },
    }
}

/// Derived, immutable overall summary of a score board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub total_score: i64,
    pub max_score: i64,
    /// total/max × 100, before the missing-program penalty. Two decimals.
    pub base_percentage: f64,
    /// base × penalty_factor. Not clamped at 100. Two decimals.
    pub overall_percentage: f64,
    pub grade: Grade,
    pub programs_evaluated: usize,
    pub programs_expected: usize,
    /// Three decimals.
    pub penalty_factor: f64,
    pub missing_programs: Vec<String>,
}

impl EvaluationSummary {
    pub fn compute(board: &ScoreBoard) -> Self {
        let (total_score, max_score) = board.totals();
        let base_percentage = if max_score > 0 {
            total_score as f64 / max_score as f64 * 100.0
        } else {
            0.0
        };
        let overall_percentage = base_percentage * board.metadata.penalty_factor;
        // Grade from the exact value; rounding is presentation only.
        let grade = Grade::from_percentage(overall_percentage);

        EvaluationSummary {
            total_score,
            max_score,
            base_percentage: round2(base_percentage),
            overall_percentage: round2(overall_percentage),
            grade,
            programs_evaluated: board.programs_evaluated(),
            programs_expected: board.metadata.total_expected,
            penalty_factor: round3(board.metadata.penalty_factor),
            missing_programs: board.metadata.missing_programs.clone(),
        }
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub(crate) fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
