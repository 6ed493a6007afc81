//! Core data model types for boletin.
//!
//! These are the fundamental types the report pipelines use to represent
//! test results, evaluator scores, and letter grades.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One row of the harness's results file: a single executed test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    /// Program the test ran against (e.g. "operaciones.c").
    pub program: String,
    /// Points awarded by the harness; 0 when the field was malformed.
    pub score: i64,
    /// Pass/fail verdict.
    pub status: TestStatus,
    /// Compilation outcome for the program under test.
    pub compilation: CompilationStatus,
    /// Input values fed to the program.
    #[serde(default)]
    pub input_values: String,
    /// Expected output.
    #[serde(default)]
    pub expected: String,
    /// Actual output, possibly multi-line.
    #[serde(default)]
    pub actual: String,
}

/// Pass/fail verdict of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pass,
    Fail,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
        }
    }
}

impl FromStr for TestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "PASS" => Ok(TestStatus::Pass),
            "FAIL" => Ok(TestStatus::Fail),
            other => Err(format!("unknown test status: {other}")),
        }
    }
}

/// Compilation outcome reported by the harness for a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompilationStatus {
    Ok,
    CompileError,
    /// The student never submitted the file.
    NoFile,
}

impl fmt::Display for CompilationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilationStatus::Ok => write!(f, "OK"),
            CompilationStatus::CompileError => write!(f, "COMPILE_ERROR"),
            CompilationStatus::NoFile => write!(f, "NO_FILE"),
        }
    }
}

impl FromStr for CompilationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "OK" | "SUCCESS" => Ok(CompilationStatus::Ok),
            "COMPILE_ERROR" => Ok(CompilationStatus::CompileError),
            "NO_FILE" => Ok(CompilationStatus::NoFile),
            other => Err(format!("unknown compilation status: {other}")),
        }
    }
}

/// Letter grade bands. Closed-open intervals except the top band, which is
/// open-ended: percentages are never clamped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grade {
    Excelente,
    Bien,
    Regular,
    Suficiente,
    Insuficiente,
}

impl Grade {
    /// Band lookup from an overall percentage.
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 90.0 {
            Grade::Excelente
        } else if pct >= 80.0 {
            Grade::Bien
        } else if pct >= 70.0 {
            Grade::Regular
        } else if pct >= 60.0 {
            Grade::Suficiente
        } else {
            Grade::Insuficiente
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Excelente => write!(f, "EXCELENTE"),
            Grade::Bien => write!(f, "BIEN"),
            Grade::Regular => write!(f, "REGULAR"),
            Grade::Suficiente => write!(f, "SUFICIENTE"),
            Grade::Insuficiente => write!(f, "INSUFICIENTE"),
        }
    }
}

/// One program's entry in a per-student grade book JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradeEntry {
    /// Evaluator score out of 10.
    #[serde(default)]
    pub calificacion: i64,
    /// Free-text evaluator comments.
    #[serde(default)]
    pub comentarios: String,
}

/// A per-student grade book: program name → evaluator score and comments.
///
/// Program keys appear with and without the `.c` suffix in the wild, so
/// lookups try both forms.
#[derive(Debug, Clone, Default)]
pub struct GradeBook {
    /// Entries keyed by program name as it appeared in the JSON.
    pub entries: BTreeMap<String, GradeEntry>,
    /// Run-level total, when the grader wrote one.
    pub total: Option<i64>,
}

impl GradeBook {
    /// Look up a program, accepting either `name` or `name.c`.
    pub fn get(&self, program: &str) -> Option<&GradeEntry> {
        if let Some(entry) = self.entries.get(program) {
            return Some(entry);
        }
        if let Some(stem) = program.strip_suffix(".c") {
            if let Some(entry) = self.entries.get(stem) {
                return Some(entry);
            }
        }
        self.entries.get(&format!("{program}.c"))
    }
}
