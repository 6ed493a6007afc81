//! Input parsers for the harness's grade books and results files.
//!
//! Both formats are external contracts: a JSON object mapping programs to
//! evaluator scores, and a delimiter-sniffed tabular results file. Malformed
//! individual rows degrade gracefully; only an unreadable or unparseable
//! file is fatal.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::model::{CompilationStatus, GradeBook, GradeEntry, TestRecord, TestStatus};

/// Load a per-student grade book JSON.
///
/// Program entries are objects with `calificacion`/`comentarios`; a top-level
/// numeric `total` is kept separately. Anything else is ignored.
pub fn load_grade_book(path: &Path) -> Result<GradeBook> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read grade book: {}", path.display()))?;
    parse_grade_book(&content)
        .with_context(|| format!("failed to parse grade book: {}", path.display()))
}

/// Parse grade book JSON from a string.
pub fn parse_grade_book(content: &str) -> Result<GradeBook> {
    let value: Value = serde_json::from_str(content).context("invalid JSON")?;
    let object = value
        .as_object()
        .context("grade book must be a JSON object")?;

    let mut book = GradeBook::default();
    for (key, val) in object {
        if key == "total" {
            book.total = val.as_i64();
            continue;
        }
        match val {
            Value::Object(_) => {
                let entry: GradeEntry = serde_json::from_value(val.clone())
                    .with_context(|| format!("bad entry for program '{key}'"))?;
                book.entries.insert(key.clone(), entry);
            }
            _ => {
                tracing::warn!("ignoring non-object grade book key '{key}'");
            }
        }
    }
    Ok(book)
}

/// Load the harness's tabular results file.
pub fn load_results(path: &Path) -> Result<Vec<TestRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read results file: {}", path.display()))?;
    parse_results(&content)
        .with_context(|| format!("failed to parse results file: {}", path.display()))
}

/// Parse results from a string. The delimiter is sniffed from the header
/// line; rows with too few fields are skipped with a warning, and malformed
/// score fields default to 0 so one bad cell never sinks the run.
pub fn parse_results(content: &str) -> Result<Vec<TestRecord>> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header_line = lines.next().context("results file is empty")?;

    let delimiter = sniff_delimiter(header_line);
    let header = split_fields(header_line, delimiter);
    let columns = Columns::from_header(&header)?;

    let mut records = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let fields = split_fields(line, delimiter);
        if fields.len() < header.len() {
            tracing::warn!(
                "skipping malformed row {} ({} of {} fields)",
                line_no + 2,
                fields.len(),
                header.len()
            );
            continue;
        }
        records.push(columns.to_record(&fields));
    }
    Ok(records)
}

/// Pick the delimiter that occurs most often in the header line.
fn sniff_delimiter(header: &str) -> char {
    [',', ';', '\t']
        .into_iter()
        .max_by_key(|d| header.matches(*d).count())
        .unwrap_or(',')
}

/// Split one line into fields, honoring double-quoted fields with embedded
/// delimiters and `""` escapes.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' && current.is_empty() {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);
    fields
}

/// Header-name → field-index mapping. Column order in the file is free.
struct Columns {
    program: usize,
    score: Option<usize>,
    status: Option<usize>,
    compilation: Option<usize>,
    input_values: Option<usize>,
    expected: Option<usize>,
    actual: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);

        Ok(Columns {
            program: find("Program_Name").context("missing Program_Name column")?,
            score: find("Test_Score"),
            status: find("Test_Status"),
            compilation: find("Compilation_Status"),
            input_values: find("Input_Values"),
            expected: find("Expected_Result"),
            actual: find("Actual_Result"),
        })
    }

    fn to_record(&self, fields: &[String]) -> TestRecord {
        let get = |idx: Option<usize>| {
            idx.and_then(|i| fields.get(i))
                .map(|s| s.as_str())
                .unwrap_or("")
        };

        let score = get(self.score).trim().parse::<i64>().unwrap_or_else(|_| {
            if !get(self.score).trim().is_empty() {
                tracing::warn!("malformed Test_Score '{}', using 0", get(self.score));
            }
            0
        });

        let status = TestStatus::from_str(get(self.status)).unwrap_or(TestStatus::Fail);
        let compilation =
            CompilationStatus::from_str(get(self.compilation)).unwrap_or(CompilationStatus::Ok);

        TestRecord {
            program: fields[self.program].trim().to_string(),
            score,
            status,
            compilation,
            input_values: get(self.input_values).to_string(),
            expected: get(self.expected).to_string(),
            actual: get(self.actual).to_string(),
        }
    }
}
