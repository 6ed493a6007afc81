//! TOML configuration with defaults matching the original course setup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level boletin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoletinConfig {
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub latex: LatexConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// What the assignment expects and how tests are weighted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Programs the assignment expects, in canonical report order.
    #[serde(default = "default_expected_programs")]
    pub expected_programs: Vec<String>,
    /// Max points each executed test contributes to `max_score`.
    #[serde(default = "default_points_per_test")]
    pub points_per_test: i64,
}

/// External LaTeX toolchain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatexConfig {
    /// Engine binary, invoked with `-interaction=nonstopmode`.
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Hard wall-clock bound on one compilation.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Keep the `.tex` source next to the PDF for debugging.
    #[serde(default)]
    pub keep_tex: bool,
}

/// Report cosmetics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Institution logo path, relative to where the engine runs.
    #[serde(default = "default_logo")]
    pub logo: String,
    /// Signature line at the bottom of every report.
    #[serde(default = "default_signature")]
    pub signature: String,
    /// Display titles per program; falls back to the file stem.
    #[serde(default = "default_program_titles")]
    pub program_titles: BTreeMap<String, String>,
}

fn default_expected_programs() -> Vec<String> {
    [
        "operaciones.c",
        "conversionCmsMts.c",
        "conversionSegsHMS.c",
        "resistencia.c",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_points_per_test() -> i64 {
    10
}

fn default_engine() -> String {
    "pdflatex".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_logo() -> String {
    "public/ibero.png".to_string()
}

fn default_signature() -> String {
    "Prof. Edgar Ortiz".to_string()
}

fn default_program_titles() -> BTreeMap<String, String> {
    [
        ("operaciones.c", "Operaciones Básicas"),
        ("conversionCmsMts.c", "Conversión Centímetros a Metros"),
        (
            "conversionSegsHMS.c",
            "Conversión Segundos a Horas-Minutos-Segundos",
        ),
        ("resistencia.c", "Cálculo de Resistencia Eléctrica"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            expected_programs: default_expected_programs(),
            points_per_test: default_points_per_test(),
        }
    }
}

impl Default for LatexConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            timeout_secs: default_timeout_secs(),
            keep_tex: false,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            logo: default_logo(),
            signature: default_signature(),
            program_titles: default_program_titles(),
        }
    }
}

impl ReportConfig {
    /// Display title for a program, falling back to its capitalized stem.
    pub fn title_for(&self, program: &str) -> String {
        if let Some(title) = self.program_titles.get(program) {
            return title.clone();
        }
        let stem = program.strip_suffix(".c").unwrap_or(program);
        let mut chars = stem.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

/// Load config from an explicit path, or `./boletin.toml` if present, or
/// defaults.
pub fn load_config_from(path: Option<&Path>) -> Result<BoletinConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("config file not found: {}", p.display());
            }
            Some(p.to_path_buf())
        }
        None => {
            let local = PathBuf::from("boletin.toml");
            local.exists().then_some(local)
        }
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))
        }
        None => Ok(BoletinConfig::default()),
    }
}
