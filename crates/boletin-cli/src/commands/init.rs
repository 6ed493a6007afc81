//! The `boletin init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("boletin.toml").exists() {
        println!("boletin.toml already exists, skipping.");
    } else {
        std::fs::write("boletin.toml", SAMPLE_CONFIG)?;
        println!("Created boletin.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit boletin.toml for your assignment");
    println!("  2. Run: boletin testing results_<student>.csv");
    println!("  3. Run: boletin grades <student>.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# boletin configuration

[evaluation]
expected_programs = [
    "operaciones.c",
    "conversionCmsMts.c",
    "conversionSegsHMS.c",
    "resistencia.c",
]
points_per_test = 10

[latex]
engine = "pdflatex"
timeout_secs = 30
keep_tex = false

[report]
logo = "public/ibero.png"
signature = "Prof. Edgar Ortiz"

[report.program_titles]
"operaciones.c" = "Operaciones Básicas"
"conversionCmsMts.c" = "Conversión Centímetros a Metros"
"conversionSegsHMS.c" = "Conversión Segundos a Horas-Minutos-Segundos"
"resistencia.c" = "Cálculo de Resistencia Eléctrica"
"#;
