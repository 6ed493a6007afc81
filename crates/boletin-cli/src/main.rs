//! boletin CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "boletin", version, about = "Academic grading report generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a grade report PDF from an evaluator's score JSON
    Grades {
        /// Per-student score JSON (program → calificación + comentarios)
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Write the .tex source without invoking the LaTeX engine
        #[arg(long)]
        tex_only: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate a testing report PDF + JSON summary from harness results
    Testing {
        /// Test results file (CSV/TSV from the test harness)
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Write the .tex and .json without invoking the LaTeX engine
        #[arg(long)]
        tex_only: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Merge a directory of per-student score JSONs into CSVs
    Export {
        /// Directory containing *.json score files
        scores_dir: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter boletin.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("boletin=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grades {
            input,
            output_dir,
            tex_only,
            config,
        } => commands::grades::execute(input, output_dir, tex_only, config).await,
        Commands::Testing {
            input,
            output_dir,
            tex_only,
            config,
        } => commands::testing::execute(input, output_dir, tex_only, config).await,
        Commands::Export {
            scores_dir,
            output_dir,
            config,
        } => commands::export::execute(scores_dir, output_dir, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
