// crates/devprofile-rs-catalog/src/bin/devprofile.rs

use clap::{Parser, Subcommand, ValueEnum};
use devprofile_rs::{Config, Grammar};
use devprofile_rs_catalog::{Catalog, CatalogError, StoreError, container};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "devprofile")]
#[command(about = "Ingest, export and grade industrial device descriptions")]
#[command(version)]
struct Cli {
    #[arg(long, env = "DEVPROFILE_DB", default_value = "devprofile.db", help = "Catalog database file")]
    db: PathBuf,
    #[arg(long, env = "DEVPROFILE_CONFIG", help = "TOML configuration file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Ingest a document or a ZIP container of documents")]
    Ingest {
        #[arg(help = "Path to the document or container")]
        path: PathBuf,
    },
    #[command(about = "Reconstruct a stored profile")]
    Export {
        id: String,
        #[arg(long, value_enum, help = "Target grammar (defaults to the configured or source grammar)")]
        grammar: Option<GrammarArg>,
        #[arg(long, short, help = "Write to this file instead of stdout")]
        output: Option<PathBuf>,
    },
    #[command(about = "Run the fidelity check of a stored profile and print the report")]
    Quality { id: String },
    #[command(about = "Print every stored quality report of a profile")]
    Reports { id: String },
    #[command(about = "Delete a profile and its reports")]
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum GrammarArg {
    /// IODD-style XML
    Markup,
    /// EDS-style INI
    SectionText,
}

impl From<GrammarArg> for Grammar {
    fn from(arg: GrammarArg) -> Self {
        match arg {
            GrammarArg::Markup => Grammar::Markup,
            GrammarArg::SectionText => Grammar::SectionText,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error [ConfigError]: {}", e);
                return ExitCode::from(2);
            }
        },
        None => Config::default(),
    };

    match run(cli.command, &cli.db, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error [{}]: {}", e.kind(), e);
            exit_code_for_error(&e)
        }
    }
}

fn run(command: Commands, db: &Path, config: Config) -> Result<ExitCode, CatalogError> {
    let catalog = Catalog::open(db, config)?;

    match command {
        Commands::Ingest { path } => {
            let bytes = fs::read(&path)?;
            if container::is_container(&bytes) {
                let mut failed = false;
                for member in catalog.ingest_container(&bytes)? {
                    match member.result {
                        Ok(id) => println!("{}\t{}", id, member.name),
                        Err(e) => {
                            failed = true;
                            eprintln!("Error [{}] in {}: {}", e.kind(), member.name, e);
                        }
                    }
                }
                return Ok(if failed { ExitCode::from(2) } else { ExitCode::SUCCESS });
            }
            println!("{}", catalog.ingest(&bytes)?);
        }
        Commands::Export { id, grammar, output } => {
            let bytes = catalog.export(&id, grammar.map(Grammar::from))?;
            let written = match output {
                Some(path) => fs::write(path, &bytes),
                None => io::stdout().write_all(&bytes),
            };
            written?;
        }
        Commands::Quality { id } => {
            let report = catalog.run_quality(&id)?;
            print_json(&report);
        }
        Commands::Reports { id } => {
            let reports = catalog.reports(&id)?;
            print_json(&reports);
        }
        Commands::Delete { id } => catalog.delete(&id)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize report: {}", e),
    }
}

/// 2 for rejected input, 3 for storage and internal failures.
fn exit_code_for_error(err: &CatalogError) -> ExitCode {
    match err {
        CatalogError::Store(StoreError::NotFound(_))
        | CatalogError::Parse(_)
        | CatalogError::Container(_)
        | CatalogError::Fidelity(_)
        | CatalogError::Io(_) => ExitCode::from(2),
        _ => ExitCode::from(3),
    }
}
