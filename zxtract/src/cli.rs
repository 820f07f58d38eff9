//! The zxtract command line interface.

use clap::{crate_version, Parser};

use crate::extract::ExtractError;

pub mod extract;
pub mod stats;

/// CLI arguments.
#[derive(Parser, Debug)]
#[clap(version = crate_version!(), long_about = None)]
#[clap(about = "Extract circuits from ZX-diagrams")]
pub enum Cli {
    /// Simplify a circuit as a ZX-diagram and extract it again.
    Extract(extract::ExtractArgs),
    /// Print gate counts for a circuit.
    Stats(stats::StatsArgs),
}

/// Error type for the CLI.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum CliError {
    /// Error reading or writing files.
    #[display("IO error: {_0}")]
    IO(std::io::Error),
    /// Error parsing a QASM file.
    #[display("Error parsing input circuit: {_0}")]
    CircuitParse(String),
    /// Extraction did not produce a circuit.
    #[display("Extraction failed: {_0}")]
    Extract(ExtractError),
}

impl Cli {
    pub fn run(self) -> Result<(), CliError> {
        match self {
            Cli::Extract(args) => args.run(),
            Cli::Stats(args) => args.run(),
        }
    }
}
