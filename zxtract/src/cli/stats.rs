//! The `stats` CLI subcommand.

use clap::Parser;
use std::path::PathBuf;

use crate::circuit::Circuit;

use super::CliError;

/// Print gate counts for a circuit.
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// QASM file to read.
    input: PathBuf,

    /// Count gates after decomposing into 1- and 2-qubit gates.
    #[arg(long)]
    basic: bool,
}

impl StatsArgs {
    pub fn run(self) -> Result<(), CliError> {
        let mut circ = Circuit::from_file(&self.input.to_string_lossy())?;
        if self.basic {
            circ = circ.to_basic_gates();
        }
        println!("{}", circ.stats());
        Ok(())
    }
}
