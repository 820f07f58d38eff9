//! The `extract` CLI subcommand.

use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;

use crate::circuit::Circuit;
use crate::extract::ToCircuit;
use crate::graph::GraphLike;
use crate::simplify::clifford_simp;
use crate::vec_graph::Graph;

use super::CliError;

/// Simplify a circuit as a ZX-diagram and extract it again.
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// QASM file to read.
    input: PathBuf,

    /// Output to a file instead of printing the result.
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Extract the diagram as it is, without Clifford simplification.
    #[arg(long)]
    no_simp: bool,

    /// Leave the final qubit permutation out of the circuit.
    #[arg(long)]
    up_to_perm: bool,

    /// Give up after this many extraction rounds.
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Keep zero rotations and adjacent Hadamards in the output.
    #[arg(long)]
    skip_cleanup: bool,
}

impl ExtractArgs {
    /// Run the `extract` command using the provided arguments.
    pub fn run(self) -> Result<(), CliError> {
        let circ = Circuit::from_file(&self.input.to_string_lossy())?;
        info!("read {}", circ.stats());

        let mut g: Graph = circ.to_graph();
        if !self.no_simp {
            clifford_simp(&mut g);
        }
        info!(
            "diagram has {} vertices, {} edges, t-count {}",
            g.num_vertices(),
            g.num_edges(),
            g.tcount()
        );

        let mut e = g.extractor();
        e.num_qubits(circ.num_qubits());
        if self.up_to_perm {
            e.up_to_perm();
        }
        if let Some(rounds) = self.max_rounds {
            e.max_rounds(rounds);
        }
        if self.skip_cleanup {
            e.skip_cleanup();
        }
        let c = e.extract()?;
        info!("extracted {}", c.stats());

        let qasm = c.to_qasm();
        if let Some(out_path) = self.out {
            fs::write(out_path, qasm)?;
        } else {
            println!("{qasm}");
        }
        Ok(())
    }
}
