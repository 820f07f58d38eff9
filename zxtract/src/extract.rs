// QuiZX - Rust library for quantum circuit rewriting and optimisation
//         using the ZX-calculus
// Copyright (C) 2021 - Aleks Kissinger
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Circuit extraction from graph-like ZX-diagrams
//!
//! Extraction works from the outputs backwards. The spiders next to the
//! outputs form a *frontier*, and the circuit is built by prepending
//! gates while the frontier is pushed back towards the inputs:
//!
//! 1. Boundaries are normalised so every input hangs off a Z spider by a
//!    Hadamard edge.
//! 2. Output wires are peeled off, turning Hadamard edges and spider
//!    phases into gates. Edges between frontier spiders become CZs.
//! 3. In each round the frontier is row-reduced against its neighbours.
//!    The row operations become CNOTs, and every frontier spider left
//!    with a single neighbour is swapped for that neighbour.
//! 4. Once only inputs remain, the leftover permutation becomes SWAPs,
//!    written as CNOT triples.
//! 5. Zero rotations and cancelling Hadamards are cleaned up.
//!
//! The result is equal to the diagram up to a positive real scalar. The
//! phase of the diagram's scalar becomes the circuit's global phase.

use crate::basic_rules::unfuse_boundary;
use crate::circuit::Circuit;
use crate::gate::*;
use crate::graph::*;
use crate::linalg::*;
use crate::phase::Phase;
use crate::rewrite::*;
use itertools::Itertools;
use log::{debug, trace, warn};
use num::traits::Zero;
use rustc_hash::FxHashSet;
use thiserror::Error;

/// Extraction could not finish
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// No frontier spider could be extracted for two rounds in a row, or
    /// the round limit was reached.
    #[error("extraction stalled after {rounds} rounds with {remaining} vertices left")]
    Stalled { rounds: usize, remaining: usize },
    /// The diagram is not of a shape extraction can handle.
    #[error("cannot extract circuit: {0}")]
    InvariantViolation(String),
}

use ExtractError::InvariantViolation;

pub trait ToCircuit: GraphLike {
    /// Extract a circuit with the default options, using up this graph
    fn into_circuit(&mut self) -> Result<Circuit, ExtractError> {
        Extractor::new(self).extract()
    }

    fn to_circuit(&self) -> Result<Circuit, ExtractError> {
        self.clone().into_circuit()
    }

    fn extractor(&mut self) -> Extractor<'_, Self> {
        Extractor::new(self)
    }
}

impl<G: GraphLike> ToCircuit for G {}

/// Prepends the gates realising row operations on the frontier
///
/// Row `i` of the matrix being reduced belongs to qubit `qubits[i]`.
struct FrontierGates<'c> {
    circuit: &'c mut Circuit,
    qubits: &'c [usize],
}

impl RowOps for FrontierGates<'_> {
    fn row_add(&mut self, r0: usize, r1: usize) {
        // adding r0 into r1 is a CNOT controlled on r1, targeting r0
        let (c, t) = (self.qubits[r1], self.qubits[r0]);
        self.circuit.push_front(Gate::new(CNOT, vec![c, t]));
    }

    fn row_swap(&mut self, r0: usize, r1: usize) {
        let (a, b) = (self.qubits[r0], self.qubits[r1]);
        self.circuit.push_front(Gate::new(CNOT, vec![a, b]));
        self.circuit.push_front(Gate::new(CNOT, vec![b, a]));
        self.circuit.push_front(Gate::new(CNOT, vec![a, b]));
    }
}

/// Remove zero rotations, then cancel adjacent Hadamards, each to a
/// fixed point. Returns true if the circuit changed.
pub fn cleanup(c: &mut Circuit) -> bool {
    let m = simplify_to_fixed_point(&RemoveZeroPhase, c);
    simplify_to_fixed_point(&CancelHadamardPair, c) || m
}

pub struct Extractor<'a, G: GraphLike> {
    g: &'a mut G,
    frontier: Vec<(usize, V)>,
    num_qubits: usize,
    up_to_perm: bool,
    max_rounds: Option<usize>,
    cleanup: bool,
}

impl<'a, G: GraphLike> Extractor<'a, G> {
    pub fn new(g: &'a mut G) -> Extractor<'a, G> {
        Extractor {
            g,
            frontier: Vec::new(),
            num_qubits: 0,
            up_to_perm: false,
            max_rounds: None,
            cleanup: true,
        }
    }

    /// Leave the final permutation of the inputs in the diagram
    pub fn up_to_perm(&mut self) -> &mut Self {
        self.up_to_perm = true;
        self
    }

    /// Give up with [ExtractError::Stalled] after this many rounds
    pub fn max_rounds(&mut self, rounds: usize) -> &mut Self {
        self.max_rounds = Some(rounds);
        self
    }

    /// Return the circuit exactly as extracted, without peephole cleanup
    pub fn skip_cleanup(&mut self) -> &mut Self {
        self.cleanup = false;
        self
    }

    /// Width of the extracted circuit. Zero means one qubit per output.
    pub fn num_qubits(&mut self, n: usize) -> &mut Self {
        self.num_qubits = n;
        self
    }

    /// The current frontier, as pairs `(qubit, vertex)` sorted by qubit
    pub fn frontier(&self) -> &[(usize, V)] {
        &self.frontier
    }

    fn frontier_qubit(&self, v: V) -> Option<usize> {
        self.frontier.iter().find(|&&(_, u)| u == v).map(|&(q, _)| q)
    }

    /// Make every input hang off a Z spider by a Hadamard edge
    ///
    /// The diagram is first made graph-like: X spiders are recoloured and
    /// adjacent Z spiders fused.
    fn normalize_boundaries(&mut self) -> Result<(), ExtractError> {
        self.g.x_to_z();
        simplify_to_fixed_point(&SpiderFusion, self.g);

        for &b in &self.g.inputs().clone() {
            if self.g.degree(b) != 1 {
                return Err(InvariantViolation(format!(
                    "input {b} has degree {}",
                    self.g.degree(b)
                )));
            }
            let Some((v, et)) = self.g.incident_edges(b).next() else {
                continue;
            };
            if et != EType::H || self.g.vertex_type(v) != VType::Z {
                if let Some(v1) = unfuse_boundary(self.g, v, b) {
                    trace!("padded input {b} with {v1}");
                }
            }
        }

        Ok(())
    }

    /// Replace output wires by gates and form the initial frontier
    fn peel_outputs(&mut self, c: &mut Circuit) -> Result<(), ExtractError> {
        self.frontier.clear();

        for (q, o) in self.g.outputs().clone().into_iter().enumerate() {
            let edge = {
                let mut edges = self.g.incident_edges(o);
                match (edges.next(), edges.next()) {
                    (Some(e), None) => Some(e),
                    _ => None,
                }
            };
            let Some((v, et)) = edge else {
                return Err(InvariantViolation(format!(
                    "output {o} does not have exactly one neighbour"
                )));
            };
            if self.g.vertex_type(v) != VType::Z {
                return Err(InvariantViolation(format!(
                    "output {o} is not connected to a spider"
                )));
            }
            if self.frontier_qubit(v).is_some() {
                return Err(InvariantViolation(format!(
                    "two outputs connected to a single vertex {v}"
                )));
            }

            if et == EType::H {
                c.push_front(Gate::new(HAD, vec![q]));
            }
            c.push_front(Gate::new_with_phase(ZPhase, vec![q], self.g.phase(v)));
            self.g.set_phase(v, Phase::zero());
            self.g.set_qubit(v, q as f64);
            self.g.remove_edge(v, o);
            self.frontier.push((q, v));
        }

        Ok(())
    }

    /// Replace edges inside the frontier with CZ gates
    fn frontier_cz(&mut self, c: &mut Circuit) {
        for (i, &(q0, v0)) in self.frontier.iter().enumerate() {
            for &(q1, v1) in &self.frontier[i + 1..] {
                if self.g.edge_type_opt(v0, v1) == Some(EType::H) {
                    self.g.remove_edge(v0, v1);
                    c.push_front(Gate::new(CZ, vec![q0, q1]));
                }
            }
        }
    }

    /// Normalise boundaries, peel the outputs and clear frontier edges
    pub fn prepare_frontier(&mut self, c: &mut Circuit) -> Result<(), ExtractError> {
        self.normalize_boundaries()?;
        self.peel_outputs(c)?;
        self.frontier_cz(c);
        Ok(())
    }

    /// Push the frontier back by one round
    ///
    /// Row-reduces the biadjacency matrix between the frontier spiders
    /// and their neighbours, prepending a CNOT for each row operation and
    /// rewiring the graph to match. Every frontier spider left with a
    /// single neighbour is then replaced in the frontier by that
    /// neighbour. Returns the newly extracted vertices.
    pub fn advance_frontier(&mut self, c: &mut Circuit) -> Result<Vec<V>, ExtractError> {
        let rows: Vec<(usize, V)> = self
            .frontier
            .iter()
            .copied()
            .filter(|&(_, v)| self.g.vertex_type(v) == VType::Z && self.g.degree(v) > 0)
            .collect();
        if rows.is_empty() {
            return Ok(vec![]);
        }
        let qubits: Vec<usize> = rows.iter().map(|&(q, _)| q).collect();
        let fverts: Vec<V> = rows.iter().map(|&(_, v)| v).collect();

        let mut nset = FxHashSet::default();
        for &v in &fverts {
            for n in self.g.neighbors(v) {
                if self.frontier_qubit(n).is_some() {
                    return Err(InvariantViolation(format!(
                        "frontier vertices {v} and {n} are connected"
                    )));
                }
                nset.insert(n);
            }
        }
        let neighbors: Vec<V> = nset
            .into_iter()
            .sorted_by(|&a, &b| {
                self.g
                    .qubit(a)
                    .total_cmp(&self.g.qubit(b))
                    .then(a.cmp(&b))
            })
            .collect();

        let m = biadjacency(&*self.g, &fverts, &neighbors);
        let (m0, steps) = gaussian_elimination(&m);
        trace!("frontier {:?} against {:?}, {} row ops", fverts, neighbors, steps.len());

        apply(
            &steps,
            &mut FrontierGates {
                circuit: &mut *c,
                qubits: &qubits,
            },
        );

        for (i, &v) in fverts.iter().enumerate() {
            for (j, &w) in neighbors.iter().enumerate() {
                if m[(i, j)] == 1 {
                    self.g.remove_edge(v, w);
                }
            }
        }
        for (i, &v) in fverts.iter().enumerate() {
            for (j, &w) in neighbors.iter().enumerate() {
                if m0[(i, j)] == 1 {
                    self.g.add_edge_with_type(v, w, EType::H);
                }
            }
        }

        let mut extracted: Vec<(usize, V)> = Vec::new();
        for i in m0.unit_rows() {
            let Some(j) = (0..m0.num_cols()).find(|&j| m0[(i, j)] == 1) else {
                continue;
            };
            let (q, v) = rows[i];
            let w = neighbors[j];
            if self.g.degree(v) != 1 {
                continue;
            }

            let is_input = self.g.vertex_type(w) == VType::B && self.g.is_input(w);
            if !is_input && self.g.vertex_type(w) != VType::Z {
                return Err(InvariantViolation(format!(
                    "vertex {w} behind the frontier is neither a spider nor an input"
                )));
            }

            c.push_front(Gate::new(HAD, vec![q]));
            if !is_input {
                c.push_front(Gate::new_with_phase(ZPhase, vec![q], self.g.phase(w)));
                self.g.set_phase(w, Phase::zero());
                if self.g.qubit(v) != self.g.qubit(w) {
                    self.g.set_qubit(w, self.g.qubit(v));
                    self.g.set_column(w, self.g.column(v) + 1.0);
                }
            }

            self.g.remove_edge(v, w);
            if is_input {
                self.g.add_edge(v, w);
            } else {
                self.g.remove_vertex(v);
            }

            if let Some(entry) = self.frontier.iter_mut().find(|(q1, _)| *q1 == q) {
                entry.1 = w;
            }
            extracted.push((q, w));
        }

        for (i, &(q0, w0)) in extracted.iter().enumerate() {
            for &(q1, w1) in &extracted[i + 1..] {
                if self.g.edge_type_opt(w0, w1) == Some(EType::H) {
                    self.g.remove_edge(w0, w1);
                    c.push_front(Gate::new(CZ, vec![q0, q1]));
                }
            }
        }

        self.frontier.sort_by_key(|&(q, _)| q);
        Ok(extracted.into_iter().map(|(_, w)| w).collect())
    }

    /// Turn the wiring between the inputs and the frontier into SWAPs
    ///
    /// By now every input is attached to a phase-free spider sitting on
    /// some qubit, so the biadjacency matrix is a permutation and reduces
    /// by swaps alone.
    fn permutation_to_swaps(&mut self, c: &mut Circuit) -> Result<(), ExtractError> {
        let inputs = self.g.inputs().clone();
        let mut nbrs = Vec::with_capacity(inputs.len());
        for &b in &inputs {
            let n = {
                let mut ns = self.g.neighbors(b);
                match (ns.next(), ns.next()) {
                    (Some(n), None) => Some(n),
                    _ => None,
                }
            };
            let Some(n) = n else {
                return Err(InvariantViolation(format!(
                    "input {b} does not have exactly one neighbour"
                )));
            };
            nbrs.push(n);
        }
        nbrs.sort_by(|&a, &b| {
            self.g
                .qubit(a)
                .total_cmp(&self.g.qubit(b))
                .then(a.cmp(&b))
        });

        let m = biadjacency(&*self.g, &nbrs, &inputs);
        let (_, steps) = gaussian_elimination(&m);
        let qubits: Vec<usize> = (0..nbrs.len()).collect();
        let mut gates = FrontierGates {
            circuit: c,
            qubits: &qubits,
        };
        for s in &steps {
            if let GEStep::AddTo { .. } = s {
                return Err(InvariantViolation(
                    "inputs are not connected by a permutation".into(),
                ));
            }
            s.apply_to(&mut gates);
        }

        Ok(())
    }

    pub fn extract(&mut self) -> Result<Circuit, ExtractError> {
        let n = if self.num_qubits == 0 {
            self.g.outputs().len()
        } else {
            self.num_qubits
        };
        let mut c = Circuit::new(n);

        if self.g.inputs().len() != self.g.outputs().len() {
            warn!(
                "cannot extract a diagram with {} inputs and {} outputs",
                self.g.inputs().len(),
                self.g.outputs().len()
            );
            c.set_global_phase(self.g.scalar().phase());
            return Ok(c);
        }
        if n < self.g.outputs().len() {
            return Err(InvariantViolation(format!(
                "{} outputs do not fit on {n} qubits",
                self.g.outputs().len()
            )));
        }

        self.prepare_frontier(&mut c)?;

        let mut visited: FxHashSet<V> = self.frontier.iter().map(|&(_, v)| v).collect();
        visited.extend(self.g.outputs().iter().copied());
        visited.extend(
            self.g
                .vertices()
                .filter(|&v| self.g.degree(v) == 0 && self.g.vertex_type(v) != VType::B),
        );

        let mut rounds = 0;
        let mut idle = 0;
        loop {
            let remaining = self.g.vertices().filter(|v| !visited.contains(v)).count();
            if remaining == 0 {
                break;
            }
            if self.max_rounds.is_some_and(|max| rounds >= max) {
                trace!("round cap reached on:\n{}", self.g.to_dot());
                return Err(ExtractError::Stalled { rounds, remaining });
            }

            let extracted = self.advance_frontier(&mut c)?;
            rounds += 1;
            let new = extracted.into_iter().filter(|&w| visited.insert(w)).count();
            debug!("round {rounds}: extracted {new}, {remaining} vertices were left");

            if new == 0 {
                idle += 1;
                if idle >= 2 {
                    trace!("stalled on:\n{}", self.g.to_dot());
                    return Err(ExtractError::Stalled { rounds, remaining });
                }
            } else {
                idle = 0;
            }
        }

        if !self.up_to_perm {
            self.permutation_to_swaps(&mut c)?;
        }
        if self.cleanup {
            cleanup(&mut c);
        }

        c.set_global_phase(self.g.scalar().phase());
        debug!("extracted {} gates in {rounds} rounds", c.num_gates());
        Ok(c)
    }
}
