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

//! Circuit extraction from graph-like ZX-diagrams.
//!
//! A circuit is turned into a ZX-diagram with
//! [Circuit::to_graph](circuit::Circuit::to_graph), simplified with the
//! rewrites in [simplify], and turned back into a circuit with
//! [ToCircuit](extract::ToCircuit).
//!
//! ```
//! use zxtract::circuit::Circuit;
//! use zxtract::extract::ToCircuit;
//! use zxtract::simplify::clifford_simp;
//! use zxtract::vec_graph::Graph;
//!
//! let c = Circuit::from_qasm("qreg q[2]; cx q[0], q[1]; h q[1]; cx q[0], q[1];").unwrap();
//! let mut g: Graph = c.to_graph();
//! clifford_simp(&mut g);
//! let c1 = g.to_circuit().unwrap();
//! assert_eq!(c1.num_qubits(), 2);
//! ```

pub mod phase;
pub mod scalar;
pub mod graph;
pub mod vec_graph;
pub mod linalg;
pub mod gate;
pub mod circuit;
pub mod generate;
pub mod tensor;
pub mod basic_rules;
pub mod rewrite;
pub mod simplify;
pub mod extract;
pub mod cli;
