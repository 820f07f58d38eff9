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

use crate::circuit::Circuit;
use crate::graph::*;
use crate::phase::Phase;
use num::{One, Rational64, Zero};
use std::fmt;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum GType {
    XPhase,
    NOT,
    ZPhase,
    Z,
    S,
    T,
    Sdg,
    Tdg,
    CNOT,
    CZ,
    SWAP,
    HAD,
    TOFF,
    CCZ,
    UnknownGate,
}

pub use GType::*;

impl GType {
    pub fn from_qasm_name(s: &str) -> GType {
        match s {
            "rz" => ZPhase,
            "rx" => XPhase,
            "x" => NOT,
            "z" => Z,
            "s" => S,
            "t" => T,
            "sdg" => Sdg,
            "tdg" => Tdg,
            "h" => HAD,
            "cx" => CNOT,
            "CX" => CNOT,
            "cz" => CZ,
            "ccx" => TOFF,
            "ccz" => CCZ,
            "swap" => SWAP,
            _ => UnknownGate,
        }
    }

    pub fn qasm_name(&self) -> &'static str {
        match self {
            ZPhase => "rz",
            NOT => "x",
            XPhase => "rx",
            Z => "z",
            S => "s",
            T => "t",
            Sdg => "sdg",
            Tdg => "tdg",
            HAD => "h",
            CNOT => "cx",
            CZ => "cz",
            TOFF => "ccx",
            CCZ => "ccz",
            SWAP => "swap",
            UnknownGate => "UNKNOWN",
        }
    }

    /// number of qubits the gate acts on
    ///
    /// If the gate type requires a fixed number of qubits, return it,
    /// otherwise None.
    pub fn num_qubits(&self) -> Option<usize> {
        match self {
            CNOT | CZ | SWAP => Some(2),
            TOFF | CCZ => Some(3),
            UnknownGate => None,
            _ => Some(1),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Gate {
    pub t: GType,
    pub qs: Vec<usize>,
    pub phase: Phase,
}

impl Default for Gate {
    fn default() -> Self {
        Gate {
            t: UnknownGate,
            qs: vec![],
            phase: Phase::zero(),
        }
    }
}

impl Gate {
    pub fn new(t: GType, qs: Vec<usize>) -> Gate {
        Gate {
            t,
            qs,
            ..Default::default()
        }
    }

    pub fn new_with_phase(t: GType, qs: Vec<usize>, phase: impl Into<Phase>) -> Gate {
        Gate {
            t,
            qs,
            phase: phase.into(),
        }
    }

    pub fn from_qasm_name(s: &str) -> Gate {
        Gate::new(GType::from_qasm_name(s), vec![])
    }

    pub fn qasm_name(&self) -> &'static str {
        self.t.qasm_name()
    }

    pub fn to_qasm(&self) -> String {
        let mut s = String::from(self.qasm_name());

        if let ZPhase | XPhase = self.t {
            let r = self.phase.to_rational();
            s += &format!("({}*pi/{})", r.numer(), r.denom());
        }

        s += " ";
        let qs: Vec<String> = self.qs.iter().map(|i| format!("q[{i}]")).collect();
        s += &qs.join(", ");

        s
    }

    /// The phase this gate puts on a single spider, for gates that are
    /// one spider in ZX
    pub fn spider_phase(&self) -> Option<Phase> {
        match self.t {
            ZPhase | XPhase => Some(self.phase),
            Z | NOT => Some(Phase::one()),
            S => Some(Rational64::new(1, 2).into()),
            Sdg => Some(Rational64::new(-1, 2).into()),
            T => Some(Rational64::new(1, 4).into()),
            Tdg => Some(Rational64::new(-1, 4).into()),
            _ => None,
        }
    }

    fn push_ccz_decomp(circ: &mut Circuit, qs: &[usize]) {
        circ.push(Gate::new(CNOT, vec![qs[1], qs[2]]));
        circ.push(Gate::new(Tdg, vec![qs[2]]));
        circ.push(Gate::new(CNOT, vec![qs[0], qs[2]]));
        circ.push(Gate::new(T, vec![qs[2]]));
        circ.push(Gate::new(CNOT, vec![qs[1], qs[2]]));
        circ.push(Gate::new(Tdg, vec![qs[2]]));
        circ.push(Gate::new(CNOT, vec![qs[0], qs[2]]));
        circ.push(Gate::new(T, vec![qs[1]]));
        circ.push(Gate::new(T, vec![qs[2]]));
        circ.push(Gate::new(CNOT, vec![qs[0], qs[1]]));
        circ.push(Gate::new(T, vec![qs[0]]));
        circ.push(Gate::new(Tdg, vec![qs[1]]));
        circ.push(Gate::new(CNOT, vec![qs[0], qs[1]]));
    }

    /// number of 1- and 2-qubit Clifford + phase gates needed to realise this gate
    pub fn num_basic_gates(&self) -> usize {
        match self.t {
            CCZ => 13,
            TOFF => 15,
            _ => 1,
        }
    }

    /// decompose as 1 and 2 qubit Clifford + phase gates and push on to given circuit
    ///
    /// If a gate is already basic, push a copy of itself.
    pub fn push_basic_gates(&self, circ: &mut Circuit) {
        match self.t {
            CCZ => {
                Gate::push_ccz_decomp(circ, &self.qs);
            }
            TOFF => {
                circ.push(Gate::new(HAD, vec![self.qs[2]]));
                Gate::push_ccz_decomp(circ, &self.qs);
                circ.push(Gate::new(HAD, vec![self.qs[2]]));
            }
            _ => circ.push(self.clone()),
        }
    }

    /// Turn the current output on `qubit` into a spider and plug a fresh
    /// output boundary after it.
    fn add_spider(
        graph: &mut impl GraphLike,
        qubit: usize,
        ty: VType,
        et: EType,
        phase: impl Into<Phase>,
    ) -> Option<V> {
        let v0 = *graph.outputs().get(qubit)?;
        let prev = graph.neighbors(v0).next();
        let column = graph.column(v0);

        graph.set_vertex_type(v0, ty);
        graph.set_phase(v0, phase.into());
        let outp = graph.add_vertex_with_data(VData {
            ty: VType::B,
            qubit: qubit as f64,
            column: column + 1.0,
            ..Default::default()
        });

        graph.add_edge(v0, outp);
        graph.outputs_mut()[qubit] = outp;

        if et == EType::H {
            if let Some(v1) = prev {
                graph.toggle_edge_type(v0, v1);
            }
        }

        Some(v0)
    }

    /// Line up the columns of a two-qubit gate's spiders and their outputs.
    fn align_columns(graph: &mut impl GraphLike, v1: V, v2: V, q1: usize, q2: usize) {
        let o1 = graph.outputs()[q1];
        let o2 = graph.outputs()[q2];
        let column = graph.column(o1).max(graph.column(o2));
        graph.set_column(v1, column - 1.0);
        graph.set_column(v2, column - 1.0);
        graph.set_column(o1, column);
        graph.set_column(o2, column);
    }

    /// Add the gate to the given graph using spiders.
    ///
    /// `graph.outputs()[q]` is taken to be the current end of qubit `q`.
    /// Returns the spiders that were added for basic gates, and an empty
    /// vec for compound gates.
    pub fn add_to_graph(&self, graph: &mut impl GraphLike) -> Vec<V> {
        match self.t {
            ZPhase | Z | S | Sdg | T | Tdg | XPhase | NOT => {
                let ty = if matches!(self.t, XPhase | NOT) {
                    VType::X
                } else {
                    VType::Z
                };
                let phase = self.spider_phase().unwrap_or_else(Phase::zero);
                Gate::add_spider(graph, self.qs[0], ty, EType::N, phase)
                    .into_iter()
                    .collect()
            }
            HAD => Gate::add_spider(graph, self.qs[0], VType::Z, EType::H, Phase::zero())
                .into_iter()
                .collect(),
            CNOT | CZ => {
                let (t2, et) = if self.t == CNOT {
                    (VType::X, EType::N)
                } else {
                    (VType::Z, EType::H)
                };
                if let (Some(v1), Some(v2)) = (
                    Gate::add_spider(graph, self.qs[0], VType::Z, EType::N, Phase::zero()),
                    Gate::add_spider(graph, self.qs[1], t2, EType::N, Phase::zero()),
                ) {
                    Gate::align_columns(graph, v1, v2, self.qs[0], self.qs[1]);
                    graph.add_edge_with_type(v1, v2, et);
                    graph.scalar_mut().mul_sqrt2_pow(1);
                    vec![v1, v2]
                } else {
                    vec![]
                }
            }
            SWAP => {
                let (q0, q1) = (self.qs[0], self.qs[1]);
                if q0 < graph.outputs().len() && q1 < graph.outputs().len() {
                    graph.outputs_mut().swap(q0, q1);
                    let (o0, o1) = (graph.outputs()[q0], graph.outputs()[q1]);
                    graph.set_qubit(o0, q0 as f64);
                    graph.set_qubit(o1, q1 as f64);
                }
                vec![]
            }
            CCZ | TOFF => {
                let mut c = Circuit::new(0);
                self.push_basic_gates(&mut c);
                for g in c.gates {
                    g.add_to_graph(graph);
                }
                vec![]
            }
            UnknownGate => vec![],
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_qasm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cx", CNOT, Some(2))]
    #[case("h", HAD, Some(1))]
    #[case("ccz", CCZ, Some(3))]
    #[case("foo", UnknownGate, None)]
    fn names(#[case] name: &str, #[case] t: GType, #[case] n: Option<usize>) {
        assert_eq!(GType::from_qasm_name(name), t);
        assert_eq!(t.num_qubits(), n);
        if t != UnknownGate {
            assert_eq!(t.qasm_name(), name);
        }
    }

    #[test]
    fn qasm_output() {
        let g = Gate::new(CNOT, vec![0, 2]);
        assert_eq!(g.to_qasm(), "cx q[0], q[2]");

        let g = Gate::new_with_phase(ZPhase, vec![1], Rational64::new(-3, 4));
        assert_eq!(g.to_qasm(), "rz(-3*pi/4) q[1]");
    }

    #[test]
    fn basic_gate_counts() {
        let mut c = Circuit::new(3);
        let toff = Gate::new(TOFF, vec![0, 1, 2]);
        toff.push_basic_gates(&mut c);
        assert_eq!(c.num_gates(), toff.num_basic_gates());
        assert_eq!(c.num_gates_of_type(T) + c.num_gates_of_type(Tdg), 7);
    }
}
