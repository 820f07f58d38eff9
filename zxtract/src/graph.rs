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

use crate::phase::Phase;
use crate::scalar::Scalar;
use num::{One, Rational64, Zero};

pub type V = usize;

/// The kind of a vertex in a graph-like diagram.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VType {
    B, // Boundary
    #[default]
    Z, // Z-spider
    X, // X-spider
}

/// Data attached to a vertex.
///
/// `qubit` and `column` are layout coordinates. They are allowed to take
/// fractional values, but extraction only ever assigns integers.
#[derive(Debug, Clone, PartialEq)]
pub struct VData {
    pub ty: VType,
    pub phase: Phase,
    pub qubit: f64,
    pub column: f64,
}

impl Default for VData {
    fn default() -> Self {
        VData {
            ty: VType::B,
            phase: Phase::zero(),
            qubit: 0.0,
            column: 0.0,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EType {
    /// Normal edge.
    #[default]
    N,
    /// Hadamard edge.
    H,
}

impl EType {
    pub fn opposite(&self) -> EType {
        match self {
            EType::N => EType::H,
            EType::H => EType::N,
        }
    }

    /// Edge type of the wire obtained by composing two edges through an identity.
    pub fn merge(et0: EType, et1: EType) -> EType {
        if et0 == EType::N {
            et1
        } else {
            et1.opposite()
        }
    }
}

pub trait GraphLike: Clone + Sized + Send + Sync + std::fmt::Debug {
    /// Initialise a new empty graph
    fn new() -> Self;

    /// Number of vertices
    fn num_vertices(&self) -> usize;

    /// Number of edges
    fn num_edges(&self) -> usize;

    /// Get iterator over all vertices
    fn vertices(&self) -> impl Iterator<Item = V>;

    /// Get iterator over all edges
    ///
    /// An "edge" is a triple (s, t, edge_type), where s <= t.
    fn edges(&self) -> impl Iterator<Item = (V, V, EType)>;

    /// List of boundary vertices which serve as inputs
    fn inputs(&self) -> &Vec<V>;

    /// Set inputs for the graph
    fn set_inputs(&mut self, inputs: Vec<V>);

    /// List of boundary vertices which serve as outputs
    fn outputs(&self) -> &Vec<V>;

    /// Mutable list of boundary vertices which serve as outputs
    fn outputs_mut(&mut self) -> &mut Vec<V>;

    /// Set outputs for the graph
    fn set_outputs(&mut self, outputs: Vec<V>);

    /// Add a vertex with the given type
    fn add_vertex(&mut self, ty: VType) -> V;

    /// Add a vertex with the given VData struct
    ///
    /// The phase of a boundary vertex is always set to zero.
    fn add_vertex_with_data(&mut self, d: VData) -> V;

    /// Remove a vertex from a graph
    ///
    /// Panics if the vertex is not in the graph.
    fn remove_vertex(&mut self, v: V);

    /// Add an edge with the given type
    ///
    /// Behaviour is undefined if an edge already exists between s and t.
    fn add_edge_with_type(&mut self, s: V, t: V, ety: EType);

    /// Remove an edge from a graph
    ///
    /// Behaviour is undefined if there is no edge between s and t.
    fn remove_edge(&mut self, s: V, t: V);

    /// Get the data associated to the given vertex
    fn vertex_data(&self, v: V) -> &VData;

    /// Get a mutable ref to the data associated to the given vertex
    fn vertex_data_mut(&mut self, v: V) -> &mut VData;
    fn set_edge_type(&mut self, s: V, t: V, ety: EType);
    fn edge_type_opt(&self, s: V, t: V) -> Option<EType>;
    fn neighbors(&self, v: V) -> impl Iterator<Item = V>;
    fn incident_edges(&self, v: V) -> impl Iterator<Item = (V, EType)>;
    fn degree(&self, v: V) -> usize;
    fn scalar(&self) -> &Scalar;
    fn scalar_mut(&mut self) -> &mut Scalar;
    fn contains_vertex(&self, v: V) -> bool;

    /// Set the phase of a vertex
    fn set_phase(&mut self, v: V, phase: impl Into<Phase>) {
        self.vertex_data_mut(v).phase = phase.into();
    }

    /// Returns the phase of vertex `v`
    fn phase(&self, v: V) -> Phase {
        self.vertex_data(v).phase
    }

    /// Adds a value to the phase of a vertex
    fn add_to_phase(&mut self, v: V, phase: impl Into<Phase>) {
        let vd = self.vertex_data_mut(v);
        vd.phase += phase.into();
    }

    /// Sets the type of a vertex
    fn set_vertex_type(&mut self, v: V, ty: VType) {
        self.vertex_data_mut(v).ty = ty;
    }

    /// Returns the type of a vertex
    fn vertex_type(&self, v: V) -> VType {
        self.vertex_data(v).ty
    }

    /// Sets the qubit index of the given vertex
    fn set_qubit(&mut self, v: V, qubit: f64) {
        self.vertex_data_mut(v).qubit = qubit;
    }

    /// Returns the qubit index of the given vertex
    fn qubit(&self, v: V) -> f64 {
        self.vertex_data(v).qubit
    }

    /// Sets the column of the given vertex
    fn set_column(&mut self, v: V, column: f64) {
        self.vertex_data_mut(v).column = column;
    }

    /// Returns the column of the given vertex
    fn column(&self, v: V) -> f64 {
        self.vertex_data(v).column
    }

    fn is_input(&self, v: V) -> bool {
        self.inputs().contains(&v)
    }

    fn is_output(&self, v: V) -> bool {
        self.outputs().contains(&v)
    }

    fn add_edge(&mut self, s: V, t: V) {
        self.add_edge_with_type(s, t, EType::N);
    }

    fn edge_type(&self, s: V, t: V) -> EType {
        self.edge_type_opt(s, t).expect("Edge not found")
    }

    fn connected(&self, v0: V, v1: V) -> bool {
        self.edge_type_opt(v0, v1).is_some()
    }

    fn toggle_edge_type(&mut self, v0: V, v1: V) {
        self.set_edge_type(v0, v1, self.edge_type(v0, v1).opposite());
    }

    fn vertex_vec(&self) -> Vec<V> {
        self.vertices().collect()
    }
    fn neighbor_vec(&self, v: V) -> Vec<V> {
        self.neighbors(v).collect()
    }
    fn incident_edge_vec(&self, v: V) -> Vec<(V, EType)> {
        self.incident_edges(v).collect()
    }

    /// Convert all X spiders to Z with the colour-change rule
    fn x_to_z(&mut self) {
        for v in self.vertex_vec() {
            if self.vertex_type(v) == VType::X {
                self.set_vertex_type(v, VType::Z);
                for w in self.neighbor_vec(v) {
                    self.toggle_edge_type(v, w);
                }
            }
        }
    }

    /// Add a vertex to the graph with the given type and phase
    fn add_vertex_with_phase(&mut self, ty: VType, phase: impl Into<Phase>) -> V {
        let v = self.add_vertex(ty);
        self.set_phase(v, phase.into());
        v
    }

    /// Add an edge and simplify if necessary to remove parallel edges
    ///
    /// The behaviour of this function depends on the type of source/target
    /// vertex as well as the type of the existing edge (if there is one).
    /// Parallel edges are only supported between spiders.
    fn add_edge_smart(&mut self, s: V, t: V, ety: EType) {
        let st = self.vertex_type(s);
        if s == t {
            if st == VType::Z || st == VType::X {
                if ety == EType::H {
                    self.add_to_phase(s, Phase::one());
                    self.scalar_mut().mul_sqrt2_pow(-1);
                }
            } else {
                panic!("Self-loops only supported on Z and X nodes");
            }
        } else if let Some(ety0) = self.edge_type_opt(s, t) {
            let tt = self.vertex_type(t);
            match (st, tt) {
                (VType::Z, VType::Z) | (VType::X, VType::X) => {
                    match (ety0, ety) {
                        (EType::N, EType::N) => {} // ignore new edge
                        (EType::H, EType::H) => {
                            self.remove_edge(s, t);
                            self.scalar_mut().mul_sqrt2_pow(-2);
                        }
                        (EType::H, EType::N) => {
                            self.set_edge_type(s, t, EType::N);
                            self.add_to_phase(s, Rational64::new(1, 1));
                            self.scalar_mut().mul_sqrt2_pow(-1);
                        }
                        (EType::N, EType::H) => {
                            self.add_to_phase(s, Rational64::new(1, 1));
                            self.scalar_mut().mul_sqrt2_pow(-1);
                        }
                    }
                }
                (VType::Z, VType::X) | (VType::X, VType::Z) => {
                    match (ety0, ety) {
                        (EType::N, EType::N) => {
                            self.remove_edge(s, t);
                            self.scalar_mut().mul_sqrt2_pow(-2);
                        }
                        (EType::N, EType::H) => {
                            self.set_edge_type(s, t, EType::H);
                            self.add_to_phase(s, Rational64::new(1, 1));
                            self.scalar_mut().mul_sqrt2_pow(-1);
                        }
                        (EType::H, EType::N) => {
                            self.add_to_phase(s, Rational64::new(1, 1));
                            self.scalar_mut().mul_sqrt2_pow(-1);
                        }
                        (EType::H, EType::H) => {} // ignore new edge
                    }
                }
                _ => panic!(
                    "Parallel edges only supported between Z and X vertices ({st:?} --> {tt:?})"
                ),
            }
        } else {
            self.add_edge_with_type(s, t, ety);
        }
    }

    /// Return number of Z or X spiders with non-Clifford phase
    fn tcount(&self) -> usize {
        self.vertices()
            .filter(|&v| self.vertex_type(v) != VType::B && !self.phase(v).is_clifford())
            .count()
    }

    /// Return a graphviz-friendly string representation of the graph
    fn to_dot(&self) -> String {
        let mut dot = String::from("graph {\n");
        for v in self.vertices() {
            let t = self.vertex_type(v);
            let p = self.phase(v);
            dot += &format!(
                "  {} [color={}, label=\"{}\"",
                v,
                match t {
                    VType::B => "black",
                    VType::Z => "green",
                    VType::X => "red",
                },
                if self.is_input(v) {
                    format!("{v}:i")
                } else if self.is_output(v) {
                    format!("{v}:o")
                } else if !p.is_zero() {
                    format!("{v}:{p}")
                } else {
                    format!("{v}")
                }
            );
            let q = self.qubit(v);
            let c = self.column(v);
            if q != 0.0 || c != 0.0 {
                dot += &format!(", pos=\"{c},{q}!\"");
            }
            dot += "]\n";
        }

        dot += "\n";

        for (s, t, ty) in self.edges() {
            dot += &format!("  {s} -- {t}");
            if ty == EType::H {
                dot += " [color=blue]";
            }
            dot += "\n";
        }

        dot += "}\n";

        dot
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::{CompareTensors, Tensor};
    use crate::vec_graph::Graph;

    #[test]
    fn smart_edges() {
        let mut g = Graph::new();
        g.add_vertex(VType::B);
        g.add_vertex(VType::Z);
        g.add_vertex(VType::Z);
        g.add_vertex(VType::X);
        g.add_vertex(VType::B);
        g.add_edge_smart(0, 1, EType::N);
        g.add_edge_smart(1, 2, EType::N);
        g.add_edge_smart(2, 3, EType::N);
        g.add_edge_smart(1, 3, EType::N);
        g.add_edge_smart(3, 4, EType::N);
        g.set_inputs(vec![0]);
        g.set_outputs(vec![4]);

        let mut h = Graph::new();
        h.add_vertex(VType::B);
        h.add_vertex(VType::Z);
        h.add_vertex(VType::X);
        h.add_vertex(VType::B);
        h.add_edge_smart(0, 1, EType::N);
        h.add_edge_smart(1, 2, EType::N);
        h.add_edge_smart(1, 2, EType::N);
        h.add_edge_smart(2, 3, EType::N);
        h.set_inputs(vec![0]);
        h.set_outputs(vec![3]);

        assert_eq!(h.num_edges(), 2);
        assert!(Tensor::compare(&g, &h));
    }

    #[test]
    fn smart_hadamard_pair_cancels() {
        let mut g = Graph::new();
        let b0 = g.add_vertex(VType::B);
        let z0 = g.add_vertex(VType::Z);
        let z1 = g.add_vertex(VType::Z);
        let b1 = g.add_vertex(VType::B);
        g.add_edge(b0, z0);
        g.add_edge(z1, b1);
        g.add_edge_smart(z0, z1, EType::H);
        g.add_edge_smart(z0, z1, EType::H);
        assert!(!g.connected(z0, z1));
        assert_eq!(g.scalar().sqrt2_pow(), -2);
    }

    #[test]
    fn colour_change_all() {
        let mut g = Graph::new();
        let b0 = g.add_vertex(VType::B);
        let x = g.add_vertex_with_phase(VType::X, (1, 2));
        let b1 = g.add_vertex(VType::B);
        g.add_edge(b0, x);
        g.add_edge_with_type(x, b1, EType::H);
        g.set_inputs(vec![b0]);
        g.set_outputs(vec![b1]);
        let h = g.clone();

        g.x_to_z();
        assert_eq!(g.vertex_type(x), VType::Z);
        assert_eq!(g.edge_type(b0, x), EType::H);
        assert_eq!(g.edge_type(x, b1), EType::N);
        assert!(Tensor::compare(&g, &h));
    }

    #[test]
    fn tcount_and_dot() {
        let mut g = Graph::new();
        let i = g.add_vertex(VType::B);
        let z = g.add_vertex_with_phase(VType::Z, (1, 4));
        let x = g.add_vertex_with_phase(VType::X, (1, 2));
        let o = g.add_vertex(VType::B);
        g.add_edge(i, z);
        g.add_edge_with_type(z, x, EType::H);
        g.add_edge(x, o);
        g.set_inputs(vec![i]);
        g.set_outputs(vec![o]);
        assert_eq!(g.tcount(), 1);

        let dot = g.to_dot();
        assert!(dot.contains("0:i"));
        assert!(dot.contains("3:o"));
        assert!(dot.contains("1:1/4"));
        assert!(dot.contains("1 -- 2 [color=blue]"));
    }
}
