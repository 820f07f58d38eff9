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

//! Arena-backed implementation of [GraphLike].
//!
//! Vertices are indices into slot vectors. Deleted vertices leave a hole
//! which is reused by the next insertion, so vertex names stay stable for
//! the lifetime of a vertex.

pub use crate::graph::*;
use crate::phase::Phase;
use crate::scalar::Scalar;
use num::{One, Zero};
use std::mem;

pub type VTab<T> = Vec<Option<T>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    vdata: VTab<VData>,
    edata: VTab<Vec<(V, EType)>>,
    holes: Vec<V>, // places where a vertex has been deleted
    inputs: Vec<V>,
    outputs: Vec<V>,
    numv: usize,
    nume: usize,
    scalar: Scalar,
}

impl Graph {
    fn index<U>(nhd: &[(V, U)], v: V) -> Option<usize> {
        nhd.iter().position(|&(v0, _)| v == v0)
    }

    fn value<U: Copy>(nhd: &[(V, U)], v: V) -> Option<U> {
        nhd.iter().find(|(v0, _)| *v0 == v).map(|&(_, u)| u)
    }

    fn nhd(&self, v: V) -> &Vec<(V, EType)> {
        match self.edata.get(v) {
            Some(Some(nhd)) => nhd,
            _ => panic!("Vertex not found: {v}"),
        }
    }

    /// Removes vertex 't' from the adjacency map of 's'. This private method
    /// is used by remove_edge and remove_vertex to make the latter slightly
    /// more efficient.
    fn remove_half_edge(&mut self, s: V, t: V) {
        if let Some(Some(nhd)) = self.edata.get_mut(s) {
            if let Some(i) = Graph::index(nhd, t) {
                nhd.swap_remove(i);
            }
        }
    }

    fn set_half_edge_type(&mut self, s: V, t: V, ety: EType) {
        if let Some(Some(nhd)) = self.edata.get_mut(s) {
            let i = Graph::index(nhd, t).expect("Edge not found");
            nhd[i] = (t, ety);
        } else {
            panic!("Vertex not found: {s}");
        }
    }
}

impl GraphLike for Graph {
    fn new() -> Graph {
        Graph {
            vdata: Vec::new(),
            edata: Vec::new(),
            holes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            numv: 0,
            nume: 0,
            scalar: Scalar::one(),
        }
    }

    fn num_vertices(&self) -> usize {
        self.numv
    }

    fn num_edges(&self) -> usize {
        self.nume
    }

    fn vertices(&self) -> impl Iterator<Item = V> {
        self.vdata
            .iter()
            .enumerate()
            .filter_map(|(v, d)| d.as_ref().map(|_| v))
    }

    fn edges(&self) -> impl Iterator<Item = (V, V, EType)> {
        self.edata.iter().enumerate().flat_map(|(v, tab)| {
            tab.iter().flat_map(move |nhd| {
                nhd.iter()
                    .filter(move |&&(v1, _)| v <= v1)
                    .map(move |&(v1, et)| (v, v1, et))
            })
        })
    }

    fn inputs(&self) -> &Vec<V> {
        &self.inputs
    }
    fn set_inputs(&mut self, inputs: Vec<V>) {
        self.inputs = inputs;
    }
    fn outputs(&self) -> &Vec<V> {
        &self.outputs
    }
    fn outputs_mut(&mut self) -> &mut Vec<V> {
        &mut self.outputs
    }
    fn set_outputs(&mut self, outputs: Vec<V>) {
        self.outputs = outputs;
    }

    fn add_vertex(&mut self, ty: VType) -> V {
        self.add_vertex_with_data(VData {
            ty,
            ..Default::default()
        })
    }

    fn add_vertex_with_data(&mut self, mut d: VData) -> V {
        if d.ty == VType::B {
            d.phase = Phase::zero();
        }
        self.numv += 1;
        if let Some(v) = self.holes.pop() {
            self.vdata[v] = Some(d);
            self.edata[v] = Some(Vec::new());
            v
        } else {
            self.vdata.push(Some(d));
            self.edata.push(Some(Vec::new()));
            self.vdata.len() - 1
        }
    }

    fn remove_vertex(&mut self, v: V) {
        let adj = mem::take(&mut self.edata[v]).expect("Vertex not found");
        self.numv -= 1;
        self.holes.push(v);
        self.vdata[v] = None;

        for (v1, _) in adj {
            self.nume -= 1;
            self.remove_half_edge(v1, v);
        }
    }

    fn add_edge_with_type(&mut self, s: V, t: V, ety: EType) {
        self.nume += 1;

        if let Some(Some(nhd)) = self.edata.get_mut(s) {
            nhd.push((t, ety));
        } else {
            panic!("Source vertex not found");
        }

        if let Some(Some(nhd)) = self.edata.get_mut(t) {
            nhd.push((s, ety));
        } else {
            panic!("Target vertex not found");
        }
    }

    fn remove_edge(&mut self, s: V, t: V) {
        self.nume -= 1;
        self.remove_half_edge(s, t);
        self.remove_half_edge(t, s);
    }

    fn vertex_data(&self, v: V) -> &VData {
        self.vdata[v].as_ref().expect("Vertex not found")
    }

    fn vertex_data_mut(&mut self, v: V) -> &mut VData {
        self.vdata[v].as_mut().expect("Vertex not found")
    }

    fn set_edge_type(&mut self, s: V, t: V, ety: EType) {
        self.set_half_edge_type(s, t, ety);
        self.set_half_edge_type(t, s, ety);
    }

    fn edge_type_opt(&self, s: V, t: V) -> Option<EType> {
        if let Some(Some(nhd)) = self.edata.get(s) {
            Graph::value(nhd, t)
        } else {
            None
        }
    }

    fn neighbors(&self, v: V) -> impl Iterator<Item = V> {
        self.nhd(v).iter().map(|&(v1, _)| v1)
    }

    fn incident_edges(&self, v: V) -> impl Iterator<Item = (V, EType)> {
        self.nhd(v).iter().copied()
    }

    fn degree(&self, v: V) -> usize {
        self.nhd(v).len()
    }

    fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    fn scalar_mut(&mut self) -> &mut Scalar {
        &mut self.scalar
    }

    fn contains_vertex(&self, v: V) -> bool {
        v < self.vdata.len() && self.vdata[v].is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[test]
    fn create_empty_graph() {
        let g = Graph::new();
        assert_eq!(g.num_vertices(), 0);
        assert_eq!(g.num_edges(), 0);
    }

    #[fixture]
    fn simple_graph() -> (Graph, Vec<V>) {
        let mut g = Graph::new();
        let vs = vec![
            g.add_vertex(VType::B),
            g.add_vertex(VType::B),
            g.add_vertex(VType::Z),
            g.add_vertex(VType::Z),
            g.add_vertex(VType::X),
            g.add_vertex(VType::X),
            g.add_vertex(VType::B),
            g.add_vertex(VType::B),
        ];
        g.add_edge(vs[0], vs[2]);
        g.add_edge(vs[1], vs[3]);
        g.add_edge(vs[2], vs[4]);
        g.add_edge(vs[2], vs[5]);
        g.add_edge(vs[3], vs[4]);
        g.add_edge(vs[3], vs[5]);
        g.add_edge(vs[4], vs[6]);
        g.add_edge(vs[5], vs[7]);
        (g, vs)
    }

    #[rstest]
    fn create_simple_graph(simple_graph: (Graph, Vec<V>)) {
        let (g, _) = simple_graph;
        assert_eq!(g.num_vertices(), 8);
        assert_eq!(g.num_edges(), 8);
    }

    #[rstest]
    fn clone_graph(simple_graph: (Graph, Vec<V>)) {
        let (g, _) = simple_graph;
        let h = g.clone();
        assert_eq!(g.num_vertices(), h.num_vertices());
        assert_eq!(g.num_edges(), h.num_edges());
        assert_eq!(g, h);
    }

    #[rstest]
    fn vertex_iterator(simple_graph: (Graph, Vec<V>)) {
        let (g, mut expected_vs) = simple_graph;
        let mut vs: Vec<_> = g.vertices().collect();
        vs.sort();
        expected_vs.sort();
        assert_eq!(expected_vs, vs);
    }

    #[rstest]
    fn edge_iterator(simple_graph: (Graph, Vec<V>)) {
        let (mut g, vs) = simple_graph;
        g.set_edge_type(vs[1], vs[3], EType::H);

        let mut edges: Vec<_> = g.edges().collect();
        let mut expected_edges = vec![
            (vs[0], vs[2], EType::N),
            (vs[1], vs[3], EType::H),
            (vs[2], vs[4], EType::N),
            (vs[2], vs[5], EType::N),
            (vs[3], vs[4], EType::N),
            (vs[3], vs[5], EType::N),
            (vs[4], vs[6], EType::N),
            (vs[5], vs[7], EType::N),
        ];

        edges.sort();
        expected_edges.sort();
        assert_eq!(expected_edges, edges);
    }

    #[rstest]
    fn remove_and_reuse(simple_graph: (Graph, Vec<V>)) {
        let (mut g, vs) = simple_graph;
        g.remove_vertex(vs[2]);
        assert_eq!(g.num_vertices(), 7);
        assert_eq!(g.num_edges(), 5);
        assert!(!g.contains_vertex(vs[2]));
        assert_eq!(g.degree(vs[4]), 2);

        let v = g.add_vertex(VType::Z);
        assert_eq!(v, vs[2]);
        assert_eq!(g.degree(v), 0);
        assert_eq!(g.num_vertices(), 8);
    }

    #[rstest]
    fn remove_edge_updates_both_ends(simple_graph: (Graph, Vec<V>)) {
        let (mut g, vs) = simple_graph;
        g.remove_edge(vs[3], vs[4]);
        assert!(!g.connected(vs[3], vs[4]));
        assert!(!g.connected(vs[4], vs[3]));
        assert_eq!(g.num_edges(), 7);
        assert_eq!(g.degree(vs[4]), 2);
        assert!(g.connected(vs[2], vs[4]));
    }

    #[test]
    fn boundary_phase_is_zero() {
        let mut g = Graph::new();
        let b = g.add_vertex_with_data(VData {
            ty: VType::B,
            phase: Phase::from((1, 2)),
            ..Default::default()
        });
        assert!(g.phase(b).is_zero());
        assert_eq!(g.vertex_type(b), VType::B);
    }
}
