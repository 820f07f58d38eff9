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

//! # Basic ZX-calculus rules
//!
//! These rules always come in triples of functions. For a rule X,
//! there is a function `check_X(&g, ...) -> bool` which checks
//! whether a rule is applicable at the given vertex or vertices,
//! `X_unchecked(&mut g, ...)` applies the rule without doing any
//! checking, and `X(&mut g, ...) -> bool` is the composition of the
//! first two.
//!
//! Checks return false for vertices that are no longer in the graph, so
//! a match found earlier can be re-validated after other rewrites.
//!
//! Note calling `X_unchecked` is allowed to make unsound ZX-diagram
//! transformations, or even panic, if `check_X` doesn't return true.

use crate::graph::*;
use crate::phase::Phase;
use num::traits::Zero;
use num::Rational64;

/// Define a checked rule that takes 1 vertex
macro_rules! checked_rule1 {
    ( $check:ident, $unchecked:ident, $name:ident ) => {
        /// A checked implementation of the rule
        ///
        /// See e.g. [spider_fusion] for an example.
        pub fn $name(g: &mut impl GraphLike, v: V) -> bool {
            if $check(g, v) {
                $unchecked(g, v);
                true
            } else {
                false
            }
        }
    };
}

/// Define a checked rule that takes 2 vertices
macro_rules! checked_rule2 {
    ( $check:ident, $unchecked:ident, $name:ident ) => {
        /// A checked implementation of the rule
        ///
        /// See e.g. [spider_fusion] for an example.
        pub fn $name(g: &mut impl GraphLike, v0: V, v1: V) -> bool {
            if $check(g, v0, v1) {
                $unchecked(g, v0, v1);
                true
            } else {
                false
            }
        }
    };
}

fn is_spider(g: &impl GraphLike, v: V) -> bool {
    matches!(g.vertex_type(v), VType::Z | VType::X)
}

fn interior_h(g: &impl GraphLike, v: V) -> bool {
    g.incident_edges(v)
        .all(|(w, et)| g.vertex_type(w) == VType::Z && et == EType::H)
}

/// Check [spider_fusion_unchecked] applies
///
/// Both vertices must be Z or X, have the same type, and be connected
/// by a normal (i.e. non-Hadamard) edge.
///
/// ```
/// # use zxtract::graph::*;
/// # use zxtract::vec_graph::Graph;
/// # use zxtract::basic_rules::check_spider_fusion;
/// let mut g = Graph::new();
/// let v0 = g.add_vertex(VType::Z);
/// let v1 = g.add_vertex(VType::Z);
/// let v2 = g.add_vertex(VType::X);
/// g.add_edge(v0, v1);
/// g.add_edge(v1, v2);
///
/// assert!(check_spider_fusion(&g, v0, v1));
/// assert!(!check_spider_fusion(&g, v1, v2));
/// ```
pub fn check_spider_fusion(g: &impl GraphLike, v0: V, v1: V) -> bool {
    v0 != v1
        && g.contains_vertex(v0)
        && g.contains_vertex(v1)
        && g.edge_type_opt(v0, v1) == Some(EType::N)
        && is_spider(g, v0)
        && g.vertex_type(v0) == g.vertex_type(v1)
}

/// Apply spider fusion
///
/// Note the first vertex is preserved by the fusion, and the second
/// is deleted.
///
/// ```
/// # use zxtract::graph::*;
/// # use zxtract::tensor::{CompareTensors, Tensor};
/// # use zxtract::vec_graph::Graph;
/// # use zxtract::basic_rules::spider_fusion;
/// let mut g = Graph::new();
/// let v0 = g.add_vertex(VType::Z);
/// let v1 = g.add_vertex(VType::Z);
/// let v2 = g.add_vertex(VType::X);
/// g.add_edge(v0, v1);
/// g.add_edge(v1, v2);
///
/// let h = g.clone();
/// assert!(spider_fusion(&mut g, v0, v1));
/// assert!(Tensor::compare(&g, &h));
///
/// let h = g.clone();
/// assert!(!spider_fusion(&mut g, v0, v2)); // not the same colour
/// assert_eq!(g, h);
/// ```
pub fn spider_fusion_unchecked(g: &mut impl GraphLike, v0: V, v1: V) {
    for (v, et) in g.incident_edge_vec(v1) {
        if v != v0 {
            g.add_edge_smart(v0, v, et);
        }
    }

    g.add_to_phase(v0, g.phase(v1));
    g.remove_vertex(v1);
}

checked_rule2!(check_spider_fusion, spider_fusion_unchecked, spider_fusion);

/// Check [remove_id_unchecked] applies
pub fn check_remove_id(g: &impl GraphLike, v: V) -> bool {
    g.contains_vertex(v) && is_spider(g, v) && g.phase(v).is_zero() && g.degree(v) == 2
}

/// Remove an arity-2 spider with phase 0
///
/// Removes the spider and connects its two neighbors. The type
/// of the resulting edge is the parity of the types of
/// original 2 edges, namely: {N,N} -> N, {N,H} -> H, and
/// {H, H} -> N.
pub fn remove_id_unchecked(g: &mut impl GraphLike, v: V) {
    let nhd = g.incident_edge_vec(v);
    let new_et = EType::merge(nhd[0].1, nhd[1].1);
    g.remove_vertex(v);
    g.add_edge_smart(nhd[0].0, nhd[1].0, new_et);
}

checked_rule1!(check_remove_id, remove_id_unchecked, remove_id);

/// Check [local_comp_unchecked] applies
///
/// The vertex must be Z, have a phase pi/2 or -pi/2, and be
/// surrounded by H-edges connected to other Z spiders.
pub fn check_local_comp(g: &impl GraphLike, v: V) -> bool {
    g.contains_vertex(v)
        && g.vertex_type(v) == VType::Z
        && g.phase(v).is_proper_clifford()
        && interior_h(g, v)
}

/// Apply a local complementation
///
/// This is the version that deletes the targeted vertex. In
/// other words, it is an N-ary generalization of the Euler
/// decomposition rule.
pub fn local_comp_unchecked(g: &mut impl GraphLike, v: V) {
    let p = g.phase(v);

    // add a totally connected graph of the nhd of v
    let ns = g.neighbor_vec(v);
    for i in 0..ns.len() {
        g.add_to_phase(ns[i], -p);
        for j in (i + 1)..ns.len() {
            g.add_edge_smart(ns[i], ns[j], EType::H);
        }
    }
    g.remove_vertex(v);

    let x = ns.len() as i32;
    g.scalar_mut().mul_sqrt2_pow(((x - 1) * (x - 2)) / 2);
    g.scalar_mut()
        .mul_phase(Rational64::new(*p.to_rational().numer(), 4));
}

checked_rule1!(check_local_comp, local_comp_unchecked, local_comp);

/// Check [pivot_unchecked] applies
///
/// Both vertices must be Z, have a phase 0 or pi, and be
/// surrounded by H-edges connected to other Z spiders.
pub fn check_pivot(g: &impl GraphLike, v0: V, v1: V) -> bool {
    g.contains_vertex(v0)
        && g.contains_vertex(v1)
        && g.vertex_type(v0) == VType::Z
        && g.vertex_type(v1) == VType::Z
        && g.edge_type_opt(v0, v1) == Some(EType::H)
        && g.phase(v0).is_pauli()
        && g.phase(v1).is_pauli()
        && interior_h(g, v0)
        && interior_h(g, v1)
}

/// Apply pivoting to a pair of vertices
///
/// This is the version that deletes both vertices, so it is
/// effectively a generalised version of the strong complementarity
/// rule.
pub fn pivot_unchecked(g: &mut impl GraphLike, v0: V, v1: V) {
    let p0 = g.phase(v0);
    let p1 = g.phase(v1);

    // add a complete bipartite graph between the neighbors of v0
    // and the neighbors of v1
    let ns0 = g.neighbor_vec(v0);
    let ns1 = g.neighbor_vec(v1);
    for &n0 in &ns0 {
        g.add_to_phase(n0, p1);
        for &n1 in &ns1 {
            if n0 != v1 && n1 != v0 {
                // common neighbours get a self-loop, i.e. an extra pi
                g.add_edge_smart(n0, n1, EType::H);
            }
        }
    }

    for &n1 in &ns1 {
        g.add_to_phase(n1, p0);
    }

    g.remove_vertex(v0);
    g.remove_vertex(v1);

    let x = ns0.len() as i32;
    let y = ns1.len() as i32;
    g.scalar_mut().mul_sqrt2_pow((x - 2) * (y - 2));

    if !p0.is_zero() && !p1.is_zero() {
        g.scalar_mut().mul_phase(1);
    }
}

checked_rule2!(check_pivot, pivot_unchecked, pivot);

/// Insert an identity spider on the edge between boundary b and v
///
/// If b is not a boundary, or not adjacent to v, this is a noop. The new
/// vertex is joined to b by a Hadamard edge and to v by an edge of the
/// opposite type to the old one, then returned.
pub fn unfuse_boundary(g: &mut impl GraphLike, v: V, b: V) -> Option<V> {
    if g.vertex_type(b) != VType::B {
        return None;
    }
    let et = g.edge_type_opt(v, b)?;
    let vd = VData {
        ty: VType::Z,
        phase: Phase::zero(),
        column: (g.column(v) + g.column(b)) / 2.0,
        qubit: g.qubit(b),
    };
    let v1 = g.add_vertex_with_data(vd);
    g.remove_edge(v, b);
    g.add_edge_with_type(b, v1, EType::H);
    g.add_edge_with_type(v1, v, et.opposite());
    Some(v1)
}
