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

//! Simplification strategies built from the rules in [crate::rewrite]
//!
//! The strategies here only use rewrites which keep a diagram
//! extractable: they never introduce phase gadgets and only remove
//! interior spiders, so the result of simplifying a circuit can always
//! be turned back into a circuit with [crate::extract].

use crate::circuit::Circuit;
use crate::extract::{ExtractError, ToCircuit};
use crate::graph::*;
use crate::rewrite::*;
use crate::vec_graph::Graph;
use log::debug;

pub fn id_simp(g: &mut impl GraphLike) -> bool {
    simplify_to_fixed_point(&RemoveIdentity, g)
}

pub fn spider_simp(g: &mut impl GraphLike) -> bool {
    simplify_to_fixed_point(&SpiderFusion, g)
}

pub fn local_comp_simp(g: &mut impl GraphLike) -> bool {
    simplify_to_fixed_point(&LocalComplementation, g)
}

pub fn pivot_simp(g: &mut impl GraphLike) -> bool {
    simplify_to_fixed_point(&Pivot, g)
}

/// Remove as many interior Clifford spiders as possible
///
/// Fuses spiders, turns every X spider into a Z spider, then alternates
/// identity removal, fusion, pivoting and local complementation until
/// none of them apply. The result is graph-like.
pub fn interior_clifford_simp(g: &mut impl GraphLike) -> bool {
    spider_simp(g);
    g.x_to_z();
    let mut got_match = false;
    let mut m = true;
    while m {
        m = id_simp(g);
        m = spider_simp(g) || m;
        m = pivot_simp(g) || m;
        m = local_comp_simp(g) || m;
        if m {
            got_match = true;
        }
    }

    got_match
}

/// Clifford simplification for extraction
///
/// Pivots involving boundary spiders are not applied, since they can
/// leave phase gadgets behind, so this is [interior_clifford_simp]
/// followed by a last round of fusion.
pub fn clifford_simp(g: &mut impl GraphLike) -> bool {
    let nv = g.num_vertices();
    let m = interior_clifford_simp(g);
    let m = spider_simp(g) || m;
    debug!("clifford_simp: {} -> {} vertices", nv, g.num_vertices());
    m
}

/// Convert a circuit to a diagram, simplify it, and extract it again
pub fn clifford_simplification(c: &Circuit) -> Result<Circuit, ExtractError> {
    let mut g: Graph = c.to_graph();
    clifford_simp(&mut g);
    g.extractor().num_qubits(c.num_qubits()).extract()
}
