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

//! A generic rewrite driver
//!
//! A [Rule] splits a rewrite into two halves: finding every place it
//! applies, and applying it at a batch of those places. The driver
//! functions [apply_once] and [simplify_to_fixed_point] work for any
//! target type, so the same machinery runs graph rewrites during
//! simplification and peephole passes over extracted circuits.
//!
//! Matches in a batch are all found on the same state of the target.
//! Applying one of them may invalidate another, so every `rewrite`
//! implementation re-validates each match before acting on it and
//! silently skips stale ones. The first match of a batch is always
//! valid, so a non-empty batch always makes progress.

use crate::basic_rules::*;
use crate::circuit::Circuit;
use crate::gate::GType;
use crate::graph::*;
use log::trace;
use num::traits::Zero;
use rustc_hash::FxHashSet;

/// A rewrite rule over targets of type `T`
pub trait Rule<T> {
    type Match;

    /// Find every place the rule currently applies
    fn find_matches(&self, target: &T) -> Vec<Self::Match>;

    /// Apply the rule at each match which is still valid
    fn rewrite(&self, target: &mut T, matches: Vec<Self::Match>);

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Find all matches of `rule` and apply them in one batch
///
/// Returns false, leaving the target untouched, if nothing matched.
pub fn apply_once<T, R: Rule<T>>(rule: &R, target: &mut T) -> bool {
    let matches = rule.find_matches(target);
    if matches.is_empty() {
        return false;
    }
    trace!("{}: {} matches", rule.name(), matches.len());
    rule.rewrite(target, matches);
    true
}

/// Apply `rule` until it no longer matches
///
/// Returns true if anything was rewritten. This only terminates for
/// rules which make some measure of the target strictly smaller.
pub fn simplify_to_fixed_point<T, R: Rule<T>>(rule: &R, target: &mut T) -> bool {
    let mut got_match = false;
    while apply_once(rule, target) {
        got_match = true;
    }
    got_match
}

fn vertex_matches<G: GraphLike>(g: &G, check: fn(&G, V) -> bool) -> Vec<V> {
    g.vertices().filter(|&v| check(g, v)).collect()
}

fn edge_matches<G: GraphLike>(g: &G, check: fn(&G, V, V) -> bool) -> Vec<(V, V)> {
    g.edges()
        .filter(|&(s, t, _)| check(g, s, t))
        .map(|(s, t, _)| (s, t))
        .collect()
}

/// Fuse adjacent spiders of the same colour, see [spider_fusion]
#[derive(Debug, Clone, Copy, Default)]
pub struct SpiderFusion;

impl<G: GraphLike> Rule<G> for SpiderFusion {
    type Match = (V, V);

    fn find_matches(&self, g: &G) -> Vec<(V, V)> {
        edge_matches(g, check_spider_fusion)
    }

    fn rewrite(&self, g: &mut G, matches: Vec<(V, V)>) {
        for (v0, v1) in matches {
            spider_fusion(g, v0, v1);
        }
    }
}

/// Remove phase-free spiders of degree 2, see [remove_id]
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveIdentity;

impl<G: GraphLike> Rule<G> for RemoveIdentity {
    type Match = V;

    fn find_matches(&self, g: &G) -> Vec<V> {
        vertex_matches(g, check_remove_id)
    }

    fn rewrite(&self, g: &mut G, matches: Vec<V>) {
        for v in matches {
            remove_id(g, v);
        }
    }
}

/// Remove interior proper Clifford spiders, see [local_comp]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalComplementation;

impl<G: GraphLike> Rule<G> for LocalComplementation {
    type Match = V;

    fn find_matches(&self, g: &G) -> Vec<V> {
        vertex_matches(g, check_local_comp)
    }

    fn rewrite(&self, g: &mut G, matches: Vec<V>) {
        for v in matches {
            local_comp(g, v);
        }
    }
}

/// Remove interior pairs of Pauli spiders, see [pivot]
#[derive(Debug, Clone, Copy, Default)]
pub struct Pivot;

impl<G: GraphLike> Rule<G> for Pivot {
    type Match = (V, V);

    fn find_matches(&self, g: &G) -> Vec<(V, V)> {
        edge_matches(g, check_pivot)
    }

    fn rewrite(&self, g: &mut G, matches: Vec<(V, V)>) {
        for (v0, v1) in matches {
            pivot(g, v0, v1);
        }
    }
}

fn is_zero_rotation(c: &Circuit, i: usize) -> bool {
    c.gates.get(i).is_some_and(|g| {
        matches!(g.t, GType::ZPhase | GType::XPhase) && g.phase.is_zero()
    })
}

/// Remove the gates at `indices`, which must be sorted and distinct
fn remove_gates(c: &mut Circuit, indices: &[usize]) {
    for &i in indices.iter().rev() {
        c.gates.remove(i);
    }
}

/// Drop phase gates whose angle is zero
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveZeroPhase;

impl Rule<Circuit> for RemoveZeroPhase {
    type Match = usize;

    fn find_matches(&self, c: &Circuit) -> Vec<usize> {
        (0..c.num_gates()).filter(|&i| is_zero_rotation(c, i)).collect()
    }

    fn rewrite(&self, c: &mut Circuit, mut matches: Vec<usize>) {
        matches.retain(|&i| is_zero_rotation(c, i));
        matches.sort_unstable();
        matches.dedup();
        remove_gates(c, &matches);
    }
}

/// Cancel two Hadamards on the same qubit with nothing acting on that
/// qubit in between
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelHadamardPair;

impl CancelHadamardPair {
    fn is_pair(c: &Circuit, i: usize, j: usize) -> bool {
        let (Some(g0), Some(g1)) = (c.gates.get(i), c.gates.get(j)) else {
            return false;
        };
        if i >= j || g0.t != GType::HAD || g1.t != GType::HAD || g0.qs != g1.qs {
            return false;
        }
        let q = g0.qs[0];
        !c.gates.range(i + 1..j).any(|g| g.qs.contains(&q))
    }
}

impl Rule<Circuit> for CancelHadamardPair {
    type Match = (usize, usize);

    fn find_matches(&self, c: &Circuit) -> Vec<(usize, usize)> {
        // index of the last gate touching each qubit, if it was a HAD
        // that is not already part of a match
        let mut open_had: Vec<Option<usize>> = vec![None; c.num_qubits()];
        let mut matches = Vec::new();

        for (j, g) in c.gates.iter().enumerate() {
            if g.t == GType::HAD && g.qs.len() == 1 && g.qs[0] < open_had.len() {
                let q = g.qs[0];
                match open_had[q].take() {
                    Some(i) => matches.push((i, j)),
                    None => open_had[q] = Some(j),
                }
            } else {
                for &q in &g.qs {
                    if let Some(slot) = open_had.get_mut(q) {
                        *slot = None;
                    }
                }
            }
        }

        matches
    }

    fn rewrite(&self, c: &mut Circuit, matches: Vec<(usize, usize)>) {
        let mut seen = FxHashSet::default();
        let mut indices = Vec::new();
        for (i, j) in matches {
            if Self::is_pair(c, i, j) && !seen.contains(&i) && !seen.contains(&j) {
                seen.insert(i);
                seen.insert(j);
                indices.push(i);
                indices.push(j);
            }
        }
        indices.sort_unstable();
        remove_gates(c, &indices);
    }
}
