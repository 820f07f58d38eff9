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

//! Matrices and linear algebra over F2
//!
//! The central routine is [gaussian_elimination], which row-reduces a
//! matrix and logs every primitive row operation as a [GEStep]. The log
//! can be replayed forwards with [apply] or backwards with
//! [reverse_apply] on anything implementing [RowOps], e.g. another
//! matrix or a [Circuit](crate::circuit::Circuit).

use crate::graph::{GraphLike, V};
use rustc_hash::FxHashMap;
use std::fmt;

/// A type for matrices over F2
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Mat2 {
    d: Vec<Vec<u8>>,
}

pub trait RowOps {
    /// Add r0 to r1
    fn row_add(&mut self, r0: usize, r1: usize);
    /// Swap r0 and r1
    fn row_swap(&mut self, r0: usize, r1: usize);
}

/// A single logged row operation.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum GEStep {
    /// Exchange rows `r0` and `r1`.
    Swap { r0: usize, r1: usize },
    /// Add row `src` into row `tgt`.
    AddTo { src: usize, tgt: usize },
}

impl GEStep {
    pub fn apply_to(&self, x: &mut impl RowOps) {
        match *self {
            GEStep::Swap { r0, r1 } => x.row_swap(r0, r1),
            GEStep::AddTo { src, tgt } => x.row_add(src, tgt),
        }
    }
}

/// Replay `steps` in order on `x`.
pub fn apply(steps: &[GEStep], x: &mut impl RowOps) {
    for s in steps {
        s.apply_to(x);
    }
}

/// Undo `steps` on `x`.
///
/// Every row operation over F2 is its own inverse, so this replays the
/// log back to front.
pub fn reverse_apply(steps: &[GEStep], x: &mut impl RowOps) {
    for s in steps.iter().rev() {
        s.apply_to(x);
    }
}

/// Row-reduce a copy of `m`, returning the reduced matrix and the log
/// of row operations that produced it.
///
/// Rows are visited in order and share a single column cursor. All-zero
/// rows are skipped. For a non-zero row `i`, the cursor advances until
/// some row at or below `i` has a 1 in the cursor column; the first such
/// row is swapped up into `i` and then added into every other row with
/// a 1 in that column, above and below.
pub fn gaussian_elimination(m: &Mat2) -> (Mat2, Vec<GEStep>) {
    let mut m = m.clone();
    let steps = m.row_reduce();
    (m, steps)
}

/// Build the biadjacency matrix between `rows` and `cols`.
///
/// Entry `(i,j)` is 1 iff `rows[i]` is adjacent to `cols[j]`, for either
/// edge type.
pub fn biadjacency(g: &impl GraphLike, rows: &[V], cols: &[V]) -> Mat2 {
    let col_index: FxHashMap<V, usize> = cols.iter().enumerate().map(|(j, &w)| (w, j)).collect();
    let mut m = Mat2::zeros(rows.len(), cols.len());
    for (i, &v) in rows.iter().enumerate() {
        for w in g.neighbors(v) {
            if let Some(&j) = col_index.get(&w) {
                m[(i, j)] = 1;
            }
        }
    }
    m
}

impl Mat2 {
    pub fn new(d: Vec<Vec<u8>>) -> Mat2 {
        Mat2 { d }
    }

    /// Build a matrix with the given number of rows and columns. Place a 1
    /// wherever f(i,j) is true.
    pub fn build<F>(rows: usize, cols: usize, mut f: F) -> Mat2
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut d = vec![vec![0; cols]; rows];
        for (x, row) in d.iter_mut().enumerate() {
            for (y, b) in row.iter_mut().enumerate() {
                *b = f(x, y) as u8;
            }
        }
        Mat2 { d }
    }

    /// A matrix full of zeros
    pub fn zeros(rows: usize, cols: usize) -> Mat2 {
        Mat2::build(rows, cols, |_, _| false)
    }

    /// The identity matrix of a given size
    pub fn id(dim: usize) -> Mat2 {
        Mat2::build(dim, dim, |x, y| x == y)
    }

    pub fn num_rows(&self) -> usize {
        self.d.len()
    }

    pub fn num_cols(&self) -> usize {
        self.d.first().map_or(0, |r| r.len())
    }

    fn row_is_zero(&self, r: usize) -> bool {
        self.d[r].iter().all(|&x| x == 0)
    }

    /// Reduce in place, returning the logged steps. See [gaussian_elimination].
    pub fn row_reduce(&mut self) -> Vec<GEStep> {
        let rows = self.num_rows();
        let cols = self.num_cols();
        let mut steps = Vec::new();
        let mut col = 0;

        for i in 0..rows {
            if col >= cols {
                break;
            }
            if self.row_is_zero(i) {
                continue;
            }

            let mut pivot = None;
            while col < cols {
                pivot = (i..rows).find(|&r| self.d[r][col] != 0);
                if pivot.is_some() {
                    break;
                }
                col += 1;
            }

            let Some(r) = pivot else { break };
            if r != i {
                self.row_swap(i, r);
                steps.push(GEStep::Swap { r0: i, r1: r });
            }

            for k in 0..rows {
                if k != i && self.d[k][col] != 0 {
                    self.row_add(i, k);
                    steps.push(GEStep::AddTo { src: i, tgt: k });
                }
            }
            col += 1;
        }

        steps
    }

    /// Return the hamming weight of the given row
    pub fn row_weight(&self, i: usize) -> usize {
        self.d[i].iter().filter(|&&x| x != 0).count()
    }

    /// Return a list of rows which have a single 1
    pub fn unit_rows(&self) -> Vec<usize> {
        (0..self.num_rows())
            .filter(|&i| self.row_weight(i) == 1)
            .collect()
    }
}

impl RowOps for Mat2 {
    fn row_add(&mut self, r0: usize, r1: usize) {
        for i in 0..self.num_cols() {
            self.d[r1][i] ^= self.d[r0][i];
        }
    }

    fn row_swap(&mut self, r0: usize, r1: usize) {
        self.d.swap(r0, r1);
    }
}

impl fmt::Display for Mat2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.d {
            write!(f, "[ ")?;
            for x in row {
                write!(f, "{x} ")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

impl std::ops::Index<(usize, usize)> for Mat2 {
    type Output = u8;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.d[idx.0][idx.1]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Mat2 {
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        &mut self.d[idx.0][idx.1]
    }
}

impl std::ops::Index<usize> for Mat2 {
    type Output = Vec<u8>;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.d[idx]
    }
}
