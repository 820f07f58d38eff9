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

//! Dense tensor semantics for diagrams and circuits.
//!
//! Tensors are indexed inputs first, then outputs, with one axis of
//! dimension 2 per boundary. They are only practical for a handful of
//! qubits, and mainly serve to check that two things denote the same
//! linear map.

use crate::circuit::*;
use crate::graph::*;
use crate::phase::Phase;
use ndarray::parallel::prelude::*;
use ndarray::prelude::*;
use ndarray::*;
use num::{Complex, One, Zero};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::convert::TryFrom;
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::iter::FromIterator;

/// Complex-valued tensor with one dimension-2 axis per qubit index
pub type Tensor = Array<Complex<f64>, IxDyn>;

/// Absolute tolerance used when comparing tensors entrywise
pub const TOLERANCE: f64 = 1e-8;

fn from_phase(p: impl Into<Phase>) -> Complex<f64> {
    Complex::from_polar(1.0, PI * p.into().to_f64())
}

/// Conversion of graphs and circuits into tensors
pub trait ToTensor {
    fn to_tensor(&self) -> Tensor;
}

pub trait QubitOps {
    fn ident(q: usize) -> Self;
    fn delta(q: usize) -> Self;
    fn cphase(p: impl Into<Phase>, q: usize) -> Self;
    fn hadamard() -> Self;
    fn delta_at(&mut self, qs: &[usize]);
    fn cphase_at(&mut self, p: impl Into<Phase>, qs: &[usize]);
    fn hadamard_at(&mut self, i: usize);

    /// split into two non-overlapping pieces, where index q=0 and q=1
    fn slice_qubit_mut(
        &mut self,
        q: usize,
    ) -> (
        ArrayViewMut<Complex<f64>, IxDyn>,
        ArrayViewMut<Complex<f64>, IxDyn>,
    );

    /// contract the last n qubit indices with the first n qubits of other
    ///
    /// panics if n is greater than the number of qubits of self or other.
    fn plug_n_qubits(self, n: usize, other: &Tensor) -> Tensor;
}

pub trait CompareTensors {
    fn scalar_eq(t0: &Self, t1: &Self) -> bool;

    /// Equal as tensors, up to [TOLERANCE].
    fn compare(x0: &impl ToTensor, x1: &impl ToTensor) -> bool;

    /// Equal up to a non-zero global scalar.
    fn scalar_compare(x0: &impl ToTensor, x1: &impl ToTensor) -> bool;
}

impl CompareTensors for Tensor {
    fn scalar_eq(t0: &Tensor, t1: &Tensor) -> bool {
        // if dimensions are different, tensors are different
        if t0.dim() != t1.dim() {
            return false;
        }

        // normalise both against the entry where t0 is largest, which keeps
        // the cross-multiplication well-conditioned
        let largest = t0
            .indexed_iter()
            .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
            .filter(|(_, a)| a.norm() > TOLERANCE)
            .map(|(i, &a)| (i, a));

        match largest {
            Some((i, b0)) => {
                let b1 = t1[&i];
                if b1.norm() <= TOLERANCE {
                    return false;
                }
                let s0 = t0 * b1;
                let s1 = t1 * b0;
                s0.abs_diff_eq(&s1, TOLERANCE * b0.norm() * b1.norm())
            }
            // t0 is zero, so t1 must be too
            None => t1.iter().all(|a| a.norm() <= TOLERANCE),
        }
    }

    fn scalar_compare(x0: &impl ToTensor, x1: &impl ToTensor) -> bool {
        Tensor::scalar_eq(&x0.to_tensor(), &x1.to_tensor())
    }

    fn compare(x0: &impl ToTensor, x1: &impl ToTensor) -> bool {
        let t0 = x0.to_tensor();
        let t1 = x1.to_tensor();
        t0.dim() == t1.dim() && t0.abs_diff_eq(&t1, TOLERANCE)
    }
}

impl QubitOps for Tensor {
    fn slice_qubit_mut(
        &mut self,
        q: usize,
    ) -> (
        ArrayViewMut<Complex<f64>, IxDyn>,
        ArrayViewMut<Complex<f64>, IxDyn>,
    ) {
        let slice_at = |k: usize| -> SliceInfo<Vec<SliceInfoElem>, IxDyn, IxDyn> {
            SliceInfo::try_from(Vec::from_iter((0..self.ndim()).map(|i| {
                if i == q {
                    SliceInfoElem::from(k as isize)
                } else {
                    SliceInfoElem::from(..)
                }
            })))
            .expect("Bad qubit index for slice")
        };

        let slice0 = slice_at(0);
        let slice1 = slice_at(1);
        self.multi_slice_mut((slice0.as_ref(), slice1.as_ref()))
    }

    fn ident(q: usize) -> Tensor {
        Tensor::from_shape_fn(vec![2; q * 2], |ix| {
            if (0..q).all(|i| ix[i] == ix[q + i]) {
                Complex::one()
            } else {
                Complex::zero()
            }
        })
    }

    fn delta(q: usize) -> Tensor {
        Tensor::from_shape_fn(vec![2; q], |ix| {
            if (0..q).all(|i| ix[i] == 0) || (0..q).all(|i| ix[i] == 1) {
                Complex::one()
            } else {
                Complex::zero()
            }
        })
    }

    fn cphase(p: impl Into<Phase>, q: usize) -> Tensor {
        let mut t = Tensor::ident(q);
        let qs: Vec<_> = (0..q).collect();
        t.cphase_at(p, &qs);
        t
    }

    fn hadamard() -> Tensor {
        let n = Complex::new(FRAC_1_SQRT_2, 0.0);
        array![[n, n], [n, -n]].into_dyn()
    }

    fn delta_at(&mut self, qs: &[usize]) {
        let mut shape: Vec<usize> = vec![1; self.ndim()];
        for &q in qs {
            shape[q] = 2;
        }
        let del: Tensor = Tensor::delta(qs.len())
            .into_shape_with_order(shape)
            .expect("Bad indices for delta_at");
        *self *= &del;
    }

    fn cphase_at(&mut self, p: impl Into<Phase>, qs: &[usize]) {
        let f = from_phase(p);
        let mut shape: Vec<usize> = vec![1; self.ndim()];
        for &q in qs {
            shape[q] = 2;
        }
        let cp: Tensor = Tensor::from_shape_fn(vec![2; qs.len()], |ix| {
            if (0..qs.len()).all(|i| ix[i] == 1) {
                f
            } else {
                Complex::one()
            }
        })
        .into_shape_with_order(shape)
        .expect("Bad indices for cphase_at");
        *self *= &cp;
    }

    fn hadamard_at(&mut self, q: usize) {
        let n = Complex::new(FRAC_1_SQRT_2, 0.0);

        // split into two non-overlapping pieces, where index q=0 and q=1
        let (mut ma, mut mb) = self.slice_qubit_mut(q);

        // iterate over the pieces together and apply a hadamard to each of the
        // pairs of elements
        par_azip!((a in &mut ma, b in &mut mb) {
            let a1 = *a;
            *a = n * (*a + *b);
            *b = n * (a1 - *b);
        });
    }

    fn plug_n_qubits(self, n: usize, other: &Tensor) -> Tensor {
        let d1 = self.shape().len();
        let d2 = other.shape().len();
        let shape1: Vec<usize> = (0..(d1 + d2 - n))
            .map(|i| if i < d1 { 2 } else { 1 })
            .collect();
        let shape2: Vec<usize> = (0..(d1 + d2 - n))
            .map(|i| if i < d1 - n { 1 } else { 2 })
            .collect();

        let t1 = self
            .into_shared()
            .into_shape_with_order(shape1)
            .expect("Invalid tensor reshape");
        let t1p = t1
            .broadcast(vec![2; d1 + d2 - n])
            .expect("Invalid tensor broadcast");
        let t2 = other
            .clone()
            .into_shared()
            .into_shape_with_order(shape2)
            .expect("Invalid tensor reshape");
        let mut t3 = &t1p * &t2;
        for _ in 0..n {
            t3 = t3.sum_axis(Axis(d1 - n));
        }

        t3
    }
}

impl<G: GraphLike> ToTensor for G {
    fn to_tensor(&self) -> Tensor {
        let mut g = self.clone();
        g.x_to_z();

        // initialise the trivial tensor
        let mut a = Tensor::from_elem(vec![], Complex::one());
        let inp = g.inputs().iter().copied();
        let mid = g.vertices().filter(|&v| g.vertex_type(v) != VType::B);
        let outp = g.outputs().iter().copied();
        let mut vs: Vec<V> = inp.chain(mid.chain(outp)).collect();

        if vs.len() < g.num_vertices() {
            panic!("All boundary vertices must be an input or an output");
        }

        vs.reverse();

        let mut indexv: VecDeque<V> = VecDeque::new();
        let mut seenv: FxHashMap<V, usize> = FxHashMap::default();

        for v in vs {
            let p = g.phase(v);

            // the stack! call computes the tensor product of a new spider
            // (1, e^(i pi p)) with the existing tensor 'a'
            if p.is_zero() {
                a = stack![Axis(0), a, a];
            } else {
                let f = from_phase(p);
                a = stack![Axis(0), a, &a * f];
            }

            indexv.push_front(v);
            let mut deg_v = 0;

            for (w, et) in g.incident_edges(v) {
                if let Some(deg_w) = seenv.get_mut(&w) {
                    deg_v += 1;
                    *deg_w += 1;

                    let wi = indexv
                        .iter()
                        .position(|x| *x == w)
                        .expect("w should be in indexv");

                    if et == EType::N {
                        a.delta_at(&[0, wi]);
                    } else {
                        a.cphase_at(1, &[0, wi]);
                        a *= Complex::new(FRAC_1_SQRT_2, 0.0);
                    }

                    if g.vertex_type(w) != VType::B && g.degree(w) == *deg_w {
                        a = a.sum_axis(Axis(wi));
                        indexv.remove(wi);
                    }
                }
            }

            if g.vertex_type(v) != VType::B && g.degree(v) == deg_v {
                a = a.sum_axis(Axis(0));
                indexv.remove(0);
            }

            seenv.insert(v, deg_v);
        }

        a * g.scalar().to_complex()
    }
}

impl ToTensor for Circuit {
    fn to_tensor(&self) -> Tensor {
        use crate::gate::GType::*;
        let q = self.num_qubits();

        // start with the identity matrix
        let mut a = Tensor::ident(q);

        // since we are applying the gates to the input indices, this actually
        // computes the transpose of the circuit, but all the gates are self-
        // transposed, so we can get the circuit itself if we just reverse the order.
        for g in self.gates.iter().rev() {
            match g.t {
                ZPhase | Z | S | T | Sdg | Tdg | CZ | CCZ => {
                    let p = g.spider_phase().unwrap_or_else(Phase::one);
                    a.cphase_at(p, &g.qs);
                }
                HAD => a.hadamard_at(g.qs[0]),
                NOT | XPhase => {
                    let p = g.spider_phase().unwrap_or_else(Phase::one);
                    a.hadamard_at(g.qs[0]);
                    a.cphase_at(p, &g.qs);
                    a.hadamard_at(g.qs[0]);
                }
                CNOT => {
                    a.hadamard_at(g.qs[1]);
                    a.cphase_at(1, &g.qs);
                    a.hadamard_at(g.qs[1]);
                }
                TOFF => {
                    a.hadamard_at(g.qs[2]);
                    a.cphase_at(1, &g.qs);
                    a.hadamard_at(g.qs[2]);
                }
                SWAP => a.swap_axes(g.qs[0], g.qs[1]),
                UnknownGate => {} // unknown gates are quietly ignored
            }
        }

        if self.global_phase().is_zero() {
            a
        } else {
            a * from_phase(self.global_phase())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec_graph::Graph;
    use num::Rational64;

    #[test]
    fn tensor_id() {
        let mut g = Graph::new();
        g.add_vertex(VType::B);
        g.add_vertex(VType::B);
        g.add_edge(0, 1);
        g.set_inputs(vec![0]);
        g.set_outputs(vec![1]);
        assert!(g.to_tensor().abs_diff_eq(&Tensor::ident(1), TOLERANCE));

        let mut g = Graph::new();
        g.add_vertex(VType::B);
        g.add_vertex(VType::B);
        g.add_vertex(VType::Z);
        g.add_edge(0, 2);
        g.add_edge(2, 1);
        g.set_inputs(vec![0]);
        g.set_outputs(vec![1]);
        assert!(g.to_tensor().abs_diff_eq(&Tensor::ident(1), TOLERANCE));
    }

    #[test]
    fn tensor_delta() {
        let mut g = Graph::new();
        g.add_vertex(VType::B);
        g.add_vertex(VType::B);
        g.add_vertex(VType::B);
        g.add_vertex(VType::B);
        g.add_vertex(VType::Z);
        g.add_vertex(VType::Z);
        g.add_edge(0, 4);
        g.add_edge(1, 5);
        g.add_edge_with_type(4, 5, EType::N);
        g.add_edge(2, 4);
        g.add_edge(3, 5);
        g.set_inputs(vec![0, 1]);
        g.set_outputs(vec![2, 3]);
        assert!(g.to_tensor().abs_diff_eq(&Tensor::delta(4), TOLERANCE));
    }

    #[test]
    fn tensor_cz() {
        let mut g = Graph::new();
        g.add_vertex(VType::B);
        g.add_vertex(VType::B);
        g.add_vertex(VType::Z);
        g.add_vertex(VType::Z);
        g.add_vertex(VType::B);
        g.add_vertex(VType::B);
        g.add_edge(0, 2);
        g.add_edge(1, 3);
        g.add_edge_with_type(2, 3, EType::H);
        g.add_edge(2, 4);
        g.add_edge(3, 5);
        g.set_inputs(vec![0, 1]);
        g.set_outputs(vec![4, 5]);
        g.scalar_mut().mul_sqrt2_pow(1);
        let cz = Tensor::cphase(1, 2);
        assert!(g.to_tensor().abs_diff_eq(&cz, TOLERANCE));
    }

    #[test]
    fn had_at() {
        let mut arr = Tensor::ident(1);
        arr.hadamard_at(0);
        assert!(arr.abs_diff_eq(&Tensor::hadamard(), TOLERANCE));
        let mut arr = Tensor::ident(2);
        arr.hadamard_at(0);
        arr.hadamard_at(1);
        arr.hadamard_at(0);
        arr.hadamard_at(1);
        assert!(arr.abs_diff_eq(&Tensor::ident(2), TOLERANCE));
    }

    #[test]
    fn circuit_eqs() {
        let c1 = Circuit::from_qasm(
            r#"
        qreg q[2];
        cx q[0], q[1];
        cx q[1], q[0];
        cx q[0], q[1];
        "#,
        )
        .unwrap();

        let c2 = Circuit::from_qasm(
            r#"
        qreg q[2];
        swap q[0], q[1];
        "#,
        )
        .unwrap();

        assert!(Tensor::compare(&c1, &c2));
    }

    #[test]
    fn tensor_plug() {
        let c1 = Circuit::from_qasm(
            r#"
        qreg q[2];
        cz q[0], q[1];
        "#,
        )
        .unwrap();

        let c2 = Circuit::from_qasm(
            r#"
        qreg q[2];
        cx q[0], q[1];
        "#,
        )
        .unwrap();

        let c3 = &c1 + &c2;
        let t3 = c1.to_tensor().plug_n_qubits(2, &c2.to_tensor());
        assert!(t3.abs_diff_eq(&c3.to_tensor(), TOLERANCE));
    }

    #[test]
    fn global_phase_only_matters_on_the_nose() {
        let mut c1 = Circuit::new(1);
        c1.add_gate("h", vec![0]);
        let mut c2 = c1.clone();
        c2.set_global_phase(Rational64::new(1, 2));

        assert!(!Tensor::compare(&c1, &c2));
        assert!(Tensor::scalar_compare(&c1, &c2));

        let mut c3 = Circuit::new(1);
        c3.add_gate("s", vec![0]);
        assert!(!Tensor::scalar_compare(&c1, &c3));
    }

    #[test]
    fn phase_gates_agree() {
        let mut c1 = Circuit::new(1);
        c1.add_gate("t", vec![0]);
        c1.add_gate("t", vec![0]);
        let mut c2 = Circuit::new(1);
        c2.add_gate("s", vec![0]);
        let mut c3 = Circuit::new(1);
        c3.add_gate_with_phase("rz", vec![0], Rational64::new(1, 2));
        assert!(Tensor::compare(&c1, &c2));
        assert!(Tensor::compare(&c2, &c3));
    }
}
