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

//! Seeded random circuits, for tests and benchmarks

use crate::circuit::*;
use crate::gate::*;
use crate::phase::Phase;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builder for random circuits over CNOT, CZ, H, S, T and arbitrary Z
/// rotations
///
/// Each gate is drawn independently: with probability `p_cnot` it is a
/// CNOT, then `p_cz` a CZ, and so on. Whatever probability is left over
/// is spent on identity, so fewer than `depth` gates may come out unless
/// the probabilities sum to 1.
pub struct RandomCircuitBuilder {
    pub rng: StdRng,
    pub qubits: usize,
    pub depth: usize,
    pub p_cnot: f32,
    pub p_cz: f32,
    pub p_h: f32,
    pub p_s: f32,
    pub p_t: f32,
    pub p_rz: f32,
    /// Denominators for the angle of random Z rotations, as a fraction of pi
    pub rz_denom: i64,
}

impl Circuit {
    pub fn random() -> RandomCircuitBuilder {
        RandomCircuitBuilder {
            rng: StdRng::from_os_rng(),
            qubits: 0,
            depth: 0,
            p_cnot: 0.0,
            p_cz: 0.0,
            p_h: 0.0,
            p_s: 0.0,
            p_t: 0.0,
            p_rz: 0.0,
            rz_denom: 8,
        }
    }
}

impl RandomCircuitBuilder {
    pub fn seed(&mut self, seed: u64) -> &mut Self { self.rng = StdRng::seed_from_u64(seed); self }
    pub fn qubits(&mut self, qubits: usize) -> &mut Self { self.qubits = qubits; self }
    pub fn depth(&mut self, depth: usize) -> &mut Self { self.depth = depth; self }
    pub fn p_cnot(&mut self, p_cnot: f32) -> &mut Self { self.p_cnot = p_cnot; self }
    pub fn p_cz(&mut self, p_cz: f32) -> &mut Self { self.p_cz = p_cz; self }
    pub fn p_h(&mut self, p_h: f32) -> &mut Self { self.p_h = p_h; self }
    pub fn p_s(&mut self, p_s: f32) -> &mut Self { self.p_s = p_s; self }
    pub fn p_t(&mut self, p_t: f32) -> &mut Self { self.p_t = p_t; self }
    pub fn p_rz(&mut self, p_rz: f32) -> &mut Self { self.p_rz = p_rz; self }
    pub fn rz_denom(&mut self, d: i64) -> &mut Self { self.rz_denom = d.max(1); self }

    /// Distribute the remaining probability evenly among Clifford (CNOT, H, S) gates
    pub fn with_cliffords(&mut self) -> &mut Self {
        let p = (1.0 - self.p_t - self.p_cz - self.p_rz) / 3.0;
        self.p_cnot = p;
        self.p_h = p;
        self.p_s = p;
        self
    }

    /// Clifford+T circuits with T gates drawn with probability `p_t`
    pub fn clifford_t(&mut self, p_t: f32) -> &mut Self {
        self.p_t(p_t).with_cliffords()
    }

    pub fn uniform(&mut self) -> &mut Self {
        self.p_cnot = 1.0 / 6.0;
        self.p_cz = 1.0 / 6.0;
        self.p_h = 1.0 / 6.0;
        self.p_s = 1.0 / 6.0;
        self.p_t = 1.0 / 6.0;
        self.p_rz = 1.0 / 6.0;
        self
    }

    fn random_gate(&mut self) -> Option<Gate> {
        let p: f32 = self.rng.random();
        let q0 = self.rng.random_range(0..self.qubits);
        let two_qubit = self.qubits > 1;

        let mut p0 = 0.0;
        for t in [CNOT, CZ, HAD, S, T, ZPhase] {
            p0 += match t {
                CNOT => self.p_cnot,
                CZ => self.p_cz,
                HAD => self.p_h,
                S => self.p_s,
                T => self.p_t,
                _ => self.p_rz,
            };
            if p >= p0 {
                continue;
            }

            return match t {
                CNOT | CZ if two_qubit => {
                    let mut q1 = self.rng.random_range(0..self.qubits - 1);
                    if q1 >= q0 {
                        q1 += 1;
                    }
                    Some(Gate::new(t, vec![q0, q1]))
                }
                CNOT | CZ => None,
                ZPhase => {
                    let d = self.rz_denom;
                    let n = self.rng.random_range(1..2 * d);
                    Some(Gate::new_with_phase(ZPhase, vec![q0], Phase::from((n, d))))
                }
                _ => Some(Gate::new(t, vec![q0])),
            };
        }

        None
    }

    pub fn build(&mut self) -> Circuit {
        let mut c = Circuit::new(self.qubits);
        if self.qubits == 0 {
            return c;
        }

        for _ in 0..self.depth {
            if let Some(g) = self.random_gate() {
                c.push(g);
            }
        }

        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_circ() {
        let c = Circuit::random()
            .qubits(5)
            .depth(20)
            .p_cz(0.25)
            .p_cnot(0.25)
            .p_h(0.3)
            .p_s(0.1)
            .p_t(0.1)
            .build();

        assert_eq!(c.num_qubits(), 5);
        assert_eq!(c.num_gates(), 20);
    }

    #[test]
    fn random_seeds() {
        let mut builder = Circuit::random();
        builder.qubits(5).depth(20).uniform();

        builder.seed(1337);
        let c1 = builder.build();

        builder.seed(1337);
        let c2 = builder.build();

        builder.seed(1338);
        let c3 = builder.build();

        assert_eq!(c1, c2);
        assert_ne!(c1, c3);
    }

    #[test]
    fn random_all_gates() {
        // this could fail with some (small) probability, so try some fixed seeds
        for &seed in &[1337, 800, 40104] {
            let c = Circuit::random()
                .seed(seed)
                .qubits(10)
                .depth(100)
                .with_cliffords()
                .build();
            assert_ne!(c.num_gates_of_type(CNOT), 0);
            assert_eq!(c.num_gates_of_type(CZ), 0);
            assert_ne!(c.num_gates_of_type(HAD), 0);
            assert_ne!(c.num_gates_of_type(S), 0);
            assert_eq!(c.num_gates_of_type(T), 0);
            assert_eq!(c.num_gates_of_type(ZPhase), 0);

            let c = Circuit::random()
                .seed(seed)
                .qubits(10)
                .depth(100)
                .p_rz(0.2)
                .with_cliffords()
                .build();
            assert_ne!(c.num_gates_of_type(ZPhase), 0);
            assert!(c
                .gates
                .iter()
                .filter(|g| g.t == ZPhase)
                .all(|g| *g.phase.to_rational().denom() <= 8));
        }
    }

    #[test]
    fn single_qubit_has_no_entanglers() {
        let c = Circuit::random().seed(3).qubits(1).depth(50).uniform().build();
        assert_eq!(c.num_gates_of_type(CNOT), 0);
        assert_eq!(c.num_gates_of_type(CZ), 0);
        assert!(c.num_gates() < 50);
    }
}
