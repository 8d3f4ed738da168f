//! Tools for simulating registers of qubits in stabilizer states.
//!
//! Assumes all operations will be limited to Clifford-group transformations
//! (i.e. Hadamard, Pauli, singly controlled Pauli, or phase rotations that are
//! integer multiples of π/2) and Z-basis measurements, which together admit
//! simulation in polynomial time via the tableau of
//! [Aaronson and Gottesman](https://arxiv.org/abs/quant-ph/0406196).

pub mod error;
pub mod storage;
pub mod pauli;
pub mod gate;
pub mod tableau;
pub mod circuit;
pub mod config;
pub mod protocol;
