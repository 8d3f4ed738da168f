//! Gates whose operations belong to the *n*-qubit Clifford group.
//!
//! Only CNOT, Hadamard, and phase are primitive in the tableau; every other
//! gate here is a fixed sequence of those three.
//!
//! See also: <https://en.wikipedia.org/wiki/Clifford_gates>

use std::fmt;
use rand::Rng;

/// Description of a single gate for a register of qubits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Hadamard
    H(usize),
    /// π/2 rotation about Z
    S(usize),
    /// -π/2 rotation about Z
    SInv(usize),
    /// π rotation about X
    X(usize),
    /// π rotation about Y
    Y(usize),
    /// π rotation about Z
    Z(usize),
    /// Z-controlled π rotation about X.
    ///
    /// The first qubit index is the control.
    CX(usize, usize),
    /// Z-controlled π rotation about Z.
    CZ(usize, usize),
    /// Swap
    Swap(usize, usize),
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::H(k) => write!(f, "H({})", k),
            Self::S(k) => write!(f, "S({})", k),
            Self::SInv(k) => write!(f, "S†({})", k),
            Self::X(k) => write!(f, "X({})", k),
            Self::Y(k) => write!(f, "Y({})", k),
            Self::Z(k) => write!(f, "Z({})", k),
            Self::CX(a, b) => write!(f, "CX({}, {})", a, b),
            Self::CZ(a, b) => write!(f, "CZ({}, {})", a, b),
            Self::Swap(a, b) => write!(f, "Swap({}, {})", a, b),
        }
    }
}

impl Gate {
    /// Return `true` if `self` acts on two qubits.
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, Self::CX(..) | Self::CZ(..) | Self::Swap(..))
    }

    /// Return the qubit indices the gate acts on. The second is `None` for
    /// single-qubit gates.
    pub fn qubits(&self) -> (usize, Option<usize>) {
        match *self {
            Self::H(k)
            | Self::S(k)
            | Self::SInv(k)
            | Self::X(k)
            | Self::Y(k)
            | Self::Z(k) => (k, None),
            Self::CX(a, b)
            | Self::CZ(a, b)
            | Self::Swap(a, b) => (a, Some(b)),
        }
    }

    /// Return the gate that undoes `self`.
    pub fn inverse(&self) -> Self {
        match *self {
            Self::S(k) => Self::SInv(k),
            Self::SInv(k) => Self::S(k),
            g => g,
        }
    }

    /// Sample a random single-qubit gate (`H`, `S`, `X`, `Y`, or `Z`) for a
    /// given qubit index.
    pub fn sample_single<R>(idx: usize, rng: &mut R) -> Self
    where R: Rng + ?Sized
    {
        match rng.gen_range(0..5_usize) {
            0 => Self::H(idx),
            1 => Self::S(idx),
            2 => Self::X(idx),
            3 => Self::Y(idx),
            4 => Self::Z(idx),
            _ => unreachable!(),
        }
    }
}
