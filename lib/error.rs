//! Errors returned by tableau construction, gates, and measurements.

use thiserror::Error;

/// Everything that can go wrong from the caller's side.
///
/// Bookkeeping bugs inside the row algebra are not represented here; those
/// panic instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TableauError {
    /// A qubit index at or past the register size.
    #[error("qubit index {index} is out of range for a register of {n} qubits")]
    QubitOutOfRange { index: usize, n: usize },

    /// A two-qubit gate given the same qubit twice.
    #[error("two-qubit gate requires distinct qubits, got {0} twice")]
    SameQubit(usize),

    /// Caller-supplied tableau data with the wrong dimensions.
    #[error("{what} has shape {found:?}; expected {expected:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// A post-selected measurement asked for an outcome that the state rules
    /// out.
    #[error("qubit {index} is deterministically ∣{}⟩; cannot post-select ∣{}⟩", u8::from(!*outcome), u8::from(*outcome))]
    PostselIncompatible { index: usize, outcome: bool },

    /// Pauli strings on different numbers of qubits.
    #[error("Pauli strings act on {left} and {right} qubits")]
    PauliLength { left: usize, right: usize },

    /// A product of anticommuting Pauli strings, which isn't Hermitian.
    #[error("Pauli strings {left} and {right} anticommute")]
    Anticommuting { left: String, right: String },

    /// A Pauli string that couldn't be parsed.
    #[error("invalid Pauli string {0:?}")]
    ParsePauli(String),

    /// Out-of-range simulation settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Shorthand for results carrying a [`TableauError`].
pub type TableauResult<T> = Result<T, TableauError>;
