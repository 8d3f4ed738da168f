//! *N*-qubit stabilizer states in the Gottesman-Knill tableau representation.
//!
//! In the tableau representation, states are identified not by complex
//! amplitudes but by the set of *N*-qubit Pauli operators that stabilize them,
//! of which *N* independent ones suffice. Each single-qubit Pauli takes two
//! bits to encode and each operator carries a single sign bit, so a full state
//! costs *O*(*N*<sup>2</sup>) bits instead of the *O*(2<sup>*N*</sup>) of a
//! state vector.
//!
//! Following Aaronson and Gottesman, the tableau also carries *N*
//! "destabilizers": row `i < N` is the destabilizer paired with stabilizer row
//! `N + i`. Each destabilizer anticommutes with its own stabilizer and commutes
//! with every other row, which lets deterministic measurement outcomes be read
//! off in *O*(*N*<sup>2</sup>) time without Gaussian elimination.
//!
//! The actions of the generating operators for the *N*-qubit Clifford group
//! (Hadamard, π/2 phase, and CNOT) can then be written as bitwise operations
//! on a pair of columns, which are *O*(*N*) in runtime.
//!
//! See [arXiv:quant-ph/0406196][tableau] for details and [here][chp] for the
//! original CHP program.
//!
//! # Example
//! ```
//! use rand::{ rngs::StdRng, SeedableRng };
//! use tableau_sim::{ gate::Gate, tableau::Tableau };
//!
//! # fn main() -> Result<(), tableau_sim::error::TableauError> {
//! let mut rng = StdRng::seed_from_u64(10546);
//!
//! // initialize a new state to ∣00⟩ and make a Bell pair
//! let mut tab: Tableau = Tableau::new(2);
//! tab.apply_h(0)?.apply_cnot(0, 1)?;
//!
//! // destabilizers, then stabilizers
//! assert_eq!(tab.to_string(), "+Z.\n+.X\n---\n+XX\n+ZZ");
//!
//! let a = tab.measure(0, &mut rng)?;
//! let b = tab.measure(1, &mut rng)?;
//! assert!(!a.determined && b.determined);
//! assert_eq!(a.value, b.value);
//! # Ok(())
//! # }
//! ```
//!
//! [tableau]: https://arxiv.org/abs/quant-ph/0406196
//! [chp]: https://www.scottaaronson.com/chp/

use std::fmt;
use nalgebra as na;
use rand::Rng;
use tracing::trace;
use crate::{
    error::{ TableauError, TableauResult },
    gate::Gate,
    pauli::{ product_sign, Pauli, PauliString },
    storage::{ BitMatrix, BitVector, Packed, Storage, StorageKind },
};

/// A stabilizer state of a finite register of qubits, identified by its
/// stabilizer group.
///
/// The backing bit arrays are chosen by `S`; see [`crate::storage`].
///
/// A `Tableau` owns a small scratch row that measurements write into, so
/// every method that measures takes `&mut self`. Distinct tableaux share
/// nothing and can be driven from different threads freely.
#[derive(Clone, Debug)]
pub struct Tableau<S: Storage = Packed> {
    pub(crate) n: usize,
    pub(crate) x: S::Matrix, // Pauli-X bits; size 2n × n
    pub(crate) z: S::Matrix, // Pauli-Z bits; size 2n × n
    pub(crate) r: S::Vector, // sign bits (1 for -1); size 2n
    scratch: Scratch<S>,
}

// accumulator for deterministic measurements; contents are meaningless
// outside a single call
#[derive(Clone, Debug)]
struct Scratch<S: Storage> {
    x: S::Matrix, // size 1 × n
    z: S::Matrix, // size 1 × n
    r: bool,
}

impl<S: Storage> Scratch<S> {
    fn new(n: usize) -> Self {
        Self { x: S::Matrix::zeros(1, n), z: S::Matrix::zeros(1, n), r: false }
    }

    fn clear(&mut self) {
        self.x.clear_row(0);
        self.z.clear_row(0);
        self.r = false;
    }
}

impl<S: Storage> PartialEq for Tableau<S> {
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n
            && self.x == other.x
            && self.z == other.z
            && self.r == other.r
    }
}

impl<S: Storage> Eq for Tableau<S> { }

impl<S: Storage> Tableau<S> {
    /// Create a new stabilizer state of size `n` initialized to ∣0...0⟩.
    pub fn new(n: usize) -> Self {
        let mut x = S::Matrix::zeros(2 * n, n);
        let mut z = S::Matrix::zeros(2 * n, n);
        let r = S::Vector::zeros(2 * n);
        for k in 0..n {
            x.set(k, k, true);
            z.set(n + k, k, true);
        }
        Self { n, x, z, r, scratch: Scratch::new(n) }
    }

    /// Create a state of size `n` from raw tableau data.
    ///
    /// `x` and `z` must both be `2n × n` and `r` must have length `2n`, with
    /// rows `0..n` holding destabilizers and rows `n..2n` stabilizers. The
    /// commutation structure of the rows is not checked here; see
    /// [`Self::is_symplectic`].
    pub fn from_arrays(
        n: usize,
        x: &na::DMatrix<bool>,
        z: &na::DMatrix<bool>,
        r: &na::DVector<bool>,
    ) -> TableauResult<Self>
    {
        let expected = (2 * n, n);
        if x.shape() != expected {
            return Err(TableauError::ShapeMismatch {
                what: "x", expected, found: x.shape() });
        }
        if z.shape() != expected {
            return Err(TableauError::ShapeMismatch {
                what: "z", expected, found: z.shape() });
        }
        if r.len() != 2 * n {
            return Err(TableauError::ShapeMismatch {
                what: "r", expected: (2 * n, 1), found: r.shape() });
        }
        Ok(Self {
            n,
            x: S::Matrix::from_bools(x),
            z: S::Matrix::from_bools(z),
            r: S::Vector::from_bools(r),
            scratch: Scratch::new(n),
        })
    }

    /// Export the raw tableau data as `(x, z, r)`, in the layout accepted by
    /// [`Self::from_arrays`].
    pub fn to_arrays(&self)
        -> (na::DMatrix<bool>, na::DMatrix<bool>, na::DVector<bool>)
    {
        (self.x.to_bools(), self.z.to_bools(), self.r.to_bools())
    }

    /// Copy the state into a tableau with a different storage backend.
    pub fn convert<T: Storage>(&self) -> Tableau<T> {
        let (x, z, r) = self.to_arrays();
        Tableau {
            n: self.n,
            x: T::Matrix::from_bools(&x),
            z: T::Matrix::from_bools(&z),
            r: T::Vector::from_bools(&r),
            scratch: Scratch::new(self.n),
        }
    }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.n }

    /// Return the storage backend in use.
    pub fn storage(&self) -> StorageKind { S::KIND }

    pub(crate) fn check_qubit(&self, k: usize) -> TableauResult<()> {
        if k < self.n {
            Ok(())
        } else {
            Err(TableauError::QubitOutOfRange { index: k, n: self.n })
        }
    }

    fn check_pair(&self, a: usize, b: usize) -> TableauResult<()> {
        self.check_qubit(a)?;
        self.check_qubit(b)?;
        if a == b { return Err(TableauError::SameQubit(a)); }
        Ok(())
    }

    pub(crate) fn check_gate(&self, gate: &Gate) -> TableauResult<()> {
        match gate.qubits() {
            (k, None) => self.check_qubit(k),
            (a, Some(b)) => self.check_pair(a, b),
        }
    }

    /// Apply a Hadamard gate to the `k`-th qubit.
    pub fn apply_h(&mut self, k: usize) -> TableauResult<&mut Self> {
        self.check_qubit(k)?;
        Ok(self.apply_h_unchecked(k))
    }

    fn apply_h_unchecked(&mut self, k: usize) -> &mut Self {
        let mut x_ik: bool;
        let mut z_ik: bool;
        for i in 0..2 * self.n {
            x_ik = self.x.get(i, k);
            z_ik = self.z.get(i, k);
            if x_ik && z_ik { self.r.flip(i); }
            self.x.set(i, k, z_ik);
            self.z.set(i, k, x_ik);
        }
        self
    }

    /// Apply an S gate (= Z(π/2)) to the `k`-th qubit.
    pub fn apply_s(&mut self, k: usize) -> TableauResult<&mut Self> {
        self.check_qubit(k)?;
        Ok(self.apply_s_unchecked(k))
    }

    fn apply_s_unchecked(&mut self, k: usize) -> &mut Self {
        let mut x_ik: bool;
        for i in 0..2 * self.n {
            x_ik = self.x.get(i, k);
            if x_ik && self.z.get(i, k) { self.r.flip(i); }
            if x_ik { self.z.flip(i, k); }
        }
        self
    }

    /// Apply an S<sup>†</sup> gate (= Z(-π/2)) to the `k`-th qubit.
    pub fn apply_sinv(&mut self, k: usize) -> TableauResult<&mut Self> {
        self.check_qubit(k)?;
        Ok(self.apply_sinv_unchecked(k))
    }

    fn apply_sinv_unchecked(&mut self, k: usize) -> &mut Self {
        self.apply_s_unchecked(k)
            .apply_s_unchecked(k)
            .apply_s_unchecked(k)
    }

    /// Apply an X gate to the `k`-th qubit.
    pub fn apply_x(&mut self, k: usize) -> TableauResult<&mut Self> {
        self.check_qubit(k)?;
        Ok(self.apply_x_unchecked(k))
    }

    fn apply_x_unchecked(&mut self, k: usize) -> &mut Self {
        self.apply_h_unchecked(k)
            .apply_z_unchecked(k)
            .apply_h_unchecked(k)
    }

    /// Apply a Y gate to the `k`-th qubit.
    pub fn apply_y(&mut self, k: usize) -> TableauResult<&mut Self> {
        self.check_qubit(k)?;
        Ok(self.apply_y_unchecked(k))
    }

    fn apply_y_unchecked(&mut self, k: usize) -> &mut Self {
        // Y ∝ XZ, and the global phase drops out under conjugation
        self.apply_z_unchecked(k)
            .apply_x_unchecked(k)
    }

    /// Apply a Z gate to the `k`-th qubit.
    pub fn apply_z(&mut self, k: usize) -> TableauResult<&mut Self> {
        self.check_qubit(k)?;
        Ok(self.apply_z_unchecked(k))
    }

    fn apply_z_unchecked(&mut self, k: usize) -> &mut Self {
        self.apply_s_unchecked(k)
            .apply_s_unchecked(k)
    }

    /// Apply a CNOT gate to the `b`-th qubit, with the `a`-th qubit as control.
    pub fn apply_cnot(&mut self, a: usize, b: usize)
        -> TableauResult<&mut Self>
    {
        self.check_pair(a, b)?;
        Ok(self.apply_cnot_unchecked(a, b))
    }

    fn apply_cnot_unchecked(&mut self, a: usize, b: usize) -> &mut Self {
        let mut x_ia: bool;
        let mut z_ib: bool;
        for i in 0..2 * self.n {
            x_ia = self.x.get(i, a);
            z_ib = self.z.get(i, b);
            if x_ia && z_ib && !(self.x.get(i, b) ^ self.z.get(i, a)) {
                self.r.flip(i);
            }
            if x_ia { self.x.flip(i, b); }
            if z_ib { self.z.flip(i, a); }
        }
        self
    }

    /// Apply a CZ gate to the `a`-th and `b`-th qubits.
    pub fn apply_cz(&mut self, a: usize, b: usize) -> TableauResult<&mut Self> {
        self.check_pair(a, b)?;
        Ok(self.apply_cz_unchecked(a, b))
    }

    fn apply_cz_unchecked(&mut self, a: usize, b: usize) -> &mut Self {
        self.apply_h_unchecked(b)
            .apply_cnot_unchecked(a, b)
            .apply_h_unchecked(b)
    }

    /// Apply a SWAP gate to the `a`-th and `b`-th qubits.
    pub fn apply_swap(&mut self, a: usize, b: usize)
        -> TableauResult<&mut Self>
    {
        self.check_pair(a, b)?;
        Ok(self.apply_swap_unchecked(a, b))
    }

    fn apply_swap_unchecked(&mut self, a: usize, b: usize) -> &mut Self {
        self.apply_cnot_unchecked(a, b)
            .apply_cnot_unchecked(b, a)
            .apply_cnot_unchecked(a, b)
    }

    fn apply_gate_unchecked(&mut self, gate: Gate) -> &mut Self {
        match gate {
            Gate::H(k) => self.apply_h_unchecked(k),
            Gate::S(k) => self.apply_s_unchecked(k),
            Gate::SInv(k) => self.apply_sinv_unchecked(k),
            Gate::X(k) => self.apply_x_unchecked(k),
            Gate::Y(k) => self.apply_y_unchecked(k),
            Gate::Z(k) => self.apply_z_unchecked(k),
            Gate::CX(a, b) => self.apply_cnot_unchecked(a, b),
            Gate::CZ(a, b) => self.apply_cz_unchecked(a, b),
            Gate::Swap(a, b) => self.apply_swap_unchecked(a, b),
        }
    }

    /// Perform the action of a gate.
    ///
    /// Fails without touching the state if any qubit index is out of bounds
    /// or a two-qubit gate is given the same qubit twice.
    pub fn apply_gate(&mut self, gate: Gate) -> TableauResult<&mut Self> {
        self.check_gate(&gate)?;
        Ok(self.apply_gate_unchecked(gate))
    }

    /// Perform a series of gates.
    ///
    /// Every gate is validated before any is applied, so a bad gate anywhere in
    /// the series leaves the state untouched.
    pub fn apply_circuit<'a, I>(&mut self, gates: I) -> TableauResult<&mut Self>
    where I: IntoIterator<Item = &'a Gate>
    {
        let gates: Vec<Gate> = gates.into_iter().copied().collect();
        gates.iter().try_for_each(|g| self.check_gate(g))?;
        gates.into_iter().for_each(|g| { self.apply_gate_unchecked(g); });
        Ok(self)
    }

    // set row b equal to row a
    fn row_copy(&mut self, a: usize, b: usize) -> &mut Self {
        self.x.copy_row(a, b);
        self.z.copy_row(a, b);
        self.r.set(b, self.r.get(a));
        self
    }

    // set row i equal to +Z on qubit k
    fn row_set_z(&mut self, k: usize, i: usize) -> &mut Self {
        self.x.clear_row(i);
        self.z.clear_row(i);
        self.z.set(i, k, true);
        self.r.set(i, false);
        self
    }

    // right-multiply row b's operator by row a's operator and store the result
    // in row b
    fn row_mul(&mut self, a: usize, b: usize) -> &mut Self {
        let (x, z) = (&self.x, &self.z);
        let sign
            = product_sign(
                self.r.get(b),
                self.r.get(a),
                (0..self.n).map(|j| {
                    ((x.get(b, j), z.get(b, j)), (x.get(a, j), z.get(a, j)))
                }),
            );
        self.x.xor_row(a, b);
        self.z.xor_row(a, b);
        self.r.set(b, sign);
        self
    }

    // right-multiply the scratch row by row a
    fn scratch_mul(&mut self, a: usize) {
        let (x, z) = (&self.x, &self.z);
        let (sx, sz) = (&self.scratch.x, &self.scratch.z);
        self.scratch.r
            = product_sign(
                self.scratch.r,
                self.r.get(a),
                (0..self.n).map(|j| {
                    ((sx.get(0, j), sz.get(0, j)), (x.get(a, j), z.get(a, j)))
                }),
            );
        self.scratch.x.xor_row_from(&self.x, a, 0);
        self.scratch.z.xor_row_from(&self.z, a, 0);
    }

    // first stabilizer (by index into the stabilizer half) with an X or Y on
    // qubit k
    fn find_pivot(&self, k: usize) -> Option<usize> {
        (0..self.n).find(|p| self.x.get(self.n + *p, k))
    }

    // project onto outcome `value` using stabilizer `p` as the anticommuting
    // pivot
    fn collapse(&mut self, k: usize, p: usize, value: bool) {
        let n = self.n;
        self.row_copy(n + p, p);
        self.row_set_z(k, n + p);
        self.r.set(n + p, value);
        for i in 0..2 * n {
            if i != p && i != n + p && self.x.get(i, k) { self.row_mul(p, i); }
        }
        trace!(qubit = k, pivot = p, value, "collapsed random measurement");
    }

    // outcome of measuring qubit k when no stabilizer anticommutes with Z_k;
    // doesn't change the state
    fn deterministic_outcome(&mut self, k: usize) -> bool {
        self.scratch.clear();
        for i in 0..self.n {
            if self.x.get(i, k) { self.scratch_mul(self.n + i); }
        }
        self.scratch.r
    }

    /// Perform a projective measurement on a qubit `k` in the Z-basis,
    /// returning the outcome of the measurement.
    ///
    /// **Note**: this measurement is either deterministic (when the target
    /// qubit is ∣0⟩ or ∣1⟩) or random (otherwise). Random outcomes are drawn
    /// from `rng` with equal probability; see [`Self::measure_biased`] and
    /// [`Self::measure_postsel`].
    pub fn measure<R>(&mut self, k: usize, rng: &mut R)
        -> TableauResult<MeasureResult>
    where R: Rng + ?Sized
    {
        self.measure_biased(k, rng, 0.5)
    }

    /// Like [`Self::measure`], but random outcomes are ∣1⟩ with probability
    /// `bias`.
    ///
    /// *Panics if `bias` is not a valid probability.*
    pub fn measure_biased<R>(&mut self, k: usize, rng: &mut R, bias: f64)
        -> TableauResult<MeasureResult>
    where R: Rng + ?Sized
    {
        self.check_qubit(k)?;
        if let Some(p) = self.find_pivot(k) {
            let value: bool = rng.gen_bool(bias);
            self.collapse(k, p, value);
            Ok(MeasureResult { value, determined: false })
        } else {
            let value = self.deterministic_outcome(k);
            Ok(MeasureResult { value, determined: true })
        }
    }

    /// Like [`Self::measure`], but deterministically post-selects on a desired
    /// measurement outcome.
    ///
    /// If the desired outcome is incompatible with the state, an error is
    /// returned and the state is left as it was.
    pub fn measure_postsel(&mut self, k: usize, postsel: Postsel)
        -> TableauResult<MeasureResult>
    {
        self.check_qubit(k)?;
        let value: bool = postsel.into();
        if let Some(p) = self.find_pivot(k) {
            self.collapse(k, p, value);
            Ok(MeasureResult { value, determined: false })
        } else if self.deterministic_outcome(k) == value {
            Ok(MeasureResult { value, determined: true })
        } else {
            Err(TableauError::PostselIncompatible { index: k, outcome: value })
        }
    }

    /// Return the `i`-th row as a signed Pauli string, counting destabilizers
    /// first.
    pub fn row(&self, i: usize) -> Option<PauliString> {
        (i < 2 * self.n).then(|| {
            let ops: Vec<Pauli>
                = (0..self.n)
                .map(|j| Pauli::from_bits(self.x.get(i, j), self.z.get(i, j)))
                .collect();
            PauliString { sign: self.r.get(i), ops }
        })
    }

    /// Return the destabilizer rows.
    pub fn destabilizers(&self) -> Vec<PauliString> {
        (0..self.n).filter_map(|i| self.row(i)).collect()
    }

    /// Return the stabilizer rows.
    pub fn stabilizers(&self) -> Vec<PauliString> {
        (self.n..2 * self.n).filter_map(|i| self.row(i)).collect()
    }

    /// Convert `self` to a more human-readable stabilizer/destabilizer group
    /// representation.
    pub fn as_group(&self) -> StabGroup {
        StabGroup { stab: self.stabilizers(), destab: self.destabilizers() }
    }

    // symplectic inner product of rows i and j: 1 if they anticommute
    fn anticommutes(&self, i: usize, j: usize) -> bool {
        (0..self.n)
            .filter(|k| {
                (self.x.get(i, *k) && self.z.get(j, *k))
                    ^ (self.z.get(i, *k) && self.x.get(j, *k))
            })
            .count() % 2 == 1
    }

    /// Check that the rows form a valid symplectic basis: stabilizers commute
    /// with each other, and destabilizer `i` anticommutes with stabilizer `i`
    /// while commuting with every other row.
    ///
    /// This is *O*(*N*<sup>3</sup>) and never run by the simulation itself;
    /// it's meant for checking hand-built tableaux and for tests.
    pub fn is_symplectic(&self) -> bool {
        let n = self.n;
        (0..2 * n).all(|i| {
            (i + 1..2 * n).all(|j| self.anticommutes(i, j) == (j == i + n))
        })
    }
}

impl<S: Storage> fmt::Display for Tableau<S> {
    /// Destabilizer rows, then a line of dashes, then stabilizer rows. Each row
    /// is a sign (`+`/`-`) followed by one of `.`, `X`, `Y`, `Z` per qubit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for destab in self.destabilizers() {
            writeln!(f, "{:#}", destab)?;
        }
        write!(f, "{}", "-".repeat(self.n + 1))?;
        for stab in self.stabilizers() {
            write!(f, "\n{:#}", stab)?;
        }
        Ok(())
    }
}

/// The complete stabilizer/destabilizer groups for a given state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StabGroup {
    pub stab: Vec<PauliString>,
    pub destab: Vec<PauliString>,
}

impl fmt::Display for StabGroup {
    /// One `stabilizer | destabilizer` pair per line. The `#` formatter
    /// suppresses identities.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.stab.len();
        for (k, (stab, destab)) in
            self.stab.iter().zip(&self.destab).enumerate()
        {
            stab.fmt(f)?;
            write!(f, " | ")?;
            destab.fmt(f)?;
            if k + 1 < n { writeln!(f)?; }
        }
        Ok(())
    }
}

/// The result of a measurement, generated by [`Tableau::measure`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MeasureResult {
    /// `true` for ∣1⟩.
    pub value: bool,
    /// `true` if the outcome was fixed by the state before measurement;
    /// `false` if it was sampled.
    pub determined: bool,
}

impl fmt::Display for MeasureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f, "{}{}",
            if self.determined { "Det" } else { "Rand" },
            u8::from(self.value),
        )
    }
}

/// A post-selected measurement result, required by
/// [`Tableau::measure_postsel`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Postsel {
    /// Post-selection for ∣0⟩
    Zero,
    /// Post-selection for ∣1⟩
    One,
}

impl From<Postsel> for bool {
    fn from(postsel: Postsel) -> Self { matches!(postsel, Postsel::One) }
}

impl From<bool> for Postsel {
    fn from(b: bool) -> Self { if b { Self::One } else { Self::Zero } }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{ rngs::StdRng, SeedableRng };
    use crate::storage::Dense;

    #[test]
    fn initial_grid() {
        let tab: Tableau = Tableau::new(3);
        assert_eq!(
            tab.to_string(),
            "+X..\n+.X.\n+..X\n----\n+Z..\n+.Z.\n+..Z",
        );
        assert!(tab.is_symplectic());
        let empty: Tableau<Dense> = Tableau::new(0);
        assert_eq!(empty.to_string(), "-");
    }

    #[test]
    fn bell_grid() {
        let mut tab: Tableau<Dense> = Tableau::new(2);
        tab.apply_h(0).unwrap().apply_cnot(0, 1).unwrap();
        println!("{}", tab);
        assert_eq!(tab.to_string(), "+Z.\n+.X\n---\n+XX\n+ZZ");
        println!("{}", tab.as_group());
        assert_eq!(tab.as_group().to_string(), "+XX | +ZI\n+ZZ | +IX");
    }

    #[test]
    fn y_sign_under_phase() {
        let mut tab: Tableau = Tableau::new(1);
        tab.apply_h(0).unwrap().apply_s(0).unwrap();
        assert_eq!(tab.stabilizers(), vec!["+Y".parse::<PauliString>().unwrap()]);
        tab.apply_s(0).unwrap();
        assert_eq!(tab.stabilizers(), vec!["-X".parse::<PauliString>().unwrap()]);
        tab.apply_sinv(0).unwrap();
        assert_eq!(tab.stabilizers(), vec!["+Y".parse::<PauliString>().unwrap()]);
    }

    #[test]
    fn derived_paulis() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut tab: Tableau = Tableau::new(3);
        tab.apply_x(0).unwrap().apply_y(1).unwrap().apply_z(2).unwrap();
        let outcomes: Vec<MeasureResult>
            = (0..3).map(|k| tab.measure(k, &mut rng).unwrap()).collect();
        assert_eq!(
            outcomes,
            vec![
                MeasureResult { value: true, determined: true },
                MeasureResult { value: true, determined: true },
                MeasureResult { value: false, determined: true },
            ],
        );
    }

    #[test]
    fn cz_and_swap() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut tab: Tableau = Tableau::new(2);
        // CZ on ∣+1⟩ gives ∣-1⟩
        tab.apply_h(0).unwrap().apply_x(1).unwrap().apply_cz(0, 1).unwrap();
        tab.apply_h(0).unwrap();
        assert_eq!(
            tab.measure(0, &mut rng).unwrap(),
            MeasureResult { value: true, determined: true },
        );
        // ∣11⟩ → X on 1 → ∣10⟩ → swap → ∣01⟩
        tab.apply_x(1).unwrap().apply_swap(0, 1).unwrap();
        assert!(!tab.measure(0, &mut rng).unwrap().value);
        assert!(tab.measure(1, &mut rng).unwrap().value);
    }

    #[test]
    fn bad_indices_leave_state_alone() {
        let mut tab: Tableau = Tableau::new(2);
        tab.apply_h(1).unwrap();
        let before = tab.clone();
        assert_eq!(
            tab.apply_h(2).err(),
            Some(TableauError::QubitOutOfRange { index: 2, n: 2 }),
        );
        assert_eq!(tab.apply_cnot(1, 1).err(), Some(TableauError::SameQubit(1)));
        assert!(tab.apply_cnot(0, 5).is_err());
        assert!(
            tab.apply_circuit(&[Gate::H(0), Gate::CX(0, 1), Gate::S(9)])
                .is_err()
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert!(tab.measure(2, &mut rng).is_err());
        assert_eq!(tab, before);
    }

    #[test]
    fn from_arrays_shapes() {
        let tab: Tableau = Tableau::new(2);
        let (x, z, r) = tab.to_arrays();
        let rebuilt: Tableau<Dense> = Tableau::from_arrays(2, &x, &z, &r).unwrap();
        assert_eq!(rebuilt.convert::<Packed>(), tab);

        let bad_x = na::DMatrix::from_element(3, 2, false);
        assert_eq!(
            Tableau::<Packed>::from_arrays(2, &bad_x, &z, &r).err(),
            Some(TableauError::ShapeMismatch {
                what: "x", expected: (4, 2), found: (3, 2) }),
        );
        let bad_z = na::DMatrix::from_element(4, 3, false);
        assert!(Tableau::<Packed>::from_arrays(2, &x, &bad_z, &r).is_err());
        let bad_r = na::DVector::from_element(3, false);
        assert!(Tableau::<Packed>::from_arrays(2, &x, &z, &bad_r).is_err());
    }

    #[test]
    fn hand_built_tableau_measures() {
        // ∣1⟩ ⊗ ∣+⟩: destabs X., .Z; stabs -Z., .X
        let x = na::DMatrix::from_row_slice(4, 2, &[
            true,  false,
            false, false,
            false, false,
            false, true,
        ]);
        let z = na::DMatrix::from_row_slice(4, 2, &[
            false, false,
            false, true,
            true,  false,
            false, false,
        ]);
        let r = na::DVector::from_vec(vec![false, false, true, false]);
        let mut tab: Tableau = Tableau::from_arrays(2, &x, &z, &r).unwrap();
        assert!(tab.is_symplectic());
        let mut rng = StdRng::seed_from_u64(10546);
        assert_eq!(
            tab.measure(0, &mut rng).unwrap(),
            MeasureResult { value: true, determined: true },
        );
        assert!(!tab.measure(1, &mut rng).unwrap().determined);
    }

    #[test]
    fn non_symplectic_detected() {
        let tab: Tableau = Tableau::new(2);
        let (mut x, z, r) = tab.to_arrays();
        // make destabilizer 0 commute with its stabilizer
        x[(0, 0)] = false;
        let broken: Tableau = Tableau::from_arrays(2, &x, &z, &r).unwrap();
        assert!(!broken.is_symplectic());
    }

    #[test]
    fn postsel() {
        let mut tab: Tableau = Tableau::new(2);
        tab.apply_h(0).unwrap().apply_cnot(0, 1).unwrap();
        assert_eq!(
            tab.measure_postsel(0, Postsel::One).unwrap(),
            MeasureResult { value: true, determined: false },
        );
        let before = tab.clone();
        assert_eq!(
            tab.measure_postsel(1, Postsel::Zero).err(),
            Some(TableauError::PostselIncompatible { index: 1, outcome: false }),
        );
        assert_eq!(tab, before);
        assert_eq!(
            tab.measure_postsel(1, Postsel::One).unwrap(),
            MeasureResult { value: true, determined: true },
        );
    }

    #[test]
    fn biased_measurement() {
        let mut rng = StdRng::seed_from_u64(10546);
        for _ in 0..20 {
            let mut tab: Tableau = Tableau::new(1);
            tab.apply_h(0).unwrap();
            assert_eq!(
                tab.measure_biased(0, &mut rng, 1.0).unwrap(),
                MeasureResult { value: true, determined: false },
            );
            let mut tab: Tableau = Tableau::new(1);
            tab.apply_h(0).unwrap();
            assert!(!tab.measure_biased(0, &mut rng, 0.0).unwrap().value);
        }
    }

    #[test]
    fn deterministic_measurement_does_not_mutate() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut tab: Tableau = Tableau::new(3);
        tab.apply_h(0).unwrap()
            .apply_cnot(0, 1).unwrap()
            .apply_cnot(1, 2).unwrap();
        tab.measure(2, &mut rng).unwrap();
        let before = tab.clone();
        for k in 0..3 {
            assert!(tab.measure(k, &mut rng).unwrap().determined);
        }
        assert_eq!(tab, before);
    }

    #[test]
    fn measure_result_display() {
        let res = MeasureResult { value: true, determined: false };
        assert_eq!(res.to_string(), "Rand1");
        assert_eq!(
            MeasureResult { value: false, determined: true }.to_string(),
            "Det0",
        );
        assert!(bool::from(Postsel::from(true)));
    }
}
