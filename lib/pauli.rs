//! Pauli operators and the sign bookkeeping for multiplying them.
//!
//! A single-qubit Pauli is encoded as a pair of bits `(x, z)`:
//!
//! | `x` | `z` | Pauli |
//! | :-: | :-: | :---: |
//! | 0   | 0   | *I*   |
//! | 1   | 0   | *X*   |
//! | 1   | 1   | *Y*   |
//! | 0   | 1   | *Z*   |
//!
//! Multiplying two such operators is a bitwise XOR of the pairs, up to a phase
//! that's an integer power of **i**. For products of commuting *N*-qubit
//! Pauli strings the accumulated phase is always ±1, so a string only needs a
//! single sign bit.

use std::{ fmt, ops::MulAssign, str::FromStr };
use crate::error::{ TableauError, TableauResult };

/// A single-qubit Pauli operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pauli {
    /// Identity
    I,
    /// σ<sub>*x*</sub>
    X,
    /// σ<sub>*y*</sub>
    Y,
    /// σ<sub>*z*</sub>
    Z,
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::I => write!(f, "{}", if f.alternate() { "." } else { "I" }),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl Pauli {
    /// Decode from an `(x, z)` bit pair.
    pub fn from_bits(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => Self::I,
            (true,  false) => Self::X,
            (true,  true ) => Self::Y,
            (false, true ) => Self::Z,
        }
    }

    /// Encode as an `(x, z)` bit pair.
    pub fn to_bits(self) -> (bool, bool) {
        match self {
            Self::I => (false, false),
            Self::X => (true,  false),
            Self::Y => (true,  true ),
            Self::Z => (false, true ),
        }
    }

    /// Return `true` if `self` and `other` commute.
    pub fn commutes_with(self, other: Self) -> bool {
        match (self, other) {
            (_, Self::I) => true,
            (Self::I, _) => true,
            (a, b) => a == b,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'I' | '.' | '_' => Some(Self::I),
            'X' => Some(Self::X),
            'Y' => Some(Self::Y),
            'Z' => Some(Self::Z),
            _ => None,
        }
    }
}

/// Return the power of **i** picked up when `a` is multiplied on the right by
/// `b`.
///
/// Nonzero only when both operators are non-identity and distinct; then it's
/// `+1` if `b` follows `a` in the cycle *X* → *Y* → *Z* → *X* and `-1`
/// otherwise.
pub fn phase(a: Pauli, b: Pauli) -> i8 {
    let (xa, za) = a.to_bits();
    let (xb, zb) = b.to_bits();
    phase_bits(xa, za, xb, zb) as i8
}

#[inline]
pub(crate) fn phase_bits(xa: bool, za: bool, xb: bool, zb: bool) -> i32 {
    match (xa, za) {
        (false, false) => 0,
        // X
        (true, false) => i32::from(xb && zb) - i32::from(!xb && zb),
        // Y
        (true, true) => i32::from(!xb && zb) - i32::from(xb && !zb),
        // Z
        (false, true) => i32::from(xb && !zb) - i32::from(xb && zb),
    }
}

/// Compute the sign bit of the product of two signed Pauli strings.
///
/// `pairs` yields `((x1, z1), (x2, z2))` for each qubit, where the first
/// string is on the left. The sum of per-qubit phases must be even (i.e. the
/// strings commute); anything else means the caller's bookkeeping is broken,
/// and this function panics.
pub fn product_sign<I>(sign1: bool, sign2: bool, pairs: I) -> bool
where I: IntoIterator<Item = ((bool, bool), (bool, bool))>
{
    let e: i32
        = pairs.into_iter()
        .map(|((x1, z1), (x2, z2))| phase_bits(x1, z1, x2, z2))
        .sum();
    assert!(
        e.rem_euclid(2) == 0,
        "row multiplication picked up an imaginary phase (exponent {e}); \
        the stabilizer tableau is inconsistent"
    );
    let e = (e + 2 * i32::from(sign1) + 2 * i32::from(sign2)).rem_euclid(4);
    e == 2
}

/// A single *N*-qubit Pauli operator with a ±1 sign.
///
/// Formats as `+XZ.Y`-style strings; the alternate form (`{:#}`) writes
/// identities as `.` instead of `I`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PauliString {
    /// `true` for an overall sign of -1.
    pub sign: bool,
    pub ops: Vec<Pauli>,
}

impl PauliString {
    /// The `n`-qubit identity with sign +1.
    pub fn identity(n: usize) -> Self {
        Self { sign: false, ops: vec![Pauli::I; n] }
    }

    /// A single Pauli `op` on qubit `k` of `n`.
    pub fn single(n: usize, k: usize, op: Pauli) -> Self {
        let mut ops = vec![Pauli::I; n];
        ops[k] = op;
        Self { sign: false, ops }
    }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.ops.len() }

    /// Return the number of non-identity terms.
    pub fn weight(&self) -> usize {
        self.ops.iter().filter(|op| **op != Pauli::I).count()
    }

    /// Return `true` if `self` and `other` commute.
    ///
    /// *Panics if the strings differ in length.*
    pub fn commutes_with(&self, other: &Self) -> bool {
        assert_eq!(
            self.ops.len(), other.ops.len(),
            "cannot compare Pauli strings of different lengths"
        );
        self.ops.iter().zip(&other.ops)
            .filter(|(a, b)| !a.commutes_with(**b))
            .count() % 2 == 0
    }

    /// Return `self · rhs`, or an error if the strings differ in length or
    /// anticommute.
    pub fn try_mul(&self, rhs: &Self) -> TableauResult<Self> {
        if self.ops.len() != rhs.ops.len() {
            return Err(TableauError::PauliLength {
                left: self.ops.len(),
                right: rhs.ops.len(),
            });
        }
        if !self.commutes_with(rhs) {
            return Err(TableauError::Anticommuting {
                left: self.to_string(),
                right: rhs.to_string(),
            });
        }
        let mut prod = self.clone();
        prod.mul_unchecked(rhs);
        Ok(prod)
    }

    // caller guarantees equal lengths; product_sign panics on anticommuting
    // strings
    fn mul_unchecked(&mut self, rhs: &Self) {
        self.sign
            = product_sign(
                self.sign,
                rhs.sign,
                self.ops.iter().zip(&rhs.ops)
                    .map(|(a, b)| (a.to_bits(), b.to_bits())),
            );
        for (a, b) in self.ops.iter_mut().zip(&rhs.ops) {
            let (xa, za) = a.to_bits();
            let (xb, zb) = b.to_bits();
            *a = Pauli::from_bits(xa ^ xb, za ^ zb);
        }
    }
}

impl MulAssign<&PauliString> for PauliString {
    /// Replace `self` with `self · rhs`.
    ///
    /// *Panics if the strings anticommute or differ in length*; see
    /// [`PauliString::try_mul`] for a fallible version.
    fn mul_assign(&mut self, rhs: &PauliString) {
        assert_eq!(
            self.ops.len(), rhs.ops.len(),
            "cannot multiply Pauli strings of different lengths"
        );
        self.mul_unchecked(rhs);
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.sign { "-" } else { "+" })?;
        self.ops.iter()
            .try_for_each(|p| p.fmt(f))
    }
}

impl FromStr for PauliString {
    type Err = TableauError;

    /// Parse strings like `+XZ.Y` or `-IIZ`; the sign is optional and defaults
    /// to `+`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (sign, body)
            = match s.chars().next() {
                Some('+') => (false, &s[1..]),
                Some('-') => (true, &s[1..]),
                _ => (false, s),
            };
        let ops: Vec<Pauli>
            = body.chars()
            .map(Pauli::from_char)
            .collect::<Option<_>>()
            .ok_or_else(|| TableauError::ParsePauli(s.to_string()))?;
        Ok(Self { sign, ops })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use Pauli::*;

    #[test]
    fn phase_table() {
        assert_eq!(phase(X, Y),  1);
        assert_eq!(phase(Y, X), -1);
        assert_eq!(phase(Y, Z),  1);
        assert_eq!(phase(Z, Y), -1);
        assert_eq!(phase(Z, X),  1);
        assert_eq!(phase(X, Z), -1);
        for a in [I, X, Y, Z] {
            assert_eq!(phase(a, a), 0);
            assert_eq!(phase(I, a), 0);
            assert_eq!(phase(a, I), 0);
            for b in [I, X, Y, Z] {
                assert_eq!(phase(a, b), -phase(b, a));
            }
        }
    }

    #[test]
    fn bits_roundtrip() {
        for p in [I, X, Y, Z] {
            let (x, z) = p.to_bits();
            assert_eq!(Pauli::from_bits(x, z), p);
        }
    }

    fn ps(s: &str) -> PauliString { s.parse().unwrap() }

    #[test]
    fn product_signs() {
        // XX · ZZ = (XZ)(XZ) = (-iY)(-iY) = -YY
        let mut a = ps("+XX");
        a *= &ps("+ZZ");
        assert_eq!(a, ps("-YY"));

        // XY · YX = (iZ)(-iZ) = +ZZ
        let mut a = ps("XY");
        a *= &ps("YX");
        assert_eq!(a, ps("+ZZ"));

        // signs combine by XOR
        let mut a = ps("-Z.");
        a *= &ps("-ZZ");
        assert_eq!(a, ps("+.Z"));
    }

    #[test]
    #[should_panic]
    fn anticommuting_product_panics() {
        let mut a = ps("X");
        a *= &ps("Z");
    }

    #[test]
    fn commutation() {
        let xx = ps("XX");
        let zz = ps("ZZ");
        let zi = ps("Z.");
        assert!(xx.commutes_with(&zz));
        assert!(!xx.commutes_with(&zi));
        assert!(zz.commutes_with(&zi));
    }

    #[test]
    fn fallible_product() {
        assert_eq!(ps("+XX").try_mul(&ps("+ZZ")), Ok(ps("-YY")));
        assert_eq!(
            ps("X").try_mul(&ps("Z")),
            Err(TableauError::Anticommuting {
                left: "+X".to_string(),
                right: "+Z".to_string(),
            }),
        );
        assert_eq!(
            ps("XX").try_mul(&ps("X")),
            Err(TableauError::PauliLength { left: 2, right: 1 }),
        );
    }

    #[test]
    #[should_panic]
    fn commutation_needs_equal_lengths() {
        ps("ZZ").commutes_with(&ps("X"));
    }

    #[test]
    fn display_and_parse() {
        let p = PauliString { sign: true, ops: vec![X, I, Y, Z] };
        assert_eq!(format!("{}", p), "-XIYZ");
        assert_eq!(format!("{:#}", p), "-X.YZ");
        assert_eq!("-X.YZ".parse::<PauliString>(), Ok(p.clone()));
        assert_eq!("-XIYZ".parse::<PauliString>(), Ok(p));
        assert_eq!(PauliString::single(3, 1, Y).weight(), 1);
        assert!("+XQ".parse::<PauliString>().is_err());
    }
}
