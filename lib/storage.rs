//! Backing storage for the bit arrays in a [`Tableau`][crate::tableau::Tableau].
//!
//! The tableau algorithms only ever need to read, write, copy, clear, and XOR
//! bits, so the choice of storage is hidden behind [`BitMatrix`] and
//! [`BitVector`], bundled together by a [`Storage`] marker type. Two backends
//! are provided:
//!
//! - [`Dense`]: one `bool` per entry.
//! - [`Packed`]: columns packed into `u32` words, 32 qubits per word.
//!
//! Both give bit-identical simulation results.

use std::{ fmt, str::FromStr };
use nalgebra as na;
use crate::error::TableauError;

const PW: [u32; 32] = [ // PW[i] = 2^i
    1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768,
    65536, 131072, 262144, 524288, 1048576, 2097152, 4194304, 8388608, 16777216,
    33554432, 67108864, 134217728, 268435456, 536870912, 1073741824, 2147483648
];

/// A two-dimensional array of bits.
pub trait BitMatrix: Clone + fmt::Debug + PartialEq + Eq {
    /// Create a `rows × cols` array of zeros.
    fn zeros(rows: usize, cols: usize) -> Self;

    fn nrows(&self) -> usize;

    fn ncols(&self) -> usize;

    /// Read entry `(i, j)`.
    fn get(&self, i: usize, j: usize) -> bool;

    /// Write entry `(i, j)`.
    fn set(&mut self, i: usize, j: usize, b: bool);

    /// Invert entry `(i, j)`.
    fn flip(&mut self, i: usize, j: usize) {
        let b = self.get(i, j);
        self.set(i, j, !b);
    }

    /// Set row `b` equal to row `a`.
    fn copy_row(&mut self, a: usize, b: usize);

    /// Set every entry in row `i` to zero.
    fn clear_row(&mut self, i: usize);

    /// XOR row `a` into row `b`.
    fn xor_row(&mut self, a: usize, b: usize);

    /// XOR row `a` of another matrix with the same column count into row `b`
    /// of `self`.
    fn xor_row_from(&mut self, other: &Self, a: usize, b: usize);

    /// Set row `b` of `self` equal to row `a` of another matrix with the same
    /// column count.
    fn copy_row_from(&mut self, other: &Self, a: usize, b: usize);

    /// Convert from a plain boolean array.
    fn from_bools(bools: &na::DMatrix<bool>) -> Self {
        let mut mat = Self::zeros(bools.nrows(), bools.ncols());
        for i in 0..bools.nrows() {
            for j in 0..bools.ncols() {
                if bools[(i, j)] { mat.set(i, j, true); }
            }
        }
        mat
    }

    /// Convert to a plain boolean array.
    fn to_bools(&self) -> na::DMatrix<bool> {
        na::DMatrix::from_fn(self.nrows(), self.ncols(), |i, j| self.get(i, j))
    }
}

/// A one-dimensional array of bits.
pub trait BitVector: Clone + fmt::Debug + PartialEq + Eq {
    /// Create a length-`len` array of zeros.
    fn zeros(len: usize) -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }

    fn get(&self, i: usize) -> bool;

    fn set(&mut self, i: usize, b: bool);

    fn flip(&mut self, i: usize) {
        let b = self.get(i);
        self.set(i, !b);
    }

    fn from_bools(bools: &na::DVector<bool>) -> Self {
        let mut vec = Self::zeros(bools.len());
        bools.iter().enumerate()
            .filter(|(_, b)| **b)
            .for_each(|(i, _)| { vec.set(i, true); });
        vec
    }

    fn to_bools(&self) -> na::DVector<bool> {
        na::DVector::from_fn(self.len(), |i, _| self.get(i))
    }
}

/// Selects a matching pair of [`BitMatrix`] and [`BitVector`] types.
pub trait Storage: Copy + Clone + fmt::Debug + Default + PartialEq + Eq {
    type Matrix: BitMatrix;
    type Vector: BitVector;

    /// The runtime tag for this backend.
    const KIND: StorageKind;
}

/// One `bool` per bit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Dense;

impl Storage for Dense {
    type Matrix = DenseMatrix;
    type Vector = DenseVector;
    const KIND: StorageKind = StorageKind::Dense;
}

/// 32 bits per `u32` word along each row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Packed;

impl Storage for Packed {
    type Matrix = PackedMatrix;
    type Vector = PackedVector;
    const KIND: StorageKind = StorageKind::Packed;
}

/// Runtime name for a [`Storage`] backend, e.g. for configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Dense,
    #[default]
    Packed,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dense => write!(f, "dense"),
            Self::Packed => write!(f, "packed"),
        }
    }
}

impl FromStr for StorageKind {
    type Err = TableauError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dense" => Ok(Self::Dense),
            "packed" => Ok(Self::Packed),
            _ => Err(TableauError::InvalidConfig(
                format!("unknown storage backend {s:?}")
            )),
        }
    }
}

/// Dense bit matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseMatrix(na::DMatrix<bool>);

impl BitMatrix for DenseMatrix {
    fn zeros(rows: usize, cols: usize) -> Self {
        Self(na::DMatrix::from_element(rows, cols, false))
    }

    fn nrows(&self) -> usize { self.0.nrows() }

    fn ncols(&self) -> usize { self.0.ncols() }

    fn get(&self, i: usize, j: usize) -> bool { self.0[(i, j)] }

    fn set(&mut self, i: usize, j: usize, b: bool) { self.0[(i, j)] = b; }

    fn copy_row(&mut self, a: usize, b: usize) {
        for mut col in self.0.column_iter_mut() {
            col[b] = col[a];
        }
    }

    fn clear_row(&mut self, i: usize) { self.0.fill_row(i, false); }

    fn xor_row(&mut self, a: usize, b: usize) {
        for mut col in self.0.column_iter_mut() {
            col[b] ^= col[a];
        }
    }

    fn xor_row_from(&mut self, other: &Self, a: usize, b: usize) {
        for (mut col, ocol) in
            self.0.column_iter_mut().zip(other.0.column_iter())
        {
            col[b] ^= ocol[a];
        }
    }

    fn copy_row_from(&mut self, other: &Self, a: usize, b: usize) {
        for (mut col, ocol) in
            self.0.column_iter_mut().zip(other.0.column_iter())
        {
            col[b] = ocol[a];
        }
    }

    fn from_bools(bools: &na::DMatrix<bool>) -> Self { Self(bools.clone()) }

    fn to_bools(&self) -> na::DMatrix<bool> { self.0.clone() }
}

/// Dense bit vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseVector(na::DVector<bool>);

impl BitVector for DenseVector {
    fn zeros(len: usize) -> Self {
        Self(na::DVector::from_element(len, false))
    }

    fn len(&self) -> usize { self.0.len() }

    fn get(&self, i: usize) -> bool { self.0[i] }

    fn set(&mut self, i: usize, b: bool) { self.0[i] = b; }

    fn from_bools(bools: &na::DVector<bool>) -> Self { Self(bools.clone()) }

    fn to_bools(&self) -> na::DVector<bool> { self.0.clone() }
}

/// Bit matrix with each row packed into `u32` words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedMatrix {
    // size rows × (floor(cols / 32) + 1); bits past `cols` are always zero
    words: na::DMatrix<u32>,
    cols: usize,
}

impl BitMatrix for PackedMatrix {
    fn zeros(rows: usize, cols: usize) -> Self {
        let over32: usize = (cols >> 5) + 1;
        Self { words: na::DMatrix::zeros(rows, over32), cols }
    }

    fn nrows(&self) -> usize { self.words.nrows() }

    fn ncols(&self) -> usize { self.cols }

    fn get(&self, i: usize, j: usize) -> bool {
        self.words[(i, j >> 5)] & PW[j & 31] != 0
    }

    fn set(&mut self, i: usize, j: usize, b: bool) {
        let pw: u32 = PW[j & 31];
        if b {
            self.words[(i, j >> 5)] |= pw;
        } else {
            self.words[(i, j >> 5)] &= !pw;
        }
    }

    fn flip(&mut self, i: usize, j: usize) {
        self.words[(i, j >> 5)] ^= PW[j & 31];
    }

    fn copy_row(&mut self, a: usize, b: usize) {
        for mut w_j in self.words.column_iter_mut() {
            w_j[b] = w_j[a];
        }
    }

    fn clear_row(&mut self, i: usize) { self.words.fill_row(i, 0); }

    fn xor_row(&mut self, a: usize, b: usize) {
        for mut w_j in self.words.column_iter_mut() {
            w_j[b] ^= w_j[a];
        }
    }

    fn xor_row_from(&mut self, other: &Self, a: usize, b: usize) {
        for (mut w_j, o_j) in
            self.words.column_iter_mut().zip(other.words.column_iter())
        {
            w_j[b] ^= o_j[a];
        }
    }

    fn copy_row_from(&mut self, other: &Self, a: usize, b: usize) {
        for (mut w_j, o_j) in
            self.words.column_iter_mut().zip(other.words.column_iter())
        {
            w_j[b] = o_j[a];
        }
    }
}

/// Bit vector packed into `u32` words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedVector {
    words: na::DVector<u32>,
    len: usize,
}

impl BitVector for PackedVector {
    fn zeros(len: usize) -> Self {
        let over32: usize = (len >> 5) + 1;
        Self { words: na::DVector::zeros(over32), len }
    }

    fn len(&self) -> usize { self.len }

    fn get(&self, i: usize) -> bool { self.words[i >> 5] & PW[i & 31] != 0 }

    fn set(&mut self, i: usize, b: bool) {
        let pw: u32 = PW[i & 31];
        if b {
            self.words[i >> 5] |= pw;
        } else {
            self.words[i >> 5] &= !pw;
        }
    }

    fn flip(&mut self, i: usize) { self.words[i >> 5] ^= PW[i & 31]; }
}

#[cfg(test)]
mod test {
    use super::*;

    fn exercise_matrix<M: BitMatrix>() {
        let mut m = M::zeros(3, 40);
        assert_eq!((m.nrows(), m.ncols()), (3, 40));
        m.set(0, 1, true);
        m.set(0, 35, true);
        m.flip(1, 35);
        assert!(m.get(0, 1) && m.get(0, 35) && m.get(1, 35));
        assert!(!m.get(1, 1));

        m.xor_row(0, 1);
        assert!(m.get(1, 1));
        assert!(!m.get(1, 35));

        m.copy_row(1, 2);
        assert_eq!(
            (0..40).map(|j| m.get(2, j)).collect::<Vec<_>>(),
            (0..40).map(|j| m.get(1, j)).collect::<Vec<_>>(),
        );

        m.clear_row(2);
        assert!((0..40).all(|j| !m.get(2, j)));

        let mut row = M::zeros(1, 40);
        row.copy_row_from(&m, 0, 0);
        row.xor_row_from(&m, 1, 0);
        assert!(!row.get(0, 1));
        assert!(row.get(0, 35));

        assert_eq!(M::from_bools(&m.to_bools()), m);
    }

    fn exercise_vector<V: BitVector>() {
        let mut v = V::zeros(70);
        assert_eq!(v.len(), 70);
        v.set(3, true);
        v.flip(64);
        v.flip(3);
        assert!(!v.get(3));
        assert!(v.get(64));
        v.set(64, false);
        assert!(!v.get(64));
        v.set(69, true);
        assert_eq!(V::from_bools(&v.to_bools()), v);
    }

    #[test]
    fn dense_matrix() { exercise_matrix::<DenseMatrix>(); }

    #[test]
    fn packed_matrix() { exercise_matrix::<PackedMatrix>(); }

    #[test]
    fn dense_vector() { exercise_vector::<DenseVector>(); }

    #[test]
    fn packed_vector() { exercise_vector::<PackedVector>(); }

    #[test]
    fn storage_kind_parse() {
        assert_eq!("Dense".parse::<StorageKind>(), Ok(StorageKind::Dense));
        assert_eq!("packed".parse::<StorageKind>(), Ok(StorageKind::Packed));
        assert!("sparse".parse::<StorageKind>().is_err());
        assert_eq!(StorageKind::default(), StorageKind::Packed);
        assert_eq!(<Dense as Storage>::KIND, StorageKind::Dense);
    }
}
