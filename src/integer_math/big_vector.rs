// src/integer_math/big_vector.rs
//
// Integer vectors indexed by chain position. The dictionary reduction uses them
// to express a chain entry as a combination of earlier entries.

use num::{BigUint, Zero};
use std::ops::Add;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigVector(Vec<BigUint>);

impl BigVector {
    pub fn zero(len: usize) -> Self {
        BigVector(vec![BigUint::zero(); len])
    }

    /// Unit vector with a one at index i.
    pub fn basis(len: usize, i: usize) -> Self {
        let mut v = Self::zero(len);
        v.0[i] = BigUint::from(1u32);
        v
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> &BigUint {
        &self.0[i]
    }

    /// Multiplies every coefficient by 2^s.
    pub fn shl(&self, s: u64) -> Self {
        BigVector(self.0.iter().map(|c| c << s).collect())
    }

    /// Iterates over (index, coefficient) pairs with non-zero coefficients.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, &BigUint)> {
        self.0.iter().enumerate().filter(|(_, c)| !c.is_zero())
    }

    /// Evaluates Σ coefficient[i]·values[i].
    pub fn dot(&self, values: &[BigUint]) -> BigUint {
        self.nonzero()
            .map(|(i, c)| c * &values[i])
            .fold(BigUint::zero(), |acc, x| acc + x)
    }
}

impl<'a> Add<&'a BigVector> for &'a BigVector {
    type Output = BigVector;

    fn add(self, other: &'a BigVector) -> BigVector {
        debug_assert_eq!(self.len(), other.len(), "vector lengths differ");
        BigVector(self.0.iter().zip(other.0.iter()).map(|(a, b)| a + b).collect())
    }
}
