// src/integer_math/bigints.rs
//
// Small helpers over arbitrary-precision unsigned integers and sorted
// collections of them. All functions take references and return fresh values.

use num::{BigUint, One, Zero};

/// Returns true if n is a power of two (1 included, 0 excluded).
pub fn is_pow2(n: &BigUint) -> bool {
    !n.is_zero() && (n & (n - 1u32)).is_zero()
}

/// Returns 2^n - 1, the integer with n low bits set.
pub fn ones(n: u64) -> BigUint {
    (BigUint::one() << n) - BigUint::one()
}

/// Returns the integer with bits l..h set (h exclusive).
pub fn mask(l: u64, h: u64) -> BigUint {
    if h <= l {
        return BigUint::zero();
    }
    ones(h - l) << l
}

/// Extracts bits l..h of x (h exclusive) as an integer.
pub fn extract(x: &BigUint, l: u64, h: u64) -> BigUint {
    if h <= l {
        return BigUint::zero();
    }
    (x >> l) & ones(h - l)
}

/// Sorts integers ascending and removes duplicates.
pub fn sort_unique(mut xs: Vec<BigUint>) -> Vec<BigUint> {
    xs.sort();
    xs.dedup();
    xs
}

/// Inserts x into an ascending, duplicate-free vector, keeping it that way.
pub fn insert_sorted_unique(xs: &mut Vec<BigUint>, x: BigUint) {
    if let Err(pos) = xs.binary_search(&x) {
        xs.insert(pos, x);
    }
}

/// Returns (min, max) of the two arguments.
pub fn min_max<'a>(a: &'a BigUint, b: &'a BigUint) -> (&'a BigUint, &'a BigUint) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Builds integers from u64 literals; mostly useful in tests.
pub fn from_u64s(values: &[u64]) -> Vec<BigUint> {
    values.iter().map(|&v| BigUint::from(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pow2() {
        assert!(is_pow2(&BigUint::from(1u32)));
        assert!(is_pow2(&BigUint::from(1024u32)));
        assert!(is_pow2(&(BigUint::one() << 300u32)));
        assert!(!is_pow2(&BigUint::zero()));
        assert!(!is_pow2(&BigUint::from(6u32)));
    }

    #[test]
    fn test_ones_and_mask() {
        assert_eq!(ones(0), BigUint::zero());
        assert_eq!(ones(5), BigUint::from(31u32));
        assert_eq!(mask(2, 5), BigUint::from(0b11100u32));
        assert_eq!(mask(5, 5), BigUint::zero());
    }

    #[test]
    fn test_extract() {
        let x = BigUint::from(0b1011_0110u32);
        assert_eq!(extract(&x, 0, 4), BigUint::from(0b0110u32));
        assert_eq!(extract(&x, 4, 8), BigUint::from(0b1011u32));
        assert_eq!(extract(&x, 1, 3), BigUint::from(0b11u32));
        assert_eq!(extract(&x, 3, 3), BigUint::zero());
    }

    #[test]
    fn test_sorted_helpers() {
        let xs = sort_unique(from_u64s(&[5, 1, 3, 5, 1]));
        assert_eq!(xs, from_u64s(&[1, 3, 5]));

        let mut ys = from_u64s(&[1, 4, 9]);
        insert_sorted_unique(&mut ys, BigUint::from(5u32));
        insert_sorted_unique(&mut ys, BigUint::from(4u32));
        assert_eq!(ys, from_u64s(&[1, 4, 5, 9]));
    }
}
