// src/dict/decomposer.rs
//
// Decomposers break an integer x into a DictSum with Σ D·2^E == x, terms sorted
// by ascending exponent.
//
// Window widths of 0 are treated as 1.

use num::BigUint;
use std::fmt;

use crate::dict::{DictSum, DictTerm};
use crate::integer_math::bigints;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decomposer {
    /// Non-overlapping windows of width k, aligned to the most significant bit.
    FixedWindow { k: u32 },
    /// Variable windows of width at most k, starting and ending on set bits.
    SlidingWindow { k: u32 },
    /// Runs of consecutive ones, each at most t bits long (0 means unbounded).
    RunLength { t: u32 },
    /// Runs longer than k (capped at t) are taken whole, the rest is windowed.
    Hybrid { k: u32, t: u32 },
}

impl Decomposer {
    /// Decomposes x into dictionary terms.
    ///
    /// # Examples
    /// ```
    /// use addchain::dict::Decomposer;
    /// use num::BigUint;
    ///
    /// let x = BigUint::from(0b1110_0101u32);
    /// let sum = Decomposer::SlidingWindow { k: 3 }.decompose(&x);
    /// assert_eq!(sum.value(), x);
    /// ```
    pub fn decompose(&self, x: &BigUint) -> DictSum {
        let mut sum = match *self {
            Decomposer::FixedWindow { k } => fixed_window(x, k.max(1) as u64),
            Decomposer::SlidingWindow { k } => sliding_window(x, k.max(1) as i64),
            Decomposer::RunLength { t } => run_length(x, t as i64),
            Decomposer::Hybrid { k, t } => hybrid(x, k as i64, t as i64),
        };
        sum.sort_by_exponent();
        sum
    }
}

fn fixed_window(x: &BigUint, k: u64) -> DictSum {
    let mut sum = DictSum::new();
    let mut h = x.bits();
    while h > 0 {
        let l = h.saturating_sub(k);
        let d = bigints::extract(x, l, h);
        if d.bits() > 0 {
            sum.push(DictTerm::new(d, l));
        }
        h = l;
    }
    sum
}

fn sliding_window(x: &BigUint, k: i64) -> DictSum {
    let mut sum = DictSum::new();
    let mut h = x.bits() as i64 - 1;
    while h >= 0 {
        // Skip zeros.
        while h >= 0 && !x.bit(h as u64) {
            h -= 1;
        }
        if h < 0 {
            break;
        }
        // Look down k positions, then advance to the next set bit.
        let mut l = (h - k + 1).max(0);
        while !x.bit(l as u64) {
            l += 1;
        }
        sum.push(DictTerm::new(bigints::extract(x, l as u64, h as u64 + 1), l as u64));
        h = l - 1;
    }
    sum
}

/// Finds maximal runs of ones from the top down, capped at t bits (0 = no cap).
/// Returns (low bit, length) for each run.
fn runs(x: &BigUint, t: i64) -> Vec<(u64, u64)> {
    let mut found = Vec::new();
    let mut i = x.bits() as i64 - 1;
    while i >= 0 {
        while i >= 0 && !x.bit(i as u64) {
            i -= 1;
        }
        if i < 0 {
            break;
        }
        let s = i;
        while i >= 0 && x.bit(i as u64) && (t == 0 || s - i < t) {
            i -= 1;
        }
        found.push(((i + 1) as u64, (s - i) as u64));
    }
    found
}

fn run_length(x: &BigUint, t: i64) -> DictSum {
    let mut sum = DictSum::new();
    for (low, len) in runs(x, t) {
        sum.push(DictTerm::new(bigints::ones(len), low));
    }
    sum
}

fn hybrid(x: &BigUint, k: i64, t: i64) -> DictSum {
    let mut rest = x.clone();
    let mut sum = DictSum::new();
    for (low, len) in runs(x, t) {
        if len as i64 <= k {
            continue;
        }
        sum.push(DictTerm::new(bigints::ones(len), low));
        rest ^= bigints::mask(low, low + len);
    }
    sum.extend(sliding_window(&rest, k.max(1)));
    sum
}

impl fmt::Display for Decomposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Decomposer::FixedWindow { k } => write!(f, "fixed_window({})", k),
            Decomposer::SlidingWindow { k } => write!(f, "sliding_window({})", k),
            Decomposer::RunLength { t } => write!(f, "run_length({})", t),
            Decomposer::Hybrid { k, t } => write!(f, "hybrid({},{})", k, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::{One, Zero};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn all_decomposers() -> Vec<Decomposer> {
        let mut ds = Vec::new();
        for k in 1..=8 {
            ds.push(Decomposer::FixedWindow { k });
            ds.push(Decomposer::SlidingWindow { k });
        }
        for t in [0, 1, 2, 5, 16] {
            ds.push(Decomposer::RunLength { t });
            for k in [1, 2, 4] {
                ds.push(Decomposer::Hybrid { k, t });
            }
        }
        ds
    }

    fn terms(sum: &DictSum) -> Vec<(u64, u64)> {
        sum.terms()
            .iter()
            .map(|t| (t.d.iter_u64_digits().next().unwrap_or(0), t.e))
            .collect()
    }

    #[test]
    fn test_fixed_window() {
        // 1 0110 1001 with k = 4: windows from the top are 1011, 0100, 1.
        let x = BigUint::from(0b1_0110_1001u32);
        let sum = Decomposer::FixedWindow { k: 4 }.decompose(&x);
        assert_eq!(terms(&sum), vec![(0b1, 0), (0b0100, 1), (0b1011, 5)]);
    }

    #[test]
    fn test_sliding_window() {
        let x = BigUint::from(0b1100_0001_0111u32);
        let sum = Decomposer::SlidingWindow { k: 3 }.decompose(&x);
        assert_eq!(terms(&sum), vec![(0b11, 0), (0b101, 2), (0b11, 10)]);
        for t in sum.terms() {
            assert!(t.d.bit(0), "sliding window terms are odd");
        }
    }

    #[test]
    fn test_run_length() {
        let x = BigUint::from(0b1111_0011_1011u32);
        let sum = Decomposer::RunLength { t: 0 }.decompose(&x);
        assert_eq!(terms(&sum), vec![(0b11, 0), (0b111, 3), (0b1111, 8)]);

        let capped = Decomposer::RunLength { t: 2 }.decompose(&x);
        assert_eq!(
            terms(&capped),
            vec![(0b11, 0), (0b1, 3), (0b11, 4), (0b11, 8), (0b11, 10)]
        );
    }

    #[test]
    fn test_hybrid() {
        // One long run of six ones plus scattered bits below it.
        let x = BigUint::from(0b1111_1100_0101u32);
        let sum = Decomposer::Hybrid { k: 3, t: 0 }.decompose(&x);
        assert_eq!(terms(&sum), vec![(0b101, 0), (0b11_1111, 6)]);
    }

    #[test]
    fn test_zero_and_one() {
        for d in all_decomposers() {
            assert!(d.decompose(&BigUint::zero()).is_empty(), "{}", d);
            let sum = d.decompose(&BigUint::one());
            assert_eq!(sum.value(), BigUint::one(), "{}", d);
        }
    }

    #[test]
    fn test_round_trip_random() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        for d in all_decomposers() {
            for bits in [7u64, 64, 255] {
                let mut x = BigUint::zero();
                for _ in 0..(bits + 63) / 64 {
                    x = (x << 64u32) + BigUint::from(rng.random::<u64>());
                }
                x >>= (((bits + 63) / 64) * 64 - bits) as u32;
                let sum = d.decompose(&x);
                assert_eq!(sum.value(), x, "{} failed on {}", d, x);
                let exponents: Vec<u64> = sum.terms().iter().map(|t| t.e).collect();
                let mut sorted = exponents.clone();
                sorted.sort();
                assert_eq!(exponents, sorted, "{} not sorted", d);
            }
        }
    }

    #[test]
    fn test_sliding_never_longer_than_fixed() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x51de);
        for bits in [8u32, 64, 255, 1024] {
            for _ in 0..20 {
                let mut x = BigUint::zero();
                for _ in 0..bits.div_ceil(64) {
                    x = (x << 64u32) + BigUint::from(rng.random::<u64>());
                }
                x >>= bits.div_ceil(64) * 64 - bits;
                for k in 1..=8 {
                    let fixed = Decomposer::FixedWindow { k }.decompose(&x);
                    let sliding = Decomposer::SlidingWindow { k }.decompose(&x);
                    assert!(
                        sliding.len() <= fixed.len(),
                        "k={}: sliding {} terms, fixed {} terms for {}",
                        k,
                        sliding.len(),
                        fixed.len(),
                        x
                    );
                }
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Decomposer::SlidingWindow { k: 4 }.to_string(), "sliding_window(4)");
        assert_eq!(Decomposer::Hybrid { k: 3, t: 16 }.to_string(), "hybrid(3,16)");
    }
}
