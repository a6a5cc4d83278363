// src/contfrac/strategy.rs
//
// k-selection strategies for the continued-fraction method. Given n, a strategy
// proposes auxiliary values k < n; the algorithm builds a chain through k and n
// for each proposal and keeps the shortest.
//
// Singleton strategies propose exactly one k and give logarithmic recursion.
// Total, Dyadic and Fermat propose several and are only practical for small n.

use num::{BigUint, One};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// k = ⌊n/2⌋
    Binary,
    /// k = ⌊n/2⌋ for even n, ⌊(n+1)/2⌋ for odd n
    CoBinary,
    /// k = ⌊n/2^h⌋ with h = ⌊bitlen(n)/2⌋
    Dichotomic,
    /// k = ⌊√n⌋
    Sqrt,
    /// Every k in [2, n)
    Total,
    /// ⌊n/2^j⌋ for j ≥ 1 while the quotient exceeds 1
    Dyadic,
    /// ⌊n/2^(2^j)⌋ for j ≥ 0 while the quotient exceeds 1
    Fermat,
}

/// Every strategy, in a fixed order.
pub const STRATEGIES: [Strategy; 7] = [
    Strategy::Binary,
    Strategy::CoBinary,
    Strategy::Dichotomic,
    Strategy::Sqrt,
    Strategy::Total,
    Strategy::Dyadic,
    Strategy::Fermat,
];

impl Strategy {
    /// Candidate values of k for target n.
    pub fn k(&self, n: &BigUint) -> Vec<BigUint> {
        match self {
            Strategy::Binary => vec![n >> 1u32],
            Strategy::CoBinary => {
                if n.bit(0) {
                    vec![(n + 1u32) >> 1u32]
                } else {
                    vec![n >> 1u32]
                }
            }
            Strategy::Dichotomic => {
                let h = n.bits() / 2;
                vec![n >> h]
            }
            Strategy::Sqrt => vec![n.sqrt()],
            Strategy::Total => {
                let mut ks = Vec::new();
                let mut k = BigUint::from(2u32);
                while &k < n {
                    ks.push(k.clone());
                    k += 1u32;
                }
                ks
            }
            Strategy::Dyadic => {
                let mut ks = Vec::new();
                let mut k = n >> 1u32;
                while k > BigUint::one() {
                    ks.push(k.clone());
                    k >>= 1u32;
                }
                ks
            }
            Strategy::Fermat => {
                let mut ks = Vec::new();
                let mut shift: u64 = 1;
                loop {
                    let k = n >> shift;
                    if k <= BigUint::one() {
                        break;
                    }
                    ks.push(k);
                    shift <<= 1;
                }
                ks
            }
        }
    }

    /// True if `k` always returns exactly one candidate.
    pub fn singleton(&self) -> bool {
        matches!(
            self,
            Strategy::Binary | Strategy::CoBinary | Strategy::Dichotomic | Strategy::Sqrt
        )
    }

    pub fn name(&self) -> &str {
        match self {
            Strategy::Binary => "binary",
            Strategy::CoBinary => "co-binary",
            Strategy::Dichotomic => "dichotomic",
            Strategy::Sqrt => "sqrt",
            Strategy::Total => "total",
            Strategy::Dyadic => "dyadic",
            Strategy::Fermat => "fermat",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
