// src/contfrac/mod.rs
//
// Continued-fraction method for addition chains and addition sequences.
//
// For sorted targets n_1 < ... < n_k, write n_k = q·n_(k-1) + r. A chain for the
// remaining targets (with r added) times a chain for q, plus one addition of r,
// gives a chain for all targets. Chains for q are found through a helper value
// k proposed by a Strategy.
//
// Reference: Bergeron, Berstel, Brlek, "Efficient computation of addition chains" (1994).

pub mod strategy;

use log::debug;
use num::{BigUint, Integer, One, Zero};
use rayon::prelude::*;

use crate::algorithms::{ChainAlgorithm, SequenceAlgorithm};
use crate::chain::Chain;
use crate::error::{ChainError, Result};
use crate::integer_math::bigints;

pub use strategy::{Strategy, STRATEGIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuedFractions {
    strategy: Strategy,
}

impl ContinuedFractions {
    pub fn new(strategy: Strategy) -> Self {
        ContinuedFractions { strategy }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Chain containing every element of ns, which must be sorted and unique.
    fn chain(&self, ns: &[BigUint]) -> Result<Chain> {
        let k = ns.len();
        if k == 1 || ns[k - 2] <= BigUint::one() {
            return self.minchain(&ns[k - 1]);
        }

        let (q, r) = ns[k - 1].div_rem(&ns[k - 2]);
        let cq = self.minchain(&q)?;

        let mut rest = ns[..k - 1].to_vec();
        if r.is_zero() {
            return Chain::product(&self.chain(&rest)?, &cq);
        }

        bigints::insert_sorted_unique(&mut rest, r.clone());
        let product = Chain::product(&self.chain(&rest)?, &cq)?;
        Chain::plus(&product, &r)
    }

    /// Shortest chain for n over the strategy's candidates.
    fn minchain(&self, n: &BigUint) -> Result<Chain> {
        if bigints::is_pow2(n) {
            return Ok(Chain::doubling(n.bits() - 1));
        }
        if n == &BigUint::from(3u32) {
            return Ok(Chain::from_values(bigints::from_u64s(&[1, 2, 3])));
        }

        let two = BigUint::from(2u32);
        let ks: Vec<BigUint> = self
            .strategy
            .k(n)
            .into_iter()
            .filter(|k| k >= &two && k < n)
            .collect();
        if ks.is_empty() {
            return Err(ChainError::EmptyCandidateSet {
                strategy: self.strategy.to_string(),
                n: n.clone(),
            });
        }

        if ks.len() == 1 {
            return self.chain(&[ks[0].clone(), n.clone()]);
        }

        // Candidates are independent; results keep candidate order so ties
        // resolve the same way on every run.
        let chains: Vec<Chain> = ks
            .par_iter()
            .map(|k| self.chain(&[k.clone(), n.clone()]))
            .collect::<Result<Vec<_>>>()?;

        let mut best: Option<Chain> = None;
        for c in chains {
            if best.as_ref().map_or(true, |b| c.len() < b.len()) {
                best = Some(c);
            }
        }
        debug!(
            "continued_fractions({}): {} candidates for {}",
            self.strategy,
            ks.len(),
            n
        );
        best.ok_or_else(|| ChainError::EmptyCandidateSet {
            strategy: self.strategy.to_string(),
            n: n.clone(),
        })
    }
}

impl SequenceAlgorithm for ContinuedFractions {
    fn name(&self) -> String {
        format!("continued_fractions({})", self.strategy)
    }

    fn find_sequence(&self, targets: &[BigUint]) -> Result<Chain> {
        let ns = bigints::sort_unique(targets.to_vec());
        match ns.first() {
            None => return Err(ChainError::InvalidTarget { target: BigUint::zero() }),
            Some(first) if first.is_zero() => {
                return Err(ChainError::InvalidTarget { target: first.clone() })
            }
            _ => {}
        }
        self.chain(&ns)
    }
}

impl ChainAlgorithm for ContinuedFractions {
    fn name(&self) -> String {
        SequenceAlgorithm::name(self)
    }

    fn find_chain(&self, n: &BigUint) -> Result<Chain> {
        self.find_sequence(std::slice::from_ref(n))
    }
}
