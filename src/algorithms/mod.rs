// src/algorithms/mod.rs
//
// Algorithm interfaces and the ensemble search.
//
// Every chain algorithm maps a target n to an addition chain ending at n; every
// sequence algorithm maps a set of targets to a chain containing all of them.
// No single heuristic wins for every n, so the ensemble runs a catalogue of
// dictionary and runs algorithms over the same target and keeps the shortest
// valid result:
//
// Component           Variants
// ─────────────────────────────────────────────────────────────────────────
// Sequence algorithm  continued fractions × {binary, co-binary, dichotomic, sqrt}
// Decomposer          sliding_window(K), run_length(T), hybrid(K,T)
// Chain algorithm     dictionary(decomposer, sequence), runs(sequence)
//
// Usage:
//   let algorithms = ensemble(&EnsembleConfig::default());
//   let best = find_best(&n, &algorithms, None)?;
//   println!("{} found {} entries", best.algorithm, best.chain.len());

use log::{info, warn};
use num::BigUint;
use rayon::prelude::*;
use std::sync::Arc;

use crate::chain::Chain;
use crate::config::EnsembleConfig;
use crate::contfrac::{ContinuedFractions, STRATEGIES};
use crate::dict::{Decomposer, DictAlgorithm, RunsAlgorithm};
use crate::error::{ChainError, Result};

/// Finds an addition chain ending at a target.
pub trait ChainAlgorithm: Send + Sync {
    /// Human-readable name, stable across runs.
    fn name(&self) -> String;

    /// Returns a chain whose last element is n.
    fn find_chain(&self, n: &BigUint) -> Result<Chain>;
}

/// Finds an addition chain containing every target.
pub trait SequenceAlgorithm: Send + Sync {
    fn name(&self) -> String;

    /// Returns a chain that contains every element of targets and ends at the
    /// largest of them. Targets may be unsorted and contain duplicates.
    fn find_sequence(&self, targets: &[BigUint]) -> Result<Chain>;
}

/// Winner of an ensemble search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestChain {
    pub algorithm: String,
    pub chain: Chain,
}

/// Powers of two from `start` up to and including `limit`.
fn doublings(start: u32, limit: u32) -> Vec<u32> {
    let mut values = Vec::new();
    let mut v = start.max(1);
    while v <= limit {
        values.push(v);
        match v.checked_mul(2) {
            Some(next) => v = next,
            None => break,
        }
    }
    values
}

/// Decomposers used by the ensemble.
pub fn ensemble_decomposers(config: &EnsembleConfig) -> Vec<Decomposer> {
    let mut decomposers = Vec::new();

    for k in doublings(config.min_window, config.max_window) {
        decomposers.push(Decomposer::SlidingWindow { k });
    }

    decomposers.push(Decomposer::RunLength { t: 0 });
    for t in doublings(16, config.max_run_length) {
        decomposers.push(Decomposer::RunLength { t });
    }

    let mut hybrid_limits = vec![0];
    hybrid_limits.extend(doublings(16, config.max_hybrid_run_length));
    for k in 2..=config.max_hybrid_window {
        for &t in &hybrid_limits {
            decomposers.push(Decomposer::Hybrid { k, t });
        }
    }

    decomposers
}

/// Builds the algorithm catalogue.
///
/// Every decomposer is paired with continued fractions under each singleton
/// strategy, and one runs algorithm is added per strategy. The order is fixed,
/// so ties in `find_best` resolve the same way on every run.
///
/// # Examples
/// ```
/// use addchain::algorithms::ensemble;
/// use addchain::config::EnsembleConfig;
///
/// let algorithms = ensemble(&EnsembleConfig::default());
/// assert!(algorithms.iter().any(|a| a.name() == "runs(continued_fractions(binary))"));
/// ```
pub fn ensemble(config: &EnsembleConfig) -> Vec<Arc<dyn ChainAlgorithm>> {
    let sequences: Vec<Arc<dyn SequenceAlgorithm>> = STRATEGIES
        .iter()
        .filter(|s| s.singleton())
        .map(|s| Arc::new(ContinuedFractions::new(*s)) as Arc<dyn SequenceAlgorithm>)
        .collect();

    let mut algorithms: Vec<Arc<dyn ChainAlgorithm>> = Vec::new();
    for decomposer in ensemble_decomposers(config) {
        for sequence in &sequences {
            algorithms.push(Arc::new(DictAlgorithm::new(decomposer, Arc::clone(sequence))));
        }
    }
    for sequence in &sequences {
        algorithms.push(Arc::new(RunsAlgorithm::new(Arc::clone(sequence))));
    }
    algorithms
}

/// Runs every algorithm on n and returns the shortest valid chain.
///
/// Algorithms run in parallel on a dedicated rayon pool. Results that fail or do
/// not verify are logged and skipped; among the rest the first shortest in
/// catalogue order wins.
///
/// # Arguments
/// * `n` - The target, must be positive
/// * `algorithms` - The catalogue to search, typically from `ensemble`
/// * `threads` - Pool size; `None` uses every core
///
/// # Returns
/// * `Ok(BestChain)` - The winning algorithm name and its chain
/// * `Err(ChainError::NoChainFound)` - Every algorithm failed
pub fn find_best(
    n: &BigUint,
    algorithms: &[Arc<dyn ChainAlgorithm>],
    threads: Option<usize>,
) -> Result<BestChain> {
    let num_threads = threads.unwrap_or_else(num_cpus::get).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()?;

    info!("========================================");
    info!("ENSEMBLE SEARCH");
    info!("========================================");
    info!("Target: {} ({} bits)", n, n.bits());
    info!("Algorithms: {}", algorithms.len());
    info!("Threads: {}", num_threads);
    info!("========================================");

    let results: Vec<Result<Chain>> = pool.install(|| {
        algorithms
            .par_iter()
            .map(|a| {
                let chain = a.find_chain(n)?;
                chain.validate()?;
                chain.produces(n)?;
                Ok(chain)
            })
            .collect()
    });

    let mut best: Option<BestChain> = None;
    for (algorithm, result) in algorithms.iter().zip(results) {
        match result {
            Ok(chain) => {
                if best.as_ref().map_or(true, |b| chain.len() < b.chain.len()) {
                    best = Some(BestChain { algorithm: algorithm.name(), chain });
                }
            }
            Err(e) => warn!("✗ {} failed: {}", algorithm.name(), e),
        }
    }

    let best = best.ok_or_else(|| ChainError::NoChainFound { target: n.clone() })?;
    info!("✓ {} found a chain of length {}", best.algorithm, best.chain.len());
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::One;

    struct Failing;

    impl ChainAlgorithm for Failing {
        fn name(&self) -> String {
            "failing".to_string()
        }

        fn find_chain(&self, n: &BigUint) -> Result<Chain> {
            Err(ChainError::InvalidTarget { target: n.clone() })
        }
    }

    /// Returns a fixed chain regardless of the target.
    struct Fixed(&'static str, Chain);

    impl ChainAlgorithm for Fixed {
        fn name(&self) -> String {
            self.0.to_string()
        }

        fn find_chain(&self, _n: &BigUint) -> Result<Chain> {
            Ok(self.1.clone())
        }
    }

    fn chain(values: &[u64]) -> Chain {
        Chain::from_values(crate::integer_math::bigints::from_u64s(values))
    }

    #[test]
    fn test_doublings() {
        assert_eq!(doublings(4, 128), vec![4, 8, 16, 32, 64, 128]);
        assert_eq!(doublings(16, 64), vec![16, 32, 64]);
        assert!(doublings(16, 8).is_empty());
    }

    #[test]
    fn test_default_ensemble_size() {
        let config = EnsembleConfig::default();
        let decomposers = ensemble_decomposers(&config);
        // 6 sliding windows, 5 run lengths, 7 hybrid widths × 4 run limits
        assert_eq!(decomposers.len(), 6 + 5 + 28);
        assert_eq!(ensemble(&config).len(), decomposers.len() * 4 + 4);
    }

    #[test]
    fn test_ensemble_names_are_unique() {
        let algorithms = ensemble(&EnsembleConfig::default());
        let mut names: Vec<String> = algorithms.iter().map(|a| a.name()).collect();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn test_find_best_skips_failures() {
        let n = BigUint::from(6u32);
        let algorithms: Vec<Arc<dyn ChainAlgorithm>> = vec![
            Arc::new(Failing),
            // Not a chain for 6.
            Arc::new(Fixed("wrong", chain(&[1, 2, 4]))),
            Arc::new(Fixed("long", chain(&[1, 2, 4, 5, 6]))),
            Arc::new(Fixed("short", chain(&[1, 2, 3, 6]))),
            Arc::new(Fixed("tie", chain(&[1, 2, 4, 6]))),
        ];
        let best = find_best(&n, &algorithms, Some(2)).unwrap();
        assert_eq!(best.algorithm, "short");
        assert_eq!(best.chain, chain(&[1, 2, 3, 6]));
    }

    #[test]
    fn test_find_best_all_fail() {
        let algorithms: Vec<Arc<dyn ChainAlgorithm>> = vec![Arc::new(Failing), Arc::new(Failing)];
        assert!(matches!(
            find_best(&BigUint::from(7u32), &algorithms, Some(1)),
            Err(ChainError::NoChainFound { .. })
        ));
    }

    #[test]
    fn test_find_best_p25519_inverse() {
        let n = (BigUint::one() << 255u32) - BigUint::from(21u32);
        let algorithms = ensemble(&EnsembleConfig::default());
        let best = find_best(&n, &algorithms, None).unwrap();
        best.chain.validate().unwrap();
        best.chain.produces(&n).unwrap();
        // The binary method needs 249 additions.
        let counts = best.chain.program().unwrap().op_counts();
        assert!(counts.adds < 40, "{} additions from {}", counts.adds, best.algorithm);
    }
}
