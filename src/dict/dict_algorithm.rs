// src/dict/dict_algorithm.rs

use log::debug;
use num::{BigUint, Zero};
use std::sync::Arc;

use crate::algorithms::{ChainAlgorithm, SequenceAlgorithm};
use crate::chain::Chain;
use crate::dict::{primitive, Decomposer, DictSum};
use crate::error::{ChainError, Result};
use crate::integer_math::bigints;

/// Dictionary method: decompose, chain the dictionary, reduce, then assemble.
#[derive(Clone)]
pub struct DictAlgorithm {
    decomposer: Decomposer,
    sequence: Arc<dyn SequenceAlgorithm>,
}

impl DictAlgorithm {
    pub fn new(decomposer: Decomposer, sequence: Arc<dyn SequenceAlgorithm>) -> Self {
        DictAlgorithm { decomposer, sequence }
    }

    pub fn decomposer(&self) -> Decomposer {
        self.decomposer
    }
}

impl ChainAlgorithm for DictAlgorithm {
    fn name(&self) -> String {
        format!("dictionary({},{})", self.decomposer, self.sequence.name())
    }

    fn find_chain(&self, n: &BigUint) -> Result<Chain> {
        if n.is_zero() {
            return Err(ChainError::InvalidTarget { target: n.clone() });
        }

        let sum = self.decomposer.decompose(n);

        let dictionary = sum.dictionary();
        debug!(
            "{}: {} terms, dictionary of {} values",
            self.name(),
            sum.len(),
            dictionary.len()
        );

        let chain = self.sequence.find_sequence(&dictionary)?;
        let (reduced, chain) = primitive(&sum, &chain)?;

        Ok(assemble(&reduced, chain))
    }
}

/// Merges a dictionary chain with the chain that assembles the sum from it.
pub(crate) fn assemble(sum: &DictSum, dictionary_chain: Chain) -> Chain {
    let mut values = dictionary_chain.into_values();
    values.extend(dict_sum_chain(sum));
    Chain::from_values(bigints::sort_unique(values))
}

/// Values visited while evaluating a sorted sum from its highest term down.
///
/// Starting from the D of the highest-exponent term, double until the next
/// exponent is reached, add that term's D, and continue down to exponent 0.
/// Every D must already be available, so the result is only a chain once merged
/// with a chain for the dictionary.
pub fn dict_sum_chain(sum: &DictSum) -> Vec<BigUint> {
    let terms = sum.terms();
    let mut values = Vec::new();
    let top = match terms.last() {
        Some(t) => t,
        None => return values,
    };

    let mut cur = top.d.clone();
    values.push(cur.clone());
    for k in (1..terms.len()).rev() {
        for _ in terms[k - 1].e..terms[k].e {
            cur <<= 1u32;
            values.push(cur.clone());
        }
        cur += &terms[k - 1].d;
        values.push(cur.clone());
    }
    for _ in 0..terms[0].e {
        cur <<= 1u32;
        values.push(cur.clone());
    }
    values
}
