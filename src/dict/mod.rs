// src/dict/mod.rs
//
// Dictionary method: write the target as Σ D·2^E over a small dictionary of
// values D, build a chain covering the dictionary, then assemble the target by
// doublings and additions of dictionary entries.

pub mod decomposer;
pub mod dict_algorithm;
pub mod primitive;
pub mod runs;

use num::{BigUint, Zero};
use std::fmt;

use crate::integer_math::bigints;

pub use decomposer::Decomposer;
pub use dict_algorithm::{dict_sum_chain, DictAlgorithm};
pub use primitive::primitive;
pub use runs::{runs_chain, RunsAlgorithm};

/// The value D·2^E.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DictTerm {
    pub d: BigUint,
    pub e: u64,
}

impl DictTerm {
    pub fn new(d: BigUint, e: u64) -> Self {
        DictTerm { d, e }
    }

    pub fn value(&self) -> BigUint {
        &self.d << self.e
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictSum(Vec<DictTerm>);

impl DictSum {
    pub fn new() -> Self {
        DictSum(Vec::new())
    }

    pub fn from_terms(terms: Vec<DictTerm>) -> Self {
        DictSum(terms)
    }

    pub fn push(&mut self, term: DictTerm) {
        self.0.push(term);
    }

    pub fn extend(&mut self, other: DictSum) {
        self.0.extend(other.0);
    }

    pub fn terms(&self) -> &[DictTerm] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The integer Σ D·2^E.
    pub fn value(&self) -> BigUint {
        self.0.iter().fold(BigUint::zero(), |acc, t| acc + t.value())
    }

    /// Distinct D values in ascending order.
    pub fn dictionary(&self) -> Vec<BigUint> {
        bigints::sort_unique(self.0.iter().map(|t| t.d.clone()).collect())
    }

    /// Stable sort by ascending exponent.
    pub fn sort_by_exponent(&mut self) {
        self.0.sort_by_key(|t| t.e);
    }
}

impl fmt::Display for DictSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "0");
        }
        let terms: Vec<String> = self.0.iter().map(|t| format!("{}·2^{}", t.d, t.e)).collect();
        write!(f, "{}", terms.join(" + "))
    }
}
