// src/chain/mod.rs
//
// Addition chains: sequences starting at 1 in which every later entry is the
// sum of two earlier (possibly equal) entries.

use num::{BigUint, One};
use std::collections::HashMap;
use std::fmt;

use crate::error::{ChainError, Result};
use crate::ir::Program;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chain(Vec<BigUint>);

impl Chain {
    /// The trivial chain [1].
    pub fn new() -> Self {
        Chain(vec![BigUint::one()])
    }

    /// Wraps values without checking the chain property. See `validate`.
    pub fn from_values(values: Vec<BigUint>) -> Self {
        Chain(values)
    }

    /// The doubling chain [1, 2, 4, ..., 2^k].
    pub fn doubling(k: u64) -> Self {
        let mut values = Vec::with_capacity(k as usize + 1);
        let mut x = BigUint::one();
        values.push(x.clone());
        for _ in 0..k {
            x <<= 1u32;
            values.push(x.clone());
        }
        Chain(values)
    }

    pub fn values(&self) -> &[BigUint] {
        &self.0
    }

    pub fn into_values(self) -> Vec<BigUint> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last element of the chain, or None if it is empty.
    pub fn end(&self) -> Option<&BigUint> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BigUint> {
        self.0.iter()
    }

    /// Position of the first occurrence of x.
    pub fn index(&self, x: &BigUint) -> Option<usize> {
        self.0.iter().position(|v| v == x)
    }

    pub fn contains(&self, x: &BigUint) -> bool {
        self.index(x).is_some()
    }

    /// Succeeds if the chain ends at target.
    pub fn produces(&self, target: &BigUint) -> Result<()> {
        match self.0.last() {
            Some(last) if last == target => Ok(()),
            _ => Err(ChainError::NotProduced { target: target.clone() }),
        }
    }

    /// Checks that the chain starts at 1, strictly increases, and that every
    /// entry is the sum of two earlier entries.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(ChainError::InvalidChain { position: 0, reason: "chain is empty".to_string() });
        }
        for i in 1..self.0.len() {
            if self.0[i] <= self.0[i - 1] {
                return Err(ChainError::InvalidChain {
                    position: i,
                    reason: format!("{} does not exceed {}", self.0[i], self.0[i - 1]),
                });
            }
        }
        self.program().map(|_| ())
    }

    /// Converts the chain into a program of Add and Double instructions.
    ///
    /// For each position the most recent summand is searched first, so a doubling
    /// of the previous entry is always emitted as Double.
    pub fn program(&self) -> Result<Program> {
        if self.0.is_empty() {
            return Err(ChainError::InvalidChain { position: 0, reason: "chain is empty".to_string() });
        }
        if !self.0[0].is_one() {
            return Err(ChainError::InvalidChain {
                position: 0,
                reason: format!("chain starts at {} instead of 1", self.0[0]),
            });
        }

        let mut program = Program::new();
        let mut seen: HashMap<&BigUint, usize> = HashMap::new();
        seen.insert(&self.0[0], 0);

        for i in 1..self.0.len() {
            let target = &self.0[i];
            let mut op = None;
            for k in (0..i).rev() {
                if &self.0[k] > target {
                    continue;
                }
                let rest = target - &self.0[k];
                if let Some(&j) = seen.get(&rest) {
                    if j <= k {
                        op = Some((j, k));
                        break;
                    }
                }
            }
            match op {
                Some((j, k)) if j == k => program.double(k)?,
                Some((j, k)) => program.add(j, k)?,
                None => {
                    return Err(ChainError::InvalidChain {
                        position: i,
                        reason: format!("{} is not the sum of previous entries", target),
                    })
                }
            };
            seen.entry(target).or_insert(i);
        }

        Ok(program)
    }

    /// The product a ⊗ b: a followed by end(a)·b[i] for every i ≥ 1.
    ///
    /// If b produces m then the result produces end(a)·m.
    pub fn product(a: &Chain, b: &Chain) -> Result<Chain> {
        let last = a.last()?;
        let mut values = a.0.clone();
        for x in b.0.iter().skip(1) {
            values.push(last * x);
        }
        Ok(Chain(values))
    }

    /// a followed by end(a) + x. Valid when x already occurs in a.
    pub fn plus(a: &Chain, x: &BigUint) -> Result<Chain> {
        let next = a.last()? + x;
        let mut values = a.0.clone();
        values.push(next);
        Ok(Chain(values))
    }

    fn last(&self) -> Result<&BigUint> {
        self.0.last().ok_or_else(|| ChainError::InvalidChain {
            position: 0,
            reason: "chain is empty".to_string(),
        })
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", values.join(", "))
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a BigUint;
    type IntoIter = std::slice::Iter<'a, BigUint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
