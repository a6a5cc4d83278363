// src/dict/runs.rs
//
// Runs algorithm: a dictionary method specialised to runs of ones.
//
// The dictionary of a run-length decomposition consists of values 2^L - 1. A
// chain for the run lengths L themselves is solved as an addition sequence and
// then lifted to a chain for the runs, using
//
//     2^(a+b) - 1 = (2^b - 1)·2^a + (2^a - 1)

use log::debug;
use num::{BigUint, ToPrimitive, Zero};
use std::collections::HashMap;
use std::sync::Arc;

use crate::algorithms::{ChainAlgorithm, SequenceAlgorithm};
use crate::chain::Chain;
use crate::dict::dict_algorithm::assemble;
use crate::dict::{primitive, Decomposer};
use crate::error::{ChainError, Result};
use crate::integer_math::bigints;
use crate::ir::Instruction;

#[derive(Clone)]
pub struct RunsAlgorithm {
    sequence: Arc<dyn SequenceAlgorithm>,
}

impl RunsAlgorithm {
    pub fn new(sequence: Arc<dyn SequenceAlgorithm>) -> Self {
        RunsAlgorithm { sequence }
    }
}

impl ChainAlgorithm for RunsAlgorithm {
    fn name(&self) -> String {
        format!("runs({})", self.sequence.name())
    }

    fn find_chain(&self, n: &BigUint) -> Result<Chain> {
        if n.is_zero() {
            return Err(ChainError::InvalidTarget { target: n.clone() });
        }

        let sum = Decomposer::RunLength { t: 0 }.decompose(n);

        let lengths: Vec<BigUint> = sum
            .dictionary()
            .iter()
            .map(|run| BigUint::from(run.bits()))
            .collect();
        debug!("{}: run lengths {:?}", self.name(), lengths);

        let length_chain = self.sequence.find_sequence(&lengths)?;
        let chain = runs_chain(&length_chain)?;
        let (reduced, chain) = primitive(&sum, &chain)?;

        Ok(assemble(&reduced, chain))
    }
}

/// Lifts a chain of run lengths to a chain containing 2^L - 1 for every length L
/// in it.
///
/// Each step L = a + b (a ≤ b) of the lengths chain becomes repeated doublings of
/// 2^b - 1 up to (2^b - 1)·2^a, followed by one addition of 2^a - 1. Doublings
/// already made for an earlier step with the same b are reused.
///
/// # Examples
/// ```
/// use addchain::chain::Chain;
/// use addchain::dict::runs_chain;
/// use num::BigUint;
///
/// let lengths = Chain::from_values(vec![1u32, 2, 3].into_iter().map(BigUint::from).collect());
/// let runs = runs_chain(&lengths).unwrap();
/// runs.validate().unwrap();
/// assert!(runs.contains(&BigUint::from(7u32)));
/// ```
pub fn runs_chain(lengths: &Chain) -> Result<Chain> {
    let program = lengths.program()?;
    let values = lengths.values();

    let mut chain = Chain::new().into_values();
    // Largest shift made so far of each run 2^b - 1.
    let mut shifts: HashMap<u64, u64> = HashMap::new();

    for instruction in program.instructions() {
        let (x, y) = match *instruction {
            Instruction::Add(x, y) => (x, y),
            Instruction::Double(x) => (x, x),
            // Chain::program never emits shifts.
            Instruction::Shift(..) => continue,
        };
        let (a, b) = bigints::min_max(&values[x], &values[y]);
        let a = a.to_u64().ok_or(ChainError::RunLengthOverflow)?;
        let b = b.to_u64().ok_or(ChainError::RunLengthOverflow)?;
        let total = a.checked_add(b).ok_or(ChainError::RunLengthOverflow)?;

        let run = bigints::ones(b);
        let shift = shifts.entry(b).or_insert(0);
        while *shift < a {
            *shift += 1;
            bigints::insert_sorted_unique(&mut chain, &run << *shift);
        }
        bigints::insert_sorted_unique(&mut chain, bigints::ones(total));
    }

    Ok(Chain::from_values(chain))
}
