// src/dict/primitive.rs
//
// Primitive dictionary reduction.
//
// A dictionary chain often contains entries that only one dictionary term
// depends on. Building such a term through the dictionary chain costs the same
// additions as building it inline, but keeps an extra value alive. This pass
// rewrites the DictSum in terms of "primitive" positions, those that more than
// one term depends on (position 0 is always primitive), and drops every other
// position from the chain.
//
// Each chain position is written as an integer combination of primitive
// positions. A term D·2^E with D = Σ c_j·chain[j] then becomes Σ chain[j]·2^(E+b)
// over the set bits b of every coefficient c_j.

use bitvec::prelude::*;
use log::debug;
use num::BigUint;

use crate::chain::Chain;
use crate::dict::{DictSum, DictTerm};
use crate::error::{ChainError, Result};
use crate::integer_math::big_vector::BigVector;
use crate::ir::Instruction;

/// Rewrites sum in terms of the primitive positions of chain.
///
/// # Arguments
/// * `sum` - Dictionary sum whose every D value occurs in `chain`
/// * `chain` - Addition chain covering the dictionary of `sum`
///
/// # Returns
/// * `Ok((sum, chain))` - The equivalent reduced sum (sorted by exponent) and the
///   chain restricted to primitive positions, which is still a valid chain
/// * `Err(ChainError)` - The chain is invalid, misses a dictionary value, or the
///   rewritten sum does not have the original value
pub fn primitive(sum: &DictSum, chain: &Chain) -> Result<(DictSum, Chain)> {
    let program = chain.program()?;
    let n = chain.len();

    let positions = sum
        .terms()
        .iter()
        .map(|t| {
            chain.index(&t.d).ok_or_else(|| ChainError::InvalidChain {
                position: n,
                reason: format!("dictionary value {} is not in the chain", t.d),
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    // How many terms depend on each position.
    let used = program.dependencies();
    let mut needed_for = vec![0usize; n];
    for &p in &positions {
        for j in used[p].iter_ones() {
            needed_for[j] += 1;
        }
    }

    let mut is_primitive = bitvec![0; n];
    is_primitive.set(0, true);
    for j in 1..n {
        if needed_for[j] > 1 {
            is_primitive.set(j, true);
        }
    }

    // Express every position over the primitive ones.
    let mut vectors: Vec<BigVector> = Vec::with_capacity(n);
    vectors.push(BigVector::basis(n, 0));
    for (i, instruction) in program.instructions().iter().enumerate() {
        let position = i + 1;
        let v = if is_primitive[position] {
            BigVector::basis(n, position)
        } else {
            match *instruction {
                Instruction::Add(x, y) => &vectors[x] + &vectors[y],
                Instruction::Double(x) => &vectors[x] + &vectors[x],
                Instruction::Shift(x, s) => vectors[x].shl(s as u64),
            }
        };
        vectors.push(v);
    }

    let mut reduced = DictSum::new();
    for (term, &p) in sum.terms().iter().zip(positions.iter()) {
        for (j, coefficient) in vectors[p].nonzero() {
            for b in 0..coefficient.bits() {
                if coefficient.bit(b) {
                    reduced.push(DictTerm::new(chain.values()[j].clone(), term.e + b));
                }
            }
        }
    }

    let expected = sum.value();
    let actual = reduced.value();
    if expected != actual {
        return Err(ChainError::ReductionInconsistency { expected, actual });
    }
    reduced.sort_by_exponent();

    let kept: Vec<BigUint> = chain
        .iter()
        .enumerate()
        .filter(|(j, _)| is_primitive[*j])
        .map(|(_, x)| x.clone())
        .collect();

    debug!(
        "primitive dictionary: {} of {} chain entries kept, {} terms became {}",
        kept.len(),
        n,
        sum.len(),
        reduced.len()
    );

    Ok((reduced, Chain::from_values(kept)))
}
