// src/ir/program.rs
//
// Linear intermediate representation of an addition chain.
//
// Position 0 always holds the constant 1. Instruction i defines position i + 1
// and may only read positions that already exist, which `Program::push`
// enforces. A backend lowers Add to a multiplication, Double to a squaring and
// Shift(x, s) to s squarings.

use bitvec::prelude::*;
use num::BigUint;
use serde::Serialize;
use std::fmt;

use crate::chain::Chain;
use crate::error::{ChainError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// [x] + [y]
    Add(usize, usize),
    /// 2·[x]
    Double(usize),
    /// [x]·2^s
    Shift(usize, u32),
}

impl Instruction {
    /// Positions read by this instruction, in operand order.
    pub fn operands(&self) -> Vec<usize> {
        match *self {
            Instruction::Add(x, y) => vec![x, y],
            Instruction::Double(x) | Instruction::Shift(x, _) => vec![x],
        }
    }
}

/// Number of multiplications and squarings a backend would emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpCounts {
    pub adds: usize,
    pub doubles: usize,
}

impl OpCounts {
    pub fn total(&self) -> usize {
        self.adds + self.doubles
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Self {
        Program { instructions: Vec::new() }
    }

    /// Appends an instruction and returns the position it defines.
    ///
    /// # Arguments
    /// * `instruction` - The instruction to append; its operands must refer to existing positions
    ///
    /// # Returns
    /// * `Ok(position)` - The index of the newly defined chain position
    /// * `Err(ChainError)` - An operand refers to an undefined position, or a shift amount is zero
    pub fn push(&mut self, instruction: Instruction) -> Result<usize> {
        let position = self.instructions.len() + 1;
        for operand in instruction.operands() {
            if operand >= position {
                return Err(ChainError::OperandOutOfRange { operand, position });
            }
        }
        if let Instruction::Shift(_, 0) = instruction {
            return Err(ChainError::InvalidShift { position });
        }
        self.instructions.push(instruction);
        Ok(position)
    }

    pub fn add(&mut self, x: usize, y: usize) -> Result<usize> {
        self.push(Instruction::Add(x, y))
    }

    pub fn double(&mut self, x: usize) -> Result<usize> {
        self.push(Instruction::Double(x))
    }

    pub fn shift(&mut self, x: usize, s: u32) -> Result<usize> {
        self.push(Instruction::Shift(x, s))
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Index of the final position, which holds the program's result.
    pub fn output(&self) -> usize {
        self.instructions.len()
    }

    /// Counts how many times each position is read by later instructions.
    ///
    /// A position whose count has dropped to zero can have its storage reused.
    pub fn read_counts(&self) -> Vec<usize> {
        let mut reads = vec![0; self.instructions.len() + 1];
        for instruction in &self.instructions {
            for operand in instruction.operands() {
                reads[operand] += 1;
            }
        }
        reads
    }

    /// Transitive dependencies of every position, including the position itself.
    pub fn dependencies(&self) -> Vec<BitVec> {
        let n = self.instructions.len() + 1;
        let mut used: Vec<BitVec> = Vec::with_capacity(n);

        let mut root = bitvec![0; n];
        root.set(0, true);
        used.push(root);

        for (i, instruction) in self.instructions.iter().enumerate() {
            let mut deps = bitvec![0; n];
            deps.set(i + 1, true);
            for operand in instruction.operands() {
                for j in used[operand].iter_ones() {
                    deps.set(j, true);
                }
            }
            used.push(deps);
        }

        used
    }

    pub fn op_counts(&self) -> OpCounts {
        let mut counts = OpCounts::default();
        for instruction in &self.instructions {
            match *instruction {
                Instruction::Add(..) => counts.adds += 1,
                Instruction::Double(_) => counts.doubles += 1,
                Instruction::Shift(_, s) => counts.doubles += s as usize,
            }
        }
        counts
    }

    pub fn evaluate(&self) -> Chain {
        evaluate(self)
    }
}

/// Executes a program, returning the value of every position in order.
///
/// # Examples
/// ```
/// use addchain::ir::{evaluate, Program};
/// use num::BigUint;
///
/// let mut p = Program::new();
/// let two = p.double(0).unwrap();
/// p.add(two, 0).unwrap();
/// assert_eq!(evaluate(&p).end(), Some(&BigUint::from(3u32)));
/// ```
pub fn evaluate(program: &Program) -> Chain {
    let mut values: Vec<BigUint> = Vec::with_capacity(program.len() + 1);
    values.push(BigUint::from(1u32));
    for instruction in program.instructions() {
        let value = match *instruction {
            Instruction::Add(x, y) => &values[x] + &values[y],
            Instruction::Double(x) => &values[x] << 1u32,
            Instruction::Shift(x, s) => &values[x] << s,
        };
        values.push(value);
    }
    Chain::from_values(values)
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Add(x, y) => write!(f, "[{}] add [{}]", x, y),
            Instruction::Double(x) => write!(f, "dbl [{}]", x),
            Instruction::Shift(x, s) => write!(f, "[{}] shl {}", x, s),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "[{}] = {}", i + 1, instruction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Program {
        // 1, 2, 3, 6, 12, 15, 120
        let mut p = Program::new();
        p.double(0).unwrap();
        p.add(0, 1).unwrap();
        p.double(2).unwrap();
        p.double(3).unwrap();
        p.add(2, 4).unwrap();
        p.shift(5, 3).unwrap();
        p
    }

    #[test]
    fn test_push_rejects_forward_references() {
        let mut p = Program::new();
        assert!(matches!(
            p.add(0, 1),
            Err(ChainError::OperandOutOfRange { operand: 1, position: 1 })
        ));
        assert_eq!(p.double(0).unwrap(), 1);
        assert!(matches!(p.shift(1, 0), Err(ChainError::InvalidShift { position: 2 })));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_evaluate() {
        let chain = evaluate(&sample());
        let expected: Vec<BigUint> = [1u32, 2, 3, 6, 12, 15, 120].iter().map(|&v| BigUint::from(v)).collect();
        assert_eq!(chain.values(), expected.as_slice());
    }

    #[test]
    fn test_read_counts() {
        let reads = sample().read_counts();
        assert_eq!(reads, vec![2, 1, 2, 1, 1, 1, 0]);
    }

    #[test]
    fn test_dependencies() {
        let deps = sample().dependencies();
        let ones: Vec<usize> = deps[5].iter_ones().collect();
        assert_eq!(ones, vec![0, 1, 2, 3, 4, 5]);
        let ones: Vec<usize> = deps[2].iter_ones().collect();
        assert_eq!(ones, vec![0, 1, 2]);
    }

    #[test]
    fn test_op_counts() {
        let counts = sample().op_counts();
        assert_eq!(counts, OpCounts { adds: 2, doubles: 6 });
        assert_eq!(counts.total(), 8);
    }

    #[test]
    fn test_display() {
        let mut p = Program::new();
        p.double(0).unwrap();
        p.add(0, 1).unwrap();
        assert_eq!(p.to_string(), "[1] = dbl [0]\n[2] = [0] add [1]\n");
    }
}
