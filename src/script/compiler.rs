// src/script/compiler.rs

use log::debug;
use num::BigUint;
use std::collections::HashMap;

use crate::error::{ChainError, Result};
use crate::ir::{Instruction, Program};
use crate::script::parser::{Expr, Operand, Script, Statement};

/// Name and value bindings while translating.
struct Scope {
    program: Program,
    values: Vec<BigUint>,
    names: HashMap<String, usize>,
    line: usize,
}

impl Scope {
    fn new() -> Self {
        Scope {
            program: Program::new(),
            values: vec![BigUint::from(1u32)],
            names: HashMap::new(),
            line: 0,
        }
    }

    fn error(&self, message: String) -> ChainError {
        ChainError::Parse { line: self.line, message }
    }

    fn resolve(&self, operand: &Operand) -> Result<usize> {
        match operand {
            Operand::Constant(v) => self
                .values
                .iter()
                .position(|x| x == v)
                .ok_or_else(|| self.error(format!("constant {} is not available", v))),
            Operand::Index(i) if *i < self.values.len() => Ok(*i),
            Operand::Index(i) => Err(self.error(format!("position [{}] is not defined yet", i))),
            Operand::Identifier(name) => self
                .names
                .get(name)
                .copied()
                .ok_or_else(|| self.error(format!("unknown identifier {}", name))),
        }
    }

    fn emit(&mut self, instruction: Instruction) -> Result<usize> {
        let position = self
            .program
            .push(instruction)
            .map_err(|e| self.error(e.to_string()))?;
        let value = match instruction {
            Instruction::Add(x, y) => &self.values[x] + &self.values[y],
            Instruction::Double(x) => &self.values[x] << 1u32,
            Instruction::Shift(x, s) => &self.values[x] << s,
        };
        self.values.push(value);
        Ok(position)
    }

    /// Emits the instructions for expr and returns the position holding its value.
    fn expr(&mut self, expr: &Expr) -> Result<usize> {
        match expr {
            Expr::Operand(x) => self.resolve(x),
            Expr::Add(x, y) => {
                let (x, y) = (self.resolve(x)?, self.resolve(y)?);
                self.emit(Instruction::Add(x, y))
            }
            Expr::Double(x) => {
                let x = self.resolve(x)?;
                self.emit(Instruction::Double(x))
            }
            Expr::Shift(x, s) => {
                let x = self.resolve(x)?;
                self.emit(Instruction::Shift(x, *s))
            }
            Expr::ShiftAdd(x, s, y) => {
                let (x, y) = (self.resolve(x)?, self.resolve(y)?);
                let shifted = self.emit(Instruction::Shift(x, *s))?;
                self.emit(Instruction::Add(shifted, y))
            }
        }
    }
}

/// Lowers a parsed script to a program.
///
/// Identifiers bind to the position their expression produced and may be
/// rebound. A `return` is only accepted as the last statement, and only when it
/// refers to the final position of the program.
pub fn translate(script: &Script) -> Result<Program> {
    let mut scope = Scope::new();
    let count = script.lines.len();

    for (i, line) in script.lines.iter().enumerate() {
        scope.line = line.number;
        match &line.statement {
            Statement::Assign { name, expr } => {
                let position = scope.expr(expr)?;
                scope.names.insert(name.clone(), position);
            }
            Statement::Return(expr) => {
                if i + 1 != count {
                    return Err(scope.error("return must be the last statement".to_string()));
                }
                let position = scope.expr(expr)?;
                if position != scope.program.output() {
                    return Err(scope.error(format!(
                        "return refers to position [{}], the program ends at [{}]",
                        position,
                        scope.program.output()
                    )));
                }
            }
        }
    }

    debug!(
        "compiled {} statements into {} instructions",
        count,
        scope.program.len()
    );
    Ok(scope.program)
}
