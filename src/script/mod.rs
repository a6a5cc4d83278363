// src/script/mod.rs
//
// A small text language for addition chains, in which every line names one step.
//
//   _10 = dbl 1
//   _11 = 1 add _10
//   return _11 shl 2 add _11      # 15
//
// `compile` lowers a script to an ir::Program; `decompile` prints a program
// back as a script.

pub mod compiler;
pub mod parser;
pub mod printer;

use crate::error::Result;
use crate::ir::Program;

pub use compiler::translate;
pub use parser::{parse, Expr, Line, Operand, Script, Statement};
pub use printer::decompile;

/// Parses and translates a script.
///
/// # Examples
/// ```
/// use addchain::ir::evaluate;
/// use addchain::script::compile;
/// use num::BigUint;
///
/// let program = compile("1 shl 3\n").unwrap();
/// assert_eq!(evaluate(&program).end(), Some(&BigUint::from(8u32)));
/// ```
pub fn compile(text: &str) -> Result<Program> {
    translate(&parse(text)?)
}
