// src/ir/mod.rs

pub mod program;

// Re-export main types for convenience
pub use program::{evaluate, Instruction, OpCounts, Program};
