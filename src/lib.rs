// src/lib.rs

pub mod algorithms;
pub mod chain;
pub mod config;
pub mod contfrac;
pub mod dict;
pub mod error;
pub mod integer_math;
pub mod ir;
pub mod script;

pub use algorithms::{ensemble, find_best, BestChain, ChainAlgorithm, SequenceAlgorithm};
pub use chain::Chain;
pub use error::{ChainError, Result};
pub use ir::{evaluate, Instruction, Program};
