// src/integer_math/mod.rs

pub mod big_vector;
pub mod bigints;
