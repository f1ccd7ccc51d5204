#![doc = include_str!("../README.md")]

mod compiler;
pub mod resolution;

pub use compiler::*;
pub use plume_ast_parsing::{lex, lower, parse};
