#![doc = include_str!("../README.md")]

pub mod lexer;
pub mod parser;
pub mod transforms;

pub use lexer::{lex, LexErrors, LexingError};
pub use parser::{parse, SyntaxError};
pub use transforms::{lower, LoweringError};
