#![doc = include_str!("../README.md")]

pub mod expr;
pub mod id;
pub mod items;
pub mod printer;
pub mod program;
pub mod punctuated;
pub mod token;
