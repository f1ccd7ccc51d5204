//! The passes run over a lowered program

pub mod declaration_discovery;
pub mod type_check;
