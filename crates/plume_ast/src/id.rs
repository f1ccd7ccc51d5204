//! Stable identities for expression nodes

use std::fmt::{Display, Formatter};

/// Identifies one expression node within a single lowered [Program](crate::program::Program).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out dense node ids, starting at zero
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    next: u32,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the next unused id
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// The number of ids handed out so far
    pub fn count(&self) -> usize {
        self.next as usize
    }
}
