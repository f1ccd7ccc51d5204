//! Sequences separated by punctuation

use crate::token::AstToken;
use plume_tokens::token::{ToTokens, TokenStream};

/// Items separated by a punctuation token, with an optional trailing separator
#[derive(Debug, Clone, PartialEq)]
pub struct Punctuated<T> {
    pub items: Vec<(T, Option<AstToken>)>,
}

impl<T> Punctuated<T> {
    pub fn new() -> Self {
        Self { items: vec![] }
    }

    /// Adds an item, along with the separator that followed it
    pub fn push(&mut self, item: T, separator: Option<AstToken>) {
        self.items.push((item, separator));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items, ignoring the separators
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(item, _)| item)
    }
}

impl<T> Default for Punctuated<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ToTokens> ToTokens for Punctuated<T> {
    fn to_tokens(&self) -> TokenStream {
        self.items
            .iter()
            .flat_map(|(item, sep)| item.to_tokens().chain(sep.to_tokens()))
            .collect()
    }
}
