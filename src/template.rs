//! Template module: a parsed template ready to be built many times.
//!
//! This module provides the Template type.

use crate::builder::build_with;
use crate::factory::{ElementFactory, TreeFactory};
use crate::ir::Block;
use crate::parser::TemplateParser;
use crate::types::{Built, Node};
use crate::{HtreeError, Result};
use std::sync::Arc;

/// A compiled template. Cloning shares the instruction stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    block: Arc<Block>,
    arity: usize,
}

impl Template {
    /// Parse the static segments of a template.
    pub fn new<S: AsRef<str>>(statics: &[S]) -> Self {
        Self {
            block: Arc::new(TemplateParser::parse(statics)),
            arity: statics.len().saturating_sub(1),
        }
    }

    /// Wrap an instruction stream obtained elsewhere, e.g. from a cache.
    pub fn from_parts(block: Block, arity: usize) -> Self {
        Self {
            block: Arc::new(block),
            arity,
        }
    }

    /// Number of dynamic values every build expects.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn shared_block(&self) -> Arc<Block> {
        Arc::clone(&self.block)
    }

    /// Build a `Node` tree with one set of dynamic values.
    pub fn build<V: Clone>(&self, fields: &[V]) -> Result<Built<V, Node<V>>> {
        self.build_with(fields, &mut TreeFactory)
    }

    /// Build with a custom element factory.
    pub fn build_with<V, F>(&self, fields: &[V], factory: &mut F) -> Result<Built<V, F::Output>>
    where
        V: Clone,
        F: ElementFactory<V>,
    {
        if fields.len() != self.arity {
            return Err(HtreeError::ArityMismatch {
                expected: self.arity,
                found: fields.len(),
            });
        }
        build_with(&self.block, fields, factory)
    }
}
