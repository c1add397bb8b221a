//! Builder module: interprets a `Block` against dynamic values.
//!
//! Each node-level block is one recursion frame holding a tag, a list of prop
//! sources, a list of children and the named attribute set currently open.
//! The block itself is only read, so a caller can keep one and build it with
//! any number of value slices.

use crate::factory::{ElementFactory, TreeFactory};
use crate::ir::{Block, Instruction};
use crate::types::{Attributes, Built, Child, FieldIndex, Literal, Node, Part, PropSource, Tag};
use crate::{HtreeError, Result};

struct Frame<V, E> {
    tag: Tag<V>,
    props: Vec<PropSource<V>>,
    children: Vec<Child<V, E>>,
    /// Named set being filled; lands in `props` when a spread or the end of
    /// the frame closes it.
    open: Option<Attributes<V>>,
}

impl<V, E> Frame<V, E> {
    fn new() -> Self {
        Self {
            tag: Tag::default(),
            props: Vec::new(),
            children: Vec::new(),
            open: None,
        }
    }

    fn close_attributes(&mut self) {
        if let Some(attrs) = self.open.take() {
            self.props.push(PropSource::Named(attrs));
        }
    }

    fn finish(mut self) -> (Tag<V>, Vec<PropSource<V>>, Vec<Child<V, E>>) {
        self.close_attributes();
        (self.tag, self.props, self.children)
    }
}

pub struct TreeBuilder<'a, V, F> {
    fields: &'a [V],
    factory: &'a mut F,
}

impl<'a, V, F> TreeBuilder<'a, V, F>
where
    V: Clone,
    F: ElementFactory<V>,
{
    pub fn new(fields: &'a [V], factory: &'a mut F) -> Self {
        Self { fields, factory }
    }

    /// Interpret `block` as the implicit root of a template.
    pub fn build(&mut self, block: &Block) -> Result<Built<V, F::Output>> {
        let mut root = self.frame(block, 0).map_err(|e| {
            log::debug!(target: "htree.builder", "build failed: {e}");
            e
        })?;
        if root.children.len() == 1 {
            if let Some(child) = root.children.pop() {
                return Ok(Built::Single(child));
            }
        }
        Ok(Built::Many(root.children))
    }

    fn frame(&mut self, block: &Block, depth: usize) -> Result<Frame<V, F::Output>> {
        log::trace!(target: "htree.builder", "frame at depth {depth} with {} records", block.len());
        let mut frame = Frame::new();
        for instruction in block {
            match instruction {
                Instruction::TagSet { field, literal } => {
                    frame.tag = match self.field(*field)? {
                        Some(v) => Tag::Dynamic(v),
                        None => Tag::Name(literal.clone()),
                    };
                }
                Instruction::PropsAssign { field } => {
                    let value = self.field(*field)?.ok_or(HtreeError::LiteralSpread)?;
                    frame.close_attributes();
                    frame.props.push(PropSource::Spread(value));
                }
                Instruction::PropSet { name, field, literal } => {
                    let part = self.part(*field, literal)?;
                    frame
                        .open
                        .get_or_insert_with(Attributes::new)
                        .set(name.as_str(), vec![part]);
                }
                Instruction::PropAppend { name, field, literal } => {
                    let part = self.part(*field, literal)?;
                    frame
                        .open
                        .as_mut()
                        .and_then(|attrs| attrs.get_mut(name))
                        .ok_or_else(|| HtreeError::UnopenedAttribute(name.clone()))?
                        .push(part);
                }
                Instruction::ChildRecurse { block } => {
                    let (tag, props, children) = self.frame(block, depth + 1)?.finish();
                    let element = self.factory.create(tag, props, children);
                    frame.children.push(Child::Element(element));
                }
                Instruction::ChildAppend { field, literal } => {
                    let child = match self.field(*field)? {
                        Some(v) => Child::Dynamic(v),
                        None => Child::Text(literal.clone()),
                    };
                    frame.children.push(child);
                }
            }
        }
        Ok(frame)
    }

    fn part(&self, field: FieldIndex, literal: &Literal) -> Result<Part<V>> {
        Ok(match self.field(field)? {
            Some(v) => Part::Dynamic(v),
            None => Part::Literal(literal.clone()),
        })
    }

    /// `None` selects the record's literal, `Some` the dynamic value.
    fn field(&self, field: FieldIndex) -> Result<Option<V>> {
        match field.position() {
            None => Ok(None),
            Some(position) => self
                .fields
                .get(position)
                .cloned()
                .map(Some)
                .ok_or(HtreeError::MissingField {
                    index: field.0,
                    available: self.fields.len(),
                }),
        }
    }
}

/// Build a `Node` tree from `block` and the dynamic values of one invocation.
pub fn build<V: Clone>(block: &Block, fields: &[V]) -> Result<Built<V, Node<V>>> {
    build_with(block, fields, &mut TreeFactory)
}

/// Build with a custom element factory.
pub fn build_with<V, F>(block: &Block, fields: &[V], factory: &mut F) -> Result<Built<V, F::Output>>
where
    V: Clone,
    F: ElementFactory<V>,
{
    TreeBuilder::new(fields, factory).build(block)
}
