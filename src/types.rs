//! Types module: literal values, field indices and the node tree shapes.
//!
//! This module provides the values embedded in instruction records (`Literal`,
//! `FieldIndex`) and everything the tree builder hands back to a caller
//! (`Tag`, `Part`, `Attributes`, `PropSource`, `Child`, `Node`, `Built`).

use serde::{Deserialize, Serialize};

/// A value written literally in the static segments of a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Literal {
    Str(String),
    /// Value part of a boolean attribute such as `<input disabled>`.
    Bool(bool),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            Literal::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Bool(b) => Some(*b),
            Literal::Str(_) => None,
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Str(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Str(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

/// Selects where an instruction operand comes from.
///
/// `0` means the record's embedded literal; `n > 0` means the dynamic value at
/// position `n - 1`, i.e. the hole between static segments `n - 1` and `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldIndex(pub usize);

impl FieldIndex {
    pub const LITERAL: FieldIndex = FieldIndex(0);

    pub fn literal() -> Self {
        Self::LITERAL
    }

    /// Index for the hole at 0-based `position` in the dynamic values.
    pub fn hole(position: usize) -> Self {
        FieldIndex(position + 1)
    }

    pub fn is_literal(self) -> bool {
        self.0 == 0
    }

    /// 0-based position into the dynamic values, or `None` for a literal.
    pub fn position(self) -> Option<usize> {
        self.0.checked_sub(1)
    }
}

/// Resolved tag name of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tag<V> {
    Name(String),
    Dynamic(V),
}

impl<V> Tag<V> {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Tag::Name(name) => Some(name),
            Tag::Dynamic(_) => None,
        }
    }

    /// `true` for the empty-name tag of the implicit root.
    pub fn is_fragment(&self) -> bool {
        matches!(self, Tag::Name(name) if name.is_empty())
    }
}

impl<V> Default for Tag<V> {
    fn default() -> Self {
        Tag::Name(String::new())
    }
}

/// One fragment of an attribute value. Parts concatenate at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Part<V> {
    Literal(Literal),
    Dynamic(V),
}

impl<V> Part<V> {
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Part::Literal(lit) => Some(lit),
            Part::Dynamic(_) => None,
        }
    }

    pub fn as_dynamic(&self) -> Option<&V> {
        match self {
            Part::Dynamic(v) => Some(v),
            Part::Literal(_) => None,
        }
    }
}

/// Named attributes of one element, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes<V> {
    entries: Vec<(String, Vec<Part<V>>)>,
}

impl<V> Attributes<V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn get(&self, name: &str) -> Option<&[Part<V>]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, parts)| parts.as_slice())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<Part<V>>> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, parts)| parts)
    }

    /// Replace the parts of `name`, keeping its original position if it was
    /// already present.
    pub fn set(&mut self, name: impl Into<String>, parts: Vec<Part<V>>) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(existing) => *existing = parts,
            None => self.entries.push((name, parts)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Part<V>])> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for Attributes<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// One entry in a node's property list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropSource<V> {
    /// `...${obj}`: merged wholesale by the renderer, never expanded here.
    Spread(V),
    Named(Attributes<V>),
}

impl<V> PropSource<V> {
    pub fn as_named(&self) -> Option<&Attributes<V>> {
        match self {
            PropSource::Named(attrs) => Some(attrs),
            PropSource::Spread(_) => None,
        }
    }

    pub fn as_spread(&self) -> Option<&V> {
        match self {
            PropSource::Spread(v) => Some(v),
            PropSource::Named(_) => None,
        }
    }
}

/// A child of a node. `E` is whatever the element factory produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Child<V, E = Node<V>> {
    Text(String),
    Dynamic(V),
    Element(E),
}

impl<V, E> Child<V, E> {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Child::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dynamic(&self) -> Option<&V> {
        match self {
            Child::Dynamic(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&E> {
        match self {
            Child::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// An element of the built tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<V> {
    pub tag: Tag<V>,
    pub props: Vec<PropSource<V>>,
    pub children: Vec<Child<V>>,
}

impl<V> Node<V> {
    pub fn new(tag: Tag<V>) -> Self {
        Self {
            tag,
            props: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up a named attribute across every `Named` prop source, last wins.
    pub fn attribute(&self, name: &str) -> Option<&[Part<V>]> {
        self.props
            .iter()
            .rev()
            .filter_map(PropSource::as_named)
            .find_map(|attrs| attrs.get(name))
    }
}

/// Result of building a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Built<V, E = Node<V>> {
    /// The template had exactly one top-level child.
    Single(Child<V, E>),
    /// Zero or several top-level children, in order.
    Many(Vec<Child<V, E>>),
}

impl<V, E> Built<V, E> {
    pub fn as_single(&self) -> Option<&Child<V, E>> {
        match self {
            Built::Single(child) => Some(child),
            Built::Many(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&E> {
        self.as_single().and_then(Child::as_element)
    }

    pub fn into_children(self) -> Vec<Child<V, E>> {
        match self {
            Built::Single(child) => vec![child],
            Built::Many(children) => children,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Built::Single(_) => 1,
            Built::Many(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
