//! Factory module: turns one interpreted element into the caller's type.
//!
//! The tree builder does all the instruction decoding and hands each finished
//! element (tag, props, children) to an `ElementFactory`. `TreeFactory` makes
//! plain `Node`s; `from_fn` adapts a hyperscript-style `h(tag, props, children)`
//! closure so a rendering layer can build its own elements directly.

use crate::types::{Child, Node, PropSource, Tag};
use std::fmt;
use std::marker::PhantomData;

pub trait ElementFactory<V> {
    type Output;

    fn create(
        &mut self,
        tag: Tag<V>,
        props: Vec<PropSource<V>>,
        children: Vec<Child<V, Self::Output>>,
    ) -> Self::Output;
}

/// Builds `Node` trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFactory;

impl<V> ElementFactory<V> for TreeFactory {
    type Output = Node<V>;

    fn create(
        &mut self,
        tag: Tag<V>,
        props: Vec<PropSource<V>>,
        children: Vec<Child<V>>,
    ) -> Node<V> {
        Node { tag, props, children }
    }
}

/// Factory backed by a closure producing `O`. See [`from_fn`].
pub struct FnFactory<F, O> {
    f: F,
    output: PhantomData<fn() -> O>,
}

/// Use `f(tag, props, children)` to create every element.
pub fn from_fn<F, O>(f: F) -> FnFactory<F, O> {
    FnFactory {
        f,
        output: PhantomData,
    }
}

impl<F: Clone, O> Clone for FnFactory<F, O> {
    fn clone(&self) -> Self {
        from_fn(self.f.clone())
    }
}

impl<F, O> fmt::Debug for FnFactory<F, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFactory").finish_non_exhaustive()
    }
}

impl<V, O, F> ElementFactory<V> for FnFactory<F, O>
where
    F: FnMut(Tag<V>, Vec<PropSource<V>>, Vec<Child<V, O>>) -> O,
{
    type Output = O;

    fn create(
        &mut self,
        tag: Tag<V>,
        props: Vec<PropSource<V>>,
        children: Vec<Child<V, O>>,
    ) -> O {
        (self.f)(tag, props, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_factory_creates_node() {
        let mut factory = TreeFactory;
        let node: Node<u8> = factory.create(
            Tag::Name("p".into()),
            vec![PropSource::Spread(1)],
            vec![Child::Text("x".into())],
        );
        assert_eq!(node.tag.as_name(), Some("p"));
        assert_eq!(node.props, vec![PropSource::Spread(1)]);
        assert_eq!(node.children, vec![Child::Text("x".into())]);
    }

    #[test]
    fn test_fn_factory_counts_calls() {
        let mut calls = 0;
        let mut factory = from_fn(
            |tag: Tag<u8>,
             _props: Vec<PropSource<u8>>,
             children: Vec<Child<u8, String>>|
             -> String {
                calls += 1;
                format!("{}:{}", tag.as_name().unwrap_or("?"), children.len())
            },
        );
        assert_eq!(factory.create(Tag::Name("a".into()), vec![], vec![]), "a:0");
        assert_eq!(factory.create(Tag::Dynamic(3), vec![], vec![Child::Dynamic(1)]), "?:1");
        drop(factory);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_fn_factory_drives_builder() {
        fn count(
            _tag: Tag<i32>,
            props: Vec<PropSource<i32>>,
            children: Vec<Child<i32, usize>>,
        ) -> usize {
            let nested: usize = children.iter().filter_map(Child::as_element).sum();
            1 + nested + props.len()
        }
        let block = crate::parser::parse(&["<a x=", "><b/><c ...", "/></a>"]);
        let mut factory = from_fn(count);
        let copy = factory.clone();
        let built = crate::builder::build_with(&block, &[1, 2], &mut factory).unwrap();
        assert_eq!(built, crate::types::Built::Single(Child::Element(5)));
        assert!(format!("{:?}", copy).starts_with("FnFactory"));
    }
}
