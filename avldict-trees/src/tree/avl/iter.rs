use std::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::node_ref::{NodeManager, NodeRef};
use crate::tree::avl::Node;

/// In-order iterator over a [`Tree`](crate::tree::avl::Tree).
///
/// Holds the leftmost path of the unvisited part of the tree, so it uses
/// stack space proportional to the tree height. A dangling reference is
/// yielded once as an error and ends the iteration.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    node_mgr: &'a NodeManager<Node<K, V>>,
    error: Option<Error>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: NodeRef<Node<K, V>>, node_mgr: &'a NodeManager<Node<K, V>>) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            node_mgr,
            error: None,
            remaining: node_mgr.len(),
        };
        if let Err(err) = iter.push_leftmost_path(root) {
            iter.error = Some(err);
        }
        iter
    }

    fn push_leftmost_path(&mut self, mut node_ref: NodeRef<Node<K, V>>) -> Result<()> {
        let node_mgr = self.node_mgr;
        while let Some(node) = node_mgr.read(&node_ref)? {
            self.stack.push(node);
            node_ref = node.left;
        }
        Ok(())
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = Result<(&'a K, &'a V)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.error.take() {
            self.stack.clear();
            self.remaining = 0;
            return Some(Err(err));
        }

        let node = self.stack.pop()?;
        self.remaining = self.remaining.saturating_sub(1);
        if let Err(err) = self.push_leftmost_path(node.right) {
            self.error = Some(err);
        }
        Some(Ok((&node.key, &node.value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining + usize::from(self.error.is_some())))
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Keys of a [`Tree`](crate::tree::avl::Tree) in ascending order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Keys { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = Result<&'a K>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| entry.map(|(key, _)| key))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}
