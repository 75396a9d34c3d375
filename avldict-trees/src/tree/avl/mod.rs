//! A height-balanced binary search tree over an entry arena.

use std::borrow::Borrow;
use std::cmp::{max, Ordering};
use std::fmt::Debug;

use graphviz_rust::dot_structures::NodeId;
use tracing::trace;

use crate::error::{Error, Result};
use crate::node_ref::{MemNodeStore, NodeManager, NodeRef, NodeStore};
use crate::tree::hash::HashRoot;
use crate::tree::traits::{Hashable, Hasher};
use crate::visualization::TreeGraph;

mod iter;

pub use iter::{Iter, Keys};

/// An AVL tree whose entries live in an arena owned by the tree.
///
/// Equal keys are not merged: a second insert of the same key nests a new
/// entry into the right subtree of the first.
pub struct Tree<K, V> {
    root: NodeRef<Node<K, V>>,
    node_mgr: NodeManager<Node<K, V>>,
}

impl<K: Ord + 'static, V: 'static> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + 'static, V: 'static> Tree<K, V> {
    /// An empty tree over an unbounded in-memory store.
    pub fn new() -> Self {
        Self::with_store(Box::<MemNodeStore<Node<K, V>>>::default())
    }

    /// An empty tree that holds at most `max_entries` entries; further
    /// inserts fail with [`Error::Alloc`].
    pub fn with_limit(max_entries: usize) -> Self {
        Self::with_store(Box::new(MemNodeStore::<Node<K, V>>::with_limit(max_entries)))
    }

    /// An empty tree over the given node store.
    pub fn with_store(node_store: Box<dyn NodeStore<Node<K, V>>>) -> Self {
        Tree {
            root: NodeRef::Empty,
            node_mgr: NodeManager::new(node_store),
        }
    }
}

impl<K: Ord, V> Tree<K, V> {
    /// The value of the first entry with an equal key found on the way
    /// down, or `None`.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Result<Option<&V>>
        where
            K: Borrow<Q>,
            Q: Ord {
        match self.node_mgr.read(&self.root)? {
            None => Ok(None),
            Some(r) => Ok(r.get(key, &self.node_mgr)?.map(|node| &node.value)),
        }
    }

    /// Inserts a value and returns the tree with its new root.
    pub fn insert(mut self, key: K, value: V) -> Result<Self> {
        self.insert_mut(key, value)?;
        Ok(self)
    }

    /// Inserts a value in place. On failure the tree is left unchanged.
    pub fn insert_mut(&mut self, key: K, value: V) -> Result<()> {
        self.root = Node::insert(self.root, key, value, &mut self.node_mgr)?;
        Ok(())
    }

    /// Deletes `key` and returns the tree with its new root. Deleting an
    /// absent key returns the tree unchanged.
    pub fn delete(mut self, key: &K) -> Result<Self> {
        self.delete_mut(key)?;
        Ok(self)
    }

    /// Deletes `key` in place and hands back the removed value.
    pub fn delete_mut(&mut self, key: &K) -> Result<Option<V>> {
        let (root, removed) = Node::delete(self.root, key, &mut self.node_mgr)?;
        self.root = root;
        Ok(removed)
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root, &self.node_mgr)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.node_mgr.len()
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Height of the whole tree; 0 when empty.
    pub fn height(&self) -> Result<i32> {
        Node::get_height(&self.root, &self.node_mgr)
    }

    /// Whether the root's balance factor is within one.
    pub fn balanced(&self) -> Result<bool> {
        let bf = self.balance_factor()?;
        Ok((-1..=1).contains(&bf))
    }

    /// Left height minus right height at the root; 0 when empty.
    pub fn balance_factor(&self) -> Result<i32> {
        match self.node_mgr.read(&self.root)? {
            None => Ok(0),
            Some(root) => root.balance_factor(&self.node_mgr),
        }
    }

    /// Verifies every entry: cached heights, balance factors within one,
    /// and keys non-decreasing in order.
    pub fn check_invariants(&self) -> Result<()>
        where K: Debug {
        if let Some(root) = self.node_mgr.read(&self.root)? {
            root.check_shape(&self.node_mgr)?;
        }

        let mut prev: Option<&K> = None;
        for entry in self.iter() {
            let (key, _) = entry?;
            if let Some(prev) = prev {
                if prev > key {
                    return Err(Error::Invariant(format!("key {:?} follows {:?}", key, prev)));
                }
            }
            prev = Some(key);
        }
        Ok(())
    }
}

impl<K: Ord + Hashable, V: Hashable> Tree<K, V> {
    /// Feeds the merkle hash of the whole tree into `digest`. The empty
    /// tree writes nothing.
    pub fn merkle_hash(&self, digest: &mut dyn Hasher) -> Result<()> {
        match self.node_mgr.read(&self.root)? {
            None => Ok(()),
            Some(root) => root.merkle_hash(&self.node_mgr, digest),
        }
    }

    /// A DOT graph with one node per entry, captioned with the root hash.
    pub fn to_graphviz(&self, new_hash: fn() -> Box<dyn Hasher>) -> Result<TreeGraph> {
        let mut root_hash = HashRoot::new(new_hash);
        self.merkle_hash(&mut root_hash)?;
        let mut graph = TreeGraph::new(hex::encode(root_hash.result));
        if let Some(root) = self.node_mgr.read(&self.root)? {
            root.to_graphviz(&mut graph, &self.node_mgr, new_hash)?;
        }
        Ok(graph)
    }
}

/// One entry of the tree.
#[derive(Debug)]
pub struct Node<K, V> {
    key: K,
    value: V,
    left: NodeRef<Self>,
    right: NodeRef<Self>,
    height: i32,
}

impl<K, V> crate::node_ref::Node for Node<K, V> {
    type Ptr = usize;
}

type Ptr = usize;

impl<K: Ord, V> Node<K, V> {
    fn get<'a, Q: ?Sized>(&'a self, key: &Q, node_mgr: &'a NodeManager<Self>) -> Result<Option<&'a Self>>
        where K: Borrow<Q>, Q: Ord {
        match key.cmp(self.key.borrow()) {
            Ordering::Less => match node_mgr.read(&self.left)? {
                None => Ok(None),
                Some(left) => left.get(key, node_mgr),
            }
            Ordering::Equal => Ok(Some(self)),
            Ordering::Greater => match node_mgr.read(&self.right)? {
                None => Ok(None),
                Some(right) => right.get(key, node_mgr),
            }
        }
    }

    fn insert(node_ref: NodeRef<Self>, key: K, value: V, node_mgr: &mut NodeManager<Self>) -> Result<NodeRef<Self>> {
        let ptr = match node_ref {
            NodeRef::Empty => return node_mgr.alloc(Node::new_node(key, value)),
            NodeRef::Stored(ptr) => ptr,
        };

        let node = node_mgr.get(ptr)?;
        let (left, right) = (node.left, node.right);
        // equal keys go right
        if key < node.key {
            let left = Node::insert(left, key, value, node_mgr)?;
            node_mgr.get_mut(ptr)?.left = left;
        } else {
            let right = Node::insert(right, key, value, node_mgr)?;
            node_mgr.get_mut(ptr)?.right = right;
        }

        Ok(NodeRef::Stored(Node::balance(ptr, node_mgr)?))
    }

    fn delete(node_ref: NodeRef<Self>, key: &K, node_mgr: &mut NodeManager<Self>) -> Result<(NodeRef<Self>, Option<V>)> {
        let ptr = match node_ref {
            NodeRef::Empty => return Ok((NodeRef::Empty, None)),
            NodeRef::Stored(ptr) => ptr,
        };

        let node = node_mgr.get(ptr)?;
        let (left, right) = (node.left, node.right);
        let removed = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, removed) = Node::delete(left, key, node_mgr)?;
                node_mgr.get_mut(ptr)?.left = left;
                removed
            }
            Ordering::Greater => {
                let (right, removed) = Node::delete(right, key, node_mgr)?;
                node_mgr.get_mut(ptr)?.right = right;
                removed
            }
            Ordering::Equal => match right.ptr() {
                Some(right_ptr) if !left.is_empty() => {
                    // two children: the in-order successor takes this slot
                    let (right, successor) = Node::detach_min(right_ptr, node_mgr)?;
                    let node = node_mgr.get_mut(ptr)?;
                    node.right = right;
                    node.key = successor.key;
                    Some(std::mem::replace(&mut node.value, successor.value))
                }
                _ => {
                    let node = node_mgr.release(ptr)?;
                    let child = if left.is_empty() { right } else { left };
                    return Ok((child, Some(node.value)));
                }
            },
        };

        Ok((NodeRef::Stored(Node::balance(ptr, node_mgr)?), removed))
    }

    /// Unlinks the leftmost entry under `ptr`, rebalancing on the way up.
    /// Returns the new subtree root and the detached entry.
    fn detach_min(ptr: Ptr, node_mgr: &mut NodeManager<Self>) -> Result<(NodeRef<Self>, Self)> {
        let node = node_mgr.get(ptr)?;
        let (left, right) = (node.left, node.right);
        match left.ptr() {
            None => Ok((right, node_mgr.release(ptr)?)),
            Some(left_ptr) => {
                let (left, min) = Node::detach_min(left_ptr, node_mgr)?;
                node_mgr.get_mut(ptr)?.left = left;
                Ok((NodeRef::Stored(Node::balance(ptr, node_mgr)?), min))
            }
        }
    }
}

impl<K, V> Node<K, V> {
    fn new_node(key: K, value: V) -> Self {
        Node {
            key,
            value,
            left: NodeRef::Empty,
            right: NodeRef::Empty,
            height: 1,
        }
    }

    fn balance(ptr: Ptr, node_mgr: &mut NodeManager<Self>) -> Result<Ptr> {
        let bf = Node::update_height(ptr, node_mgr)?;
        if bf < -1 { // right big
            let right = Node::child(node_mgr.get(ptr)?.right, "right")?;
            if node_mgr.get(right)?.balance_factor(node_mgr)? > 0 { // left heavy
                Node::rotate_right_left(ptr, node_mgr)
            } else {
                Node::rotate_left(ptr, node_mgr)
            }
        } else if bf > 1 { // left big
            let left = Node::child(node_mgr.get(ptr)?.left, "left")?;
            if node_mgr.get(left)?.balance_factor(node_mgr)? < 0 { // right heavy
                Node::rotate_left_right(ptr, node_mgr)
            } else {
                Node::rotate_right(ptr, node_mgr)
            }
        } else {
            Ok(ptr)
        }
    }

    // returns the balance factor
    fn update_height(ptr: Ptr, node_mgr: &mut NodeManager<Self>) -> Result<i32> {
        let node = node_mgr.get(ptr)?;
        let lh = Node::get_height(&node.left, node_mgr)?;
        let rh = Node::get_height(&node.right, node_mgr)?;
        node_mgr.get_mut(ptr)?.height = max(lh, rh) + 1;
        Ok(lh - rh)
    }

    fn balance_factor(&self, node_mgr: &NodeManager<Self>) -> Result<i32> {
        let lh = Node::get_height(&self.left, node_mgr)?;
        let rh = Node::get_height(&self.right, node_mgr)?;
        Ok(lh - rh)
    }

    fn get_height(node_ref: &NodeRef<Self>, node_mgr: &NodeManager<Self>) -> Result<i32> {
        Ok(node_mgr.read(node_ref)?.map_or(0, |node| node.height))
    }

    fn child(node_ref: NodeRef<Self>, side: &str) -> Result<Ptr> {
        node_ref
            .ptr()
            .ok_or_else(|| Error::Invariant(format!("rotation needs a {} child", side)))
    }

    fn rotate_right(ptr: Ptr, node_mgr: &mut NodeManager<Self>) -> Result<Ptr> {
        let new_top = Node::child(node_mgr.get(ptr)?.left, "left")?;
        let left_right = node_mgr.get(new_top)?.right;
        node_mgr.get_mut(ptr)?.left = left_right;
        Node::update_height(ptr, node_mgr)?;
        node_mgr.get_mut(new_top)?.right = NodeRef::Stored(ptr);
        Node::update_height(new_top, node_mgr)?;
        trace!(from = ptr, to = new_top, "rotate right");
        Ok(new_top)
    }

    fn rotate_left(ptr: Ptr, node_mgr: &mut NodeManager<Self>) -> Result<Ptr> {
        let new_top = Node::child(node_mgr.get(ptr)?.right, "right")?;
        let right_left = node_mgr.get(new_top)?.left;
        node_mgr.get_mut(ptr)?.right = right_left;
        Node::update_height(ptr, node_mgr)?;
        node_mgr.get_mut(new_top)?.left = NodeRef::Stored(ptr);
        Node::update_height(new_top, node_mgr)?;
        trace!(from = ptr, to = new_top, "rotate left");
        Ok(new_top)
    }

    fn rotate_right_left(ptr: Ptr, node_mgr: &mut NodeManager<Self>) -> Result<Ptr> {
        let right = Node::child(node_mgr.get(ptr)?.right, "right")?;
        let new_right = Node::rotate_right(right, node_mgr)?;
        node_mgr.get_mut(ptr)?.right = NodeRef::Stored(new_right);
        Node::rotate_left(ptr, node_mgr)
    }

    fn rotate_left_right(ptr: Ptr, node_mgr: &mut NodeManager<Self>) -> Result<Ptr> {
        let left = Node::child(node_mgr.get(ptr)?.left, "left")?;
        let new_left = Node::rotate_left(left, node_mgr)?;
        node_mgr.get_mut(ptr)?.left = NodeRef::Stored(new_left);
        Node::rotate_right(ptr, node_mgr)
    }

    // returns the checked height
    fn check_shape(&self, node_mgr: &NodeManager<Self>) -> Result<i32>
        where K: Debug {
        let lh = match node_mgr.read(&self.left)? {
            None => 0,
            Some(left) => left.check_shape(node_mgr)?,
        };
        let rh = match node_mgr.read(&self.right)? {
            None => 0,
            Some(right) => right.check_shape(node_mgr)?,
        };
        if self.height != max(lh, rh) + 1 {
            return Err(Error::Invariant(format!(
                "key {:?} caches height {} but its subtrees give {}",
                self.key, self.height, max(lh, rh) + 1
            )));
        }
        if (lh - rh).abs() > 1 {
            return Err(Error::Invariant(format!("key {:?} has balance factor {}", self.key, lh - rh)));
        }
        Ok(self.height)
    }
}

impl<K: Hashable, V: Hashable> Node<K, V> {
    fn merkle_hash(&self, node_mgr: &NodeManager<Self>, digest: &mut dyn Hasher) -> Result<()> {
        let mut node_digest = digest.new();
        self.key.hash(&mut *node_digest);
        self.value.hash(&mut *node_digest);
        let mut have_left = false;
        if let Some(left) = node_mgr.read(&self.left)? {
            left.merkle_hash(node_mgr, &mut *node_digest)?;
            have_left = true;
        }
        if let Some(right) = node_mgr.read(&self.right)? {
            if !have_left {
                // pad with a 0 in case left is empty to distinguish left from right
                node_digest.update(&[0]);
            }
            right.merkle_hash(node_mgr, &mut *node_digest)?;
        }
        let hash = node_digest.finalize();
        digest.update(&hash);
        Ok(())
    }

    fn to_graphviz(&self, graph: &mut TreeGraph, node_mgr: &NodeManager<Self>, new_hash: fn() -> Box<dyn Hasher>) -> Result<NodeId> {
        let mut root_hash = HashRoot::new(new_hash);
        self.merkle_hash(node_mgr, &mut root_hash)?;
        let hash_str = hex::encode(&root_hash.result[..root_hash.result.len().min(8)]);
        let id = graph.new_node(format!("{} v={} h={} {}", self.key, self.value, self.height, hash_str));

        if let Some(left) = node_mgr.read(&self.left)? {
            let lid = left.to_graphviz(graph, node_mgr, new_hash)?;
            graph.draw_edge(&id, &lid);
        }

        if let Some(right) = node_mgr.read(&self.right)? {
            let rid = right.to_graphviz(graph, node_mgr, new_hash)?;
            graph.draw_edge(&id, &rid);
        }

        Ok(id)
    }
}
