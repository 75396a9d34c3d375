use std::fmt::{Debug, Formatter};
use std::hash::Hash;

/// The trait that all arena entries implement.
pub trait Node {
    /// The handle type a node store hands out for this entry type.
    type Ptr: Pointer;
}

/// Handles into a node store are small copyable values.
pub trait Pointer: Copy + Debug + Eq + Hash {}

impl<Ptr> Pointer for Ptr where Ptr: Copy + Debug + Eq + Hash {}

/// A reference to a child entry held by a node store, or the empty subtree.
pub enum NodeRef<N: Node> {
    /// An entry living in the store under this pointer.
    Stored(N::Ptr),
    /// An absent subtree.
    Empty,
}

impl<N: Node> NodeRef<N> {
    /// The pointer behind this reference, if any.
    pub fn ptr(&self) -> Option<N::Ptr> {
        match self {
            NodeRef::Stored(ptr) => Some(*ptr),
            NodeRef::Empty => None,
        }
    }

    /// Whether this reference is the empty subtree.
    pub fn is_empty(&self) -> bool {
        matches!(self, NodeRef::Empty)
    }
}

impl<N: Node> Default for NodeRef<N> {
    fn default() -> Self {
        NodeRef::Empty
    }
}

// Manual impls: the derives would require `N` itself to be Clone/Copy/Eq.
impl<N: Node> Clone for NodeRef<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: Node> Copy for NodeRef<N> {}

impl<N: Node> PartialEq for NodeRef<N> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr() == other.ptr()
    }
}

impl<N: Node> Eq for NodeRef<N> {}

impl<N: Node> Debug for NodeRef<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Stored(ptr) => f.debug_tuple("Stored").field(ptr).finish(),
            NodeRef::Empty => f.write_str("Empty"),
        }
    }
}
