use tracing::warn;

use crate::error::{Error, Result};
use crate::node_ref::r#impl::Node;

/// The trait to be implemented by all node storage mediums.
pub trait NodeStore<N: Node> {
    /// Moves a new node into storage and returns the pointer to it.
    /// Fails with [`Error::Alloc`] when the store cannot grow.
    fn insert(&mut self, node: N) -> Result<N::Ptr>;

    /// Reads a node from storage by its pointer.
    fn read(&self, ptr: N::Ptr) -> Result<&N>;

    /// Reads a node for modification.
    fn read_mut(&mut self, ptr: N::Ptr) -> Result<&mut N>;

    /// Removes the node with the provided pointer from storage and hands
    /// ownership back to the caller. The pointer may be reused afterwards.
    fn delete(&mut self, ptr: N::Ptr) -> Result<N>;

    /// Number of live nodes.
    fn len(&self) -> usize;

    /// Whether the store holds no live nodes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node store backed by a growable slab. Freed slots are recycled
/// through a free list, so pointers stay small and stable.
pub struct MemNodeStore<N> {
    slots: Vec<Option<N>>,
    free: Vec<usize>,
    live: usize,
    limit: Option<usize>,
}

impl<N> Default for MemNodeStore<N> {
    fn default() -> Self {
        MemNodeStore {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            limit: None,
        }
    }
}

impl<N> MemNodeStore<N> {
    /// A store that refuses to hold more than `limit` live nodes.
    pub fn with_limit(limit: usize) -> Self {
        MemNodeStore {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Slots ever allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<N: Node<Ptr = usize>> NodeStore<N> for MemNodeStore<N> {
    fn insert(&mut self, node: N) -> Result<usize> {
        if matches!(self.limit, Some(limit) if self.live >= limit) {
            warn!(live = self.live, "node store limit reached");
            return Err(Error::Alloc { live: self.live });
        }

        let ptr = match self.free.pop() {
            Some(ptr) => {
                self.slots[ptr] = Some(node);
                ptr
            }
            None => {
                if self.slots.try_reserve(1).is_err() {
                    warn!(live = self.live, "node store could not grow");
                    return Err(Error::Alloc { live: self.live });
                }
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.live += 1;
        Ok(ptr)
    }

    fn read(&self, ptr: usize) -> Result<&N> {
        match self.slots.get(ptr) {
            Some(Some(node)) => Ok(node),
            _ => Err(Error::DanglingNode(ptr)),
        }
    }

    fn read_mut(&mut self, ptr: usize) -> Result<&mut N> {
        match self.slots.get_mut(ptr) {
            Some(Some(node)) => Ok(node),
            _ => Err(Error::DanglingNode(ptr)),
        }
    }

    fn delete(&mut self, ptr: usize) -> Result<N> {
        let node = self
            .slots
            .get_mut(ptr)
            .and_then(Option::take)
            .ok_or(Error::DanglingNode(ptr))?;
        self.free.push(ptr);
        self.live -= 1;
        Ok(node)
    }

    fn len(&self) -> usize {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::node_ref::node_store::{MemNodeStore, NodeStore};
    use crate::node_ref::r#impl::tests::TestNode;

    fn node(label: &'static str) -> TestNode {
        TestNode { label }
    }

    #[test]
    fn test_insert_read_delete() -> anyhow::Result<()> {
        let mut store = MemNodeStore::default();
        let a = store.insert(node("a"))?;
        let b = store.insert(node("b"))?;
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.read(a)?.label, "a");

        store.read_mut(b)?.label = "bb";
        assert_eq!(store.read(b)?.label, "bb");

        let removed = store.delete(a)?;
        assert_eq!(removed.label, "a");
        assert_eq!(store.len(), 1);
        assert!(matches!(store.read(a), Err(Error::DanglingNode(p)) if p == a));
        assert!(matches!(store.delete(a), Err(Error::DanglingNode(_))));
        Ok(())
    }

    #[test]
    fn test_slot_reuse() -> anyhow::Result<()> {
        let mut store = MemNodeStore::default();
        let a = store.insert(node("a"))?;
        store.insert(node("b"))?;
        store.delete(a)?;
        let c = store.insert(node("c"))?;
        assert_eq!(c, a);
        assert_eq!(store.capacity(), 2);
        Ok(())
    }

    #[test]
    fn test_limit() -> anyhow::Result<()> {
        let mut store = MemNodeStore::with_limit(1);
        let a = store.insert(node("a"))?;
        assert!(matches!(store.insert(node("b")), Err(Error::Alloc { live: 1 })));
        store.delete(a)?;
        assert!(store.is_empty());
        store.insert(node("c"))?;
        Ok(())
    }
}
