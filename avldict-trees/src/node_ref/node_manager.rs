use crate::error::Result;
use crate::node_ref::node_store::{MemNodeStore, NodeStore};
use crate::node_ref::r#impl::{Node, NodeRef};

/// The NodeManager functions as an abstraction over node storage which
/// resolves [`NodeRef`]s and owns every node handed to it. Dropping the
/// manager drops the store and with it every node exactly once.
pub struct NodeManager<N: Node> {
    /// The underlying node store.
    pub node_store: Box<dyn NodeStore<N>>,
}

impl<N: Node<Ptr = usize> + 'static> Default for NodeManager<N> {
    fn default() -> Self {
        NodeManager::new(Box::<MemNodeStore<N>>::default())
    }
}

impl<N: Node> NodeManager<N> {
    /// Wraps a node store.
    pub fn new(node_store: Box<dyn NodeStore<N>>) -> Self {
        NodeManager { node_store }
    }

    /// Resolves a reference; the empty subtree reads as `None`.
    pub fn read(&self, node_ref: &NodeRef<N>) -> Result<Option<&N>> {
        match node_ref {
            NodeRef::Stored(ptr) => self.node_store.read(*ptr).map(Some),
            NodeRef::Empty => Ok(None),
        }
    }

    /// Reads a node known to be stored.
    pub fn get(&self, ptr: N::Ptr) -> Result<&N> {
        self.node_store.read(ptr)
    }

    /// Reads a node known to be stored, for modification.
    pub fn get_mut(&mut self, ptr: N::Ptr) -> Result<&mut N> {
        self.node_store.read_mut(ptr)
    }

    /// Moves a fresh node into the store and returns a reference to it.
    pub fn alloc(&mut self, node: N) -> Result<NodeRef<N>> {
        Ok(NodeRef::Stored(self.node_store.insert(node)?))
    }

    /// Removes a node from the store, returning ownership of it. The
    /// node's own child references are left as they were.
    pub fn release(&mut self, ptr: N::Ptr) -> Result<N> {
        self.node_store.delete(ptr)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.node_store.len()
    }

    /// Whether no nodes are live.
    pub fn is_empty(&self) -> bool {
        self.node_store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::node_ref::node_store::MemNodeStore;
    use crate::node_ref::r#impl::tests::TestNode;
    use crate::node_ref::{NodeManager, NodeRef};

    #[test]
    fn test_manager() -> anyhow::Result<()> {
        let mut mgr = NodeManager::<TestNode>::new(Box::new(MemNodeStore::<TestNode>::default()));
        assert!(mgr.read(&NodeRef::Empty)?.is_none());

        let node_ref = mgr.alloc(TestNode { label: "root" })?;
        assert_eq!(mgr.len(), 1);
        assert_eq!(mgr.read(&node_ref)?.map(|n| n.label), Some("root"));

        let ptr = node_ref.ptr().ok_or_else(|| anyhow::anyhow!("expected a stored node"))?;
        mgr.get_mut(ptr)?.label = "renamed";
        assert_eq!(mgr.get(ptr)?.label, "renamed");

        let node = mgr.release(ptr)?;
        assert_eq!(node.label, "renamed");
        assert!(mgr.is_empty());
        assert!(mgr.read(&node_ref).is_err());
        Ok(())
    }
}
