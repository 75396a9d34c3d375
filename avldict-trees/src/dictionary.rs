//! The typed-key dictionary: digest the key, then hand the digest to the
//! tree.

use tracing::debug;

use crate::error::Result;
use crate::tree::avl::Tree;
use crate::tree::djb2::digest;
use crate::tree::hash::HashRoot;
use crate::tree::traits::Hasher;
use crate::tree::value::Value;
use crate::visualization::TreeGraph;

/// Values stored under the DJB2 digest of a typed key.
///
/// Keys that digest to the same number are not told apart: the later
/// insert nests beside the earlier one and lookups find whichever the
/// descent reaches first.
#[derive(Default)]
pub struct Dictionary {
    tree: Tree<u64, Value>,
}

impl Dictionary {
    /// An empty, unbounded dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// A dictionary that refuses to hold more than `max_entries` values.
    pub fn with_limit(max_entries: usize) -> Self {
        Dictionary { tree: Tree::with_limit(max_entries) }
    }

    /// Stores `value` under `key` and returns the digest used.
    pub fn insert(&mut self, key: &Value, value: Value) -> Result<u64> {
        self.insert_digest(key.digest(), value)
    }

    /// Stores `value` under the digest of already serialized key bytes.
    pub fn insert_bytes(&mut self, key_bytes: &[u8], value: Value) -> Result<u64> {
        self.insert_digest(digest(key_bytes), value)
    }

    fn insert_digest(&mut self, key: u64, value: Value) -> Result<u64> {
        let kind = value.kind();
        self.tree.insert_mut(key, value)?;
        debug!(key, ?kind, entries = self.tree.len(), "inserted");
        Ok(key)
    }

    /// The value stored under `key`, or `None`.
    pub fn search(&self, key: &Value) -> Result<Option<&Value>> {
        self.tree.get(&key.digest())
    }

    /// Like [`Dictionary::search`], for a key given as raw bytes.
    pub fn search_bytes(&self, key_bytes: &[u8]) -> Result<Option<&Value>> {
        self.tree.get(&digest(key_bytes))
    }

    /// Removes the value under `key`, if any. Absent keys are a no-op.
    pub fn delete(&mut self, key: &Value) -> Result<Option<Value>> {
        self.delete_digest(key.digest())
    }

    /// Like [`Dictionary::delete`], for a key given as raw bytes.
    pub fn delete_bytes(&mut self, key_bytes: &[u8]) -> Result<Option<Value>> {
        self.delete_digest(digest(key_bytes))
    }

    fn delete_digest(&mut self, key: u64) -> Result<Option<Value>> {
        let removed = self.tree.delete_mut(&key)?;
        debug!(key, removed = removed.is_some(), entries = self.tree.len(), "delete");
        Ok(removed)
    }

    /// All digests in ascending order.
    pub fn traverse(&self) -> Result<Vec<u64>> {
        self.tree.keys().map(|key| key.copied()).collect()
    }

    /// The merkle root hash of the dictionary; empty when there are no
    /// entries.
    pub fn fingerprint(&self, new_hash: fn() -> Box<dyn Hasher>) -> Result<Vec<u8>> {
        let mut root = HashRoot::new(new_hash);
        self.tree.merkle_hash(&mut root)?;
        Ok(root.result)
    }

    /// A DOT graph of the underlying tree, captioned with its fingerprint.
    pub fn to_graphviz(&self, new_hash: fn() -> Box<dyn Hasher>) -> Result<TreeGraph> {
        self.tree.to_graphviz(new_hash)
    }

    /// Read access to the underlying tree.
    pub fn tree(&self) -> &Tree<u64, Value> {
        &self.tree
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::dictionary::Dictionary;
    use crate::error::Error;
    use crate::tree::hash::{new_blake2b, new_blake3};
    use crate::tree::value::{BoundedString, Value};

    fn s(text: &str) -> Value {
        Value::Str(BoundedString::truncated(text))
    }

    #[test]
    fn test_typed_round_trip() -> anyhow::Result<()> {
        let mut dict = Dictionary::new();
        dict.insert(&Value::Int(42), s("answer"))?;
        dict.insert(&Value::Float(2.5), Value::Int(7))?;
        dict.insert(&s("pi"), Value::Float(1.25))?;

        assert_eq!(dict.search(&Value::Int(42))?, Some(&s("answer")));
        assert_eq!(dict.search(&Value::Float(2.5))?, Some(&Value::Int(7)));
        assert_eq!(dict.search(&s("pi"))?, Some(&Value::Float(1.25)));
        assert_eq!(dict.search(&Value::Int(43))?, None);
        assert_eq!(dict.len(), 3);
        dict.tree().check_invariants()?;
        Ok(())
    }

    #[test]
    fn test_bytes_api_matches_typed_api() -> anyhow::Result<()> {
        let mut dict = Dictionary::new();
        let key = Value::Int(10);
        let digest = dict.insert_bytes(&10i32.to_le_bytes(), Value::Int(1))?;
        assert_eq!(digest, key.digest());
        assert_eq!(dict.search(&key)?, Some(&Value::Int(1)));
        assert_eq!(dict.search_bytes(&key.to_bytes())?, Some(&Value::Int(1)));
        assert_eq!(dict.delete_bytes(&key.to_bytes())?, Some(Value::Int(1)));
        assert!(dict.is_empty());
        Ok(())
    }

    #[test]
    fn test_delete() -> anyhow::Result<()> {
        let mut dict = Dictionary::new();
        for i in 0..20 {
            dict.insert(&Value::Int(i), Value::Int(i * 100))?;
        }
        assert_eq!(dict.delete(&Value::Int(7))?, Some(Value::Int(700)));
        assert_eq!(dict.search(&Value::Int(7))?, None);
        assert_eq!(dict.delete(&Value::Int(7))?, None);
        assert_eq!(dict.len(), 19);
        for i in (0..20).filter(|i| *i != 7) {
            assert_eq!(dict.search(&Value::Int(i))?, Some(&Value::Int(i * 100)));
        }
        dict.tree().check_invariants()?;
        Ok(())
    }

    #[test]
    fn test_traverse_is_sorted_digests() -> anyhow::Result<()> {
        let mut dict = Dictionary::new();
        let keys = [s("alpha"), s("beta"), Value::Int(-3), Value::Float(0.5)];
        for key in &keys {
            dict.insert(key, Value::Int(0))?;
        }
        let mut expected: Vec<u64> = keys.iter().map(Value::digest).collect();
        expected.sort_unstable();
        assert_eq!(dict.traverse()?, expected);
        Ok(())
    }

    #[test]
    fn test_colliding_keys_nest() -> anyhow::Result<()> {
        let mut dict = Dictionary::new();
        dict.insert(&s("dup"), Value::Int(1))?;
        dict.insert(&s("dup"), Value::Int(2))?;
        let digest = s("dup").digest();
        assert_eq!(dict.traverse()?, vec![digest, digest]);
        assert!(matches!(dict.search(&s("dup"))?, Some(Value::Int(1 | 2))));
        dict.tree().check_invariants()?;

        dict.delete(&s("dup"))?;
        assert_eq!(dict.traverse()?, vec![digest]);
        dict.delete(&s("dup"))?;
        assert!(dict.is_empty());
        Ok(())
    }

    #[test]
    fn test_limit() -> anyhow::Result<()> {
        let mut dict = Dictionary::with_limit(2);
        dict.insert(&Value::Int(1), Value::Int(1))?;
        dict.insert(&Value::Int(2), Value::Int(2))?;
        let before = dict.traverse()?;
        assert!(matches!(
            dict.insert(&Value::Int(3), Value::Int(3)),
            Err(Error::Alloc { live: 2 })
        ));
        assert_eq!(dict.traverse()?, before);
        assert_eq!(dict.search(&Value::Int(3))?, None);

        dict.delete(&Value::Int(1))?;
        dict.insert(&Value::Int(3), Value::Int(3))?;
        assert_eq!(dict.search(&Value::Int(3))?, Some(&Value::Int(3)));
        Ok(())
    }

    #[test]
    fn test_fingerprint() -> anyhow::Result<()> {
        let mut dict = Dictionary::new();
        assert!(dict.fingerprint(new_blake3)?.is_empty());

        for i in 0..8 {
            dict.insert(&Value::Int(i), Value::Int(i))?;
        }
        let before = dict.fingerprint(new_blake3)?;
        assert_eq!(before.len(), 32);
        assert_eq!(dict.fingerprint(new_blake2b)?.len(), 64);

        dict.delete(&Value::Int(100))?;
        assert_eq!(dict.fingerprint(new_blake3)?, before);

        dict.delete(&Value::Int(3))?;
        assert_ne!(dict.fingerprint(new_blake3)?, before);
        Ok(())
    }

    #[test]
    fn test_graphviz() -> anyhow::Result<()> {
        let mut dict = Dictionary::new();
        for i in 0..5 {
            dict.insert(&Value::Int(i), Value::Int(i))?;
        }
        let graph = dict.to_graphviz(new_blake3)?;
        assert_eq!(graph.node_count(), 5);
        let dot = graph.to_dot();
        let root_digest = hex::encode(dict.fingerprint(new_blake3)?);
        assert!(dot.contains(&root_digest));
        Ok(())
    }
}
