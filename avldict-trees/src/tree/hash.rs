//! Hashers for tree fingerprints.

use digest::Digest;

use crate::tree::traits::Hasher;

/// Hashes a stream of bytes with BLAKE3.
pub struct Blake3Hash {
    hasher: blake3::Hasher,
}

impl Default for Blake3Hash {
    fn default() -> Self {
        Self::new()
    }
}

impl Blake3Hash {
    /// A fresh BLAKE3 hasher.
    pub fn new() -> Self {
        Blake3Hash { hasher: blake3::Hasher::new() }
    }
}

impl Hasher for Blake3Hash {
    fn new(&self) -> Box<dyn Hasher> {
        Box::new(Self::new())
    }

    fn update(&mut self, value: &[u8]) {
        self.hasher.update(value);
    }

    fn finalize(&mut self) -> Vec<u8> {
        let hash: [u8; 32] = self.hasher.finalize().into();
        self.hasher.reset();
        Vec::from(hash)
    }
}

/// Adapts any RustCrypto [`Digest`] to [`Hasher`].
pub struct DigestHash<D: Digest> {
    hasher: D,
}

/// BLAKE2b with a 512-bit output.
pub type Blake2bHash = DigestHash<blake2::Blake2b512>;

impl<D: Digest> Default for DigestHash<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest> DigestHash<D> {
    /// A fresh hasher.
    pub fn new() -> Self {
        DigestHash { hasher: D::new() }
    }
}

impl<D: Digest + 'static> Hasher for DigestHash<D> {
    fn new(&self) -> Box<dyn Hasher> {
        Box::new(Self::new())
    }

    fn update(&mut self, value: &[u8]) {
        Digest::update(&mut self.hasher, value);
    }

    fn finalize(&mut self) -> Vec<u8> {
        std::mem::replace(&mut self.hasher, D::new()).finalize().to_vec()
    }
}

/// Captures the hash a tree root writes into its parent digest. Trees
/// hash each node with a fresh hasher from `new_hash` and hand the result
/// upwards; at the root that result is kept here.
pub struct HashRoot {
    /// Builds the hasher for each node.
    pub new_hash: fn() -> Box<dyn Hasher>,
    /// The root hash, empty until a tree writes one.
    pub result: Vec<u8>,
}

impl HashRoot {
    /// An empty root that builds node hashers with `new_hash`.
    pub fn new(new_hash: fn() -> Box<dyn Hasher>) -> Self {
        HashRoot {
            new_hash,
            result: vec![],
        }
    }
}

impl Hasher for HashRoot {
    fn new(&self) -> Box<dyn Hasher> {
        (self.new_hash)()
    }

    fn update(&mut self, value: &[u8]) {
        self.result = Vec::from(value);
    }

    fn finalize(&mut self) -> Vec<u8> {
        self.result.clone()
    }
}

/// Builds BLAKE3 node hashers.
pub fn new_blake3() -> Box<dyn Hasher> {
    Box::new(Blake3Hash::new())
}

/// Builds BLAKE2b node hashers.
pub fn new_blake2b() -> Box<dyn Hasher> {
    Box::new(Blake2bHash::new())
}

#[cfg(test)]
mod tests {
    use crate::tree::hash::{new_blake2b, new_blake3, Blake2bHash, Blake3Hash, HashRoot};
    use crate::tree::traits::Hasher;

    #[test]
    fn test_blake3_matches_reference() {
        let mut hasher = Blake3Hash::new();
        hasher.update(b"abc");
        assert_eq!(hasher.finalize(), blake3::hash(b"abc").as_bytes().to_vec());
        // finalize resets
        hasher.update(b"abc");
        assert_eq!(hasher.finalize(), blake3::hash(b"abc").as_bytes().to_vec());
    }

    #[test]
    fn test_blake2b_resets() {
        let mut hasher = Blake2bHash::new();
        hasher.update(b"abc");
        let first = hasher.finalize();
        assert_eq!(first.len(), 64);
        hasher.update(b"abc");
        assert_eq!(hasher.finalize(), first);
    }

    #[test]
    fn test_algorithms_differ() {
        let mut a = new_blake3();
        let mut b = new_blake2b();
        a.update(b"same input");
        b.update(b"same input");
        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_hash_root_keeps_last_update() {
        let mut root = HashRoot::new(new_blake3);
        assert!(root.finalize().is_empty());
        root.update(&[1, 2, 3]);
        assert_eq!(root.result, vec![1, 2, 3]);
        let mut child = root.new();
        child.update(b"x");
        assert_eq!(child.finalize().len(), 32);
    }
}
