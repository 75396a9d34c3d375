//! The DJB2 digest that maps serialized keys onto the tree's order.
//!
//! Not collision resistant; equal digests are a normal case for the tree.

use crate::tree::traits::Hasher;

/// Initial accumulator value.
pub const DJB2_SEED: u64 = 5381;

/// Digests `bytes` in one call: `acc = acc * 33 + b` for every byte,
/// wrapping on overflow.
///
/// ```
/// assert_eq!(avldict_trees::digest(b""), 5381);
/// assert_eq!(avldict_trees::digest(b"a"), 5381 * 33 + 97);
/// ```
pub fn digest(bytes: &[u8]) -> u64 {
    let mut hasher = Djb2::new();
    hasher.write_bytes(bytes);
    hasher.value()
}

/// Streaming form of [`digest`]. Feeding bytes in several chunks gives
/// the same result as one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Djb2 {
    acc: u64,
}

impl Default for Djb2 {
    fn default() -> Self {
        Djb2 { acc: DJB2_SEED }
    }
}

impl Djb2 {
    /// A hasher holding the seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `bytes` into the accumulator.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.acc = bytes.iter().fold(self.acc, |acc, &b| {
            (acc << 5).wrapping_add(acc).wrapping_add(u64::from(b))
        });
    }

    /// The digest of everything written so far.
    pub fn value(&self) -> u64 {
        self.acc
    }
}

impl std::hash::Hasher for Djb2 {
    fn finish(&self) -> u64 {
        self.acc
    }

    fn write(&mut self, bytes: &[u8]) {
        self.write_bytes(bytes);
    }
}

impl Hasher for Djb2 {
    fn new(&self) -> Box<dyn Hasher> {
        Box::new(Self::new())
    }

    fn update(&mut self, value: &[u8]) {
        self.write_bytes(value);
    }

    fn finalize(&mut self) -> Vec<u8> {
        let out = self.acc.to_be_bytes().to_vec();
        self.acc = DJB2_SEED;
        out
    }
}

#[cfg(test)]
mod tests {
    use std::hash::Hasher as _;

    use crate::tree::djb2::{digest, Djb2, DJB2_SEED};
    use crate::tree::traits::Hasher;

    #[test]
    fn test_empty_input() {
        assert_eq!(digest(&[]), DJB2_SEED);
        assert_eq!(digest(b""), 5381);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(digest(b"a"), 177_670);
        assert_eq!(digest(b"ab"), 177_670 * 33 + 98);
        assert_eq!(digest(&[0, 0, 0, 0]), 5381 * 33 * 33 * 33 * 33);
    }

    #[test]
    fn test_deterministic() {
        let bytes = b"the same bytes twice";
        assert_eq!(digest(bytes), digest(bytes));
        assert_ne!(digest(b"ab"), digest(b"ba"));
    }

    #[test]
    fn test_wraps_instead_of_overflowing() {
        let long = vec![0xffu8; 4096];
        let expected = long.iter().fold(5381u64, |acc, &b| {
            acc.wrapping_mul(33).wrapping_add(u64::from(b))
        });
        assert_eq!(digest(&long), expected);
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let mut hasher = Djb2::new();
        hasher.write(b"hello ");
        hasher.write(b"world");
        assert_eq!(hasher.finish(), digest(b"hello world"));
    }

    #[test]
    fn test_finalize_resets() {
        let mut hasher = Djb2::new();
        hasher.update(b"abc");
        let first = hasher.finalize();
        assert_eq!(first, digest(b"abc").to_be_bytes().to_vec());
        assert_eq!(hasher.value(), DJB2_SEED);
    }
}
