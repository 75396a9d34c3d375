//! Traits shared by tree keys, values and hashers.

use std::fmt::{Debug, Display};

/// Bounds shared by keys and values that can be printed in graphs and logs.
pub trait SimpleType: Debug + Clone + Display {}

impl<T: Debug + Clone + Display> SimpleType for T {}

/// Types with a canonical raw byte serialization. The same bytes feed the
/// DJB2 key digest and the merkle fingerprint.
pub trait Hashable: SimpleType {
    /// Writes this value's raw bytes into `digest`.
    fn hash(&self, digest: &mut dyn Hasher);
}

/// A streaming byte hasher.
pub trait Hasher {
    /// A fresh hasher of the same algorithm.
    fn new(&self) -> Box<dyn Hasher>;
    /// Feeds more bytes.
    fn update(&mut self, value: &[u8]);
    /// Returns the digest and resets the hasher.
    fn finalize(&mut self) -> Vec<u8>;
}

impl Hashable for u64 {
    fn hash(&self, digest: &mut dyn Hasher) {
        digest.update(&self.to_le_bytes());
    }
}

impl Hashable for i32 {
    fn hash(&self, digest: &mut dyn Hasher) {
        digest.update(&self.to_le_bytes());
    }
}

impl Hashable for f64 {
    fn hash(&self, digest: &mut dyn Hasher) {
        digest.update(&self.to_le_bytes());
    }
}
