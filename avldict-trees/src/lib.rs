//! A dictionary keyed by DJB2 digests of typed keys, stored in an
//! arena-backed AVL tree, with merkle fingerprints and Graphviz export
//! for inspection.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod dictionary;
pub mod error;
pub mod node_ref;
pub mod tree;
pub mod visualization;

pub use crate::dictionary::Dictionary;
pub use crate::error::{Error, Result};
pub use crate::tree::avl::Tree;
pub use crate::tree::djb2::{digest, Djb2};
pub use crate::tree::hash::{new_blake2b, new_blake3, Blake2bHash, Blake3Hash, HashRoot};
pub use crate::tree::traits::{Hashable, Hasher};
pub use crate::tree::value::{BoundedString, Value, ValueKind, MAX_STR_LEN};
