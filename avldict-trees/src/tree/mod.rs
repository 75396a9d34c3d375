//! The AVL engine and the hashing and value types it is built with.

pub mod avl;
pub mod djb2;
pub mod hash;
pub mod traits;
pub mod value;
