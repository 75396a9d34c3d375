//! Typed keys and payloads: integers, floats and bounded strings.

use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};
use crate::tree::djb2::Djb2;
use crate::tree::traits::{Hashable, Hasher};

/// Longest string, in characters, a [`BoundedString`] holds.
pub const MAX_STR_LEN: usize = 20;

/// A string of at most [`MAX_STR_LEN`] characters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoundedString(String);

impl BoundedString {
    /// Rejects input longer than [`MAX_STR_LEN`] characters.
    pub fn new(s: &str) -> Result<Self> {
        let len = s.chars().count();
        if len > MAX_STR_LEN {
            return Err(Error::StringTooLong { len, max: MAX_STR_LEN });
        }
        Ok(BoundedString(s.to_owned()))
    }

    /// Keeps the first [`MAX_STR_LEN`] characters of `s`.
    pub fn truncated(s: &str) -> Self {
        BoundedString(s.chars().take(MAX_STR_LEN).collect())
    }

    /// The stored text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for BoundedString {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        BoundedString::new(s)
    }
}

impl Display for BoundedString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Hashable for BoundedString {
    fn hash(&self, digest: &mut dyn Hasher) {
        digest.update(self.0.as_bytes());
    }
}

/// Which of the three payload types a [`Value`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `i32`
    Integer,
    /// `f64`
    Float,
    /// [`BoundedString`]
    Str,
}

impl ValueKind {
    /// Every kind, in menu order.
    pub const ALL: [ValueKind; 3] = [ValueKind::Integer, ValueKind::Float, ValueKind::Str];

    /// The single-character selection code.
    pub fn code(self) -> char {
        match self {
            ValueKind::Integer => 'i',
            ValueKind::Float => 'f',
            ValueKind::Str => 's',
        }
    }

    /// The kind selected by `code`, if any.
    pub fn from_code(code: char) -> Option<Self> {
        ValueKind::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Human readable name for prompts.
    pub fn label(self) -> &'static str {
        match self {
            ValueKind::Integer => "Integer",
            ValueKind::Float => "Float",
            ValueKind::Str => "String [20 chars]",
        }
    }
}

/// A typed key or payload. The kind is the variant, so it can never
/// disagree with the data.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A 32-bit signed integer.
    Int(i32),
    /// A double precision float.
    Float(f64),
    /// A short string.
    Str(BoundedString),
}

impl Value {
    /// Which payload type this is.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
        }
    }

    /// The raw little-endian serialization used for digesting: 4 bytes for
    /// integers, 8 for floats, the UTF-8 bytes for strings.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Int(i) => i.to_le_bytes().to_vec(),
            Value::Float(f) => f.to_le_bytes().to_vec(),
            Value::Str(s) => s.as_str().as_bytes().to_vec(),
        }
    }

    /// The DJB2 digest of [`Value::to_bytes`], used as the tree key.
    pub fn digest(&self) -> u64 {
        let mut hasher = Djb2::new();
        self.hash(&mut hasher);
        hasher.value()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(d) => write!(f, "{:.6}", d),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl Hashable for Value {
    fn hash(&self, digest: &mut dyn Hasher) {
        match self {
            Value::Int(i) => i.hash(digest),
            Value::Float(d) => d.hash(digest),
            Value::Str(s) => s.hash(digest),
        }
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Int(x)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<BoundedString> for Value {
    fn from(s: BoundedString) -> Self {
        Value::Str(s)
    }
}
