//! Locator-carrying handles over a [`JsonValue`](crate::value::JsonValue).
//!
//! Every path is either backed by a real document or by the dummy driver,
//! which records what a deserialize function reads instead of reading it.

pub mod array;
pub mod decode;
pub mod element;
pub mod object;
pub mod scalar;

pub use array::ArrayPath;
pub use decode::{BooleanDecoder, Decoder, NumberDecoder, StringDecoder};
pub use element::ElementPath;
pub use object::ObjectPath;
pub use scalar::{NullableScalarPath, ScalarPath};

use std::fmt;

/// Accumulated member path of a value, e.g. `interfaces.eth0.dhcp` or
/// `channels[2].address`. The document root is the empty locator.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn key(&self, key: &str) -> Self {
        if self.is_root() {
            Self(key.to_owned())
        } else {
            Self(format!("{}.{}", self.0, key))
        }
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("$")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
