use crate::{path::Locator, value::JsonKind};
use std::fmt::Display;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Required member is not present in its parent object.
    #[error("missing member `{locator}`")]
    MissingMember { locator: Locator },
    /// Member is present but holds JSON `null` where a value is required.
    #[error("member `{locator}` is null")]
    NullValue { locator: Locator },
    #[error("expected {expected} at `{locator}` but found {actual}")]
    TypeMismatch {
        locator: Locator,
        expected: JsonKind,
        actual: JsonKind,
    },
    /// Value is an array or object where a string, number or boolean is required.
    #[error("expected primitive at `{locator}` but found {actual}")]
    NotPrimitive { locator: Locator, actual: JsonKind },
    #[error("cannot parse {raw:?} at `{locator}`: {source}")]
    ParseFailure {
        locator: Locator,
        raw: String,
        source: ParseError,
    },
    /// Non-null path was built directly over an absent or null value.
    #[error("cannot build path at `{locator}` over {found} value")]
    ConstructionFailure {
        locator: Locator,
        found: &'static str,
    },
    #[error("no string parser registered for tag `{tag}`")]
    UnknownParser { tag: String },
    #[error("invalid JSON text: {0}")]
    Syntax(String),
    #[error("{0}")]
    Message(String),
}

impl Error {
    pub fn locator(&self) -> Option<&Locator> {
        match self {
            Self::MissingMember { locator }
            | Self::NullValue { locator }
            | Self::TypeMismatch { locator, .. }
            | Self::NotPrimitive { locator, .. }
            | Self::ParseFailure { locator, .. }
            | Self::ConstructionFailure { locator, .. } => Some(locator),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

/// Rejection reported by a [`StringParser`](crate::parser::StringParser).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
