pub mod de;
pub mod descriptor;
pub mod error;
pub mod parser;
pub mod path;
pub mod ser;
pub mod serializer;
pub mod types;
pub mod value;

#[cfg(test)]
mod tests;

pub use crate::{
    de::from_value,
    descriptor::Descriptor,
    error::{Error, ParseError, Result},
    parser::{NamedEnum, ParserRegistry, StringParser},
    path::{ArrayPath, ElementPath, Locator, NullableScalarPath, ObjectPath, ScalarPath},
    ser::to_value,
    serializer::Serializer,
    types::{ChannelAddress, SemanticVersion},
    value::{JsonKind, JsonValue, Number},
};
