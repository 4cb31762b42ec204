pub mod json;

pub use json::{JsonKind, JsonValue, Number};
