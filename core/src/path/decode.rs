use crate::{
    error::*,
    parser::{PlainString, StringParser},
    path::Locator,
    value::{JsonKind, JsonValue, Number},
};

/// Capability turning one non-null JSON value into a typed value.
///
/// A decoder also names the structural kind it expects and supplies the
/// placeholder that the dummy driver hands out instead of real data.
pub trait Decoder {
    type Output;

    fn kind(&self) -> JsonKind;

    /// `value` is never JSON null, paths handle nullability before decoding.
    fn decode(&self, value: &JsonValue, locator: &Locator) -> Result<Self::Output>;

    /// Raw and decoded placeholder for the dummy driver.
    fn example(&self) -> (JsonValue, Self::Output);
}

pub(crate) fn type_mismatch(expected: JsonKind, value: &JsonValue, locator: &Locator) -> Error {
    Error::TypeMismatch {
        locator: locator.to_owned(),
        expected,
        actual: value.kind(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanDecoder;

impl Decoder for BooleanDecoder {
    type Output = bool;

    fn kind(&self) -> JsonKind {
        JsonKind::Boolean
    }

    fn decode(&self, value: &JsonValue, locator: &Locator) -> Result<bool> {
        value
            .as_bool()
            .ok_or_else(|| type_mismatch(JsonKind::Boolean, value, locator))
    }

    fn example(&self) -> (JsonValue, bool) {
        (JsonValue::Bool(false), false)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NumberDecoder;

impl Decoder for NumberDecoder {
    type Output = Number;

    fn kind(&self) -> JsonKind {
        JsonKind::Number
    }

    fn decode(&self, value: &JsonValue, locator: &Locator) -> Result<Number> {
        value
            .as_number()
            .copied()
            .ok_or_else(|| type_mismatch(JsonKind::Number, value, locator))
    }

    fn example(&self) -> (JsonValue, Number) {
        (JsonValue::from(0), Number::SignedInteger(0))
    }
}

/// Reads a JSON string and hands its content to a [`StringParser`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StringDecoder<P>(pub P);

impl StringDecoder<PlainString> {
    pub fn plain() -> Self {
        Self(PlainString)
    }
}

impl<P> Decoder for StringDecoder<P>
where
    P: StringParser,
{
    type Output = P::Output;

    fn kind(&self) -> JsonKind {
        JsonKind::String
    }

    fn decode(&self, value: &JsonValue, locator: &Locator) -> Result<P::Output> {
        let raw = value
            .as_str()
            .ok_or_else(|| type_mismatch(JsonKind::String, value, locator))?;
        self.0.parse(raw).map_err(|source| Error::ParseFailure {
            locator: locator.to_owned(),
            raw: raw.to_owned(),
            source,
        })
    }

    fn example(&self) -> (JsonValue, P::Output) {
        let example = self.0.example();
        (JsonValue::String(example.raw), example.value)
    }
}
