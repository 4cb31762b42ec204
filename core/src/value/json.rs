use crate::{de::value::JsonValueVisitor, error::Error};
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{fmt, str::FromStr};

/// Structural kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    /// String, number or boolean.
    pub fn is_primitive(self) -> bool {
        matches!(self, Self::Boolean | Self::Number | Self::String)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Number {
    SignedInteger(i64),
    UnsignedInteger(u64),
    Float(f64),
}

impl Number {
    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::Float(_))
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::SignedInteger(v) => v as f64,
            Self::UnsignedInteger(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    pub fn as_f32(&self) -> f32 {
        self.as_f64() as f32
    }

    /// Fractional parts are truncated towards zero.
    pub fn as_i64(&self) -> i64 {
        match *self {
            Self::SignedInteger(v) => v,
            Self::UnsignedInteger(v) => v as i64,
            Self::Float(v) => v as i64,
        }
    }

    pub fn as_i32(&self) -> i32 {
        self.as_i64() as i32
    }

    pub fn as_i16(&self) -> i16 {
        self.as_i64() as i16
    }

    pub fn as_i8(&self) -> i8 {
        self.as_i64() as i8
    }

    pub fn as_u64(&self) -> u64 {
        match *self {
            Self::SignedInteger(v) => v as u64,
            Self::UnsignedInteger(v) => v,
            Self::Float(v) => v as u64,
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match *self {
            Self::SignedInteger(v) => Some(v as i128),
            Self::UnsignedInteger(v) => Some(v as i128),
            Self::Float(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::SignedInteger(v) => serializer.serialize_i64(*v),
            Self::UnsignedInteger(v) => serializer.serialize_u64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

macro_rules! impl_number_from {
    ($type:ty => $variant:ident) => {
        impl From<$type> for Number {
            fn from(value: $type) -> Self {
                Self::$variant(value as _)
            }
        }

        impl From<$type> for JsonValue {
            fn from(value: $type) -> Self {
                Self::Number(Number::$variant(value as _))
            }
        }
    };
}

impl_number_from!(i8 => SignedInteger);
impl_number_from!(i16 => SignedInteger);
impl_number_from!(i32 => SignedInteger);
impl_number_from!(i64 => SignedInteger);
impl_number_from!(isize => SignedInteger);
impl_number_from!(u8 => UnsignedInteger);
impl_number_from!(u16 => UnsignedInteger);
impl_number_from!(u32 => UnsignedInteger);
impl_number_from!(u64 => UnsignedInteger);
impl_number_from!(usize => UnsignedInteger);
impl_number_from!(f32 => Float);
impl_number_from!(f64 => Float);

/// In-memory representation of one parsed JSON fragment.
///
/// Object members keep their document order. Equality ignores member order
/// and compares numbers by value, so `10`, `10u64` and `10.0` are equal.
#[derive(Debug, Default, Clone)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    pub fn null() -> Self {
        Self::Null
    }

    pub fn array() -> Self {
        Self::Array(Default::default())
    }

    pub fn array_from<T: Into<JsonValue>>(value: impl IntoIterator<Item = T>) -> Self {
        Self::Array(value.into_iter().map(|item| item.into()).collect())
    }

    pub fn item(self, value: impl Into<JsonValue>) -> Self {
        match self {
            Self::Array(mut result) => {
                result.push(value.into());
                Self::Array(result)
            }
            _ => self,
        }
    }

    pub fn object() -> Self {
        Self::Object(Default::default())
    }

    pub fn object_from<K: ToString, V: Into<JsonValue>>(
        value: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        value
            .into_iter()
            .fold(Self::object(), |result, (key, value)| {
                result.property(key, value)
            })
    }

    /// Sets a member, replacing an existing one in place.
    pub fn property(self, key: impl ToString, value: impl Into<JsonValue>) -> Self {
        match self {
            Self::Object(mut result) => {
                let key = key.to_string();
                let value = value.into();
                if let Some((_, item)) = result.iter_mut().find(|(k, _)| k == &key) {
                    *item = value;
                } else {
                    result.push((key, value));
                }
                Self::Object(result)
            }
            _ => self,
        }
    }

    /// Like [`JsonValue::property`] but leaves the member out for `None`.
    pub fn optional_property<T: Into<JsonValue>>(self, key: impl ToString, value: Option<T>) -> Self {
        match value {
            Some(value) => self.property(key, value),
            None => self,
        }
    }

    pub fn kind(&self) -> JsonKind {
        match self {
            Self::Null => JsonKind::Null,
            Self::Bool(_) => JsonKind::Boolean,
            Self::Number(_) => JsonKind::Number,
            Self::String(_) => JsonKind::String,
            Self::Array(_) => JsonKind::Array,
            Self::Object(_) => JsonKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, JsonValue)]> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn member(&self, key: &str) -> Option<&JsonValue> {
        self.as_object()
            .and_then(|members| members.iter().find(|(k, _)| k == key))
            .map(|(_, value)| value)
    }
}

/// Every member of `a` is found in `b` with an equal value.
fn contains_members(a: &[(String, JsonValue)], b: &[(String, JsonValue)]) -> bool {
    a.iter().all(|(key, value)| {
        b.iter()
            .find(|(k, _)| k == key)
            .is_some_and(|(_, v)| v == value)
    })
}

impl PartialEq for JsonValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => {
                a.len() == b.len() && contains_members(a, b) && contains_members(b, a)
            }
            _ => false,
        }
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Number> for JsonValue {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<&String> for JsonValue {
    fn from(value: &String) -> Self {
        Self::String(value.to_owned())
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
    fn from(value: Vec<T>) -> Self {
        Self::array_from(value)
    }
}

impl FromStr for JsonValue {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(content).map_err(|error| Error::Syntax(error.to_string()))
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&content)
    }
}

impl Serialize for JsonValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Number(v) => v.serialize(serializer),
            Self::String(v) => serializer.serialize_str(v),
            Self::Array(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for item in v {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(v) => {
                let mut map = serializer.serialize_map(Some(v.len()))?;
                for (k, v) in v {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(JsonValueVisitor)
    }
}
