use crate::{error::*, value::*};
use serde::{
    de::{
        value::StrDeserializer, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess,
        SeqAccess, Unexpected, VariantAccess, Visitor,
    },
    forward_to_deserialize_any, Deserialize,
};
use std::collections::HashMap;

/// Builds any serde-deserializable type from a [`JsonValue`].
pub fn from_value<'a, T>(value: &'a JsonValue) -> Result<T>
where
    T: Deserialize<'a>,
{
    T::deserialize(Deserializer::from_value(value))
}

#[derive(Debug)]
pub struct Deserializer<'de> {
    input: &'de JsonValue,
}

impl<'de> Deserializer<'de> {
    pub fn from_value(input: &'de JsonValue) -> Self {
        Self { input }
    }
}

impl<'de> serde::de::Deserializer<'de> for Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.input {
            JsonValue::Null => visitor.visit_unit(),
            JsonValue::Bool(v) => visitor.visit_bool(*v),
            JsonValue::Number(v) => match v {
                Number::SignedInteger(v) => visitor.visit_i64(*v),
                Number::UnsignedInteger(v) => visitor.visit_u64(*v),
                Number::Float(v) => visitor.visit_f64(*v),
            },
            JsonValue::String(v) => visitor.visit_borrowed_str(v),
            JsonValue::Array(v) => visitor.visit_seq(SeqDeserializer {
                values: v.as_slice(),
                index: 0,
            }),
            JsonValue::Object(v) => visitor.visit_map(MapDeserializer {
                values: v.as_slice(),
                index: 0,
            }),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.input {
            JsonValue::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.input {
            JsonValue::String(name) => visitor.visit_enum(EnumDeserializer {
                name,
                content: None,
            }),
            JsonValue::Object(members) if members.len() == 1 => {
                let (name, content) = &members[0];
                visitor.visit_enum(EnumDeserializer {
                    name,
                    content: Some(content),
                })
            }
            other => Err(serde::de::Error::invalid_type(
                unexpected(other),
                &"string or single-member object",
            )),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

fn unexpected(value: &JsonValue) -> Unexpected<'_> {
    match value {
        JsonValue::Null => Unexpected::Unit,
        JsonValue::Bool(v) => Unexpected::Bool(*v),
        JsonValue::Number(Number::SignedInteger(v)) => Unexpected::Signed(*v),
        JsonValue::Number(Number::UnsignedInteger(v)) => Unexpected::Unsigned(*v),
        JsonValue::Number(Number::Float(v)) => Unexpected::Float(*v),
        JsonValue::String(v) => Unexpected::Str(v),
        JsonValue::Array(_) => Unexpected::Seq,
        JsonValue::Object(_) => Unexpected::Map,
    }
}

#[derive(Debug)]
pub struct SeqDeserializer<'de> {
    values: &'de [JsonValue],
    index: usize,
}

impl<'de> SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        if let Some(value) = self.values.get(self.index) {
            self.index += 1;
            return seed.deserialize(Deserializer::from_value(value)).map(Some);
        }
        Ok(None)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len() - self.index)
    }
}

#[derive(Debug)]
pub struct MapDeserializer<'de> {
    values: &'de [(String, JsonValue)],
    index: usize,
}

impl<'de> MapAccess<'de> for MapDeserializer<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        if let Some((key, _)) = self.values.get(self.index) {
            return seed.deserialize(key.as_str().into_deserializer()).map(Some);
        }
        Ok(None)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        if let Some((_, value)) = self.values.get(self.index) {
            self.index += 1;
            return seed.deserialize(Deserializer::from_value(value));
        }
        Err(Error::Message("expected object member".to_owned()))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len() - self.index)
    }
}

#[derive(Debug)]
struct EnumDeserializer<'de> {
    name: &'de str,
    content: Option<&'de JsonValue>,
}

impl<'de> EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let deserializer: StrDeserializer<'_, Error> = self.name.into_deserializer();
        let name = seed.deserialize(deserializer)?;
        Ok((name, self))
    }
}

impl<'de> VariantAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.content {
            None | Some(JsonValue::Null) => Ok(()),
            Some(_) => Err(Error::Message(format!(
                "expected unit variant `{}`",
                self.name
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        match self.content {
            Some(content) => seed.deserialize(Deserializer::from_value(content)),
            None => Err(Error::Message(format!(
                "expected newtype variant `{}`",
                self.name
            ))),
        }
    }

    fn tuple_variant<V>(self, _: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.content {
            Some(JsonValue::Array(content)) => visitor.visit_seq(SeqDeserializer {
                values: content,
                index: 0,
            }),
            _ => Err(Error::Message(format!(
                "expected tuple variant `{}`",
                self.name
            ))),
        }
    }

    fn struct_variant<V>(self, _: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.content {
            Some(JsonValue::Object(content)) => visitor.visit_map(MapDeserializer {
                values: content,
                index: 0,
            }),
            _ => Err(Error::Message(format!(
                "expected struct variant `{}`",
                self.name
            ))),
        }
    }
}

#[derive(Copy, Clone)]
pub struct JsonValueVisitor;

impl<'de> Visitor<'de> for JsonValueVisitor {
    type Value = JsonValue;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(JsonValue::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(JsonValue::Number(Number::SignedInteger(value)))
    }

    fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(JsonValue::Number(Number::UnsignedInteger(value)))
    }

    fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(JsonValue::Number(Number::Float(value)))
    }

    fn visit_char<E>(self, value: char) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(JsonValue::String(value.to_string()))
    }

    fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(JsonValue::String(value.to_owned()))
    }

    fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(JsonValue::String(value))
    }

    fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(JsonValue::array_from(value.iter().copied()))
    }

    fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(JsonValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        deserializer.deserialize_any(JsonValueVisitor)
    }

    fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(JsonValue::Null)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        deserializer.deserialize_any(JsonValueVisitor)
    }

    fn visit_seq<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut result = Vec::with_capacity(access.size_hint().unwrap_or_default());
        while let Some(v) = access.next_element()? {
            result.push(v);
        }
        Ok(JsonValue::Array(result))
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut members: Vec<(String, JsonValue)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        let mut positions: HashMap<String, usize> = HashMap::new();
        while let Some((key, value)) = access.next_entry::<String, JsonValue>()? {
            // repeated keys keep their first position and their last value
            match positions.get(&key) {
                Some(&index) => members[index].1 = value,
                None => {
                    positions.insert(key.clone(), members.len());
                    members.push((key, value));
                }
            }
        }
        Ok(JsonValue::Object(members))
    }
}
