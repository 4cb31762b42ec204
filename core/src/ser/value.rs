use crate::{error::*, value::*};
use serde::Serialize;

/// Converts any serde-serializable type into a [`JsonValue`].
///
/// Enums use the external tagging convention: unit variants become their
/// name, every other variant a single-member object keyed by the name.
pub fn to_value<T>(value: &T) -> Result<JsonValue>
where
    T: Serialize + ?Sized,
{
    value.serialize(Serializer)
}

pub struct Serializer;

impl serde::ser::Serializer for Serializer {
    type Ok = JsonValue;
    type Error = Error;
    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = TupleVariantSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = StructSerializer;
    type SerializeStructVariant = StructVariantSerializer;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        Ok(JsonValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        Ok(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        Ok(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        Ok(v.into())
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        Ok(v.into())
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        Ok(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        Ok(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        Ok(v.into())
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        Ok(v.into())
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        Ok(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
        Ok(v.into())
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        Ok(JsonValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Ok(JsonValue::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        Ok(JsonValue::array_from(v.iter().copied()))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(JsonValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Self::Ok> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        Ok(JsonValue::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(self, _: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        Ok(JsonValue::object().property(variant, value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqSerializer {
            values: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        Ok(SeqSerializer {
            values: Vec::with_capacity(len),
        })
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(SeqSerializer {
            values: Vec::with_capacity(len),
        })
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(TupleVariantSerializer {
            variant,
            values: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            value: JsonValue::object(),
            key: None,
        })
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer {
            value: JsonValue::object(),
        })
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(StructVariantSerializer {
            variant,
            value: JsonValue::object(),
        })
    }
}

pub struct SeqSerializer {
    values: Vec<JsonValue>,
}

impl serde::ser::SerializeSeq for SeqSerializer {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.values.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(JsonValue::Array(self.values))
    }
}

impl serde::ser::SerializeTuple for SeqSerializer {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        serde::ser::SerializeSeq::end(self)
    }
}

impl serde::ser::SerializeTupleStruct for SeqSerializer {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        serde::ser::SerializeSeq::end(self)
    }
}

pub struct TupleVariantSerializer {
    variant: &'static str,
    values: Vec<JsonValue>,
}

impl serde::ser::SerializeTupleVariant for TupleVariantSerializer {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.values.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(JsonValue::object().property(self.variant, JsonValue::Array(self.values)))
    }
}

pub struct MapSerializer {
    value: JsonValue,
    key: Option<String>,
}

impl serde::ser::SerializeMap for MapSerializer {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.key = Some(map_key(key.serialize(Serializer)?)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .key
            .take()
            .ok_or_else(|| Error::Message("map value without key".to_owned()))?;
        let value = value.serialize(Serializer)?;
        self.value = std::mem::take(&mut self.value).property(key, value);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(self.value)
    }
}

/// JSON object keys must be strings; scalar keys are stringified.
fn map_key(key: JsonValue) -> Result<String> {
    match key {
        JsonValue::String(key) => Ok(key),
        JsonValue::Bool(key) => Ok(key.to_string()),
        JsonValue::Number(key) => Ok(JsonValue::Number(key).to_string()),
        other => Err(Error::Message(format!(
            "object key must be a string, found {}",
            other.kind()
        ))),
    }
}

pub struct StructSerializer {
    value: JsonValue,
}

impl serde::ser::SerializeStruct for StructSerializer {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(Serializer)?;
        self.value = std::mem::take(&mut self.value).property(key, value);
        Ok(())
    }

    fn end(self) -> Result<JsonValue> {
        Ok(self.value)
    }
}

pub struct StructVariantSerializer {
    variant: &'static str,
    value: JsonValue,
}

impl serde::ser::SerializeStructVariant for StructVariantSerializer {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(Serializer)?;
        self.value = std::mem::take(&mut self.value).property(key, value);
        Ok(())
    }

    fn end(self) -> Result<JsonValue> {
        Ok(JsonValue::object().property(self.variant, self.value))
    }
}
