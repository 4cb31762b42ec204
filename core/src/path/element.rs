use crate::{
    descriptor::Shape,
    error::*,
    parser::{EnumParser, NamedEnum, StringParser},
    path::{
        decode::type_mismatch, ArrayPath, BooleanDecoder, Decoder, Locator, NullableScalarPath,
        NumberDecoder, ObjectPath, ScalarPath, StringDecoder,
    },
    serializer::Serializer,
    value::{JsonKind, JsonValue, Number},
};
use std::sync::Arc;

static PRIMITIVE_EXAMPLE: JsonValue = JsonValue::String(String::new());

#[derive(Debug, Clone)]
enum Source<'a> {
    /// `None` marks a member that is not present at all.
    Actual(Option<&'a JsonValue>),
    Dummy(Arc<Shape>),
}

/// Handle over one JSON value, or over its absence, that can reinterpret
/// itself as any scalar or composite kind.
#[derive(Debug, Clone)]
pub struct ElementPath<'a> {
    locator: Locator,
    source: Source<'a>,
}

macro_rules! impl_number_getters {
    ( $( $get:ident, $nullable:ident => $type:ty, $as:ident; )+ ) => {
        $(
            pub fn $get(&self) -> Result<$type> {
                Ok(self.get_as_number()?.$as())
            }

            pub fn $nullable(&self) -> Result<Option<$type>> {
                Ok(self.get_as_number_nullable()?.map(|number| number.$as()))
            }
        )+
    };
}

impl<'a> ElementPath<'a> {
    /// Root path over a value that must not be null.
    pub fn new(value: &'a JsonValue) -> Result<Self> {
        if value.is_null() {
            return Err(Error::ConstructionFailure {
                locator: Locator::root(),
                found: "null",
            });
        }
        Ok(Self::nullable(Some(value)))
    }

    /// Root path that defers null and absence handling to its accessors.
    pub fn nullable(value: Option<&'a JsonValue>) -> Self {
        Self::actual(value, Locator::root())
    }

    pub(crate) fn actual(value: Option<&'a JsonValue>, locator: Locator) -> Self {
        Self {
            locator,
            source: Source::Actual(value),
        }
    }

    pub(crate) fn dummy(shape: Arc<Shape>, locator: Locator) -> Self {
        Self {
            locator,
            source: Source::Dummy(shape),
        }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self.source, Source::Dummy(_))
    }

    /// Whether a non-null value is there. Dummy paths always report one.
    pub fn is_present(&self) -> bool {
        match self.source {
            Source::Actual(value) => value.is_some_and(|value| !value.is_null()),
            Source::Dummy(_) => true,
        }
    }

    /// Raw value behind an actual path. Dummy paths have none.
    pub fn value(&self) -> Option<&'a JsonValue> {
        match self.source {
            Source::Actual(value) => value,
            Source::Dummy(_) => None,
        }
    }

    fn require(&self, value: Option<&'a JsonValue>) -> Result<&'a JsonValue> {
        match value {
            None => Err(Error::MissingMember {
                locator: self.locator.to_owned(),
            }),
            Some(JsonValue::Null) => Err(Error::NullValue {
                locator: self.locator.to_owned(),
            }),
            Some(value) => Ok(value),
        }
    }

    fn check_primitive(&self, value: &JsonValue) -> Result<()> {
        if value.kind().is_primitive() {
            Ok(())
        } else {
            Err(Error::NotPrimitive {
                locator: self.locator.to_owned(),
                actual: value.kind(),
            })
        }
    }

    /// Raw string, number or boolean. Dummy paths hand out an empty string.
    pub fn get_as_primitive(&self) -> Result<&'a JsonValue> {
        match &self.source {
            Source::Actual(value) => {
                let value = self.require(*value)?;
                self.check_primitive(value)?;
                Ok(value)
            }
            Source::Dummy(shape) => {
                shape.mark_scalar(JsonKind::String);
                Ok(&PRIMITIVE_EXAMPLE)
            }
        }
    }

    /// Same path, checked to hold a string, number or boolean.
    pub fn get_as_primitive_path(&self) -> Result<ElementPath<'a>> {
        match &self.source {
            Source::Actual(value) => self.check_primitive(self.require(*value)?)?,
            Source::Dummy(shape) => shape.mark_scalar(JsonKind::String),
        }
        Ok(self.clone())
    }

    /// Like [`ElementPath::get_as_primitive_path`], but null and absence pass.
    pub fn get_as_primitive_path_nullable(&self) -> Result<ElementPath<'a>> {
        match &self.source {
            Source::Actual(None | Some(JsonValue::Null)) => {}
            Source::Actual(Some(value)) => self.check_primitive(value)?,
            Source::Dummy(shape) => {
                shape.mark_nullable();
                shape.mark_scalar(JsonKind::String);
            }
        }
        Ok(self.clone())
    }

    pub fn get_as<D>(&self, decoder: &D) -> Result<D::Output>
    where
        D: Decoder,
    {
        match &self.source {
            Source::Actual(value) => decoder.decode(self.require(*value)?, &self.locator),
            Source::Dummy(shape) => {
                shape.mark_scalar(decoder.kind());
                Ok(decoder.example().1)
            }
        }
    }

    /// Absence and JSON null give `None`; a value of the wrong kind still fails.
    pub fn get_as_nullable<D>(&self, decoder: &D) -> Result<Option<D::Output>>
    where
        D: Decoder,
    {
        match &self.source {
            Source::Actual(None | Some(JsonValue::Null)) => Ok(None),
            Source::Actual(Some(value)) => decoder.decode(value, &self.locator).map(Some),
            Source::Dummy(shape) => {
                shape.mark_nullable();
                shape.mark_scalar(decoder.kind());
                Ok(Some(decoder.example().1))
            }
        }
    }

    pub fn get_as_path<D>(&self, decoder: &D) -> Result<ScalarPath<'a, D::Output>>
    where
        D: Decoder,
    {
        match &self.source {
            Source::Actual(value) => {
                let raw = self.require(*value)?;
                let value = decoder.decode(raw, &self.locator)?;
                Ok(ScalarPath::new(self.clone(), raw.clone(), value))
            }
            Source::Dummy(shape) => {
                shape.mark_scalar(decoder.kind());
                let (raw, value) = decoder.example();
                Ok(ScalarPath::new(self.clone(), raw, value))
            }
        }
    }

    pub fn get_as_path_nullable<D>(&self, decoder: &D) -> Result<NullableScalarPath<'a, D::Output>>
    where
        D: Decoder,
    {
        let value = match &self.source {
            Source::Actual(None | Some(JsonValue::Null)) => None,
            Source::Actual(Some(raw)) => {
                let value = decoder.decode(raw, &self.locator)?;
                Some(((*raw).clone(), value))
            }
            Source::Dummy(shape) => {
                shape.mark_nullable();
                shape.mark_scalar(decoder.kind());
                Some(decoder.example())
            }
        };
        Ok(NullableScalarPath::new(self.clone(), value))
    }

    pub fn get_as_bool(&self) -> Result<bool> {
        self.get_as(&BooleanDecoder)
    }

    pub fn get_as_bool_nullable(&self) -> Result<Option<bool>> {
        self.get_as_nullable(&BooleanDecoder)
    }

    pub fn get_as_bool_path(&self) -> Result<ScalarPath<'a, bool>> {
        self.get_as_path(&BooleanDecoder)
    }

    pub fn get_as_bool_path_nullable(&self) -> Result<NullableScalarPath<'a, bool>> {
        self.get_as_path_nullable(&BooleanDecoder)
    }

    pub fn get_as_string(&self) -> Result<String> {
        self.get_as(&StringDecoder::plain())
    }

    pub fn get_as_string_nullable(&self) -> Result<Option<String>> {
        self.get_as_nullable(&StringDecoder::plain())
    }

    pub fn get_as_string_path(&self) -> Result<ScalarPath<'a, String>> {
        self.get_as_path(&StringDecoder::plain())
    }

    pub fn get_as_string_path_nullable(&self) -> Result<NullableScalarPath<'a, String>> {
        self.get_as_path_nullable(&StringDecoder::plain())
    }

    pub fn get_as_string_parsed<P>(&self, parser: &P) -> Result<P::Output>
    where
        P: StringParser + ?Sized,
    {
        self.get_as(&StringDecoder(parser))
    }

    pub fn get_as_string_parsed_nullable<P>(&self, parser: &P) -> Result<Option<P::Output>>
    where
        P: StringParser + ?Sized,
    {
        self.get_as_nullable(&StringDecoder(parser))
    }

    pub fn get_as_enum<E>(&self) -> Result<E>
    where
        E: NamedEnum,
    {
        self.get_as_string_parsed(&EnumParser::<E>::new())
    }

    pub fn get_as_number(&self) -> Result<Number> {
        self.get_as(&NumberDecoder)
    }

    pub fn get_as_number_nullable(&self) -> Result<Option<Number>> {
        self.get_as_nullable(&NumberDecoder)
    }

    pub fn get_as_number_path(&self) -> Result<ScalarPath<'a, Number>> {
        self.get_as_path(&NumberDecoder)
    }

    pub fn get_as_number_path_nullable(&self) -> Result<NullableScalarPath<'a, Number>> {
        self.get_as_path_nullable(&NumberDecoder)
    }

    impl_number_getters! {
        get_as_double, get_as_double_nullable => f64, as_f64;
        get_as_float, get_as_float_nullable => f32, as_f32;
        get_as_long, get_as_long_nullable => i64, as_i64;
        get_as_int, get_as_int_nullable => i32, as_i32;
        get_as_short, get_as_short_nullable => i16, as_i16;
        get_as_byte, get_as_byte_nullable => i8, as_i8;
    }

    pub fn get_as_object(&self) -> Result<ObjectPath<'a>> {
        match &self.source {
            Source::Actual(value) => match self.require(*value)? {
                JsonValue::Object(members) => {
                    Ok(ObjectPath::actual(members, self.locator.to_owned()))
                }
                other => Err(type_mismatch(JsonKind::Object, other, &self.locator)),
            },
            Source::Dummy(shape) => {
                shape.mark_object();
                Ok(ObjectPath::dummy(shape.clone(), self.locator.to_owned()))
            }
        }
    }

    /// JSON null or absence give `None`, member access needs a value.
    pub fn get_as_object_nullable(&self) -> Result<Option<ObjectPath<'a>>> {
        match &self.source {
            Source::Actual(None | Some(JsonValue::Null)) => Ok(None),
            Source::Actual(_) => self.get_as_object().map(Some),
            Source::Dummy(shape) => {
                shape.mark_nullable();
                self.get_as_object().map(Some)
            }
        }
    }

    pub fn get_as_array(&self) -> Result<ArrayPath<'a>> {
        match &self.source {
            Source::Actual(value) => match self.require(*value)? {
                JsonValue::Array(values) => Ok(ArrayPath::actual(values, self.locator.to_owned())),
                other => Err(type_mismatch(JsonKind::Array, other, &self.locator)),
            },
            Source::Dummy(shape) => Ok(ArrayPath::dummy(shape.element(), self.locator.to_owned())),
        }
    }

    pub fn get_as_array_nullable(&self) -> Result<Option<ArrayPath<'a>>> {
        match &self.source {
            Source::Actual(None | Some(JsonValue::Null)) => Ok(None),
            Source::Actual(_) => self.get_as_array().map(Some),
            Source::Dummy(shape) => {
                shape.mark_nullable();
                self.get_as_array().map(Some)
            }
        }
    }

    /// Hands this element to a nested serializer.
    pub fn get_as_serialized<T>(&self, serializer: &Serializer<T>) -> Result<T> {
        serializer.deserialize_path(self)
    }

    pub fn get_as_serialized_nullable<T>(&self, serializer: &Serializer<T>) -> Result<Option<T>> {
        match &self.source {
            Source::Actual(None | Some(JsonValue::Null)) => Ok(None),
            Source::Actual(_) => serializer.deserialize_path(self).map(Some),
            Source::Dummy(shape) => {
                shape.mark_nullable();
                serializer.deserialize_path(self).map(Some)
            }
        }
    }
}
