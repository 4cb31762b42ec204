use crate::{
    descriptor::Shape,
    error::*,
    parser::{
        ChannelAddressParser, EnumParser, LocalDateParser, LocalTimeParser, NamedEnum,
        SemanticVersionParser, StringParser, UuidParser, ZonedDateTimeParser,
    },
    path::{
        decode::type_mismatch, ArrayPath, BooleanDecoder, Decoder, ElementPath, Locator,
        NullableScalarPath, NumberDecoder, ScalarPath, StringDecoder,
    },
    serializer::Serializer,
    types::{ChannelAddress, SemanticVersion},
    value::{JsonKind, JsonValue, Number},
};
use std::{collections::HashSet, hash::Hash, sync::Arc};
use time::{Date, OffsetDateTime, Time};
use uuid::Uuid;

static NULL: JsonValue = JsonValue::Null;

#[derive(Debug, Clone)]
enum Source<'a> {
    Actual(&'a [(String, JsonValue)]),
    Dummy(Arc<Shape>),
}

/// Handle over a JSON object that resolves members into child paths.
///
/// Every kind comes in four flavours: `get_x` requires a non-null value,
/// `get_x_nullable` maps absence and JSON null to `None`, and the `_path`
/// variants return a [`ScalarPath`] or [`NullableScalarPath`] instead of the
/// bare value. A value of the wrong kind fails in every flavour.
#[derive(Debug, Clone)]
pub struct ObjectPath<'a> {
    locator: Locator,
    source: Source<'a>,
}

macro_rules! impl_number_getters {
    ( $( $get:ident, $nullable:ident, $or_default:ident => $type:ty, $as:ident; )+ ) => {
        $(
            pub fn $get(&self, key: &str) -> Result<$type> {
                Ok(self.get_number(key)?.$as())
            }

            pub fn $nullable(&self, key: &str) -> Result<Option<$type>> {
                Ok(self.get_number_nullable(key)?.map(|number| number.$as()))
            }

            pub fn $or_default(&self, key: &str, default: $type) -> Result<$type> {
                Ok(self.$nullable(key)?.unwrap_or(default))
            }
        )+
    };
}

macro_rules! impl_parsed_getters {
    ( $( $get:ident, $nullable:ident => $type:ty, $parser:expr; )+ ) => {
        $(
            pub fn $get(&self, key: &str) -> Result<$type> {
                self.get_string_parsed(key, &$parser)
            }

            pub fn $nullable(&self, key: &str) -> Result<Option<$type>> {
                self.get_string_parsed_nullable(key, &$parser)
            }
        )+
    };
}

impl<'a> ObjectPath<'a> {
    /// Root path over a value that must be a JSON object.
    pub fn new(value: &'a JsonValue) -> Result<Self> {
        Self::from_option(Some(value))
    }

    /// Fails right away for an absent or null root instead of on first access.
    pub fn from_option(value: Option<&'a JsonValue>) -> Result<Self> {
        let locator = Locator::root();
        match value {
            None => Err(Error::ConstructionFailure {
                locator,
                found: "absent",
            }),
            Some(JsonValue::Null) => Err(Error::ConstructionFailure {
                locator,
                found: "null",
            }),
            Some(JsonValue::Object(members)) => Ok(Self::actual(members, locator)),
            Some(other) => Err(type_mismatch(JsonKind::Object, other, &locator)),
        }
    }

    /// Root path that reports `None` for an absent or null value.
    pub fn nullable(value: Option<&'a JsonValue>) -> Result<Option<Self>> {
        match value {
            None | Some(JsonValue::Null) => Ok(None),
            value => Self::from_option(value).map(Some),
        }
    }

    pub(crate) fn actual(members: &'a [(String, JsonValue)], locator: Locator) -> Self {
        Self {
            locator,
            source: Source::Actual(members),
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

    fn members(&self) -> &'a [(String, JsonValue)] {
        match self.source {
            Source::Actual(members) => members,
            Source::Dummy(_) => &[],
        }
    }

    /// Member names in document order. Dummy objects have none.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.members().iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.members().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members().is_empty()
    }

    fn child(&self, key: &str, optional: bool) -> ElementPath<'a> {
        let locator = self.locator.key(key);
        match &self.source {
            Source::Actual(members) => ElementPath::actual(
                members.iter().find(|(k, _)| k == key).map(|(_, value)| value),
                locator,
            ),
            Source::Dummy(shape) => ElementPath::dummy(shape.property(key, optional), locator),
        }
    }

    /// Fails if the member is absent; a JSON null member is still a path.
    pub fn get_json_element_path(&self, key: &str) -> Result<ElementPath<'a>> {
        let path = self.child(key, false);
        match &self.source {
            Source::Actual(_) if path.value().is_none() => Err(Error::MissingMember {
                locator: path.locator().to_owned(),
            }),
            _ => Ok(path),
        }
    }

    /// Never fails, absence and null surface once the child is read.
    pub fn get_nullable_json_element_path(&self, key: &str) -> ElementPath<'a> {
        self.child(key, true)
    }

    pub fn get_json_element(&self, key: &str) -> Result<&'a JsonValue> {
        let path = self.get_json_element_path(key)?;
        Ok(path.value().unwrap_or(&NULL))
    }

    /// String, number or boolean member; array, object, null and absence fail.
    pub fn get_json_primitive(&self, key: &str) -> Result<&'a JsonValue> {
        self.get_json_element_path(key)?.get_as_primitive()
    }

    pub fn get_json_primitive_path(&self, key: &str) -> Result<ElementPath<'a>> {
        self.get_json_element_path(key)?.get_as_primitive_path()
    }

    /// Null and absence pass, array and object still fail.
    pub fn get_nullable_json_primitive_path(&self, key: &str) -> Result<ElementPath<'a>> {
        self.get_nullable_json_element_path(key)
            .get_as_primitive_path_nullable()
    }

    pub fn get<D>(&self, key: &str, decoder: &D) -> Result<D::Output>
    where
        D: Decoder,
    {
        self.get_json_element_path(key)?.get_as(decoder)
    }

    pub fn get_nullable<D>(&self, key: &str, decoder: &D) -> Result<Option<D::Output>>
    where
        D: Decoder,
    {
        self.get_nullable_json_element_path(key)
            .get_as_nullable(decoder)
    }

    pub fn get_path<D>(&self, key: &str, decoder: &D) -> Result<ScalarPath<'a, D::Output>>
    where
        D: Decoder,
    {
        self.get_json_element_path(key)?.get_as_path(decoder)
    }

    pub fn get_path_nullable<D>(
        &self,
        key: &str,
        decoder: &D,
    ) -> Result<NullableScalarPath<'a, D::Output>>
    where
        D: Decoder,
    {
        self.get_nullable_json_element_path(key)
            .get_as_path_nullable(decoder)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get(key, &BooleanDecoder)
    }

    pub fn get_bool_nullable(&self, key: &str) -> Result<Option<bool>> {
        self.get_nullable(key, &BooleanDecoder)
    }

    pub fn get_bool_or_default(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self.get_bool_nullable(key)?.unwrap_or(default))
    }

    pub fn get_bool_path(&self, key: &str) -> Result<ScalarPath<'a, bool>> {
        self.get_path(key, &BooleanDecoder)
    }

    pub fn get_bool_path_nullable(&self, key: &str) -> Result<NullableScalarPath<'a, bool>> {
        self.get_path_nullable(key, &BooleanDecoder)
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key, &StringDecoder::plain())
    }

    pub fn get_string_nullable(&self, key: &str) -> Result<Option<String>> {
        self.get_nullable(key, &StringDecoder::plain())
    }

    pub fn get_string_or_default(&self, key: &str, default: &str) -> Result<String> {
        Ok(self
            .get_string_nullable(key)?
            .unwrap_or_else(|| default.to_owned()))
    }

    pub fn get_string_path(&self, key: &str) -> Result<ScalarPath<'a, String>> {
        self.get_path(key, &StringDecoder::plain())
    }

    pub fn get_string_path_nullable(&self, key: &str) -> Result<NullableScalarPath<'a, String>> {
        self.get_path_nullable(key, &StringDecoder::plain())
    }

    pub fn get_string_parsed<P>(&self, key: &str, parser: &P) -> Result<P::Output>
    where
        P: StringParser + ?Sized,
    {
        self.get(key, &StringDecoder(parser))
    }

    pub fn get_string_parsed_nullable<P>(&self, key: &str, parser: &P) -> Result<Option<P::Output>>
    where
        P: StringParser + ?Sized,
    {
        self.get_nullable(key, &StringDecoder(parser))
    }

    pub fn get_string_parsed_path<P>(&self, key: &str, parser: &P) -> Result<ScalarPath<'a, P::Output>>
    where
        P: StringParser + ?Sized,
    {
        self.get_path(key, &StringDecoder(parser))
    }

    pub fn get_string_parsed_path_nullable<P>(
        &self,
        key: &str,
        parser: &P,
    ) -> Result<NullableScalarPath<'a, P::Output>>
    where
        P: StringParser + ?Sized,
    {
        self.get_path_nullable(key, &StringDecoder(parser))
    }

    pub fn get_enum<E>(&self, key: &str) -> Result<E>
    where
        E: NamedEnum,
    {
        self.get_string_parsed(key, &EnumParser::<E>::new())
    }

    pub fn get_enum_nullable<E>(&self, key: &str) -> Result<Option<E>>
    where
        E: NamedEnum,
    {
        self.get_string_parsed_nullable(key, &EnumParser::<E>::new())
    }

    impl_parsed_getters! {
        get_uuid, get_uuid_nullable => Uuid, UuidParser;
        get_semantic_version, get_semantic_version_nullable => SemanticVersion, SemanticVersionParser;
        get_channel_address, get_channel_address_nullable => ChannelAddress, ChannelAddressParser;
        get_local_date, get_local_date_nullable => Date, LocalDateParser::new();
        get_local_time, get_local_time_nullable => Time, LocalTimeParser::new();
        get_zoned_date_time, get_zoned_date_time_nullable => OffsetDateTime, ZonedDateTimeParser::new();
    }

    pub fn get_number(&self, key: &str) -> Result<Number> {
        self.get(key, &NumberDecoder)
    }

    pub fn get_number_nullable(&self, key: &str) -> Result<Option<Number>> {
        self.get_nullable(key, &NumberDecoder)
    }

    pub fn get_number_path(&self, key: &str) -> Result<ScalarPath<'a, Number>> {
        self.get_path(key, &NumberDecoder)
    }

    pub fn get_number_path_nullable(&self, key: &str) -> Result<NullableScalarPath<'a, Number>> {
        self.get_path_nullable(key, &NumberDecoder)
    }

    impl_number_getters! {
        get_double, get_double_nullable, get_double_or_default => f64, as_f64;
        get_float, get_float_nullable, get_float_or_default => f32, as_f32;
        get_long, get_long_nullable, get_long_or_default => i64, as_i64;
        get_int, get_int_nullable, get_int_or_default => i32, as_i32;
        get_short, get_short_nullable, get_short_or_default => i16, as_i16;
        get_byte, get_byte_nullable, get_byte_or_default => i8, as_i8;
    }

    pub fn get_object(&self, key: &str) -> Result<ObjectPath<'a>> {
        self.get_json_element_path(key)?.get_as_object()
    }

    pub fn get_object_nullable(&self, key: &str) -> Result<Option<ObjectPath<'a>>> {
        self.get_nullable_json_element_path(key)
            .get_as_object_nullable()
    }

    /// Reads a member through a nested serializer.
    pub fn get_with<T>(&self, key: &str, serializer: &Serializer<T>) -> Result<T> {
        self.get_json_element_path(key)?
            .get_as_serialized(serializer)
    }

    pub fn get_with_nullable<T>(&self, key: &str, serializer: &Serializer<T>) -> Result<Option<T>> {
        self.get_nullable_json_element_path(key)
            .get_as_serialized_nullable(serializer)
    }

    pub fn get_array_path(&self, key: &str) -> Result<ArrayPath<'a>> {
        self.get_json_element_path(key)?.get_as_array()
    }

    pub fn get_array_path_nullable(&self, key: &str) -> Result<Option<ArrayPath<'a>>> {
        self.get_nullable_json_element_path(key)
            .get_as_array_nullable()
    }

    pub fn get_list<T, F>(&self, key: &str, decoder: F) -> Result<Vec<T>>
    where
        F: Fn(&ElementPath<'a>) -> Result<T>,
    {
        self.get_array_path(key)?.get_as_list(decoder)
    }

    pub fn get_list_nullable<T, F>(&self, key: &str, decoder: F) -> Result<Option<Vec<T>>>
    where
        F: Fn(&ElementPath<'a>) -> Result<T>,
    {
        self.get_array_path_nullable(key)?
            .map(|array| array.get_as_list(decoder))
            .transpose()
    }

    pub fn get_list_with<T>(&self, key: &str, serializer: &Serializer<T>) -> Result<Vec<T>> {
        self.get_array_path(key)?.get_as_list_with(serializer)
    }

    pub fn get_array<T, F>(&self, key: &str, decoder: F) -> Result<Box<[T]>>
    where
        F: Fn(&ElementPath<'a>) -> Result<T>,
    {
        self.get_array_path(key)?.get_as_array(decoder)
    }

    pub fn get_array_with<T>(&self, key: &str, serializer: &Serializer<T>) -> Result<Box<[T]>> {
        self.get_array_path(key)?.get_as_array_with(serializer)
    }

    pub fn get_set<T, F>(&self, key: &str, decoder: F) -> Result<HashSet<T>>
    where
        T: Eq + Hash,
        F: Fn(&ElementPath<'a>) -> Result<T>,
    {
        self.get_array_path(key)?.get_as_set(decoder)
    }

    pub fn get_set_with<T>(&self, key: &str, serializer: &Serializer<T>) -> Result<HashSet<T>>
    where
        T: Eq + Hash,
    {
        self.get_array_path(key)?.get_as_set_with(serializer)
    }

    /// Decodes every member in document order and gathers `(key, value)`
    /// pairs into any collection. Dummy objects yield an empty collection.
    pub fn collect<T, C, F>(&self, decoder: F) -> Result<C>
    where
        C: FromIterator<(String, T)>,
        F: Fn(&ElementPath<'a>) -> Result<T>,
    {
        if let Source::Dummy(shape) = &self.source {
            shape.mark_object();
        }
        self.members()
            .iter()
            .map(|(key, value)| {
                let path = ElementPath::actual(Some(value), self.locator.key(key));
                decoder(&path).map(|value| (key.to_owned(), value))
            })
            .collect()
    }

    pub fn collect_string_keys<C>(&self) -> C
    where
        C: FromIterator<(String, ElementPath<'a>)>,
    {
        if let Source::Dummy(shape) = &self.source {
            shape.mark_object();
        }
        self.members()
            .iter()
            .map(|(key, value)| {
                let path = ElementPath::actual(Some(value), self.locator.key(key));
                (key.to_owned(), path)
            })
            .collect()
    }

    /// Like [`ObjectPath::collect_string_keys`] with member names run
    /// through a [`StringParser`], e.g. to key a map by channel address.
    pub fn collect_parsed_keys<P, C>(&self, parser: &P) -> Result<C>
    where
        P: StringParser + ?Sized,
        C: FromIterator<(P::Output, ElementPath<'a>)>,
    {
        if let Source::Dummy(shape) = &self.source {
            shape.mark_object();
        }
        self.members()
            .iter()
            .map(|(key, value)| {
                let locator = self.locator.key(key);
                match parser.parse(key) {
                    Ok(parsed) => Ok((parsed, ElementPath::actual(Some(value), locator))),
                    Err(source) => Err(Error::ParseFailure {
                        locator,
                        raw: key.to_owned(),
                        source,
                    }),
                }
            })
            .collect()
    }
}
