use crate::{
    descriptor::{Descriptor, Shape},
    error::*,
    parser::StringParser,
    path::{ElementPath, Locator, ObjectPath},
    value::{JsonValue, Number},
};
use std::{fmt, sync::Arc};

type SerializeFn<T> = dyn Fn(&T) -> JsonValue + Send + Sync;
type DeserializeFn<T> = dyn Fn(&ElementPath<'_>) -> Result<T> + Send + Sync;

/// Pair of conversion functions between `T` and [`JsonValue`].
///
/// The deserialize function is written once against the path API and serves
/// two purposes: [`Serializer::deserialize`] runs it over a real document and
/// [`Serializer::descriptor`] runs it over the dummy driver to record which
/// members it reads. It must therefore not branch on the values it gets back.
///
/// ```
/// use jsonpath_serializer::{JsonValue, Serializer};
///
/// #[derive(Debug, PartialEq)]
/// struct Meter {
///     id: String,
///     power: Option<i32>,
/// }
///
/// let serializer = Serializer::object(
///     |meter: &Meter| {
///         JsonValue::object()
///             .property("id", &meter.id)
///             .property("power", meter.power)
///     },
///     |path| {
///         Ok(Meter {
///             id: path.get_string("id")?,
///             power: path.get_int_nullable("power")?,
///         })
///     },
/// );
///
/// let input = r#"{"id":"meter0","power":null}"#.parse::<JsonValue>().unwrap();
/// let meter = serializer.deserialize(&input).unwrap();
/// assert_eq!(meter, Meter { id: "meter0".to_owned(), power: None });
/// assert_eq!(serializer.serialize(&meter), input);
/// ```
pub struct Serializer<T> {
    serialize: Arc<SerializeFn<T>>,
    deserialize: Arc<DeserializeFn<T>>,
    /// Whether a JSON null document is handed to `deserialize`.
    nullable: bool,
}

impl<T> Clone for Serializer<T> {
    fn clone(&self) -> Self {
        Self {
            serialize: self.serialize.clone(),
            deserialize: self.deserialize.clone(),
            nullable: self.nullable,
        }
    }
}

impl<T> fmt::Debug for Serializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T> Serializer<T> {
    pub fn serialize(&self, value: &T) -> JsonValue {
        (self.serialize)(value)
    }

    /// A null document fails with [`Error::ConstructionFailure`] unless the
    /// serializer came from [`Serializer::nullable`].
    pub fn deserialize(&self, input: &JsonValue) -> Result<T> {
        let root = if self.nullable {
            Ok(ElementPath::nullable(Some(input)))
        } else {
            ElementPath::new(input)
        };
        let result = root.and_then(|root| self.deserialize_path(&root));
        if let Err(error) = &result {
            tracing::debug!(
                type_name = std::any::type_name::<T>(),
                locator = ?error.locator().map(ToString::to_string),
                %error,
                "deserialize failed"
            );
        }
        result
    }

    pub fn deserialize_path(&self, path: &ElementPath<'_>) -> Result<T> {
        (self.deserialize)(path)
    }

    /// Runs the deserialize function over the dummy driver.
    pub fn descriptor(&self) -> Descriptor {
        let shape = Arc::new(Shape::default());
        let root = ElementPath::dummy(shape.clone(), Locator::root());
        if let Err(error) = self.deserialize_path(&root) {
            tracing::warn!(
                type_name = std::any::type_name::<T>(),
                %error,
                "deserialize function failed against dummy driver"
            );
        }
        let descriptor = shape.describe(false);
        tracing::trace!(
            type_name = std::any::type_name::<T>(),
            %descriptor,
            "derived descriptor"
        );
        descriptor
    }
}

impl<T> Serializer<T>
where
    T: 'static,
{
    pub fn new<S, D>(serialize: S, deserialize: D) -> Self
    where
        S: Fn(&T) -> JsonValue + Send + Sync + 'static,
        D: Fn(&ElementPath<'_>) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            serialize: Arc::new(serialize),
            deserialize: Arc::new(deserialize),
            nullable: false,
        }
    }

    /// Serializer whose input must be a JSON object.
    pub fn object<S, D>(serialize: S, deserialize: D) -> Self
    where
        S: Fn(&T) -> JsonValue + Send + Sync + 'static,
        D: Fn(&ObjectPath<'_>) -> Result<T> + Send + Sync + 'static,
    {
        Self::new(serialize, move |path: &ElementPath<'_>| {
            deserialize(&path.get_as_object()?)
        })
    }

    /// Object without members, e.g. an empty RPC request.
    pub fn empty_object<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(
            |_| JsonValue::object(),
            move |path: &ElementPath<'_>| {
                path.get_as_object()?;
                Ok(factory())
            },
        )
    }

    /// String member decoded by `parser` and written back with its `format`.
    pub fn string_parsed<P>(parser: P) -> Self
    where
        P: StringParser<Output = T> + Send + Sync + 'static,
    {
        let parser = Arc::new(parser);
        let format = parser.clone();
        Self::new(
            move |value: &T| JsonValue::String(format.format(value)),
            move |path: &ElementPath<'_>| path.get_as_string_parsed(parser.as_ref()),
        )
    }

    /// Array of values of this serializer.
    pub fn list(&self) -> Serializer<Vec<T>> {
        let serialize = self.clone();
        let deserialize = self.clone();
        Serializer::new(
            move |values: &Vec<T>| {
                JsonValue::Array(values.iter().map(|value| serialize.serialize(value)).collect())
            },
            move |path: &ElementPath<'_>| path.get_as_array()?.get_as_list_with(&deserialize),
        )
    }

    /// Same value where JSON null and absence read as `None`.
    pub fn nullable(&self) -> Serializer<Option<T>> {
        let serialize = self.clone();
        let deserialize = self.clone();
        Serializer {
            nullable: true,
            ..Serializer::new(
                move |value: &Option<T>| match value {
                    Some(value) => serialize.serialize(value),
                    None => JsonValue::Null,
                },
                move |path: &ElementPath<'_>| path.get_as_serialized_nullable(&deserialize),
            )
        }
    }
}

impl Serializer<bool> {
    pub fn boolean() -> Self {
        Self::new(|value| JsonValue::Bool(*value), |path| path.get_as_bool())
    }
}

impl Serializer<String> {
    pub fn string() -> Self {
        Self::new(|value: &String| value.into(), |path| path.get_as_string())
    }
}

impl Serializer<Number> {
    pub fn number() -> Self {
        Self::new(|value| JsonValue::Number(*value), |path| path.get_as_number())
    }
}

impl Serializer<f64> {
    pub fn double() -> Self {
        Self::new(|value| (*value).into(), |path| path.get_as_double())
    }
}

impl Serializer<i64> {
    pub fn long() -> Self {
        Self::new(|value| (*value).into(), |path| path.get_as_long())
    }
}

impl Serializer<i32> {
    pub fn int() -> Self {
        Self::new(|value| (*value).into(), |path| path.get_as_int())
    }
}
