//! Pluggable `string -> T` decoders used by string-typed members.

pub mod datetime;
pub mod ident;
pub mod registry;

pub use datetime::{DateTimeFormat, LocalDateParser, LocalTimeParser, ZonedDateTimeParser};
pub use ident::{ChannelAddressParser, SemanticVersionParser, UuidParser};
pub use registry::ParserRegistry;

use crate::{error::ParseError, value::JsonKind};
use std::{any::type_name, fmt, marker::PhantomData};

/// Literal sample of a parser: the raw string and what it parses into.
#[derive(Debug, Clone, PartialEq)]
pub struct Example<T> {
    pub raw: String,
    pub value: T,
}

impl<T> Example<T> {
    pub fn new(raw: impl ToString, value: T) -> Self {
        Self {
            raw: raw.to_string(),
            value,
        }
    }
}

pub trait StringParser {
    type Output;

    fn parse(&self, raw: &str) -> Result<Self::Output, ParseError>;

    /// Raw string form of a value, the inverse of [`StringParser::parse`].
    fn format(&self, value: &Self::Output) -> String;

    fn example(&self) -> Example<Self::Output>;
}

impl<P> StringParser for &P
where
    P: StringParser + ?Sized,
{
    type Output = P::Output;

    fn parse(&self, raw: &str) -> Result<Self::Output, ParseError> {
        (**self).parse(raw)
    }

    fn format(&self, value: &Self::Output) -> String {
        (**self).format(value)
    }

    fn example(&self) -> Example<Self::Output> {
        (**self).example()
    }
}

/// Accepts any string as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainString;

impl StringParser for PlainString {
    type Output = String;

    fn parse(&self, raw: &str) -> Result<String, ParseError> {
        Ok(raw.to_owned())
    }

    fn format(&self, value: &String) -> String {
        value.to_owned()
    }

    fn example(&self) -> Example<String> {
        Example::new("string", "string".to_owned())
    }
}

/// Enumeration whose variants travel as their exact names.
pub trait NamedEnum: Clone + 'static {
    fn variants() -> &'static [Self];

    fn name(&self) -> &'static str;

    fn example() -> Self;

    fn from_name(name: &str) -> Option<Self> {
        Self::variants()
            .iter()
            .find(|variant| variant.name() == name)
            .cloned()
    }
}

/// Declares a fieldless enum together with its [`NamedEnum`] wire names.
/// The first variant is the documentation example.
///
/// ```
/// jsonpath_serializer::named_enum! {
///     pub enum Phase {
///         L1 = "L1",
///         L2 = "L2",
///         L3 = "L3",
///     }
/// }
/// ```
#[macro_export]
macro_rules! named_enum {
    (
        $( #[$meta:meta] )*
        $vis:vis enum $name:ident {
            $first:ident = $first_wire:literal
            $( , $variant:ident = $wire:literal )* $(,)?
        }
    ) => {
        $( #[$meta] )*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $first,
            $( $variant, )*
        }

        impl $crate::parser::NamedEnum for $name {
            fn variants() -> &'static [Self] {
                &[Self::$first $( , Self::$variant )*]
            }

            fn name(&self) -> &'static str {
                match self {
                    Self::$first => $first_wire,
                    $( Self::$variant => $wire, )*
                }
            }

            fn example() -> Self {
                Self::$first
            }
        }
    };
}

impl NamedEnum for JsonKind {
    fn variants() -> &'static [Self] {
        &[
            Self::Null,
            Self::Boolean,
            Self::Number,
            Self::String,
            Self::Array,
            Self::Object,
        ]
    }

    fn name(&self) -> &'static str {
        JsonKind::name(*self)
    }

    fn example() -> Self {
        Self::Object
    }
}

/// Matches variant names exactly, case included.
pub struct EnumParser<E>(PhantomData<fn() -> E>);

impl<E> EnumParser<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for EnumParser<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EnumParser<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EnumParser<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumParser<{}>", type_name::<E>())
    }
}

impl<E> StringParser for EnumParser<E>
where
    E: NamedEnum,
{
    type Output = E;

    fn parse(&self, raw: &str) -> Result<E, ParseError> {
        E::from_name(raw).ok_or_else(|| {
            let names = E::variants()
                .iter()
                .map(|variant| variant.name())
                .collect::<Vec<_>>()
                .join(", ");
            ParseError::new(format!("unknown variant `{}`, expected one of: {}", raw, names))
        })
    }

    fn format(&self, value: &E) -> String {
        value.name().to_owned()
    }

    fn example(&self) -> Example<E> {
        let value = E::example();
        Example::new(value.name(), value)
    }
}
