use crate::{
    path::{ElementPath, Locator},
    value::{JsonValue, Number},
};

/// Decoded scalar that remembers where it came from and its raw form.
#[derive(Debug, Clone)]
pub struct ScalarPath<'a, T> {
    element: ElementPath<'a>,
    raw: JsonValue,
    value: T,
}

impl<'a, T> ScalarPath<'a, T> {
    pub(crate) fn new(element: ElementPath<'a>, raw: JsonValue, value: T) -> Self {
        Self {
            element,
            raw,
            value,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn raw(&self) -> &JsonValue {
        &self.raw
    }

    pub fn locator(&self) -> &Locator {
        self.element.locator()
    }

    /// Element path this scalar was read from, to reinterpret it.
    pub fn build_path(&self) -> ElementPath<'a> {
        self.element.clone()
    }
}

impl ScalarPath<'_, Number> {
    pub fn get_as_double(&self) -> f64 {
        self.value.as_f64()
    }

    pub fn get_as_float(&self) -> f32 {
        self.value.as_f32()
    }

    pub fn get_as_long(&self) -> i64 {
        self.value.as_i64()
    }

    pub fn get_as_int(&self) -> i32 {
        self.value.as_i32()
    }

    pub fn get_as_short(&self) -> i16 {
        self.value.as_i16()
    }

    pub fn get_as_byte(&self) -> i8 {
        self.value.as_i8()
    }
}

/// Scalar read that may have found nothing.
#[derive(Debug, Clone)]
pub struct NullableScalarPath<'a, T> {
    element: ElementPath<'a>,
    value: Option<(JsonValue, T)>,
}

impl<'a, T> NullableScalarPath<'a, T> {
    pub(crate) fn new(element: ElementPath<'a>, value: Option<(JsonValue, T)>) -> Self {
        Self { element, value }
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    pub fn get_or_null(&self) -> Option<&T> {
        self.value.as_ref().map(|(_, value)| value)
    }

    pub fn get_optional(self) -> Option<T> {
        self.value.map(|(_, value)| value)
    }

    pub fn get_or_default(self, default: T) -> T {
        self.get_optional().unwrap_or(default)
    }

    pub fn raw(&self) -> Option<&JsonValue> {
        self.value.as_ref().map(|(raw, _)| raw)
    }

    pub fn locator(&self) -> &Locator {
        self.element.locator()
    }

    pub fn build_path(&self) -> ElementPath<'a> {
        self.element.clone()
    }
}

macro_rules! impl_nullable_number {
    ( $( $or_null:ident, $or_default:ident => $type:ty, $as:ident; )+ ) => {
        impl NullableScalarPath<'_, Number> {
            $(
                pub fn $or_null(&self) -> Option<$type> {
                    self.get_or_null().map(|number| number.$as())
                }

                pub fn $or_default(&self, default: $type) -> $type {
                    self.$or_null().unwrap_or(default)
                }
            )+
        }
    };
}

impl_nullable_number! {
    get_as_double_or_null, get_as_double_or_default => f64, as_f64;
    get_as_float_or_null, get_as_float_or_default => f32, as_f32;
    get_as_long_or_null, get_as_long_or_default => i64, as_i64;
    get_as_int_or_null, get_as_int_or_default => i32, as_i32;
    get_as_short_or_null, get_as_short_or_default => i16, as_i16;
    get_as_byte_or_null, get_as_byte_or_default => i8, as_i8;
}
