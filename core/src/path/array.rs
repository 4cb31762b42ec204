use crate::{
    descriptor::Shape,
    error::*,
    path::{decode::type_mismatch, ElementPath, Locator},
    serializer::Serializer,
    value::{JsonKind, JsonValue},
};
use std::{collections::HashSet, hash::Hash, sync::Arc};

#[derive(Debug, Clone)]
enum Source<'a> {
    Actual(&'a [JsonValue]),
    /// Shape shared by every element.
    Dummy(Arc<Shape>),
}

/// Handle over a JSON array. Elements are visited in document order.
#[derive(Debug, Clone)]
pub struct ArrayPath<'a> {
    locator: Locator,
    source: Source<'a>,
}

impl<'a> ArrayPath<'a> {
    pub fn new(value: &'a JsonValue) -> Result<Self> {
        match value {
            JsonValue::Null => Err(Error::ConstructionFailure {
                locator: Locator::root(),
                found: "null",
            }),
            JsonValue::Array(values) => Ok(Self::actual(values, Locator::root())),
            other => Err(type_mismatch(JsonKind::Array, other, &Locator::root())),
        }
    }

    pub(crate) fn actual(values: &'a [JsonValue], locator: Locator) -> Self {
        Self {
            locator,
            source: Source::Actual(values),
        }
    }

    pub(crate) fn dummy(element: Arc<Shape>, locator: Locator) -> Self {
        Self {
            locator,
            source: Source::Dummy(element),
        }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self.source, Source::Dummy(_))
    }

    /// Dummy arrays pretend to hold a single element.
    pub fn len(&self) -> usize {
        match &self.source {
            Source::Actual(values) => values.len(),
            Source::Dummy(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path of the element at `index`; out of range gives an absent path.
    pub fn element(&self, index: usize) -> ElementPath<'a> {
        let locator = self.locator.index(index);
        match &self.source {
            Source::Actual(values) => ElementPath::actual(values.get(index), locator),
            Source::Dummy(shape) => ElementPath::dummy(shape.clone(), locator),
        }
    }

    pub fn elements(&self) -> Vec<ElementPath<'a>> {
        (0..self.len()).map(|index| self.element(index)).collect()
    }

    fn decode_all<T, C, F>(&self, decoder: F) -> Result<C>
    where
        C: FromIterator<T>,
        F: Fn(&ElementPath<'a>) -> Result<T>,
    {
        (0..self.len())
            .map(|index| decoder(&self.element(index)))
            .collect()
    }

    pub fn get_as_list<T, F>(&self, decoder: F) -> Result<Vec<T>>
    where
        F: Fn(&ElementPath<'a>) -> Result<T>,
    {
        self.decode_all(decoder)
    }

    pub fn get_as_list_with<T>(&self, serializer: &Serializer<T>) -> Result<Vec<T>> {
        self.decode_all(|element| element.get_as_serialized(serializer))
    }

    pub fn get_as_array<T, F>(&self, decoder: F) -> Result<Box<[T]>>
    where
        F: Fn(&ElementPath<'a>) -> Result<T>,
    {
        self.decode_all(decoder)
    }

    pub fn get_as_array_with<T>(&self, serializer: &Serializer<T>) -> Result<Box<[T]>> {
        self.decode_all(|element| element.get_as_serialized(serializer))
    }

    /// Duplicates collapse; the first failing element aborts the read.
    pub fn get_as_set<T, F>(&self, decoder: F) -> Result<HashSet<T>>
    where
        T: Eq + Hash,
        F: Fn(&ElementPath<'a>) -> Result<T>,
    {
        self.decode_all(decoder)
    }

    pub fn get_as_set_with<T>(&self, serializer: &Serializer<T>) -> Result<HashSet<T>>
    where
        T: Eq + Hash,
    {
        self.decode_all(|element| element.get_as_serialized(serializer))
    }
}
