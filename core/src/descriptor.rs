use crate::{
    error::Result,
    path::ObjectPath,
    serializer::Serializer,
    value::{JsonKind, JsonValue},
};
use serde::{Serialize, Serializer as SerdeSerializer};
use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

/// Schema tree derived from a [`Serializer`]: kind, optionality and, for
/// objects, the described members in the order they are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub kind: JsonKind,
    pub optional: bool,
    pub properties: Option<Vec<(String, Descriptor)>>,
}

impl Descriptor {
    pub fn new(kind: JsonKind) -> Self {
        Self {
            kind,
            optional: false,
            properties: match kind {
                JsonKind::Object => Some(Default::default()),
                _ => None,
            },
        }
    }

    pub fn object() -> Self {
        Self::new(JsonKind::Object)
    }

    pub fn optional(mut self, value: bool) -> Self {
        self.optional = value;
        self
    }

    pub fn property(mut self, name: impl ToString, descriptor: Descriptor) -> Self {
        let name = name.to_string();
        let properties = self.properties.get_or_insert_with(Default::default);
        if let Some((_, item)) = properties.iter_mut().find(|(n, _)| n == &name) {
            *item = descriptor;
        } else {
            properties.push((name, descriptor));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.properties
            .as_ref()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn to_json(&self) -> JsonValue {
        let result = JsonValue::object()
            .property("type", self.kind.name())
            .property("optional", self.optional);
        match &self.properties {
            Some(properties) => result.property(
                "properties",
                properties
                    .iter()
                    .fold(JsonValue::object(), |result, (name, descriptor)| {
                        result.property(name, descriptor.to_json())
                    }),
            ),
            None => result,
        }
    }

    /// Reads a rendered descriptor back, e.g. from a golden file.
    pub fn serializer() -> Serializer<Descriptor> {
        Serializer::object(Descriptor::to_json, |path: &ObjectPath| -> Result<Descriptor> {
            let properties = match path.get_object_nullable("properties")? {
                Some(properties) => Some(properties.collect(|member| {
                    member.get_as_serialized(&Descriptor::serializer())
                })?),
                None => None,
            };
            Ok(Descriptor {
                kind: path.get_enum::<JsonKind>("type")?,
                optional: path.get_bool("optional")?,
                properties,
            })
        })
    }
}

impl Serialize for Descriptor {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: SerdeSerializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_json().fmt(f)
    }
}

/// What the dummy driver learned about one value so far.
#[derive(Debug, Default)]
pub(crate) struct Shape {
    kind: Mutex<ShapeKind>,
    nullable: AtomicBool,
}

#[derive(Debug, Default)]
enum ShapeKind {
    #[default]
    Unknown,
    Scalar(JsonKind),
    Array(Arc<Shape>),
    Object(Vec<Property>),
}

#[derive(Debug)]
struct Property {
    name: String,
    optional: bool,
    shape: Arc<Shape>,
}

impl Shape {
    /// Read through an accessor that accepts null.
    pub(crate) fn mark_nullable(&self) {
        self.nullable.store(true, Ordering::Relaxed);
    }

    pub(crate) fn mark_scalar(&self, kind: JsonKind) {
        if let Ok(mut current) = self.kind.lock() {
            *current = ShapeKind::Scalar(kind);
        }
    }

    pub(crate) fn mark_object(&self) {
        if let Ok(mut current) = self.kind.lock() {
            if !matches!(*current, ShapeKind::Object(_)) {
                *current = ShapeKind::Object(Default::default());
            }
        }
    }

    /// Marks the value as an array and returns the shape of its elements.
    pub(crate) fn element(&self) -> Arc<Shape> {
        if let Ok(mut current) = self.kind.lock() {
            if let ShapeKind::Array(element) = &*current {
                return element.clone();
            }
            let element = Arc::new(Shape::default());
            *current = ShapeKind::Array(element.clone());
            return element;
        }
        Default::default()
    }

    /// Marks the value as an object and returns the shape of one member.
    /// Reading the same member again keeps its shape and updates optionality.
    pub(crate) fn property(&self, name: &str, optional: bool) -> Arc<Shape> {
        if let Ok(mut current) = self.kind.lock() {
            if !matches!(*current, ShapeKind::Object(_)) {
                *current = ShapeKind::Object(Default::default());
            }
            if let ShapeKind::Object(properties) = &mut *current {
                if let Some(property) = properties.iter_mut().find(|p| p.name == name) {
                    property.optional = optional;
                    return property.shape.clone();
                }
                let shape = Arc::new(Shape::default());
                properties.push(Property {
                    name: name.to_owned(),
                    optional,
                    shape: shape.clone(),
                });
                return shape;
            }
        }
        Default::default()
    }

    pub(crate) fn describe(&self, optional: bool) -> Descriptor {
        let optional = optional || self.nullable.load(Ordering::Relaxed);
        let Ok(current) = self.kind.lock() else {
            return Descriptor::object().optional(optional);
        };
        let descriptor = match &*current {
            // raw element access without interpretation
            ShapeKind::Unknown => Descriptor::object(),
            ShapeKind::Scalar(kind) => Descriptor::new(*kind),
            ShapeKind::Array(_) => Descriptor::new(JsonKind::Array),
            ShapeKind::Object(properties) => {
                properties
                    .iter()
                    .fold(Descriptor::object(), |result, property| {
                        result.property(&property.name, property.shape.describe(property.optional))
                    })
            }
        };
        descriptor.optional(optional)
    }
}
