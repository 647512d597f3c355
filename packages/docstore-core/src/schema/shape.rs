//! The field type grammar.
//!
//! ```text
//! field    := scalar | enum | Option<scalar|enum>
//!           | [element; N] | Vec<element> | Map<scalar|enum, element>
//! element  := scalar | enum | Option<scalar|enum>
//! ```
//!
//! Everything else is rejected.

use std::fmt;

use crate::types::{EnumDescriptor, ScalarKind, TypeDesc};

/// A scalar or an enum: the only things allowed at the leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Scalar(ScalarKind),
    Enum(&'static EnumDescriptor),
}

/// A container element: a primitive, optionally nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Value(Primitive),
    Optional(Primitive),
}

/// An accepted field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Scalar(ScalarKind),
    Enum(&'static EnumDescriptor),
    Optional(Primitive),
    Array { element: Element, len: usize },
    List(Element),
    Map { key: Primitive, value: Element },
}

impl FieldShape {
    pub fn name(&self) -> &'static str {
        match self {
            FieldShape::Scalar(_) => "scalar",
            FieldShape::Enum(_) => "enum",
            FieldShape::Optional(_) => "optional",
            FieldShape::Array { .. } => "array",
            FieldShape::List(_) => "list",
            FieldShape::Map { .. } => "map",
        }
    }
}

/// Why a declared type was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRejection {
    /// The rejected declared type.
    pub declared: String,
    /// The offending inner type, when the outer constructor itself is allowed.
    pub inner: Option<String>,
}

impl ShapeRejection {
    fn new(declared: &TypeDesc, inner: Option<&TypeDesc>) -> Self {
        Self {
            declared: declared.to_string(),
            inner: inner.map(TypeDesc::to_string),
        }
    }
}

impl fmt::Display for ShapeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported type {}", self.declared)?;
        if let Some(inner) = &self.inner {
            write!(f, " (inner type {} is not allowed here)", inner)?;
        }
        Ok(())
    }
}

/// Classifies a declared type against the grammar.
pub fn classify(desc: &TypeDesc) -> Result<FieldShape, ShapeRejection> {
    match desc {
        TypeDesc::Scalar(kind) => Ok(FieldShape::Scalar(*kind)),
        TypeDesc::Enum(descriptor) => Ok(FieldShape::Enum(*descriptor)),
        TypeDesc::Optional(inner) => optional_primitive(inner)
            .map(FieldShape::Optional)
            .ok_or_else(|| ShapeRejection::new(desc, Some(&**inner))),
        TypeDesc::Array(inner, len) => element(inner)
            .map(|element| FieldShape::Array { element, len: *len })
            .ok_or_else(|| ShapeRejection::new(desc, Some(&**inner))),
        TypeDesc::List(inner) => element(inner)
            .map(FieldShape::List)
            .ok_or_else(|| ShapeRejection::new(desc, Some(&**inner))),
        TypeDesc::Map(key, value) => {
            let key_shape = primitive(key).ok_or_else(|| ShapeRejection::new(desc, Some(&**key)))?;
            let value_shape =
                element(value).ok_or_else(|| ShapeRejection::new(desc, Some(&**value)))?;
            Ok(FieldShape::Map {
                key: key_shape,
                value: value_shape,
            })
        }
        TypeDesc::Record(_) => Err(ShapeRejection::new(desc, None)),
    }
}

fn primitive(desc: &TypeDesc) -> Option<Primitive> {
    match desc {
        TypeDesc::Scalar(kind) => Some(Primitive::Scalar(*kind)),
        TypeDesc::Enum(descriptor) => Some(Primitive::Enum(*descriptor)),
        _ => None,
    }
}

/// Optional strings are excluded: absent and empty share the empty text.
fn optional_primitive(desc: &TypeDesc) -> Option<Primitive> {
    match primitive(desc)? {
        Primitive::Scalar(ScalarKind::String) => None,
        other => Some(other),
    }
}

fn element(desc: &TypeDesc) -> Option<Element> {
    match desc {
        TypeDesc::Optional(inner) => optional_primitive(inner).map(Element::Optional),
        other => primitive(other).map(Element::Value),
    }
}
