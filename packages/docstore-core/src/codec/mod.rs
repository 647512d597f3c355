//! Text encoding of field values.
//!
//! Every field becomes one node named after the field with a `type`
//! attribute. Scalars, enums and optionals live in the node text.
//! Arrays and lists get one `index_{i}` child per element. Maps do the
//! same and put the entry key in the child's `key` attribute.
//!
//! Text is locale-independent: numbers use Rust's canonical formatting,
//! booleans are `true`/`false`, enums are written as their discriminant,
//! timestamps as `YYYY-MM-DDTHH:MM:SS[.fraction]`.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::document::Node;
use crate::schema::{Element, FieldShape, Primitive};
use crate::types::{EnumDescriptor, ScalarKind, Value};
use crate::vocabulary::{index_name, ATTR_KEY, ATTR_TYPE};

/// Timestamp text format, shared by encoding and decoding.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Errors turning values into text or text into values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("'{text}' is not a valid {type_name}: {reason}")]
    InvalidText {
        type_name: &'static str,
        text: String,
        reason: String,
    },

    #[error("'{text}' is not a variant of enum '{enum_name}'")]
    UnknownEnumValue {
        enum_name: &'static str,
        text: String,
    },

    #[error("Map entry '{entry}' has no key")]
    MissingKey { entry: String },

    #[error("Cannot encode a {got} value as {expected}")]
    ShapeMismatch {
        expected: &'static str,
        got: &'static str,
    },
}

/// Encodes one field into its node.
///
/// # Arguments
/// * `name` - Field name, used as the node name
/// * `shape` - Validated shape of the field
/// * `tag` - Type tag for the `type` attribute
/// * `value` - Current field value
pub fn encode_field(
    name: &str,
    shape: &FieldShape,
    tag: &str,
    value: &Value,
) -> Result<Node, CodecError> {
    let mut node = Node::new(name);
    node.set_attribute(ATTR_TYPE, tag);

    match (shape, value) {
        (FieldShape::Scalar(kind), value) => node.set_text(format_scalar(*kind, value)?),
        (FieldShape::Enum(descriptor), value) => node.set_text(format_enum(descriptor, value)?),
        (FieldShape::Optional(primitive), value) => {
            node.set_text(format_element(&Element::Optional(*primitive), value)?)
        }
        (
            FieldShape::Array { element, .. } | FieldShape::List(element),
            Value::Sequence(items),
        ) => {
            for (i, item) in items.iter().enumerate() {
                node.push(Node::with_text(index_name(i), format_element(element, item)?));
            }
        }
        (FieldShape::Map { key, value: element }, Value::Map(entries)) => {
            for (i, (entry_key, entry_value)) in entries.iter().enumerate() {
                let mut child = Node::with_text(index_name(i), format_element(element, entry_value)?);
                child.set_attribute(ATTR_KEY, format_primitive(key, entry_key)?);
                node.push(child);
            }
        }
        (shape, value) => {
            return Err(CodecError::ShapeMismatch {
                expected: shape.name(),
                got: value.kind_name(),
            })
        }
    }

    Ok(node)
}

/// Decodes a field node according to `shape`.
///
/// The node's `type` attribute is not checked here.
pub fn decode_field(shape: &FieldShape, node: &Node) -> Result<Value, CodecError> {
    match shape {
        FieldShape::Scalar(kind) => parse_scalar(*kind, node.text()),
        FieldShape::Enum(descriptor) => parse_enum(descriptor, node.text()),
        FieldShape::Optional(primitive) => parse_element(&Element::Optional(*primitive), node.text()),
        FieldShape::Array { element, .. } | FieldShape::List(element) => node
            .children()
            .iter()
            .map(|child| parse_element(element, child.text()))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        FieldShape::Map { key, value } => {
            let mut entries = Vec::with_capacity(node.children().len());
            for child in node.children() {
                let key_text = child.attribute(ATTR_KEY).ok_or_else(|| CodecError::MissingKey {
                    entry: child.name().to_string(),
                })?;
                entries.push((
                    parse_primitive(key, key_text)?,
                    parse_element(value, child.text())?,
                ));
            }
            Ok(Value::Map(entries))
        }
    }
}

fn format_element(element: &Element, value: &Value) -> Result<String, CodecError> {
    match (element, value) {
        (Element::Value(primitive), value) => format_primitive(primitive, value),
        (Element::Optional(_), Value::Optional(None)) => Ok(String::new()),
        (Element::Optional(primitive), Value::Optional(Some(inner))) => {
            format_primitive(primitive, inner)
        }
        (Element::Optional(_), other) => Err(CodecError::ShapeMismatch {
            expected: "optional",
            got: other.kind_name(),
        }),
    }
}

fn format_primitive(primitive: &Primitive, value: &Value) -> Result<String, CodecError> {
    match primitive {
        Primitive::Scalar(kind) => format_scalar(*kind, value),
        Primitive::Enum(descriptor) => format_enum(descriptor, value),
    }
}

fn format_scalar(kind: ScalarKind, value: &Value) -> Result<String, CodecError> {
    let text = match (kind, value) {
        (ScalarKind::Bool, Value::Bool(v)) => v.to_string(),
        (
            ScalarKind::I8 | ScalarKind::I16 | ScalarKind::I32 | ScalarKind::I64,
            Value::Int(v),
        ) => v.to_string(),
        (
            ScalarKind::U8 | ScalarKind::U16 | ScalarKind::U32 | ScalarKind::U64,
            Value::UInt(v),
        ) => v.to_string(),
        // Shortest text that reads back to the same f32.
        (ScalarKind::F32, Value::Float(v)) => (*v as f32).to_string(),
        (ScalarKind::F64, Value::Float(v)) => v.to_string(),
        (ScalarKind::Char, Value::Char(v)) => v.to_string(),
        (ScalarKind::String, Value::Text(v)) => v.clone(),
        (ScalarKind::Timestamp, Value::Timestamp(v)) => v.format(TIMESTAMP_FORMAT).to_string(),
        (kind, other) => {
            return Err(CodecError::ShapeMismatch {
                expected: kind.type_name(),
                got: other.kind_name(),
            })
        }
    };
    Ok(text)
}

fn format_enum(descriptor: &EnumDescriptor, value: &Value) -> Result<String, CodecError> {
    match value {
        Value::Enum(discriminant) => Ok(discriminant.to_string()),
        other => Err(CodecError::ShapeMismatch {
            expected: descriptor.name,
            got: other.kind_name(),
        }),
    }
}

fn parse_element(element: &Element, text: &str) -> Result<Value, CodecError> {
    match element {
        Element::Value(primitive) => parse_primitive(primitive, text),
        Element::Optional(_) if text.is_empty() => Ok(Value::Optional(None)),
        Element::Optional(primitive) => {
            parse_primitive(primitive, text).map(|v| Value::Optional(Some(Box::new(v))))
        }
    }
}

fn parse_primitive(primitive: &Primitive, text: &str) -> Result<Value, CodecError> {
    match primitive {
        Primitive::Scalar(kind) => parse_scalar(*kind, text),
        Primitive::Enum(descriptor) => parse_enum(descriptor, text),
    }
}

/// Parses scalar text. Empty text yields the kind's zero value.
fn parse_scalar(kind: ScalarKind, text: &str) -> Result<Value, CodecError> {
    if text.is_empty() {
        return Ok(zero_value(kind));
    }

    let value = match kind {
        ScalarKind::Bool => parse_bool(text)?,
        ScalarKind::I8 => Value::Int(parse_number::<i8>(kind, text)?.into()),
        ScalarKind::I16 => Value::Int(parse_number::<i16>(kind, text)?.into()),
        ScalarKind::I32 => Value::Int(parse_number::<i32>(kind, text)?.into()),
        ScalarKind::I64 => Value::Int(parse_number::<i64>(kind, text)?),
        ScalarKind::U8 => Value::UInt(parse_number::<u8>(kind, text)?.into()),
        ScalarKind::U16 => Value::UInt(parse_number::<u16>(kind, text)?.into()),
        ScalarKind::U32 => Value::UInt(parse_number::<u32>(kind, text)?.into()),
        ScalarKind::U64 => Value::UInt(parse_number::<u64>(kind, text)?),
        ScalarKind::F32 => Value::Float(parse_number::<f32>(kind, text)?.into()),
        ScalarKind::F64 => Value::Float(parse_number::<f64>(kind, text)?),
        ScalarKind::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Value::Char(c),
                _ => return Err(invalid_text(kind, text, "expected exactly one character")),
            }
        }
        ScalarKind::String => Value::Text(text.to_string()),
        ScalarKind::Timestamp => NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT)
            .map(Value::Timestamp)
            .map_err(|e| invalid_text(kind, text, e))?,
    };
    Ok(value)
}

fn zero_value(kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::Bool => Value::Bool(false),
        ScalarKind::I8 | ScalarKind::I16 | ScalarKind::I32 | ScalarKind::I64 => Value::Int(0),
        ScalarKind::U8 | ScalarKind::U16 | ScalarKind::U32 | ScalarKind::U64 => Value::UInt(0),
        ScalarKind::F32 | ScalarKind::F64 => Value::Float(0.0),
        ScalarKind::Char => Value::Char('\0'),
        ScalarKind::String => Value::Text(String::new()),
        ScalarKind::Timestamp => Value::Timestamp(NaiveDateTime::default()),
    }
}

fn parse_bool(text: &str) -> Result<Value, CodecError> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        Err(invalid_text(ScalarKind::Bool, text, "expected true or false"))
    }
}

fn parse_number<T>(kind: ScalarKind, text: &str) -> Result<T, CodecError>
where
    T: FromStr,
    T::Err: Display,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| invalid_text(kind, text, e))
}

/// Accepts a discriminant or a variant name.
fn parse_enum(descriptor: &EnumDescriptor, text: &str) -> Result<Value, CodecError> {
    let trimmed = text.trim();
    let discriminant = match trimmed.parse::<i64>() {
        Ok(value) if descriptor.has_discriminant(value) => Some(value),
        Ok(_) => None,
        Err(_) => descriptor.discriminant_of(trimmed),
    };
    discriminant
        .map(Value::Enum)
        .ok_or_else(|| CodecError::UnknownEnumValue {
            enum_name: descriptor.name,
            text: text.to_string(),
        })
}

fn invalid_text(kind: ScalarKind, text: &str, reason: impl Display) -> CodecError {
    CodecError::InvalidText {
        type_name: kind.type_name(),
        text: text.to_string(),
        reason: reason.to_string(),
    }
}
