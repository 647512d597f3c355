//! Type tags written next to every stored field.

use super::TypeDesc;

/// How much of a declared type goes into a field's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeCoding {
    /// Only the outermost type name, e.g. `Vec` or `i32`.
    #[default]
    Simple,
    /// The whole type with paths and generic arguments, e.g. `Vec<Option<i32>>`.
    Qualified,
}

/// Renders the tag for `desc` under `coding`.
///
/// The tag is compared verbatim on read; a stored field whose tag differs
/// from the one computed for the current declaration is ignored.
pub fn type_tag(desc: &TypeDesc, coding: TypeCoding) -> String {
    match coding {
        TypeCoding::Simple => simple_tag(desc).to_string(),
        TypeCoding::Qualified => qualified_tag(desc),
    }
}

fn simple_tag(desc: &TypeDesc) -> &'static str {
    match desc {
        TypeDesc::Scalar(kind) => kind.type_name(),
        TypeDesc::Enum(descriptor) => descriptor.name,
        TypeDesc::Optional(_) => "Option",
        TypeDesc::Array(..) => "Array",
        TypeDesc::List(_) => "Vec",
        TypeDesc::Map(..) => "Map",
        TypeDesc::Record(name) => *name,
    }
}

fn qualified_tag(desc: &TypeDesc) -> String {
    match desc {
        TypeDesc::Scalar(kind) => kind.qualified_name().to_string(),
        TypeDesc::Enum(descriptor) => descriptor.qualified_name(),
        TypeDesc::Optional(inner) => format!("Option<{}>", qualified_tag(inner)),
        TypeDesc::Array(inner, len) => format!("[{}; {}]", qualified_tag(inner), len),
        TypeDesc::List(inner) => format!("Vec<{}>", qualified_tag(inner)),
        TypeDesc::Map(key, value) => {
            format!("Map<{}, {}>", qualified_tag(key), qualified_tag(value))
        }
        TypeDesc::Record(name) => name.to_string(),
    }
}
