//! Declared field types and the dynamic values that flow between records and the codec.
//!
//! A record field's Rust type describes itself through [`FieldValue::type_desc`]
//! and converts to and from a [`Value`]. The codec only ever sees `Value`s.

mod builtin_types;
mod error;
pub mod type_tag;

use std::fmt;

use chrono::NaiveDateTime;

pub use error::ValueError;
pub use type_tag::{type_tag, TypeCoding};

/// Scalar kinds a field, container element or map key can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    String,
    Timestamp,
}

impl ScalarKind {
    /// Short type name, as written in source.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Char => "char",
            ScalarKind::String => "String",
            ScalarKind::Timestamp => "NaiveDateTime",
        }
    }

    /// Path-qualified type name.
    pub fn qualified_name(&self) -> &'static str {
        match self {
            ScalarKind::String => "alloc::string::String",
            ScalarKind::Timestamp => "chrono::NaiveDateTime",
            other => other.type_name(),
        }
    }
}

/// Static description of an enum usable as a field type.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: &'static str,
    pub module_path: &'static str,
    /// Variant names with their integer discriminants, in declaration order.
    pub variants: &'static [(&'static str, i64)],
}

impl EnumDescriptor {
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module_path, self.name)
    }

    pub fn has_discriminant(&self, value: i64) -> bool {
        self.variants.iter().any(|(_, v)| *v == value)
    }

    pub fn variant_name(&self, value: i64) -> Option<&'static str> {
        self.variants
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| *name)
    }

    pub fn discriminant_of(&self, name: &str) -> Option<i64> {
        self.variants
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }
}

/// The declared type of a record field.
///
/// Any nesting can be described; whether a description is storable is
/// decided by [`crate::schema::classify`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    Scalar(ScalarKind),
    Enum(&'static EnumDescriptor),
    Optional(Box<TypeDesc>),
    Array(Box<TypeDesc>, usize),
    List(Box<TypeDesc>),
    Map(Box<TypeDesc>, Box<TypeDesc>),
    /// Another record type, by name. Never storable as a field.
    Record(&'static str),
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&type_tag(self, TypeCoding::Qualified))
    }
}

/// A field value in transit between a record and the codec.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Text(String),
    Timestamp(NaiveDateTime),
    /// Enum discriminant.
    Enum(i64),
    Optional(Option<Box<Value>>),
    Sequence(Vec<Value>),
    /// Map entries in the order they were produced.
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "signed integer",
            Value::UInt(_) => "unsigned integer",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
            Value::Enum(_) => "enum",
            Value::Optional(_) => "optional",
            Value::Sequence(_) => "sequence",
            Value::Map(_) => "map",
        }
    }
}

/// A Rust type that can be stored in a record field.
pub trait FieldValue: Sized {
    /// The declared type this Rust type maps to.
    fn type_desc() -> TypeDesc;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ValueError>;
}

/// Defines a fieldless enum usable as a record field.
///
/// Every variant needs an explicit discriminant. The first variant is the
/// default. The enum gets `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
/// `PartialOrd` and `Ord` derived.
///
/// ```
/// docstore_core::record_enum! {
///     pub enum Priority {
///         Low = 0,
///         High = 10,
///     }
/// }
///
/// assert_eq!(Priority::default(), Priority::Low);
/// assert_eq!(Priority::descriptor().discriminant_of("High"), Some(10));
/// ```
#[macro_export]
macro_rules! record_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(#[$first_meta:meta])* $first:ident = $first_value:expr
            $(, $(#[$variant_meta:meta])* $variant:ident = $value:expr)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $(#[$first_meta])* $first = $first_value,
            $($(#[$variant_meta])* $variant = $value,)*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                $name::$first
            }
        }

        impl $name {
            /// Name, path and variants of this enum.
            pub fn descriptor() -> &'static $crate::types::EnumDescriptor {
                static DESCRIPTOR: $crate::types::EnumDescriptor = $crate::types::EnumDescriptor {
                    name: stringify!($name),
                    module_path: module_path!(),
                    variants: &[
                        (stringify!($first), ($first_value) as i64),
                        $((stringify!($variant), ($value) as i64),)*
                    ],
                };
                &DESCRIPTOR
            }
        }

        impl $crate::types::FieldValue for $name {
            fn type_desc() -> $crate::types::TypeDesc {
                $crate::types::TypeDesc::Enum(Self::descriptor())
            }

            fn to_value(&self) -> $crate::types::Value {
                $crate::types::Value::Enum(*self as i64)
            }

            fn from_value(
                value: $crate::types::Value,
            ) -> ::std::result::Result<Self, $crate::types::ValueError> {
                match value {
                    $crate::types::Value::Enum(discriminant) => {
                        if discriminant == ($first_value) as i64 {
                            return Ok($name::$first);
                        }
                        $(if discriminant == ($value) as i64 {
                            return Ok($name::$variant);
                        })*
                        Err($crate::types::ValueError::UnknownDiscriminant {
                            enum_name: stringify!($name),
                            value: discriminant,
                        })
                    }
                    other => Err($crate::types::ValueError::mismatch(stringify!($name), &other)),
                }
            }
        }
    };
}
