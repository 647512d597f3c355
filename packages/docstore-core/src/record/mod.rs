//! Record types and their field access.
//!
//! A record is a plain struct with an identity and a list of typed fields.
//! The [`record!`](crate::record!) macro writes the [`Record`] impl; types
//! that need something unusual can implement it by hand.

pub mod serializer;

use uuid::Uuid;

use crate::types::{TypeDesc, Value, ValueError};

/// A named field together with its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub declared: TypeDesc,
}

impl FieldDecl {
    pub fn new(name: &'static str, declared: TypeDesc) -> Self {
        Self { name, declared }
    }
}

/// A storable record type.
pub trait Record: Sized {
    /// Section name, also the name of every record node.
    const TYPE_NAME: &'static str;

    /// Declared fields in declaration order, identity excluded.
    fn fields() -> Vec<FieldDecl>;

    /// A record with the given identity and every field at its default.
    fn with_id(id: String) -> Self;

    fn id(&self) -> &str;

    /// Current value of the named field, `None` if there is no such field.
    fn read_field(&self, name: &str) -> Option<Value>;

    /// Overwrites the named field.
    fn write_field(&mut self, name: &str, value: Value) -> Result<(), ValueError>;
}

/// Generates a fresh record identity: 32 lowercase hex digits.
pub fn new_identity() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Defines a record struct and its [`Record`] impl.
///
/// The struct gets a private `id` field, `new()` assigning a fresh
/// identity, `Default`, `Debug`, `Clone` and `PartialEq`. Every field type
/// must implement [`FieldValue`](crate::types::FieldValue) and `Default`.
///
/// ```
/// use docstore_core::record::Record;
///
/// docstore_core::record! {
///     pub struct Contact {
///         pub name: String,
///         pub phones: Vec<String>,
///     }
/// }
///
/// let contact = Contact::new();
/// assert_eq!(contact.id().len(), 32);
/// assert_eq!(Contact::TYPE_NAME, "Contact");
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$field_meta:meta])* $field_vis:vis $field:ident : $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            id: ::std::string::String,
            $($(#[$field_meta])* $field_vis $field: $ty,)*
        }

        impl $name {
            /// Creates a record with a fresh identity and default field values.
            pub fn new() -> Self {
                <Self as $crate::record::Record>::with_id($crate::record::new_identity())
            }

            pub fn id(&self) -> &str {
                &self.id
            }
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::record::Record for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn fields() -> ::std::vec::Vec<$crate::record::FieldDecl> {
                vec![
                    $($crate::record::FieldDecl::new(
                        stringify!($field),
                        <$ty as $crate::types::FieldValue>::type_desc(),
                    ),)*
                ]
            }

            fn with_id(id: ::std::string::String) -> Self {
                Self {
                    id,
                    $($field: ::std::default::Default::default(),)*
                }
            }

            fn id(&self) -> &str {
                &self.id
            }

            fn read_field(&self, name: &str) -> ::std::option::Option<$crate::types::Value> {
                match name {
                    $(stringify!($field) => Some($crate::types::FieldValue::to_value(&self.$field)),)*
                    _ => None,
                }
            }

            fn write_field(
                &mut self,
                name: &str,
                value: $crate::types::Value,
            ) -> ::std::result::Result<(), $crate::types::ValueError> {
                match name {
                    $(stringify!($field) => {
                        self.$field = <$ty as $crate::types::FieldValue>::from_value(value)?;
                        Ok(())
                    })*
                    _ => {
                        drop(value);
                        Err($crate::types::ValueError::UnknownField {
                            field: name.to_string(),
                        })
                    }
                }
            }
        }
    };
}
