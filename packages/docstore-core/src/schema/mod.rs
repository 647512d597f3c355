//! Record schemas: the validated, cached view of a record type's fields.

mod shape;

use std::collections::HashSet;

pub use shape::{classify, Element, FieldShape, Primitive, ShapeRejection};

use crate::document::is_valid_name;
use crate::error::StoreError;
use crate::record::Record;
use crate::types::{type_tag, TypeCoding, TypeDesc};
use crate::vocabulary::{is_reserved_name, ATTR_ID};

/// One validated field of a record schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub declared: TypeDesc,
    pub shape: FieldShape,
    /// Tag written to and expected in the field node's type attribute.
    pub tag: String,
}

/// Validated field layout of one record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    type_name: &'static str,
    coding: TypeCoding,
    fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// Validates `R` and computes its field shapes and tags.
    ///
    /// # Arguments
    /// * `coding` - Tag rendering used for every field
    ///
    /// # Returns
    /// The schema, `InvalidSchema` when the type or a field name cannot be
    /// used as a node name, or `InvalidFieldShape` for the first field whose
    /// type falls outside the grammar.
    pub fn build<R: Record>(coding: TypeCoding) -> Result<Self, StoreError> {
        let type_name = R::TYPE_NAME;
        let invalid = |reason: String| StoreError::InvalidSchema {
            type_name: type_name.to_string(),
            reason,
        };

        if !is_valid_name(type_name) {
            return Err(invalid("type name is not a valid node name".to_string()));
        }
        if is_reserved_name(type_name) {
            return Err(invalid("type name is reserved".to_string()));
        }

        let decls = R::fields();
        let mut seen_names = HashSet::with_capacity(decls.len());
        let mut fields = Vec::with_capacity(decls.len());
        for decl in decls {
            if !is_valid_name(decl.name) {
                return Err(invalid(format!(
                    "field name '{}' is not a valid node name",
                    decl.name
                )));
            }
            if decl.name == ATTR_ID {
                return Err(invalid(format!("field name '{}' is reserved", decl.name)));
            }
            if !seen_names.insert(decl.name) {
                return Err(invalid(format!("duplicate field name '{}'", decl.name)));
            }

            let shape = classify(&decl.declared).map_err(|rejection| {
                StoreError::InvalidFieldShape {
                    type_name: type_name.to_string(),
                    field: decl.name.to_string(),
                    rejection,
                }
            })?;
            let tag = type_tag(&decl.declared, coding);

            fields.push(FieldSpec {
                name: decl.name,
                declared: decl.declared,
                shape,
                tag,
            });
        }

        tracing::trace!(
            "Built schema for '{}' with {} fields",
            type_name,
            fields.len()
        );

        Ok(Self {
            type_name,
            coding,
            fields,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn coding(&self) -> TypeCoding {
        self.coding
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
