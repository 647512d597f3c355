//! Conversion between records and record nodes.

use crate::codec;
use crate::document::Node;
use crate::error::StoreError;
use crate::record::Record;
use crate::schema::{FieldShape, FieldSpec, RecordSchema};
use crate::vocabulary::{ATTR_ID, ATTR_TYPE};

/// Builds the node for `record`: named after the type, identity in the
/// `id` attribute, one child per declared field in declaration order.
pub fn to_node<R: Record>(record: &R, schema: &RecordSchema) -> Result<Node, StoreError> {
    let mut node = Node::new(schema.type_name());
    node.set_attribute(ATTR_ID, record.id());

    for spec in schema.fields() {
        let value = record
            .read_field(spec.name)
            .ok_or_else(|| StoreError::InvalidSchema {
                type_name: schema.type_name().to_string(),
                reason: format!("declared field '{}' cannot be read", spec.name),
            })?;
        let child = codec::encode_field(spec.name, &spec.shape, &spec.tag, &value)
            .map_err(|e| conversion_error(schema, spec, format!("{:?}", value), e))?;
        node.push(child);
    }

    Ok(node)
}

/// Rebuilds a record from its node.
///
/// Children naming no declared field are skipped, as are children whose
/// type tag differs from the declared field's tag; both keep the field at
/// its default. Declared fields with no child also stay at their default.
pub fn from_node<R: Record>(node: &Node, schema: &RecordSchema) -> Result<R, StoreError> {
    let id = node.attribute(ATTR_ID).ok_or_else(|| StoreError::Conversion {
        record_type: schema.type_name().to_string(),
        field: ATTR_ID.to_string(),
        declared: "String".to_string(),
        raw: String::new(),
        reason: "record node has no identity".to_string(),
    })?;
    let mut record = R::with_id(id.to_string());

    for child in node.children() {
        let Some(spec) = schema.field(child.name()) else {
            tracing::trace!(
                "Skipping unknown field '{}' on '{}' {}",
                child.name(),
                schema.type_name(),
                id
            );
            continue;
        };

        if child.attribute(ATTR_TYPE) != Some(spec.tag.as_str()) {
            tracing::debug!(
                "Skipping field '{}' on '{}' {}: stored tag {:?}, declared {}",
                spec.name,
                schema.type_name(),
                id,
                child.attribute(ATTR_TYPE),
                spec.tag
            );
            continue;
        }

        let value = codec::decode_field(&spec.shape, child)
            .map_err(|e| conversion_error(schema, spec, raw_text(&spec.shape, child), e))?;
        record
            .write_field(spec.name, value)
            .map_err(|e| conversion_error(schema, spec, raw_text(&spec.shape, child), e))?;
    }

    Ok(record)
}

/// Text of a field node as written in the document.
fn raw_text(shape: &FieldShape, node: &Node) -> String {
    match shape {
        FieldShape::Array { .. } | FieldShape::List(_) | FieldShape::Map { .. } => node.inner_text(),
        _ => node.text().to_string(),
    }
}

fn conversion_error(
    schema: &RecordSchema,
    spec: &FieldSpec,
    raw: String,
    reason: impl std::fmt::Display,
) -> StoreError {
    StoreError::Conversion {
        record_type: schema.type_name().to_string(),
        field: spec.name.to_string(),
        declared: spec.declared.to_string(),
        raw,
        reason: reason.to_string(),
    }
}
