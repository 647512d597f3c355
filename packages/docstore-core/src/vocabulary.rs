//! Fixed node and attribute names shared by the write and read paths.

/// Name of the document root node.
pub const ROOT_NODE: &str = "DocumentStore";

/// Name of the node carrying the document's compatibility version.
pub const VERSION_NODE: &str = "DocumentVersion";

/// Attribute holding a record's identity.
pub const ATTR_ID: &str = "id";

/// Attribute holding a field's type tag.
pub const ATTR_TYPE: &str = "type";

/// Attribute holding a map entry's key.
pub const ATTR_KEY: &str = "key";

pub const ATTR_VERSION_MAJOR: &str = "Major";
pub const ATTR_VERSION_MINOR: &str = "Minor";
pub const ATTR_VERSION_RELEASE: &str = "Release";
pub const ATTR_VERSION_REVISION: &str = "Revision";

/// Version attributes in comparison order.
pub const VERSION_ATTRIBUTES: [&str; 4] = [
    ATTR_VERSION_MAJOR,
    ATTR_VERSION_MINOR,
    ATTR_VERSION_RELEASE,
    ATTR_VERSION_REVISION,
];

/// Prefix of the child nodes produced for list, array and map entries.
pub const INDEX_PREFIX: &str = "index_";

/// Returns the child node name for the entry at `index`.
pub fn index_name(index: usize) -> String {
    format!("{}{}", INDEX_PREFIX, index)
}

/// Node names that a record type may not use as its section name.
pub fn is_reserved_name(name: &str) -> bool {
    name == ROOT_NODE || name == VERSION_NODE
}
