//! The record store: one document tree, one section per record type.

use std::collections::HashMap;
use std::path::Path;

use crate::config::StoreConfig;
use crate::document::{self, Node};
use crate::error::{Result, StoreError};
use crate::record::{serializer, Record};
use crate::schema::RecordSchema;
use crate::version::{self, CompatibilityVersion};
use crate::vocabulary::{ATTR_ID, ROOT_NODE, VERSION_NODE};


/// Typed record store over a single document tree.
///
/// Reads (`get`, `get_all`, `query`) need the record type to be registered.
/// Writes (`add`, `update`, `remove`, `clear`) need its section to exist in
/// the document, and build the schema on the fly when the type was never
/// registered in this store instance.
#[derive(Debug)]
pub struct RecordStore {
    config: StoreConfig,
    root: Node,
    /// Registered schemas by record type name
    schemas: HashMap<&'static str, RecordSchema>,
}

impl RecordStore {
    /// Creates an empty store stamped with the configured current version.
    pub fn new(config: StoreConfig) -> Self {
        let mut root = Node::new(ROOT_NODE);
        version::write_version(&mut root, config.current_version);
        tracing::debug!("Created new store at version {}", config.current_version);
        Self {
            config,
            root,
            schemas: HashMap::new(),
        }
    }

    /// Opens a store from a document file.
    ///
    /// # Arguments
    /// * `path` - Document file to load
    /// * `config` - Store configuration, including the accepted version range
    ///
    /// # Returns
    /// The store, or `MissingFile`/`LoadFailure` from loading, or
    /// `VersionMismatch` when the stored version is out of range.
    pub fn open(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        let path = path.as_ref();
        let root = document::load_document(path)?;
        let store = Self::from_document(root, config)?;
        tracing::info!(
            "Opened store '{}' at version {}",
            path.display(),
            store
                .file_version()
                .map(|v| v.to_string())
                .unwrap_or_default()
        );
        Ok(store)
    }

    /// Wraps an already loaded document tree, applying the version gate.
    pub fn from_document(root: Node, config: StoreConfig) -> Result<Self> {
        let stored = version::read_version(&root);
        if let Err(mismatch) =
            version::check_version(stored, config.current_version, config.minimum_version)
        {
            tracing::warn!("Rejected document: {}", mismatch);
            return Err(mismatch.into());
        }
        Ok(Self {
            config,
            root,
            schemas: HashMap::new(),
        })
    }

    /// Registers a record type, creating its section if the document lacks one.
    ///
    /// # Returns
    /// `InvalidSchema` or `InvalidFieldShape` when the type fails validation,
    /// `AlreadyRegistered` when it was registered before.
    pub fn register<R: Record>(&mut self) -> Result<()> {
        let schema = RecordSchema::build::<R>(self.config.type_coding)?;
        if self.schemas.contains_key(R::TYPE_NAME) {
            return Err(StoreError::AlreadyRegistered {
                type_name: R::TYPE_NAME.to_string(),
            });
        }

        if self.section(R::TYPE_NAME).is_none() {
            self.root.push(Node::new(R::TYPE_NAME));
            tracing::debug!("Created section '{}'", R::TYPE_NAME);
        }
        self.schemas.insert(R::TYPE_NAME, schema);
        tracing::debug!("Registered record type '{}'", R::TYPE_NAME);
        Ok(())
    }

    /// Whether the document has a section for `R`.
    pub fn has_section<R: Record>(&self) -> bool {
        self.section(R::TYPE_NAME).is_some()
    }

    /// Whether `R` was registered on this store.
    pub fn is_registered<R: Record>(&self) -> bool {
        self.schemas.contains_key(R::TYPE_NAME)
    }

    /// Whether `R` is registered and its section holds a record with `id`.
    pub fn contains<R: Record>(&self, id: &str) -> bool {
        self.is_registered::<R>() && self.section_holds(R::TYPE_NAME, id)
    }

    /// Appends `record` to its section.
    ///
    /// Returns `false` without changing anything when the identity is empty,
    /// the section is missing, or it already holds a record with the same
    /// identity.
    pub fn add<R: Record>(&mut self, record: &R) -> Result<bool> {
        if record.id().is_empty()
            || !self.has_section::<R>()
            || self.section_holds(R::TYPE_NAME, record.id())
        {
            return Ok(false);
        }

        let node = self.serialize(record)?;
        Ok(self.push_record(R::TYPE_NAME, node))
    }

    /// Fetches the record with `id`.
    ///
    /// An empty `id`, a missing section or an unknown identity yield `None`.
    pub fn get<R: Record>(&self, id: &str) -> Result<Option<R>> {
        let schema = self.registered::<R>()?;
        if id.is_empty() {
            return Ok(None);
        }

        self.section(R::TYPE_NAME)
            .and_then(|section| find_record(section, id))
            .map(|node| serializer::from_node(node, schema))
            .transpose()
    }

    /// Every record of type `R`, in document order.
    pub fn get_all<R: Record>(&self) -> Result<Vec<R>> {
        self.query(|_: &R| true)
    }

    /// Every record of type `R` matching `predicate`, in document order.
    ///
    /// All records are reconstructed before filtering, so a record that fails
    /// conversion fails the whole query.
    pub fn query<R, F>(&self, mut predicate: F) -> Result<Vec<R>>
    where
        R: Record,
        F: FnMut(&R) -> bool,
    {
        let schema = self.registered::<R>()?;
        let Some(section) = self.section(R::TYPE_NAME) else {
            return Ok(Vec::new());
        };

        let mut matches = Vec::new();
        for node in section.children() {
            let record: R = serializer::from_node(node, schema)?;
            if predicate(&record) {
                matches.push(record);
            }
        }
        Ok(matches)
    }

    /// Replaces the stored record sharing `record`'s identity.
    ///
    /// Every record node with that identity is removed and one new node is
    /// appended at the end of the section. Returns `false` without changing
    /// anything when the section is missing or holds no such record.
    pub fn update<R: Record>(&mut self, record: &R) -> Result<bool> {
        if !self.section_holds(R::TYPE_NAME, record.id()) {
            return Ok(false);
        }

        let node = self.serialize(record)?;
        let id = record.id();
        let Some(section) = self.section_mut(R::TYPE_NAME) else {
            return Ok(false);
        };
        let removed = section.remove_children_where(|n| n.attribute(ATTR_ID) == Some(id));
        section.push(node);
        if removed > 1 {
            tracing::warn!(
                "Collapsed {} duplicate '{}' records with identity {}",
                removed,
                R::TYPE_NAME,
                id
            );
        }
        Ok(true)
    }

    /// Removes every record sharing `record`'s identity.
    ///
    /// Returns whether anything was removed.
    pub fn remove<R: Record>(&mut self, record: &R) -> bool {
        let id = record.id();
        if id.is_empty() {
            return false;
        }
        self.section_mut(R::TYPE_NAME)
            .map_or(0, |section| {
                section.remove_children_where(|n| n.attribute(ATTR_ID) == Some(id))
            })
            > 0
    }

    /// Removes all records of type `R`, keeping the empty section.
    ///
    /// Returns the number of removed records.
    pub fn clear<R: Record>(&mut self) -> usize {
        let removed = self
            .section_mut(R::TYPE_NAME)
            .map_or(0, Node::clear_children);
        tracing::debug!("Cleared {} records from '{}'", removed, R::TYPE_NAME);
        removed
    }

    /// Removes the records of every section. The version marker and the
    /// sections themselves stay.
    ///
    /// Returns the total number of removed records.
    pub fn clear_all(&mut self) -> usize {
        let removed: usize = self
            .root
            .children_mut()
            .filter(|section| section.name() != VERSION_NODE)
            .map(Node::clear_children)
            .sum();
        tracing::debug!("Cleared {} records from all sections", removed);
        removed
    }

    /// Writes the document to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        document::save_document(
            &self.root,
            path.as_ref(),
            self.config.io_max_retries,
            self.config.io_retry_delay_ms,
        )
    }

    /// Version recorded in the document, if readable.
    pub fn file_version(&self) -> Option<CompatibilityVersion> {
        version::read_version(&self.root)
    }

    pub fn current_version(&self) -> CompatibilityVersion {
        self.config.current_version
    }

    pub fn minimum_version(&self) -> CompatibilityVersion {
        self.config.minimum_version
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The underlying document tree.
    pub fn document(&self) -> &Node {
        &self.root
    }

    fn section(&self, type_name: &str) -> Option<&Node> {
        if type_name == VERSION_NODE {
            return None;
        }
        self.root.child(type_name)
    }

    fn section_mut(&mut self, type_name: &str) -> Option<&mut Node> {
        if type_name == VERSION_NODE {
            return None;
        }
        self.root.child_mut(type_name)
    }

    fn section_holds(&self, type_name: &str, id: &str) -> bool {
        !id.is_empty()
            && self
                .section(type_name)
                .map_or(false, |section| find_record(section, id).is_some())
    }

    fn registered<R: Record>(&self) -> Result<&RecordSchema> {
        self.schemas
            .get(R::TYPE_NAME)
            .ok_or_else(|| StoreError::NotRegistered {
                type_name: R::TYPE_NAME.to_string(),
            })
    }

    /// Serializes with the registered schema, or a freshly built one.
    fn serialize<R: Record>(&self, record: &R) -> Result<Node> {
        match self.schemas.get(R::TYPE_NAME) {
            Some(schema) => serializer::to_node(record, schema),
            None => {
                let schema = RecordSchema::build::<R>(self.config.type_coding)?;
                serializer::to_node(record, &schema)
            }
        }
    }

    fn push_record(&mut self, type_name: &str, node: Node) -> bool {
        match self.section_mut(type_name) {
            Some(section) => {
                section.push(node);
                true
            }
            None => false,
        }
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

fn find_record<'a>(section: &'a Node, id: &str) -> Option<&'a Node> {
    section
        .children()
        .iter()
        .find(|node| node.attribute(ATTR_ID) == Some(id))
}
