//! Embedded typed-record document store.
//!
//! Records are plain structs declared with [`record!`]. Each record type gets
//! a section in one ordered document tree; every record is a node in that
//! section and every field a child node carrying its text and a type tag.
//! The tree is kept in memory and written to a single file on save.
//!
//! ```
//! use docstore_core::{record, RecordStore, StoreConfig};
//!
//! record! {
//!     pub struct Member {
//!         pub first_name: String,
//!         pub balance: f64,
//!     }
//! }
//!
//! let mut store = RecordStore::new(StoreConfig::default());
//! store.register::<Member>()?;
//!
//! let mut member = Member::new();
//! member.first_name = "Marcin".to_string();
//! assert!(store.add(&member)?);
//!
//! let found = store.query::<Member, _>(|m| m.first_name == "Marcin")?;
//! assert_eq!(found, vec![member]);
//! # Ok::<(), docstore_core::StoreError>(())
//! ```

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod record;
pub mod schema;
pub mod store;
pub mod types;
pub mod version;
pub mod vocabulary;

pub use config::StoreConfig;
pub use document::Node;
pub use error::StoreError;
pub use record::Record;
pub use store::RecordStore;
pub use types::{FieldValue, TypeCoding};
pub use version::{CompatibilityVersion, VersionMismatch};
