//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::ShapeRejection;
use crate::version::VersionMismatch;

/// Record store operation errors.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Record type cannot be used as a section at all
    #[error("Type '{type_name}' is not a valid record type: {reason}")]
    InvalidSchema { type_name: String, reason: String },

    /// Record type registered twice
    #[error("Type '{type_name}' already registered")]
    AlreadyRegistered { type_name: String },

    /// Field type outside the storable grammar
    #[error("Field '{field}' of type '{type_name}' has {rejection}")]
    InvalidFieldShape {
        type_name: String,
        field: String,
        rejection: ShapeRejection,
    },

    /// Read on a type that was never registered
    #[error("Type '{type_name}' not registered")]
    NotRegistered { type_name: String },

    /// Stored text cannot become the declared field type
    #[error("Cannot convert '{raw}' to {declared} for field '{field}' of '{record_type}': {reason}")]
    Conversion {
        record_type: String,
        field: String,
        declared: String,
        raw: String,
        reason: String,
    },

    /// Source file absent
    #[error("File '{}' not found", .path.display())]
    MissingFile { path: PathBuf },

    /// Source file unreadable or not a document
    #[error("Failed to load '{}': {reason}", .path.display())]
    LoadFailure { path: PathBuf, reason: String },

    /// Destination empty, a directory, or in a missing directory
    #[error("Invalid destination path '{}'", .path.display())]
    InvalidPath { path: PathBuf },

    /// Write or rename failed
    #[error("Failed to save '{}': {reason}", .path.display())]
    SaveFailure { path: PathBuf, reason: String },

    /// Document version outside the accepted range
    #[error(transparent)]
    VersionMismatch(#[from] VersionMismatch),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
