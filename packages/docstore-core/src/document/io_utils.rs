//! File I/O for the document tree.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::Node;
use crate::error::StoreError;

/// Which side of persistence an I/O error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Load,
    Save,
}

/// Classifies I/O errors into specific StoreError variants.
pub fn classify_io_error(error: std::io::Error, path: &Path, operation: IoOperation) -> StoreError {
    let path = path.to_path_buf();
    match (operation, error.kind()) {
        (IoOperation::Load, ErrorKind::NotFound) => StoreError::MissingFile { path },
        (IoOperation::Load, _) => StoreError::LoadFailure {
            path,
            reason: error.to_string(),
        },
        (IoOperation::Save, ErrorKind::NotFound) => StoreError::InvalidPath { path },
        (IoOperation::Save, ErrorKind::StorageFull | ErrorKind::OutOfMemory) => StoreError::SaveFailure {
            path,
            reason: format!("disk full: {}", error),
        },
        (IoOperation::Save, _) => StoreError::SaveFailure {
            path,
            reason: error.to_string(),
        },
    }
}

/// Returns true for I/O errors that may succeed when the operation is repeated.
pub fn is_transient(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
    )
}

/// Retries an I/O operation that may fail with transient errors.
pub fn retry_io_operation<F, T>(
    mut operation: F,
    max_retries: u32,
    retry_delay_ms: u64,
    context: &str,
) -> std::io::Result<T>
where
    F: FnMut() -> std::io::Result<T>,
{
    let mut attempt = 0;
    loop {
        match operation() {
            Ok(result) => return Ok(result),
            Err(err) if is_transient(&err) && attempt < max_retries => {
                attempt += 1;
                tracing::warn!(
                    "Transient I/O error in {} (attempt {}/{}): {}",
                    context,
                    attempt,
                    max_retries,
                    err
                );
                if retry_delay_ms > 0 {
                    std::thread::sleep(std::time::Duration::from_millis(retry_delay_ms));
                }
            }
            Err(err) => return Err(err),
        }
    }
}

/// Loads a document tree from `path`.
///
/// # Arguments
/// * `path` - File to read
///
/// # Returns
/// The root node, `MissingFile` when the path is empty or does not name an
/// existing file, or `LoadFailure` when the contents cannot be read or parsed.
pub fn load_document(path: &Path) -> Result<Node, StoreError> {
    if path.as_os_str().is_empty() || !path.is_file() {
        return Err(StoreError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let contents =
        fs::read_to_string(path).map_err(|e| classify_io_error(e, path, IoOperation::Load))?;

    let root: Node = serde_json::from_str(&contents).map_err(|e| StoreError::LoadFailure {
        path: path.to_path_buf(),
        reason: format!("Failed to parse document: {}", e),
    })?;

    tracing::debug!(
        "Loaded document '{}' with {} top-level nodes",
        path.display(),
        root.children().len()
    );
    Ok(root)
}

/// Saves `root` to `path`, replacing any existing file.
///
/// The tree is written to a sibling temp file, synced and renamed over the
/// destination. A failed save leaves an existing destination untouched.
pub fn save_document(
    root: &Node,
    path: &Path,
    max_retries: u32,
    retry_delay_ms: u64,
) -> Result<(), StoreError> {
    check_destination(path)?;

    let json = serde_json::to_string_pretty(root).map_err(|e| StoreError::SaveFailure {
        path: path.to_path_buf(),
        reason: format!("Failed to serialize document: {}", e),
    })?;

    let temp_path = temp_path_for(path);
    let write_result = retry_io_operation(
        || {
            let mut file = File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()
        },
        max_retries,
        retry_delay_ms,
        "document write",
    );
    if let Err(e) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(classify_io_error(e, path, IoOperation::Save));
    }

    // Atomic rename
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(classify_io_error(e, path, IoOperation::Save));
    }

    tracing::info!("Saved document to '{}'", path.display());
    Ok(())
}

/// Rejects empty paths, directories, and new files whose directory does not exist.
fn check_destination(path: &Path) -> Result<(), StoreError> {
    let invalid = || StoreError::InvalidPath {
        path: path.to_path_buf(),
    };

    if path.as_os_str().is_empty() || path.is_dir() || path.file_name().is_none() {
        return Err(invalid());
    }
    if path.exists() {
        return Ok(());
    }
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() || parent.is_dir() => Ok(()),
        _ => Err(invalid()),
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
