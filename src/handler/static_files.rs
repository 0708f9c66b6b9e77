//! Static file loading module
//!
//! Resolves a request URL under the document root and reads the file whole.

use hyper::StatusCode;
use std::io;
use std::path::Path;
use tokio::fs;

/// Read the file a URL names under `document_root`
///
/// Fails with `PermissionDenied` when the resolved path leaves the document
/// root, `NotFound` for directories, and `InvalidData` when the file is
/// larger than `max_file_size` bytes.
pub async fn read_file(document_root: &str, url: &str, max_file_size: u64) -> io::Result<Vec<u8>> {
    let root = Path::new(document_root);
    let root_canonical = fs::canonicalize(root).await?;

    let relative = url.trim_start_matches('/');
    let file_canonical = fs::canonicalize(root.join(relative)).await?;

    if !file_canonical.starts_with(&root_canonical) {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("{url} resolves outside the document root"),
        ));
    }

    let metadata = fs::metadata(&file_canonical).await?;
    if metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{url} is a directory"),
        ));
    }
    if metadata.len() > max_file_size {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{url} is {} bytes, larger than the {max_file_size} byte limit",
                metadata.len()
            ),
        ));
    }

    fs::read(&file_canonical).await
}

/// Status reported for a file that could not be read
pub fn error_status(err: &io::Error) -> StatusCode {
    match err.kind() {
        io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
        io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
