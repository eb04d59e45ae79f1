//! Small helpers for log formatting and output directory checks.

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to the nearest
/// character boundary, since article text is full of `č`, `ć` and `š`) with
/// an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test with
/// a uniquely named temporary file that is removed again on drop. Existing
/// files in the directory are never opened.
///
/// # Arguments
///
/// * `path` - The directory to check; an empty path means the current directory
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be created or
/// a file cannot be created inside it.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> io::Result<()> {
    let dir = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    fs::create_dir_all(dir).await?;

    let scratch = tempfile::Builder::new()
        .prefix(".protest_digest-")
        .tempfile_in(dir)?;
    drop(scratch);
    info!(path = %dir.display(), "Output directory is writable");
    Ok(())
}
