use std::path::Path;

/// Writes a file, creating its parent directories first
///
/// Existing files are overwritten, so re-running a mirror into the same directory
/// refreshes it in place.
pub async fn write_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}
