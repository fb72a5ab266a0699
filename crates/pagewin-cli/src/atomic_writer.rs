use pagewin_core::PageResult;
use std::fs;
use std::path::Path;

/// Writes through a temp file in the target's directory, then renames it
/// over the target so a crash never leaves a half-written dataset.
pub struct AtomicWriter;

impl AtomicWriter {
    pub fn write_atomic(path: &Path, data: &[u8]) -> PageResult<()> {
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let temp_file = tempfile::NamedTempFile::new_in(parent)?;
        fs::write(temp_file.path(), data)?;
        temp_file.persist(path).map_err(|e| e.error)?;

        tracing::debug!(
            "Atomically wrote {} bytes to {}",
            data.len(),
            path.display()
        );
        Ok(())
    }

    pub fn read_all(path: &Path) -> PageResult<Vec<u8>> {
        let data = fs::read(path)?;
        tracing::debug!("Read {} bytes from {}", data.len(), path.display());
        Ok(data)
    }
}
