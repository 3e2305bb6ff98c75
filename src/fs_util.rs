use std::fs;
use std::io::{self, Write};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use tempfile::Builder;

use crate::error::DatasetError;

/// Resolves a response-file entry against the dataset directory.
///
/// Relative names are joined to `base_dir`. Rooted names keep their root but
/// inherit the volume prefix (`C:`) of `base_dir` when they have none; on
/// platforms without prefixes this is a no-op.
pub fn resolve_path(base_dir: &Utf8Path, file_name: &str) -> Utf8PathBuf {
    let path = Utf8Path::new(file_name.trim());
    if !path.has_root() {
        return base_dir.join(path);
    }
    match (base_dir.components().next(), path.components().next()) {
        (Some(Utf8Component::Prefix(prefix)), Some(Utf8Component::RootDir)) => {
            Utf8PathBuf::from(prefix.as_str()).join(path)
        }
        _ => path.to_path_buf(),
    }
}

/// Reads a dataset text file. Bytes that are not UTF-8 (Latin-1 headings and
/// comments from older tools) are replaced rather than rejected.
pub fn read_text(path: &Utf8Path) -> io::Result<String> {
    let bytes = fs::read(path.as_std_path())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes `content` to a temporary file next to `path`, then renames it into
/// place. The target is untouched unless the whole content was written.
pub fn write_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), DatasetError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs::create_dir_all(parent.as_std_path()).map_err(|err| DatasetError::Filesystem(err.to_string()))?;
    let mut temp = Builder::new()
        .prefix(".smdata-write")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| DatasetError::Filesystem(err.to_string()))?;
    temp.write_all(content)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|err| DatasetError::Filesystem(err.to_string()))?;
    temp.persist(path.as_std_path())
        .map_err(|err| DatasetError::Filesystem(err.error.to_string()))?;
    Ok(())
}
