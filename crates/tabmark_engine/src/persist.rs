use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory unusable: {0}")]
    OutputDir(String),
    #[error("output path has no file name: {0}")]
    NoFileName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Atomically replace `path` with `content`, creating its parent directory.
///
/// The content goes to a temp file in the same directory which is then
/// renamed over the target, so readers never see a partial file.
pub fn write_output_file(path: &Path, content: &str) -> Result<PathBuf, PersistError> {
    if path.file_name().is_none() {
        return Err(PersistError::NoFileName(path.display().to_string()));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if dir.exists() {
        if !dir.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| PersistError::Io(e.error))?;
    Ok(path.to_path_buf())
}
