use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::domain::error::{AppError, Result};

fn io_err(msg: impl Into<String>) -> AppError {
    AppError::IoError(msg.into())
}

/// File names produced by one pipeline run inside the output directory
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn ensure(&self) -> Result<()> {
        ensure_dir(&self.root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn submission_path(&self) -> PathBuf {
        self.root.join("submission.csv")
    }

    pub fn probabilities_path(&self) -> PathBuf {
        self.root.join("probabilities.csv")
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join("report.json")
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| io_err(format!("Failed to create dir {}: {e}", path.display())))?;
    Ok(())
}

/// Write through a temp file and rename, so readers never see a half-written file
pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let tmp_path = path.with_extension(format!("tmp-{}", Uuid::new_v4()));
    {
        let mut file = fs::File::create(&tmp_path).map_err(|e| {
            io_err(format!(
                "Failed to create temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        file.write_all(bytes).map_err(|e| {
            io_err(format!(
                "Failed to write temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        file.sync_all().ok();
    }

    // On Windows rename cannot replace an existing file
    if path.exists() {
        fs::remove_file(path).map_err(|e| {
            io_err(format!(
                "Failed to replace existing file {}: {e}",
                path.display()
            ))
        })?;
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_err(format!(
            "Failed to rename temp file {} to {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })
}
