use super::types::SelectedFile;
use crate::config::IntakeConfig;
use crate::error::Result;
use ignore::Walk;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

impl SelectedFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let content = fs::read(path)?;
        Ok(Self::new(name, content))
    }
}

/// Turns picked or dropped paths into selected files. Files are taken as
/// given; directories are walked (respecting ignore files) and only entries
/// with an accepted extension are kept. Unreadable files are logged and
/// skipped.
pub fn collect_paths(paths: &[PathBuf], config: &IntakeConfig) -> Vec<SelectedFile> {
    let mut selected = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in Walk::new(path).flatten() {
                let entry_path = entry.path();
                if entry_path.is_file() && config.accepts(entry_path) {
                    push_file(&mut selected, entry_path);
                }
            }
        } else {
            push_file(&mut selected, path);
        }
    }

    selected
}

fn push_file(selected: &mut Vec<SelectedFile>, path: &Path) {
    match SelectedFile::from_path(path) {
        Ok(file) => {
            debug!("Selected {} ({} bytes)", file.name, file.size);
            selected.push(file);
        }
        Err(e) => warn!("Skipping {}: {}", path.display(), e),
    }
}
