//! Skin discovery.
//!
//! Skins live one per folder anywhere below a content root. Each folder
//! holds an `info.json` (matched case-insensitively) plus the images it
//! references.

use std::path::{Path, PathBuf};

use folium_types::error::{FoliumError, Result};
use folium_types::CoreId;

use crate::document::Skin;

/// File name of a skin description, compared case-insensitively.
pub const SKIN_FILE_NAME: &str = "info.json";

/// A skin that failed to load during a scan.
#[derive(Debug)]
pub struct SkinLoadFailure {
    pub path: PathBuf,
    pub error: FoliumError,
}

/// The set of skins found under a content root.
#[derive(Debug, Default)]
pub struct SkinRepository {
    skins: Vec<Skin>,
    failures: Vec<SkinLoadFailure>,
}

impl SkinRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `root` recursively and replace the loaded set.
    ///
    /// A malformed or unreadable skin is logged and recorded in
    /// [`failures`](Self::failures); the scan continues. Only an unreadable
    /// root is an error.
    pub fn load_all(&mut self, root: &Path) -> Result<&[Skin]> {
        let mut files = Vec::new();
        let entries = std::fs::read_dir(root)
            .map_err(|e| FoliumError::Skin(format!("{}: {e}", root.display())))?;
        collect_skin_files(entries, &mut files);
        files.sort();

        self.skins.clear();
        self.failures.clear();
        for path in files {
            match Skin::from_file(&path) {
                Ok(skin) => {
                    log::debug!("Loaded skin '{}' for {}", skin.name, skin.core());
                    self.skins.push(skin);
                },
                Err(error) => {
                    log::warn!("Skipping skin: {error}");
                    self.failures.push(SkinLoadFailure { path, error });
                },
            }
        }
        log::info!(
            "Loaded {} skins from {} ({} skipped)",
            self.skins.len(),
            root.display(),
            self.failures.len()
        );
        Ok(&self.skins)
    }

    pub fn skins(&self) -> &[Skin] {
        &self.skins
    }

    /// Documents skipped by the last scan.
    pub fn failures(&self) -> &[SkinLoadFailure] {
        &self.failures
    }

    /// All skins targeting `core`, in scan order.
    pub fn skins_for_core(&self, core: CoreId) -> Vec<&Skin> {
        self.skins.iter().filter(|s| s.core() == core).collect()
    }

    /// Look a skin up by folder name.
    pub fn find(&self, name: &str) -> Option<&Skin> {
        self.skins.iter().find(|s| s.name == name)
    }
}

fn collect_skin_files(entries: std::fs::ReadDir, out: &mut Vec<PathBuf>) {
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            match std::fs::read_dir(&path) {
                Ok(sub) => collect_skin_files(sub, out),
                Err(e) => log::warn!("Cannot read {}: {e}", path.display()),
            }
        } else if entry
            .file_name()
            .to_string_lossy()
            .eq_ignore_ascii_case(SKIN_FILE_NAME)
        {
            out.push(path);
        }
    }
}
