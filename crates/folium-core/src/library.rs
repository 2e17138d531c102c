//! Game discovery.
//!
//! Each core has a folder under the documents root named after it, with
//! games anywhere below `roms/` and save states in `states/`:
//!
//! ```text
//! Documents/
//!   Tomato/roms/Action/Game.gba
//!   Tomato/roms/Action/Game.png        icon
//!   Tomato/roms/Action/Game.gba.json   extended metadata
//!   Tomato/states/Game.1.state
//!   Lychee/roms/Disc.cue               references Disc.bin
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use folium_types::error::{FoliumError, Result};
use folium_types::CoreId;

use crate::cue::CueSheet;

const ICON_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Plain facts about a game file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    pub path: PathBuf,
    /// File name without extension.
    pub stem: String,
    /// Lowercased extension.
    pub extension: String,
    pub size: u64,
}

impl FileDetails {
    fn from_path(path: &Path) -> Result<Self> {
        let size = fs::metadata(path)?.len();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            stem,
            extension,
            size,
        })
    }
}

/// Optional details from a `<game file>.json` sidecar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtendedMetadata {
    pub title: Option<String>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u16>,
    pub region: Option<String>,
    pub serial: Option<String>,
    pub cheats: Vec<Cheat>,
}

/// A cheat code stored with the game's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Cheat {
    pub name: String,
    pub code: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveState {
    pub path: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameEntry {
    pub core: CoreId,
    pub file: FileDetails,
    /// Sidecar title, else the file stem.
    pub title: String,
    pub icon: Option<PathBuf>,
    pub metadata: Option<ExtendedMetadata>,
    pub save_states: Vec<SaveState>,
    /// Data files of a disc image, from its cue sheet.
    pub tracks: Vec<PathBuf>,
}

/// All games found under the documents root.
#[derive(Debug, Default)]
pub struct GameLibrary {
    games: Vec<GameEntry>,
}

impl GameLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescan `documents` and replace the list.
    ///
    /// A core without a folder simply has no games. Files that cannot be
    /// read or described are logged and left out.
    pub fn refresh(&mut self, documents: &Path) -> Result<&[GameEntry]> {
        if !documents.is_dir() {
            return Err(FoliumError::Library(format!(
                "{} is not a directory",
                documents.display()
            )));
        }

        let mut games = Vec::new();
        for core in CoreId::ALL {
            let core_dir = documents.join(core.name());
            let roms = core_dir.join("roms");
            if !roms.is_dir() {
                log::debug!("No games folder for {core} at {}", roms.display());
                continue;
            }
            let states = list_states(&core_dir.join("states"));
            games.extend(scan_core(core, &roms, &states));
        }
        games.sort_by(|a, b| a.file.path.cmp(&b.file.path));
        log::info!("Library: {} games under {}", games.len(), documents.display());
        self.games = games;
        Ok(&self.games)
    }

    pub fn games(&self) -> &[GameEntry] {
        &self.games
    }

    pub fn games_for_core(&self, core: CoreId) -> impl Iterator<Item = &GameEntry> {
        self.games.iter().filter(move |g| g.core == core)
    }

    pub fn find(&self, path: &Path) -> Option<&GameEntry> {
        self.games.iter().find(|g| g.file.path == path)
    }
}

fn scan_core(core: CoreId, roms: &Path, states: &[SaveState]) -> Vec<GameEntry> {
    let mut files = Vec::new();
    walk(roms, &mut files);
    files.retain(|p| {
        p.extension()
            .is_some_and(|e| core.accepts_extension(&e.to_string_lossy()))
    });

    // Disc images: parse cue sheets first so the files they reference are
    // not listed as games of their own.
    let mut sheets = Vec::new();
    let mut referenced = HashSet::new();
    for path in files.iter().filter(|p| has_extension(p, "cue")) {
        match CueSheet::from_file(path) {
            Ok(sheet) => {
                referenced.extend(sheet.referenced_paths().map(Path::to_path_buf));
                sheets.push((path.clone(), sheet));
            },
            Err(e) => log::warn!("Skipping disc image: {e}"),
        }
    }

    let mut entries = Vec::new();
    for path in files {
        if referenced.contains(&path) {
            continue;
        }
        let tracks = if has_extension(&path, "cue") {
            match sheets.iter().find(|(p, _)| *p == path) {
                Some((_, sheet)) => sheet.referenced_paths().map(Path::to_path_buf).collect(),
                None => continue,
            }
        } else {
            Vec::new()
        };
        match describe(core, &path, states, tracks) {
            Ok(entry) => entries.push(entry),
            Err(e) => log::warn!("Skipping {}: {e}", path.display()),
        }
    }
    entries
}

fn describe(
    core: CoreId,
    path: &Path,
    states: &[SaveState],
    tracks: Vec<PathBuf>,
) -> Result<GameEntry> {
    let file = FileDetails::from_path(path)?;
    let metadata = read_sidecar(path);
    let title = metadata
        .as_ref()
        .and_then(|m| m.title.clone())
        .unwrap_or_else(|| file.stem.clone());
    let icon = ICON_EXTENSIONS
        .iter()
        .map(|ext| path.with_extension(ext))
        .find(|p| p.is_file());
    let save_states = states
        .iter()
        .filter(|s| belongs_to(&s.name, &file.stem))
        .cloned()
        .collect();

    Ok(GameEntry {
        core,
        file,
        title,
        icon,
        metadata,
        save_states,
        tracks,
    })
}

/// `Game.gba` -> `Game.gba.json`. A broken sidecar is ignored, not fatal.
fn read_sidecar(path: &Path) -> Option<ExtendedMetadata> {
    let mut name = path.file_name()?.to_os_string();
    name.push(".json");
    let sidecar = path.with_file_name(name);
    let text = fs::read_to_string(&sidecar).ok()?;
    match serde_json::from_str(&text) {
        Ok(meta) => Some(meta),
        Err(e) => {
            log::warn!("Ignoring metadata {}: {e}", sidecar.display());
            None
        },
    }
}

/// `Game.1.state` belongs to `Game`, not to `Game 2` or `Gameboy`.
fn belongs_to(state: &str, stem: &str) -> bool {
    state
        .strip_prefix(stem)
        .is_some_and(|rest| rest.starts_with('.'))
}

fn list_states(dir: &Path) -> Vec<SaveState> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut states: Vec<SaveState> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .map(|e| SaveState {
            name: e.file_name().to_string_lossy().into_owned(),
            path: e.path(),
        })
        .collect();
    states.sort_by(|a, b| a.name.cmp(&b.name));
    states
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read {}: {e}", dir.display());
            return;
        },
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        match entry.file_type() {
            Ok(t) if t.is_dir() => walk(&path, out),
            Ok(t) if t.is_file() => out.push(path),
            _ => {},
        }
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
