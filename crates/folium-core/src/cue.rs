//! Cue sheets for disc images.
//!
//! Only the structure needed to find a disc's data files is kept: `FILE`
//! entries with their `TRACK`s and `INDEX` points. Anything malformed is
//! an error with the offending line; a guessed file name is never
//! substituted.

use std::fs;
use std::path::{Path, PathBuf};

use folium_types::error::{FoliumError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct CueSheet {
    pub files: Vec<CueFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CueFile {
    /// Resolved against the sheet's directory.
    pub path: PathBuf,
    /// `BINARY`, `WAVE`, `MOTOROLA`...
    pub file_type: String,
    pub tracks: Vec<CueTrack>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CueTrack {
    pub number: u8,
    /// `MODE2/2352`, `AUDIO`...
    pub mode: String,
    pub indices: Vec<(u8, Msf)>,
}

/// Minute/second/frame disc position, 75 frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msf {
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
}

impl Msf {
    pub fn to_frames(self) -> u32 {
        (self.minute as u32 * 60 + self.second as u32) * 75 + self.frame as u32
    }
}

impl CueSheet {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| FoliumError::Cue(format!("{}: {e}", path.display())))?;
        let base_dir = path.parent().unwrap_or(Path::new(""));
        Self::parse(&text, base_dir)
            .map_err(|e| FoliumError::Cue(format!("{}: {}", path.display(), strip_prefix(e))))
    }

    pub fn parse(text: &str, base_dir: &Path) -> Result<Self> {
        let mut files: Vec<CueFile> = Vec::new();

        for (lineno, line) in text.lines().enumerate() {
            let lineno = lineno + 1;
            let parts = split_line(line)
                .ok_or_else(|| cue_error(lineno, "unterminated quote"))?;
            let Some(command) = parts.first() else {
                continue;
            };

            match command.to_ascii_uppercase().as_str() {
                "FILE" => {
                    let name = parts
                        .get(1)
                        .filter(|n| !n.is_empty())
                        .ok_or_else(|| cue_error(lineno, "FILE without a file name"))?;
                    let file_type = parts
                        .get(2)
                        .ok_or_else(|| cue_error(lineno, "FILE without a type"))?;
                    files.push(CueFile {
                        path: base_dir.join(name),
                        file_type: file_type.to_ascii_uppercase(),
                        tracks: Vec::new(),
                    });
                },
                "TRACK" => {
                    let file = files
                        .last_mut()
                        .ok_or_else(|| cue_error(lineno, "TRACK before any FILE"))?;
                    let number = parts
                        .get(1)
                        .and_then(|n| n.parse().ok())
                        .ok_or_else(|| cue_error(lineno, "TRACK needs a number"))?;
                    let mode = parts
                        .get(2)
                        .ok_or_else(|| cue_error(lineno, "TRACK without a mode"))?;
                    file.tracks.push(CueTrack {
                        number,
                        mode: mode.to_ascii_uppercase(),
                        indices: Vec::new(),
                    });
                },
                "INDEX" => {
                    let track = files
                        .last_mut()
                        .and_then(|f| f.tracks.last_mut())
                        .ok_or_else(|| cue_error(lineno, "INDEX outside a TRACK"))?;
                    let number = parts
                        .get(1)
                        .and_then(|n| n.parse().ok())
                        .ok_or_else(|| cue_error(lineno, "INDEX needs a number"))?;
                    let msf = parts
                        .get(2)
                        .and_then(|t| parse_msf(t))
                        .ok_or_else(|| cue_error(lineno, "INDEX needs a mm:ss:ff position"))?;
                    track.indices.push((number, msf));
                },
                // REM, PERFORMER, TITLE, PREGAP, FLAGS, CATALOG...
                _ => {},
            }
        }

        if files.is_empty() {
            return Err(FoliumError::Cue("no FILE entries".into()));
        }
        Ok(Self { files })
    }

    /// Every data file the sheet references.
    pub fn referenced_paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }
}

fn cue_error(line: usize, what: &str) -> FoliumError {
    FoliumError::Cue(format!("line {line}: {what}"))
}

fn strip_prefix(e: FoliumError) -> String {
    match e {
        FoliumError::Cue(msg) => msg,
        other => other.to_string(),
    }
}

/// Split on whitespace, keeping quoted runs together. `None` when a quote
/// is left open.
fn split_line(line: &str) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in line.trim().chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            },
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    parts.push(std::mem::take(&mut current));
                    quoted = false;
                }
            },
            _ => current.push(c),
        }
    }
    if in_quotes {
        return None;
    }
    if !current.is_empty() || quoted {
        parts.push(current);
    }
    Some(parts)
}

fn parse_msf(s: &str) -> Option<Msf> {
    let mut it = s.split(':').map(|p| p.parse::<u8>().ok());
    let msf = Msf {
        minute: it.next()??,
        second: it.next()??,
        frame: it.next()??,
    };
    if it.next().is_some() || msf.second >= 60 || msf.frame >= 75 {
        return None;
    }
    Some(msf)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTI_TRACK: &str = r#"
REM GENRE Action
FILE "Game (Track 1).bin" BINARY
  TRACK 01 MODE2/2352
    INDEX 01 00:00:00
FILE "Game (Track 2).bin" BINARY
  TRACK 02 AUDIO
    INDEX 00 00:00:00
    INDEX 01 00:02:00
"#;

    #[test]
    fn parses_multi_file_sheet() {
        let sheet = CueSheet::parse(MULTI_TRACK, Path::new("/roms")).unwrap();
        assert_eq!(sheet.files.len(), 2);
        assert_eq!(sheet.files[0].path, PathBuf::from("/roms/Game (Track 1).bin"));
        assert_eq!(sheet.files[0].file_type, "BINARY");
        assert_eq!(sheet.files[0].tracks[0].mode, "MODE2/2352");
        let audio = &sheet.files[1].tracks[0];
        assert_eq!(audio.number, 2);
        assert_eq!(audio.indices[1].1.to_frames(), 150);
        assert_eq!(sheet.referenced_paths().count(), 2);
    }

    #[test]
    fn unquoted_names_and_lowercase_commands() {
        let text = "file game.bin binary\ntrack 1 mode1/2352\n";
        let sheet = CueSheet::parse(text, Path::new("")).unwrap();
        assert_eq!(sheet.files[0].path, PathBuf::from("game.bin"));
        assert_eq!(sheet.files[0].tracks[0].mode, "MODE1/2352");
    }

    #[test]
    fn sheet_without_files_is_an_error() {
        let err = CueSheet::parse("REM nothing here\n", Path::new("")).unwrap_err();
        assert!(matches!(err, FoliumError::Cue(_)));
        assert!(err.to_string().contains("no FILE entries"), "{err}");
    }

    #[test]
    fn unterminated_quote_names_the_line() {
        let err = CueSheet::parse("\nFILE \"broken.bin BINARY\n", Path::new("")).unwrap_err();
        assert!(err.to_string().contains("line 2: unterminated quote"), "{err}");
    }

    #[test]
    fn missing_file_name_is_not_guessed() {
        let err = CueSheet::parse("FILE\n", Path::new("")).unwrap_err();
        assert!(err.to_string().contains("FILE without a file name"), "{err}");
        let err = CueSheet::parse("FILE \"\" BINARY\n", Path::new("")).unwrap_err();
        assert!(err.to_string().contains("FILE without a file name"), "{err}");
    }

    #[test]
    fn bad_positions_are_rejected() {
        let text = "FILE a.bin BINARY\nTRACK 01 AUDIO\nINDEX 01 00:61:00\n";
        assert!(CueSheet::parse(text, Path::new("")).is_err());
        let text = "FILE a.bin BINARY\nINDEX 01 00:00:00\n";
        assert!(CueSheet::parse(text, Path::new("")).is_err());
    }

    #[test]
    fn from_file_resolves_against_sheet_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.cue");
        std::fs::write(&path, MULTI_TRACK).unwrap();
        let sheet = CueSheet::from_file(&path).unwrap();
        assert_eq!(sheet.files[0].path, dir.path().join("Game (Track 1).bin"));

        std::fs::write(&path, "").unwrap();
        let err = CueSheet::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("game.cue: no FILE entries"), "{err}");
    }
}
