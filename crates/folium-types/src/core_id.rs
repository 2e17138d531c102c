//! Identifiers for the external emulation cores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FoliumError;

/// One of the closed-box emulation cores Folium can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CoreId {
    /// Nintendo 3DS.
    Cytrus,
    /// Nintendo DS.
    Grape,
    /// Game Boy / Game Boy Color.
    Kiwi,
    /// PlayStation.
    Lychee,
    /// Super Nintendo.
    Mango,
    /// Nintendo Entertainment System.
    Peach,
    /// Game Boy Advance.
    Tomato,
}

impl CoreId {
    pub const ALL: [CoreId; 7] = [
        CoreId::Cytrus,
        CoreId::Grape,
        CoreId::Kiwi,
        CoreId::Lychee,
        CoreId::Mango,
        CoreId::Peach,
        CoreId::Tomato,
    ];

    /// Display name, also used as the per-core documents folder name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cytrus => "Cytrus",
            Self::Grape => "Grape",
            Self::Kiwi => "Kiwi",
            Self::Lychee => "Lychee",
            Self::Mango => "Mango",
            Self::Peach => "Peach",
            Self::Tomato => "Tomato",
        }
    }

    /// Lowercase file extensions (without the dot) this core can boot.
    pub fn rom_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Cytrus => &["3ds", "3dsx", "app", "cci", "cxi"],
            Self::Grape => &["nds", "gba"],
            Self::Kiwi => &["gb", "gbc"],
            Self::Lychee => &["cue", "iso"],
            Self::Mango => &["sfc", "smc"],
            Self::Peach => &["nes"],
            Self::Tomato => &["gba"],
        }
    }

    /// Native resolution of each screen the core renders, top screen first.
    pub fn native_screens(self) -> &'static [(u32, u32)] {
        match self {
            Self::Cytrus => &[(400, 240), (320, 240)],
            Self::Grape => &[(256, 192), (256, 192)],
            Self::Kiwi => &[(160, 144)],
            Self::Lychee => &[(320, 240)],
            Self::Mango => &[(256, 224)],
            Self::Peach => &[(256, 240)],
            Self::Tomato => &[(240, 160)],
        }
    }

    /// Whether `ext` is an extension this core accepts (case-insensitive).
    pub fn accepts_extension(self, ext: &str) -> bool {
        self.rom_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoreId {
    type Err = FoliumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoreId::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FoliumError::Skin(format!("unknown core '{s}'")))
    }
}

impl TryFrom<String> for CoreId {
    type Error = FoliumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CoreId> for String {
    fn from(value: CoreId) -> Self {
        value.name().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("cytrus".parse::<CoreId>().unwrap(), CoreId::Cytrus);
        assert_eq!("Tomato".parse::<CoreId>().unwrap(), CoreId::Tomato);
        assert_eq!(" PEACH ".parse::<CoreId>().unwrap(), CoreId::Peach);
    }

    #[test]
    fn parse_unknown_core_fails() {
        let err = "guava".parse::<CoreId>().unwrap_err();
        assert!(format!("{err}").contains("guava"));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&CoreId::Lychee).unwrap();
        assert_eq!(json, "\"lychee\"");
        let back: CoreId = serde_json::from_str("\"Lychee\"").unwrap();
        assert_eq!(back, CoreId::Lychee);
    }

    #[test]
    fn extensions_match_ignoring_case() {
        assert!(CoreId::Cytrus.accepts_extension("3DSX"));
        assert!(CoreId::Grape.accepts_extension("nds"));
        assert!(!CoreId::Peach.accepts_extension("gba"));
    }

    #[test]
    fn dual_screen_cores() {
        assert_eq!(CoreId::Cytrus.native_screens().len(), 2);
        assert_eq!(CoreId::Grape.native_screens().len(), 2);
        assert_eq!(CoreId::Peach.native_screens(), &[(256, 240)]);
    }

    #[test]
    fn all_names_round_trip() {
        for core in CoreId::ALL {
            assert_eq!(core.name().parse::<CoreId>().unwrap(), core);
        }
    }
}
