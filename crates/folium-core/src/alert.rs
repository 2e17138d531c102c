//! Blocking alerts for unrecoverable session failures.

use std::fmt;

use folium_types::error::FoliumError;

/// The only way out of a fatal alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    StopAndExit,
}

impl AlertAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::StopAndExit => "Stop & Exit",
        }
    }
}

/// A boot or runtime failure the user must acknowledge. The session is
/// already stopped when one of these is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalAlert {
    pub title: String,
    pub message: String,
    pub action: AlertAction,
}

impl FatalAlert {
    pub fn boot_failed(error: &FoliumError) -> Self {
        Self {
            title: "Could not start game".into(),
            message: error.to_string(),
            action: AlertAction::StopAndExit,
        }
    }

    pub fn emulation_failed(error: &FoliumError) -> Self {
        Self {
            title: "Emulation stopped".into(),
            message: error.to_string(),
            action: AlertAction::StopAndExit,
        }
    }
}

impl fmt::Display for FatalAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.title, self.message, self.action.label())
    }
}
