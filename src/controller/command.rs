//! User actions understood by the controller

use crate::error::{RetroCamError, Result};
use crate::preset::FilterPreset;
use std::path::PathBuf;
use std::str::FromStr;

/// An action requested by the front-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraCommand {
    /// Switch the active preset
    SelectPreset(FilterPreset),
    /// Load a local file as the current film
    LoadImage(PathBuf),
    /// Go back to the default film
    ResetImage,
    /// Press the shutter button
    PressShutter,
    /// Save the developed print
    Save,
    /// Stop the event loop
    Shutdown,
}

impl FromStr for CameraCommand {
    type Err = RetroCamError;

    /// Parse a text command: `preset <id>`, `load <path>`, `reset`,
    /// `shutter`, `save` or `quit`
    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(v, r)| (v, r.trim()));

        match verb.to_ascii_lowercase().as_str() {
            "preset" | "mode" => Ok(Self::SelectPreset(rest.parse()?)),
            "load" if !rest.is_empty() => Ok(Self::LoadImage(PathBuf::from(rest))),
            "reset" => Ok(Self::ResetImage),
            "shutter" | "snap" => Ok(Self::PressShutter),
            "save" => Ok(Self::Save),
            "quit" | "exit" => Ok(Self::Shutdown),
            _ => Err(RetroCamError::UnknownCommand(line.to_string())),
        }
    }
}
