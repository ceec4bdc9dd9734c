//! Settings file support
//!
//! Settings are read from `--config <path>` or from
//! `<config_dir>/powerplan-cli/config.toml`. Every field is optional; command
//! line flags override whatever the file says.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::services::coverage::TieBreak;

pub const DEFAULT_POWER_PLAN_COLUMN: &str = "POWERPLAN_DESCRIPTION";
pub const DEFAULT_CATALOG_CODE_COLUMN: &str = "CATALOG_CD";
pub const DEFAULT_PRIMARY_COLUMN: &str = "PRIMARY";
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "output.xlsx";
pub const DEFAULT_OUTPUT_SHEET_NAME: &str = "Assignments";

/// Tie-break rule as it appears in settings and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreakMode {
    /// Ascending by power plan name
    #[default]
    Lexicographic,
    /// Order in which power plans first appear in the input
    InputOrder,
}

impl From<TieBreakMode> for TieBreak {
    fn from(mode: TieBreakMode) -> Self {
        match mode {
            TieBreakMode::Lexicographic => TieBreak::Lexicographic,
            TieBreakMode::InputOrder => TieBreak::InputOrder,
        }
    }
}

/// Input header names
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    pub power_plan: String,
    pub catalog_code: String,
    pub primary: String,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            power_plan: DEFAULT_POWER_PLAN_COLUMN.to_string(),
            catalog_code: DEFAULT_CATALOG_CODE_COLUMN.to_string(),
            primary: DEFAULT_PRIMARY_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Sheet to read; the first sheet when unset
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub default_file_name: String,
    pub sheet_name: String,
    /// Add a "Summary" sheet to xlsx output
    pub summary_sheet: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            default_file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
            sheet_name: DEFAULT_OUTPUT_SHEET_NAME.to_string(),
            summary_sheet: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    pub tie_break: TieBreakMode,
}

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: ColumnSettings,
    pub input: InputSettings,
    pub output: OutputSettings,
    pub selection: SelectionSettings,
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid settings file")
    }

    /// Load settings from an explicit file. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Load settings from `explicit` if given, else from the default location if it exists,
    /// else fall back to defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::info!("Loading settings from {}", path.display());
            return Self::load_from_file(path);
        }

        match default_settings_path() {
            Some(path) if path.exists() => {
                log::info!("Loading settings from {}", path.display());
                Self::load_from_file(&path)
            }
            _ => {
                log::debug!("No settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Default settings location (~/.config/powerplan-cli/config.toml on Linux)
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("powerplan-cli").join("config.toml"))
}
