//! Persistent settings and their environment overrides.

use crate::layout::SheetLayout;
use dirs_next as dirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Overrides the sheet id stored in the settings file.
pub const SHEET_ID_ENV: &str = "PROGRAM_SHEET_ID";

/// User settings kept as JSON in the platform config directory.
///
/// Every field is optional in the file; missing ones take their defaults so
/// older files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub sheet_id: Option<String>,
    pub tabs: Vec<String>,
    pub timeout_secs: u64,
    pub layout: SheetLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sheet_id: None,
            tabs: vec!["4-Day Template".to_string()],
            timeout_secs: 10,
            layout: SheetLayout::default(),
        }
    }
}

impl Settings {
    const FILE: &'static str = "program_sheet_scraper.json";

    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Load the settings file, or defaults when it is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        let Ok(data) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str(&data) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Ignoring invalid settings in {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) -> std::io::Result<PathBuf> {
        let path = Self::path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory")
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Sheet id to fetch: command line first, then `PROGRAM_SHEET_ID`, then the
/// settings file.
pub fn resolve_sheet_id(cli: Option<&str>, settings: &Settings) -> Option<String> {
    let given = |id: &str| !id.trim().is_empty();
    cli.filter(|id| given(*id))
        .map(str::to_string)
        .or_else(|| std::env::var(SHEET_ID_ENV).ok().filter(|id| given(id.as_str())))
        .or_else(|| settings.sheet_id.clone().filter(|id| given(id.as_str())))
}
