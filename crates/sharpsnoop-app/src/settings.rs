//! Optional JSON settings file. Command-line flags take precedence.

use anyhow::{Context, Result};
use serde::Deserialize;
use sharpsnoop_core::{BitOrder, DisplayConfig, Layout};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub lines: Option<usize>,
    pub bits_per_line: Option<usize>,
    pub output_path: Option<PathBuf>,
    pub interval_ms: Option<u64>,
    pub bit_order: Option<BitOrder>,
    pub layout: Option<Layout>,
}

impl Settings {
    /// Reads `explicit` if given, else the per-user settings file when one exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match default_path() {
                Some(path) if path.is_file() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading settings {}", path.display()))?;
        let settings =
            serde_json::from_str(&text).with_context(|| format!("parsing settings {}", path.display()))?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Layers these settings over `base`.
    pub fn apply(self, mut base: DisplayConfig) -> DisplayConfig {
        if let Some(lines) = self.lines {
            base.lines = lines;
        }
        if let Some(bits) = self.bits_per_line {
            base.bits_per_line = bits;
        }
        if let Some(path) = self.output_path {
            base.output_path = path;
        }
        if let Some(ms) = self.interval_ms {
            base.emission_interval = Duration::from_millis(ms);
        }
        if let Some(order) = self.bit_order {
            base.bit_order = order;
        }
        if let Some(layout) = self.layout {
            base.layout = layout;
        }
        base
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sharpsnoop").join("settings.json"))
}
