//! Display session configuration.

use crate::DisplayError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest accepted value for either display dimension.
pub const MAX_DIMENSION: usize = 2048;

/// Where the bits of a data byte land within its 8-pixel group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitOrder {
    /// Most significant bit on the lowest offset.
    #[default]
    Msb,
    /// Most significant bit on offset + 7.
    Lsb,
}

/// How line addresses map onto the saved raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Line address is the image x coordinate; the image is `lines` wide.
    #[default]
    Columns,
    /// Line address is the image y coordinate; the image is `lines` tall.
    Rows,
}

impl std::str::FromStr for BitOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "msb" | "msb-first" => Ok(Self::Msb),
            "lsb" | "lsb-first" => Ok(Self::Lsb),
            other => Err(format!("unknown bit order `{other}` (expected msb or lsb)")),
        }
    }
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "columns" => Ok(Self::Columns),
            "rows" => Ok(Self::Rows),
            other => Err(format!("unknown layout `{other}` (expected columns or rows)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub lines: usize,
    pub bits_per_line: usize,
    pub output_path: PathBuf,
    pub emission_interval: Duration,
    pub bit_order: BitOrder,
    pub layout: Layout,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            lines: 240,
            bits_per_line: 400,
            output_path: PathBuf::from("display.png"),
            emission_interval: Duration::from_millis(100),
            bit_order: BitOrder::Msb,
            layout: Layout::Columns,
        }
    }
}

impl DisplayConfig {
    pub fn new(lines: usize, bits_per_line: usize, output_path: impl Into<PathBuf>) -> Self {
        Self {
            lines,
            bits_per_line,
            output_path: output_path.into(),
            ..Default::default()
        }
    }

    pub fn with_interval_ms(mut self, millis: u64) -> Self {
        self.emission_interval = Duration::from_millis(millis);
        self
    }

    pub fn validate(&self) -> Result<(), DisplayError> {
        let in_range = |n: usize| (1..=MAX_DIMENSION).contains(&n);
        if !in_range(self.lines) || !in_range(self.bits_per_line) {
            return Err(DisplayError::InvalidDimensions {
                lines: self.lines,
                bits_per_line: self.bits_per_line,
                max: MAX_DIMENSION,
            });
        }
        validate_output_path(&self.output_path)
    }
}

fn validate_output_path(path: &Path) -> Result<(), DisplayError> {
    if path.as_os_str().is_empty() {
        return Err(DisplayError::EmptyOutputPath);
    }
    match image::ImageFormat::from_path(path) {
        Ok(format) if format.writing_enabled() => {}
        _ => return Err(DisplayError::UnsupportedFormat(path.to_path_buf())),
    }
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            Err(DisplayError::MissingOutputDir(dir.to_path_buf()))
        }
        _ => Ok(()),
    }
}
