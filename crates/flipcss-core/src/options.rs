use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Writing direction a stylesheet is cleaned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Ltr => Direction::Rtl,
            Direction::Rtl => Direction::Ltr,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ltr" => Ok(Direction::Ltr),
            "rtl" => Ok(Direction::Rtl),
            other => Err(format!("unknown direction '{}', expected ltr or rtl", other)),
        }
    }
}

/// Switches for the flip pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlipOptions {
    /// Collect diagnostics for rewrites that may not mirror cleanly.
    pub warnings: bool,
    /// Swap `:before` and `:after`.
    pub swap_pseudo: bool,
    /// Mirror the words left/right inside `url()`.
    pub flip_urls: bool,
    /// Mirror the words left/right inside selectors.
    pub flip_selectors: bool,
}

impl Default for FlipOptions {
    fn default() -> Self {
        Self {
            warnings: false,
            swap_pseudo: false,
            flip_urls: true,
            flip_selectors: true,
        }
    }
}

/// A full transform request: optional cleaning followed by flipping.
///
/// Can be loaded from a JSON file:
///
/// ```json
/// { "direction": "rtl", "warnings": true, "flipUrls": false }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub direction: Option<Direction>,
    pub clean_only: bool,
    #[serde(flatten)]
    pub flip: FlipOptions,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&data).map_err(|e| Error::config(path, e.to_string()))
    }

    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}
