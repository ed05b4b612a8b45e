//! Demo configuration
//!
//! The original demo hard-coded its parameters (image, kernel size, grid
//! dimensions, label text and anchor) per scenario; here they live in one
//! JSON-backed structure so a scenario is a file instead of an edit.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::filter::ChannelMask;
use crate::matrix::{DotShape, ShiftDirection};

/// Text stamped over the grid: the label and its anchor cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    pub text: String,
    pub col: i32,
    pub row: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Image to pixelate; None renders the built-in test card
    pub image: Option<PathBuf>,
    /// Kernel radius k; blocks are (2k+1) x (2k+1)
    pub kernel_radius: u32,
    /// Grid columns
    pub cols: u32,
    /// Grid rows
    pub rows: u32,
    pub dot_shape: DotShape,
    /// Foreground color for label glyphs, [r, g, b]
    pub dot_on_color: [u8; 3],
    /// Background fill behind label glyphs, [r, g, b]
    pub dot_off_color: [u8; 3],
    pub label: Option<LabelConfig>,
    pub shift: ShiftDirection,
    /// Minimum milliseconds between scroll steps
    pub shift_interval_ms: u64,
    pub channels: ChannelMask,
}

impl Default for Config {
    /// The classic demo setup: kernel radius 6 on a 100x85 panel of square
    /// dots, red label at (5, 75), scrolling left every 10 ms
    fn default() -> Self {
        Self {
            image: None,
            kernel_radius: 6,
            cols: 100,
            rows: 85,
            dot_shape: DotShape::Square,
            dot_on_color: [255, 0, 0],
            dot_off_color: [26, 26, 36],
            label: Some(LabelConfig {
                text: "@hansolo_".to_string(),
                col: 5,
                row: 75,
            }),
            shift: ShiftDirection::Left,
            shift_interval_ms: 10,
            channels: ChannelMask::ALL,
        }
    }
}

impl Config {
    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo_parameters() {
        let config = Config::default();
        assert_eq!(config.kernel_radius, 6);
        assert_eq!((config.cols, config.rows), (100, 85));
        let label = config.label.unwrap();
        assert_eq!(label.text, "@hansolo_");
        assert_eq!((label.col, label.row), (5, 75));
        assert_eq!(config.shift, ShiftDirection::Left);
        assert_eq!(config.shift_interval_ms, 10);
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config {
            image: Some(PathBuf::from("bird.jpg")),
            dot_shape: DotShape::Round,
            shift: ShiftDirection::Down,
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.image, config.image);
        assert_eq!(back.dot_shape, DotShape::Round);
        assert_eq!(back.shift, ShiftDirection::Down);
        assert_eq!(back.kernel_radius, config.kernel_radius);
    }
}
