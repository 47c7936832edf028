//! Robomap - occupancy-grid mapping and proximity-guarded motion
//!
//! This library fuses a wide-field range scan and a pose estimate into a fixed-size
//! occupancy grid, persists that grid as plain text, and gates forward/backward motion
//! on a short-range proximity ring. All hardware access goes through the
//! [`driver::RobotDriver`] trait.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod core;
pub mod driver;
pub mod mapping;
pub mod navigation;
pub mod sensors;

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used items for easier access
pub use crate::core::{OccupancyGrid, Point, Pose, SafetyState};
pub use driver::{RobotDriver, SimulatedRobot};
pub use mapping::{GridMapper, MapUpdate};
pub use navigation::{MotionController, ProximityGuard};
pub use sensors::{ProximityRing, RangeSensor, WideScanner};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobomapConfig {
    /// Occupancy grid dimensions and scale
    pub grid: GridConfig,
    /// Wide-field scanner angle calibration
    pub lidar: LidarConfig,
    /// Proximity guard parameters
    pub guard: GuardConfig,
    /// Where the demo persists the grid
    pub map_path: String,
}

impl RobomapConfig {
    /// Loads a configuration from a YAML file; missing keys take their defaults
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config = serde_yaml::from_reader(file)?;
        Ok(config)
    }
}

/// Occupancy grid configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells along X
    pub number_x: usize,
    /// Cells along Y
    pub number_y: usize,
    /// World units per cell
    pub cell_size: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            number_x: 20,
            number_y: 20,
            cell_size: 1.0,
        }
    }
}

/// Wide-field scanner angle calibration, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LidarConfig {
    /// Bearing of reading 0 relative to the robot heading
    pub start_angle: f64,
    /// Bearing step between consecutive readings
    pub angle_increment: f64,
}

impl LidarConfig {
    /// Bearing of reading `index`
    pub fn angle(&self, index: usize) -> f64 {
        self.start_angle + index as f64 * self.angle_increment
    }

    /// Readings in a sweep symmetric about the heading, from `start_angle` to
    /// `-start_angle`. Zero for a degenerate calibration.
    pub fn beam_count(&self) -> usize {
        let span = -2.0 * self.start_angle;
        if !(span.is_finite() && span >= 0.0 && self.angle_increment > 0.0) {
            return 0;
        }
        (span / self.angle_increment).floor() as usize + 1
    }
}

impl Default for LidarConfig {
    fn default() -> Self {
        LidarConfig {
            start_angle: -120.0,
            angle_increment: 0.36,
        }
    }
}

/// Proximity guard configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Readings below this distance block motion
    pub safety_threshold: f64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            safety_threshold: navigation::DEFAULT_SAFETY_THRESHOLD,
        }
    }
}

impl Default for RobomapConfig {
    fn default() -> Self {
        RobomapConfig {
            grid: GridConfig::default(),
            lidar: LidarConfig::default(),
            guard: GuardConfig::default(),
            map_path: "map.txt".to_string(),
        }
    }
}

/// Robomap error types
#[derive(Error, Debug)]
pub enum RobomapError {
    /// World point outside the grid
    #[error("Point ({x}, {y}) is outside the grid")]
    OutOfBounds {
        /// World X
        x: f64,
        /// World Y
        y: f64,
    },

    /// Sensor could not be refreshed
    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(&'static str),

    /// Driver rejected a request
    #[error("Driver failure: {0}")]
    DriverFailure(String),

    /// Map file could not be opened for writing
    #[error("Unable to open map file {}: {source}", .path.display())]
    PersistOpen {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Writing a grid row failed
    #[error("Failed to write map file {}: {source}", .path.display())]
    PersistWrite {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Flushing or syncing the map file failed
    #[error("Failed to close map file {}: {source}", .path.display())]
    PersistFlush {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Token other than `0`/`1` in a map dump
    #[error("Invalid cell '{token}' on line {line}")]
    MapParse {
        /// 1-based line number
        line: usize,
        /// Offending token
        token: String,
    },

    /// Map dump has the wrong number of rows
    #[error("Map has {found} rows, expected {expected}")]
    RowCountMismatch {
        /// Rows in the grid
        expected: usize,
        /// Rows in the file
        found: usize,
    },

    /// Map dump row has the wrong number of cells
    #[error("Line {line} has {found} cells, expected {expected}")]
    ColumnCountMismatch {
        /// 1-based line number
        line: usize,
        /// Cells per grid row
        expected: usize,
        /// Cells on the line
        found: usize,
    },

    /// Invalid configuration file
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Other I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Robomap operations
pub type Result<T> = std::result::Result<T, RobomapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn default_config_matches_reference_values() {
        let config = RobomapConfig::default();
        assert_eq!(config.grid, GridConfig { number_x: 20, number_y: 20, cell_size: 1.0 });
        assert_eq!(config.lidar.start_angle, -120.0);
        assert_eq!(config.lidar.angle_increment, 0.36);
        assert_eq!(config.guard.safety_threshold, 0.5);
        assert_eq!(config.map_path, "map.txt");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "grid:\n  number_x: 8\nguard:\n  safety_threshold: 0.3").unwrap();

        let config = RobomapConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.grid.number_x, 8);
        assert_eq!(config.grid.number_y, 20);
        assert_eq!(config.guard.safety_threshold, 0.3);
        assert_eq!(config.lidar, LidarConfig::default());
    }

    #[test]
    fn bad_yaml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "grid: [1, 2").unwrap();
        assert!(matches!(RobomapConfig::from_yaml_file(file.path()), Err(RobomapError::Config(_))));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RobomapConfig::from_yaml_file(dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(RobomapError::Io(_))));
    }

    #[rstest]
    #[case(-120.0, 0.36, 667)]
    #[case(-90.0, 1.0, 181)]
    #[case(0.0, 1.0, 1)]
    #[case(-120.0, 0.0, 0)]
    #[case(30.0, 1.0, 0)]
    fn beam_count_covers_symmetric_sweep(#[case] start: f64, #[case] step: f64, #[case] expected: usize) {
        let lidar = LidarConfig { start_angle: start, angle_increment: step };
        assert_eq!(lidar.beam_count(), expected);
    }

    #[test]
    fn persistence_errors_name_the_file() {
        let err = RobomapError::PersistOpen {
            path: PathBuf::from("/nowhere/map.txt"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/nowhere/map.txt"));
    }
}
