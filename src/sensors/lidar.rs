// sensors/lidar.rs

// Wide-field scanner adapter. The reading count comes from the driver on every
// update, the buffer is reallocated to exactly that size and bulk filled. When the
// driver has nothing to offer the previous snapshot is kept and the failure reported.
// Bearings come from the configured calibration, not from the hardware.

// Dependencies
use log::{debug, warn};
use std::ops::Index;

use super::{INVALID_RANGE, RangeSensor};
use crate::driver::{RobotDriver, SharedDriver};
use crate::{LidarConfig, Result, RobomapError};

/// Adapter for the wide-field range scanner.
pub struct WideScanner<D: RobotDriver> {
    driver: SharedDriver<D>,
    calibration: LidarConfig,
    ranges: Vec<f32>,
}

impl<D: RobotDriver> WideScanner<D> {
    /// Creates the adapter with the reference calibration (-120° start, 0.36° step)
    pub fn new(driver: SharedDriver<D>) -> Self {
        Self::with_calibration(driver, LidarConfig::default())
    }

    /// Creates the adapter with an explicit angle calibration
    pub fn with_calibration(driver: SharedDriver<D>, calibration: LidarConfig) -> Self {
        WideScanner {
            driver,
            calibration,
            ranges: Vec::new(),
        }
    }

    /// Readings of the last successful update.
    ///
    /// The slice borrows the scanner, so it cannot be held across the next `update`.
    pub fn ranges(&self) -> &[f32] {
        &self.ranges
    }

    /// Angle calibration in use
    pub fn calibration(&self) -> &LidarConfig {
        &self.calibration
    }
}

impl<D: RobotDriver> RangeSensor for WideScanner<D> {
    fn update(&mut self) -> Result<()> {
        let driver = self.driver.borrow();
        let count = driver.wide_scan_count();
        if count == 0 {
            warn!(
                "Failed to retrieve wide scan data, keeping {} stale readings",
                self.ranges.len()
            );
            return Err(RobomapError::SensorUnavailable(self.sensor_type()));
        }

        // Fresh buffer every time; the old snapshot is dropped, never appended to
        let mut ranges = vec![0.0_f32; count];
        driver.read_wide_scan(&mut ranges);
        self.ranges = ranges;
        debug!("Wide scan refreshed: {} readings", count);
        Ok(())
    }

    fn range_count(&self) -> usize {
        self.ranges.len()
    }

    fn range(&self, index: usize) -> f64 {
        self.ranges.get(index).map_or(INVALID_RANGE, |&r| f64::from(r))
    }

    fn angle(&self, index: usize) -> f64 {
        self.calibration.angle(index)
    }

    fn sensor_type(&self) -> &'static str {
        "wide-scanner"
    }
}

impl<D: RobotDriver> Index<usize> for WideScanner<D> {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        const MISSING: f32 = INVALID_RANGE as f32;
        self.ranges.get(index).unwrap_or(&MISSING)
    }
}
