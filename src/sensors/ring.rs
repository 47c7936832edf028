// sensors/ring.rs

// Short-range proximity ring: nine fixed slots spread evenly around the robot body.
// The buffer never changes size, each update just overwrites the nine readings.

// Dependencies
use log::debug;
use std::ops::Index;

use super::{INVALID_RANGE, RangeSensor};
use crate::Result;
use crate::driver::{PROXIMITY_SLOTS, RobotDriver, SharedDriver};

/// Angular spacing between two neighbouring ring slots (degrees)
pub const SLOT_SPACING: f64 = 360.0 / PROXIMITY_SLOTS as f64;

/// Fixed bearing of a ring slot in degrees, relative to the robot heading.
/// Slot 0 looks straight ahead.
pub fn slot_angle(slot: usize) -> f64 {
    slot as f64 * SLOT_SPACING
}

/// Adapter for the 9-slot proximity ring.
pub struct ProximityRing<D: RobotDriver> {
    driver: SharedDriver<D>,
    ranges: [f64; PROXIMITY_SLOTS],
}

impl<D: RobotDriver> ProximityRing<D> {
    /// Creates the adapter; readings start as [`INVALID_RANGE`] until the first update
    pub fn new(driver: SharedDriver<D>) -> Self {
        ProximityRing {
            driver,
            ranges: [INVALID_RANGE; PROXIMITY_SLOTS],
        }
    }

    /// Readings of the last update, slot order
    pub fn ranges(&self) -> &[f64; PROXIMITY_SLOTS] {
        &self.ranges
    }
}

impl<D: RobotDriver> RangeSensor for ProximityRing<D> {
    fn update(&mut self) -> Result<()> {
        let driver = self.driver.borrow();
        for (slot, range) in self.ranges.iter_mut().enumerate() {
            *range = driver.proximity_range(slot);
        }
        debug!("Proximity ring: {:?}", self.ranges);
        Ok(())
    }

    fn range_count(&self) -> usize {
        PROXIMITY_SLOTS
    }

    fn range(&self, index: usize) -> f64 {
        self.ranges.get(index).copied().unwrap_or(INVALID_RANGE)
    }

    fn angle(&self, index: usize) -> f64 {
        slot_angle(index)
    }

    fn sensor_type(&self) -> &'static str {
        "proximity-ring"
    }
}

impl<D: RobotDriver> Index<usize> for ProximityRing<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        self.ranges.get(index).unwrap_or(&INVALID_RANGE)
    }
}
