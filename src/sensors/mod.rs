//! Range sensor adapters
//!
//! Two sensors share one contract ([`RangeSensor`]) but keep their own geometry:
//! the fixed 9-slot proximity ring and the variable-count wide-field scanner. Each
//! adapter owns its reading buffer and refreshes it from the driver on `update`.

pub mod lidar;
pub mod ring;

use crate::Result;

pub use lidar::WideScanner;
pub use ring::ProximityRing;

/// Sentinel returned for an index outside the current scan
pub const INVALID_RANGE: f64 = -1.0;

/// Extreme reading of a scan and where it was found.
///
/// For an empty scan `value` is [`INVALID_RANGE`] and `index` is `None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extremum {
    /// Reading value
    pub value: f64,
    /// Index of the first reading holding `value`
    pub index: Option<usize>,
}

impl Extremum {
    const EMPTY: Extremum = Extremum { value: INVALID_RANGE, index: None };
}

/// Capability interface implemented by every range sensor adapter.
pub trait RangeSensor {
    /// Pulls a fresh snapshot from the driver.
    ///
    /// On failure the previous readings stay in place and the error describes why.
    fn update(&mut self) -> Result<()>;

    /// Number of readings in the current snapshot
    fn range_count(&self) -> usize;

    /// Reading at `index`, or [`INVALID_RANGE`] when the index is out of range.
    ///
    /// Readings `<= 0` are invalid and must not be read as a zero distance.
    fn range(&self, index: usize) -> f64;

    /// Bearing of reading `index` in degrees, relative to the robot heading
    fn angle(&self, index: usize) -> f64;

    /// Short name used in logs
    fn sensor_type(&self) -> &'static str;

    /// Smallest reading; first occurrence wins on ties
    fn min_range(&self) -> Extremum {
        extremum(self, |candidate, best| candidate < best)
    }

    /// Largest reading; first occurrence wins on ties
    fn max_range(&self) -> Extremum {
        extremum(self, |candidate, best| candidate > best)
    }
}

fn extremum<S, F>(sensor: &S, better: F) -> Extremum
where
    S: RangeSensor + ?Sized,
    F: Fn(f64, f64) -> bool,
{
    (0..sensor.range_count()).fold(Extremum::EMPTY, |best, i| {
        let value = sensor.range(i);
        match best.index {
            Some(_) if !better(value, best.value) => best,
            _ => Extremum { value, index: Some(i) },
        }
    })
}
