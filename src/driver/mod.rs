//! Robot driver capability set
//!
//! The mapper and the guard never see a concrete robot. Everything they need from the
//! hardware goes through [`RobotDriver`]: session lifecycle, motion commands, the pose
//! estimate, the 9-slot proximity ring and the wide-field scanner.

pub mod sim;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::core::Pose;

pub use sim::{DriverCommand, Room, SimulatedRobot};

/// Number of slots on the short-range proximity ring
pub const PROXIMITY_SLOTS: usize = 9;

/// Driver handle shared by the motion controller and the sensor adapters.
///
/// Everything runs on one thread, so a `RefCell` is enough; no borrow is held across
/// calls.
pub type SharedDriver<D> = Rc<RefCell<D>>;

/// Wraps a driver (or a controller built on one) into a shared single-thread handle
pub fn shared<T>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

/// Motion direction understood by the driver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Straight ahead
    Forward,
    /// Straight back
    Backward,
    /// Left (strafe for `move_in`, counter-clockwise for `rotate`)
    Left,
    /// Right (strafe for `move_in`, clockwise for `rotate`)
    Right,
}

/// Capabilities consumed from the underlying robot driver.
#[cfg_attr(test, mockall::automock)]
pub trait RobotDriver {
    /// Opens the session with the robot
    fn connect(&mut self) -> Result<()>;

    /// Closes the session
    fn disconnect(&mut self);

    /// Starts a translation in `direction`
    fn move_in(&mut self, direction: Direction);

    /// Starts a rotation in `direction` (only `Left`/`Right` are meaningful)
    fn rotate(&mut self, direction: Direction);

    /// Stops any motion
    fn stop(&mut self);

    /// Current pose estimate; heading in degrees
    fn pose(&self) -> Pose;

    /// Single proximity reading for `slot` in `0..PROXIMITY_SLOTS`
    fn proximity_range(&self, slot: usize) -> f64;

    /// Number of readings the wide-field scanner currently holds; 0 on failure
    fn wide_scan_count(&self) -> usize;

    /// Bulk copy of the wide-field readings into `buffer`
    fn read_wide_scan(&self, buffer: &mut [f32]);
}
