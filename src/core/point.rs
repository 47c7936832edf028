// core/point.rs

// World-frame 2D point used by the occupancy grid and the mapper's projection step.
// Bearings are reported in degrees so they line up with the robot heading and the
// sensor angle tables.

// Dependencies
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::pose::Pose;

/// A point in world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (world units)
    pub x: f64,
    /// Y coordinate (world units)
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Overwrites the x coordinate
    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    /// Overwrites the y coordinate
    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    /// Overwrites both coordinates
    pub fn set_point(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }

    /// Bearing from this point to `other`, in degrees within `[0, 360)`.
    pub fn angle_to(&self, other: &Point) -> f64 {
        bearing_degrees(other.x - self.x, other.y - self.y)
    }

    /// Point as an nalgebra column vector
    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for Point {
    fn from(v: Vector2<f64>) -> Self {
        Point::new(v.x, v.y)
    }
}

// A point equals a pose when it sits on the pose's position; heading is ignored.
impl PartialEq<Pose> for Point {
    fn eq(&self, other: &Pose) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// atan2 bearing folded into `[0, 360)` degrees
pub(crate) fn bearing_degrees(dx: f64, dy: f64) -> f64 {
    let angle = dy.atan2(dx).to_degrees();
    if angle < 0.0 { angle + 360.0 } else { angle }
}
