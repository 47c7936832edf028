// core/pose.rs

// Robot pose (x, y, heading) as reported by the driver. Heading is in degrees, the
// same convention as the sensor bearing tables, so the mapper can add the two
// directly before converting to radians.

// Dependencies
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use super::point::{Point, bearing_degrees};

/// Position and heading of the robot in world coordinates.
///
/// Equality is exact floating-point comparison of all three components; poses that
/// went through arithmetic should be compared with a tolerance instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// X position (world units)
    pub x: f64,
    /// Y position (world units)
    pub y: f64,
    /// Heading (degrees)
    pub heading: f64,
}

impl Pose {
    /// Creates a pose from position and heading
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Pose { x, y, heading }
    }

    /// Overwrites all three components
    pub fn set_pose(&mut self, x: f64, y: f64, heading: f64) {
        self.x = x;
        self.y = y;
        self.heading = heading;
    }

    /// Position part of the pose
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Heading converted to radians
    pub fn heading_radians(&self) -> f64 {
        self.heading.to_radians()
    }

    /// Euclidean distance between the two positions
    pub fn distance_to(&self, other: &Pose) -> f64 {
        self.position().distance_to(&other.position())
    }

    /// Bearing towards `other` in degrees within `[0, 360)`
    pub fn angle_to(&self, other: &Pose) -> f64 {
        bearing_degrees(other.x - self.x, other.y - self.y)
    }
}

impl Add for Pose {
    type Output = Pose;

    fn add(self, other: Pose) -> Pose {
        Pose::new(self.x + other.x, self.y + other.y, self.heading + other.heading)
    }
}

impl Sub for Pose {
    type Output = Pose;

    fn sub(self, other: Pose) -> Pose {
        Pose::new(self.x - other.x, self.y - other.y, self.heading - other.heading)
    }
}

impl AddAssign for Pose {
    fn add_assign(&mut self, other: Pose) {
        self.x += other.x;
        self.y += other.y;
        self.heading += other.heading;
    }
}

impl SubAssign for Pose {
    fn sub_assign(&mut self, other: Pose) {
        self.x -= other.x;
        self.y -= other.y;
        self.heading -= other.heading;
    }
}

// Partial order: `a < b` only when a is strictly below b on both axes. Poses that
// differ in one axis only (or only in heading) are incomparable.
impl PartialOrd for Pose {
    fn partial_cmp(&self, other: &Pose) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.x < other.x && self.y < other.y {
            Some(Ordering::Less)
        } else if self.x > other.x && self.y > other.y {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}
