//! Navigation layer for Robomap
//!
//! Motion control over the driver and the proximity guard that gates forward and
//! backward requests on the short-range ring.

pub mod controller;
pub mod guard;

use std::cell::RefCell;
use std::rc::Rc;

pub use controller::MotionController;
pub use guard::{DEFAULT_SAFETY_THRESHOLD, ProximityGuard};

/// Motion controller handle shared by the mapper and the guard
pub type SharedController<D> = Rc<RefCell<MotionController<D>>>;
