//! Core types and utilities for plane detection.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! know anything about sampling, consensus scoring or the sensor that
//! produced the points.

mod cloud;
mod logger;
mod plane;
mod rotation;

pub use cloud::FiniteCloud;
pub use plane::{CandidatePlane, PlaneResult};
pub use rotation::rotation_to_z;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_for_verbosity};

pub use nalgebra::{Point3, UnitVector3, Vector3};
