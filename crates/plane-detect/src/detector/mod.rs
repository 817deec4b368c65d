//! Per-frame plane detection pipeline.
//!
//! This module wires together the finite-point filter, the consensus search
//! and (optionally) the least-squares refinement.

mod error;
mod params;
mod pipeline;
mod result;

pub use error::PlaneDetectError;
pub use params::{PlaneDetectorParams, PlaneOutput};
pub use pipeline::PlaneDetector;
pub use result::{DetectedPlane, PlaneDetection};
