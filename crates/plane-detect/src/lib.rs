//! Single-plane detection for sparse, noisy point clouds.
//!
//! The detector runs a RANSAC search over three-point plane hypotheses and,
//! by default, refines the winner with an ordinary least-squares fit over its
//! inliers. It is meant to be called once per sensor frame.
//!
//! ## Quickstart
//!
//! ```
//! use plane_detect::{PlaneDetector, PlaneDetectorParams};
//! use plane_detect::core::Point3;
//! use rand_chacha::ChaCha8Rng;
//!
//! let cloud: Vec<Point3<f64>> = (0..64)
//!     .map(|k| Point3::new((k % 8) as f64 * 0.1, (k / 8) as f64 * 0.1, 0.0))
//!     .collect();
//!
//! let mut detector = PlaneDetector::<ChaCha8Rng>::seeded(PlaneDetectorParams::default(), 7);
//! let detection = detector.detect(&cloud).expect("plane");
//! assert!(detection.plane.normal().z.abs() > 0.999);
//! assert!(detection.plane.extent().is_some());
//! ```
//!
//! ## API map
//! - `plane_detect::core`: geometric types (`CandidatePlane`, `PlaneResult`, ...).
//! - [`sampler`]: distinct-index triplet sampling from an owned random source.
//! - [`ransac`]: consensus search.
//! - [`refine`]: least-squares refinement.
//! - [`PlaneDetector`]: the per-frame pipeline.
//! - [`frame`]: latest-frame-wins hand-off for frame callbacks.
//! - [`io`]: JSON clouds, configs and reports.

pub use plane_detect_core as core;

mod detector;
pub mod frame;
pub mod io;
pub mod ransac;
pub mod refine;
pub mod sampler;

pub use detector::{DetectedPlane, PlaneDetectError, PlaneDetection, PlaneDetector};
pub use detector::{PlaneDetectorParams, PlaneOutput};
pub use frame::FrameSlot;
pub use ransac::{RansacOutcome, RansacParams};
pub use refine::RefineParams;
pub use sampler::TripletSampler;

pub use plane_detect_core::{CandidatePlane, PlaneResult};
