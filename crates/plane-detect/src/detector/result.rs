use nalgebra::{Point3, UnitVector3};
use plane_detect_core::{CandidatePlane, PlaneResult};
use serde::{Deserialize, Serialize};

/// Plane reported for a frame, in either output variant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectedPlane {
    Raw(CandidatePlane),
    Refined(PlaneResult),
}

impl DetectedPlane {
    /// A point on the plane: the sampled anchor or the fitted centroid.
    pub fn point(&self) -> Point3<f64> {
        match self {
            DetectedPlane::Raw(c) => c.anchor,
            DetectedPlane::Refined(r) => r.point,
        }
    }

    pub fn normal(&self) -> UnitVector3<f64> {
        match self {
            DetectedPlane::Raw(c) => c.normal,
            DetectedPlane::Refined(r) => r.normal,
        }
    }

    /// Spread of the supporting points; only the refined variant has one.
    pub fn extent(&self) -> Option<f64> {
        match self {
            DetectedPlane::Raw(_) => None,
            DetectedPlane::Refined(r) => Some(r.extent),
        }
    }

    pub fn refined(&self) -> Option<&PlaneResult> {
        match self {
            DetectedPlane::Refined(r) => Some(r),
            DetectedPlane::Raw(_) => None,
        }
    }
}

/// Output of a successful detection pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneDetection {
    pub plane: DetectedPlane,
    /// The consensus hypothesis the plane was derived from.
    pub candidate: CandidatePlane,
    /// Cloud indices of the three points that produced `candidate`.
    pub sample: [usize; 3],
    /// Cloud indices of the points supporting `candidate`.
    pub inliers: Vec<usize>,
}

impl PlaneDetection {
    #[inline]
    pub fn inlier_count(&self) -> usize {
        self.inliers.len()
    }
}
