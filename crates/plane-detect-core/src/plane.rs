use nalgebra::{Point3, UnitVector3};
use serde::{Deserialize, Serialize};

/// Plane hypothesis `dot(normal, p - anchor) = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidatePlane {
    /// A point lying on the plane.
    pub anchor: Point3<f64>,
    /// Unit plane normal.
    pub normal: UnitVector3<f64>,
}

impl CandidatePlane {
    pub fn new(anchor: Point3<f64>, normal: UnitVector3<f64>) -> Self {
        Self { anchor, normal }
    }

    /// Signed offset `d` of the plane equation `dot(normal, p) = d`.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.normal.dot(&self.anchor.coords)
    }

    /// Perpendicular distance from `q` to the plane.
    #[inline]
    pub fn distance(&self, q: &Point3<f64>) -> f64 {
        (self.normal.dot(&q.coords) - self.offset()).abs()
    }

    /// Strict inlier test against `threshold`.
    #[inline]
    pub fn is_inlier(&self, q: &Point3<f64>, threshold: f64) -> bool {
        self.distance(q) < threshold
    }
}

/// Least-squares plane with a spread statistic.
///
/// `extent` is the root-mean-square distance of the supporting points to
/// `point`. It is a radius for sizing a visual marker, not a fit residual.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneResult {
    /// Centroid of the supporting points.
    pub point: Point3<f64>,
    pub normal: UnitVector3<f64>,
    pub extent: f64,
}
