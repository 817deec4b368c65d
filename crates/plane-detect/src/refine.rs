//! Ordinary least-squares refinement of a consensus plane.
//!
//! The inliers are rotated so that the coarse normal becomes `+Z`, where the
//! plane is well described as a height field `z = a*x + b*y + c`. The normal
//! equations of that fit form a symmetric 3x3 system:
//!
//! ```text
//! [Sxx Sxy Sx] [a]   [Sxz]
//! [Sxy Syy Sy] [b] = [Syz]
//! [Sx  Sy  n ] [c]   [Sz ]
//! ```
//!
//! Coordinates are divided by the RMS distance of the inliers to the anchor
//! first, so the conditioning test sees the same matrix for a cloud and any
//! uniformly scaled copy of it. The slopes `a` and `b` are unaffected by that
//! scaling. The centroid and the normal `(a, b, -1)` are then mapped back.

use log::debug;
use nalgebra::{Matrix3, Point3, UnitVector3, Vector3};
use plane_detect_core::{rotation_to_z, PlaneResult};
use serde::{Deserialize, Serialize};

use crate::PlaneDetectError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Parameters of the least-squares refinement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineParams {
    /// Fewer supporting points than this cannot define a plane.
    pub min_inliers: usize,
    /// Smallest accepted ratio between the smallest and largest eigenvalue
    /// of the scale-normalised normal matrix.
    pub rcond: f64,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            min_inliers: 3,
            rcond: 1e-12,
        }
    }
}

/// Moment sums of the rotated inliers.
#[derive(Clone, Copy, Debug, Default)]
struct Moments {
    sxx: f64,
    sxy: f64,
    sx: f64,
    sxz: f64,
    syy: f64,
    sy: f64,
    syz: f64,
    sz: f64,
    n: f64,
}

impl Moments {
    fn push(&mut self, q: &Point3<f64>) {
        self.sxx += q.x * q.x;
        self.sxy += q.x * q.y;
        self.sx += q.x;
        self.sxz += q.x * q.z;
        self.syy += q.y * q.y;
        self.sy += q.y;
        self.syz += q.y * q.z;
        self.sz += q.z;
        self.n += 1.0;
    }

    fn normal_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.sxx, self.sxy, self.sx, //
            self.sxy, self.syy, self.sy, //
            self.sx, self.sy, self.n,
        )
    }

    fn rhs(&self) -> Vector3<f64> {
        Vector3::new(self.sxz, self.syz, self.sz)
    }

    fn centroid(&self) -> Point3<f64> {
        Point3::new(self.sx / self.n, self.sy / self.n, self.sz / self.n)
    }
}

/// Refine the plane `(anchor, normal)` against its supporting points.
///
/// `anchor` only serves as the local origin of the fit, which keeps the sums
/// well scaled when the cloud sits far from the world origin. The returned
/// normal is `(a, b, -1)` mapped back to the cloud frame, so it points
/// roughly against the coarse `normal`.
///
/// Fails with [`PlaneDetectError::DegenerateFit`] when there are fewer than
/// `params.min_inliers` points or the points do not span a plane.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(inliers), fields(inliers = inliers.len()))
)]
pub fn refine(
    anchor: &Point3<f64>,
    normal: &UnitVector3<f64>,
    inliers: &[Point3<f64>],
    params: &RefineParams,
) -> Result<PlaneResult, PlaneDetectError> {
    let degenerate = PlaneDetectError::DegenerateFit {
        inliers: inliers.len(),
    };
    if inliers.is_empty() || inliers.len() < params.min_inliers {
        return Err(degenerate);
    }

    let spread = (inliers
        .iter()
        .map(|q| (q - anchor).norm_squared())
        .sum::<f64>()
        / inliers.len() as f64)
        .sqrt();
    if !(spread > 0.0 && spread.is_finite()) {
        return Err(degenerate);
    }

    let rotation = rotation_to_z(normal);
    let mut moments = Moments::default();
    for q in inliers {
        let local = rotation * ((q - anchor) / spread);
        moments.push(&Point3::from(local));
    }

    let m = moments.normal_matrix();
    let eig = m.symmetric_eigenvalues();
    let (lo, hi) = (eig.min(), eig.max());
    if !(hi > 0.0 && lo > hi * params.rcond) {
        debug!("refine: singular normal matrix (eigenvalues {lo:e}..{hi:e})");
        return Err(degenerate);
    }

    let solution = m.cholesky().ok_or(degenerate)?.solve(&moments.rhs());
    if !solution.iter().all(|v| v.is_finite()) {
        return Err(degenerate);
    }
    let (a, b) = (solution.x, solution.y);

    let back = rotation.inverse();
    let point = anchor + back * (moments.centroid().coords * spread);
    let normal = UnitVector3::new_normalize(back * Vector3::new(a, b, -1.0));

    let mean_sq = inliers
        .iter()
        .map(|q| (q - point).norm_squared())
        .sum::<f64>()
        / inliers.len() as f64;
    let extent = mean_sq.sqrt();
    if !extent.is_finite() {
        return Err(degenerate);
    }

    Ok(PlaneResult {
        point,
        normal,
        extent,
    })
}
