//! Random-sample consensus search for a single dominant plane.
//!
//! Each trial draws three points, builds the plane through them and counts
//! how many cloud points lie within `distance_threshold` of it. The best
//! supported hypothesis is accepted when at least `1 / consensus_divisor` of
//! the cloud supports it.

use log::{debug, trace};
use nalgebra::{Point3, UnitVector3};
use plane_detect_core::{CandidatePlane, FiniteCloud};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sampler::TripletSampler;
use crate::PlaneDetectError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Samples whose edges meet at a smaller sine are treated as collinear.
const MIN_SAMPLE_SINE: f64 = 1e-10;

/// Parameters of the consensus search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RansacParams {
    /// Number of sampled hypotheses per frame.
    pub trials: usize,
    /// Maximum point-to-plane distance of an inlier, in cloud units.
    pub distance_threshold: f64,
    /// Clouds with fewer finite points are rejected up front.
    pub min_points: usize,
    /// The winner needs at least `points / consensus_divisor` inliers
    /// (integer division).
    pub consensus_divisor: usize,
}

impl Default for RansacParams {
    fn default() -> Self {
        Self {
            trials: 200,
            distance_threshold: 0.02,
            min_points: 10,
            consensus_divisor: 4,
        }
    }
}

impl RansacParams {
    /// Inlier count a hypothesis needs on a cloud of `points` finite points.
    pub fn required_inliers(&self, points: usize) -> usize {
        points / self.consensus_divisor.max(1)
    }
}

/// Winning hypothesis of a successful search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RansacOutcome {
    pub candidate: CandidatePlane,
    /// Cloud indices of the three points that produced `candidate`.
    pub sample: [usize; 3],
    /// Cloud indices of all points supporting `candidate`.
    pub inliers: Vec<usize>,
}

impl RansacOutcome {
    #[inline]
    pub fn inlier_count(&self) -> usize {
        self.inliers.len()
    }
}

/// Plane through three points, or `None` when they do not span a plane.
pub fn plane_from_sample(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
) -> Option<CandidatePlane> {
    let v1 = p1 - p0;
    let v2 = p2 - p0;
    let cross = v1.cross(&v2);
    // |v1 x v2| = |v1| |v2| sin(angle), so the test does not depend on scale.
    if !(cross.norm() > MIN_SAMPLE_SINE * v1.norm() * v2.norm()) {
        return None;
    }
    let normal = UnitVector3::try_new(cross, 0.0)?;
    Some(CandidatePlane::new(*p0, normal))
}

/// Number of cloud points within `threshold` of `plane`.
pub fn count_inliers(cloud: &FiniteCloud<'_>, plane: &CandidatePlane, threshold: f64) -> usize {
    let d = plane.offset();
    cloud
        .iter()
        .filter(|(_, q)| (plane.normal.dot(&q.coords) - d).abs() < threshold)
        .count()
}

/// Original cloud indices of the points within `threshold` of `plane`.
pub fn collect_inliers(
    cloud: &FiniteCloud<'_>,
    plane: &CandidatePlane,
    threshold: f64,
) -> Vec<usize> {
    let d = plane.offset();
    cloud
        .iter()
        .filter(|(_, q)| (plane.normal.dot(&q.coords) - d).abs() < threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Run the consensus search over the finite points of a cloud.
///
/// Ties keep the earliest hypothesis, so a fixed random sequence always
/// yields the same winner.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(cloud, sampler), fields(points = cloud.len()))
)]
pub fn search<R: Rng>(
    cloud: &FiniteCloud<'_>,
    params: &RansacParams,
    sampler: &mut TripletSampler<R>,
) -> Result<RansacOutcome, PlaneDetectError> {
    let n = cloud.len();
    let min_points = params.min_points.max(3);
    if n < min_points {
        return Err(PlaneDetectError::InsufficientData {
            points: n,
            required: min_points,
        });
    }

    let mut best: Option<(CandidatePlane, [usize; 3])> = None;
    let mut best_count = 0usize;
    let mut degenerate = 0usize;

    for trial in 0..params.trials {
        let [i0, i1, i2] = sampler.next_triplet(n);
        let Some(candidate) = plane_from_sample(cloud.get(i0), cloud.get(i1), cloud.get(i2))
        else {
            degenerate += 1;
            continue;
        };

        let count = count_inliers(cloud, &candidate, params.distance_threshold);
        if count > best_count {
            trace!("trial {trial}: new best with {count} inliers");
            best_count = count;
            best = Some((candidate, [i0, i1, i2]));
        }
    }

    let required = params.required_inliers(n);
    debug!(
        "ransac: best={best_count} required={required} points={n} trials={} degenerate={degenerate}",
        params.trials
    );

    let (candidate, [i0, i1, i2]) = match best {
        Some(best) if best_count >= required => best,
        _ => {
            return Err(PlaneDetectError::NoConsensus {
                inliers: best_count,
                required,
            })
        }
    };

    let inliers = collect_inliers(cloud, &candidate, params.distance_threshold);
    Ok(RansacOutcome {
        candidate,
        sample: [
            cloud.source_index(i0),
            cloud.source_index(i1),
            cloud.source_index(i2),
        ],
        inliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};
    use rand_chacha::ChaCha8Rng;

    fn sampler(seed: u64) -> TripletSampler<ChaCha8Rng> {
        TripletSampler::seeded(seed)
    }

    fn floor_grid(side: usize, z: f64) -> Vec<Point3<f64>> {
        let step = 2.0 / (side - 1) as f64;
        (0..side)
            .flat_map(|j| {
                (0..side).map(move |i| Point3::new(-1.0 + i as f64 * step, -1.0 + j as f64 * step, z))
            })
            .collect()
    }

    #[test]
    fn collinear_sample_has_no_plane() {
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(1.0, 1.0, 1.0);
        let p2 = Point3::new(2.0, 2.0, 2.0);
        assert!(plane_from_sample(&p0, &p1, &p2).is_none());
        assert!(plane_from_sample(&p0, &p0, &p1).is_none());
    }

    #[test]
    fn sample_normal_is_unit() {
        let plane = plane_from_sample(
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(3.0, 0.0, 1.0),
            &Point3::new(0.0, 5.0, 1.0),
        )
        .expect("plane");
        assert!((plane.normal.norm() - 1.0).abs() < 1e-12);
        assert!((plane.normal.dot(&Vector3::z()).abs() - 1.0).abs() < 1e-12);
        assert!((plane.offset().abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sample_test_ignores_scale() {
        for scale in [1e-7, 1.0, 2e5] {
            let plane = plane_from_sample(
                &Point3::new(0.0, 0.0, 0.0),
                &Point3::new(scale, 0.0, 0.0),
                &Point3::new(0.0, scale, 0.0),
            )
            .expect("right triangle spans a plane");
            assert!((plane.normal.z - 1.0).abs() < 1e-12, "scale {scale}");

            let line = plane_from_sample(
                &Point3::new(0.0, 0.0, 0.0),
                &Point3::new(scale, scale, 0.0),
                &Point3::new(3.0 * scale, 3.0 * scale, 0.0),
            );
            assert!(line.is_none(), "scale {scale}");
        }
    }

    #[test]
    fn first_of_tied_hypotheses_wins() {
        // Two parallel 4x4 grids one unit apart: every triplet inside one grid
        // scores 16, while mixed triplets score at most 8.
        let mut pts = floor_grid(4, 0.0);
        pts.extend(floor_grid(4, 1.0));
        let cloud = FiniteCloud::new(&pts);
        let params = RansacParams::default();

        let mut replay = sampler(21);
        let scored: Vec<([usize; 3], usize)> = (0..params.trials)
            .map(|_| {
                let [i0, i1, i2] = replay.next_triplet(cloud.len());
                let count = plane_from_sample(cloud.get(i0), cloud.get(i1), cloud.get(i2))
                    .map_or(0, |plane| count_inliers(&cloud, &plane, params.distance_threshold));
                ([i0, i1, i2], count)
            })
            .collect();
        let best = scored.iter().map(|&(_, c)| c).max().expect("trials");
        assert_eq!(best, 16);
        let tied: Vec<[usize; 3]> = scored
            .iter()
            .filter(|&&(_, c)| c == best)
            .map(|&(t, _)| t)
            .collect();
        // Both grids reach the maximum, so later ties exist on either level.
        assert!(tied.iter().any(|t| pts[t[0]].z == 0.0));
        assert!(tied.iter().any(|t| pts[t[0]].z == 1.0));

        let res = search(&cloud, &params, &mut sampler(21)).expect("plane");
        assert_eq!(res.sample, tied[0]);
        assert_eq!(res.inlier_count(), 16);
    }

    #[test]
    fn small_cloud_is_rejected() {
        let pts = floor_grid(3, 0.0);
        let cloud = FiniteCloud::new(&pts);
        let err = search(&cloud, &RansacParams::default(), &mut sampler(1)).unwrap_err();
        assert_eq!(
            err,
            PlaneDetectError::InsufficientData {
                points: 9,
                required: 10
            }
        );
    }

    #[test]
    fn finds_exact_plane_and_all_inliers() {
        let pts = floor_grid(6, 0.25);
        let cloud = FiniteCloud::new(&pts);
        let res = search(&cloud, &RansacParams::default(), &mut sampler(2)).expect("plane");
        assert_eq!(res.inlier_count(), pts.len());
        assert!((res.candidate.normal.z.abs() - 1.0).abs() < 1e-9);
        assert!((res.candidate.anchor.z - 0.25).abs() < 1e-12);
        assert!(res.inliers.contains(&res.sample[0]));
    }

    #[test]
    fn all_collinear_cloud_has_no_consensus() {
        let pts: Vec<Point3<f64>> = (0..20)
            .map(|i| Point3::new(i as f64 * 0.1, i as f64 * 0.2, -(i as f64) * 0.05))
            .collect();
        let cloud = FiniteCloud::new(&pts);
        let err = search(&cloud, &RansacParams::default(), &mut sampler(3)).unwrap_err();
        assert_eq!(
            err,
            PlaneDetectError::NoConsensus {
                inliers: 0,
                required: 5
            }
        );
    }

    #[test]
    fn same_seed_same_winner() {
        let mut pts = floor_grid(5, 0.0);
        pts.extend(floor_grid(4, 0.7));
        let cloud = FiniteCloud::new(&pts);
        let a = search(&cloud, &RansacParams::default(), &mut sampler(9)).expect("plane");
        let b = search(&cloud, &RansacParams::default(), &mut sampler(9)).expect("plane");
        assert_eq!(a, b);
        assert_eq!(a.inlier_count(), 25);
    }

    #[test]
    fn required_inliers_uses_floor_division() {
        let params = RansacParams::default();
        assert_eq!(params.required_inliers(40), 10);
        assert_eq!(params.required_inliers(43), 10);
        assert_eq!(params.required_inliers(44), 11);
    }
}
