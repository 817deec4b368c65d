use log::debug;
use nalgebra::Point3;
use plane_detect_core::FiniteCloud;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{DetectedPlane, PlaneDetectError, PlaneDetection, PlaneDetectorParams, PlaneOutput};
use crate::ransac;
use crate::refine::refine;
use crate::sampler::TripletSampler;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Single-plane detector for sparse point clouds.
///
/// Owns its random source, so a detector built with a fixed seed replays the
/// same hypotheses for the same frames. Detection takes `&mut self`: one pass
/// at a time per instance.
pub struct PlaneDetector<R = ChaCha8Rng> {
    params: PlaneDetectorParams,
    sampler: TripletSampler<R>,
}

impl<R: Rng> PlaneDetector<R> {
    /// Create a detector drawing its samples from `rng`.
    pub fn new(params: PlaneDetectorParams, rng: R) -> Self {
        Self {
            params,
            sampler: TripletSampler::from_rng(rng),
        }
    }

    /// Detector parameters.
    #[inline]
    pub fn params(&self) -> &PlaneDetectorParams {
        &self.params
    }

    /// Detect the dominant plane in `cloud`.
    ///
    /// Non-finite points are ignored; the indices in the result refer to
    /// `cloud` as given.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, cloud), fields(points = cloud.len()))
    )]
    pub fn try_detect(
        &mut self,
        cloud: &[Point3<f64>],
    ) -> Result<PlaneDetection, PlaneDetectError> {
        let finite = FiniteCloud::new(cloud);
        if finite.dropped() > 0 {
            debug!("ignoring {} non-finite points", finite.dropped());
        }

        let outcome = ransac::search(&finite, &self.params.ransac, &mut self.sampler)?;

        let plane = match self.params.output {
            PlaneOutput::Raw => DetectedPlane::Raw(outcome.candidate),
            PlaneOutput::Refined => {
                let support: Vec<Point3<f64>> =
                    outcome.inliers.iter().map(|&i| cloud[i]).collect();
                let fitted = refine(
                    &outcome.candidate.anchor,
                    &outcome.candidate.normal,
                    &support,
                    &self.params.refine,
                )?;
                DetectedPlane::Refined(fitted)
            }
        };

        Ok(PlaneDetection {
            plane,
            candidate: outcome.candidate,
            sample: outcome.sample,
            inliers: outcome.inliers,
        })
    }

    /// Like [`Self::try_detect`], with every failure reported as `None`.
    pub fn detect(&mut self, cloud: &[Point3<f64>]) -> Option<PlaneDetection> {
        match self.try_detect(cloud) {
            Ok(detection) => Some(detection),
            Err(err) => {
                debug!("no plane: {err}");
                None
            }
        }
    }
}

impl<R: Rng + SeedableRng> PlaneDetector<R> {
    /// Create a detector with a deterministic random sequence.
    pub fn seeded(params: PlaneDetectorParams, seed: u64) -> Self {
        Self {
            params,
            sampler: TripletSampler::seeded(seed),
        }
    }

    /// Create a detector seeded from the operating system.
    pub fn from_entropy(params: PlaneDetectorParams) -> Self {
        Self::new(params, R::from_os_rng())
    }

    /// Restart the random sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.sampler.reseed(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn grid(side: usize) -> Vec<Point3<f64>> {
        let step = 1.0 / side as f64;
        let mut pts = Vec::new();
        for j in 0..side {
            for i in 0..side {
                pts.push(Point3::new(i as f64 * step, j as f64 * step, 0.5));
            }
        }
        pts
    }

    #[test]
    fn raw_output_has_no_extent() {
        let pts = grid(6);
        let mut det = PlaneDetector::<ChaCha8Rng>::seeded(PlaneDetectorParams::raw(), 1);
        let res = det.try_detect(&pts).expect("plane");
        assert!(matches!(res.plane, DetectedPlane::Raw(_)));
        assert_eq!(res.plane.extent(), None);
        assert_eq!(res.plane.point(), pts[res.sample[0]]);
        assert_eq!(res.plane, DetectedPlane::Raw(res.candidate));
    }

    #[test]
    fn refined_output_has_extent() {
        let pts = grid(6);
        let mut det = PlaneDetector::<ChaCha8Rng>::seeded(PlaneDetectorParams::default(), 1);
        let res = det.try_detect(&pts).expect("plane");
        let fitted = res.plane.refined().expect("refined");
        assert!(fitted.extent > 0.0 && fitted.extent.is_finite());
        assert!((fitted.point.z - 0.5).abs() < 1e-12);
        assert!((fitted.normal.dot(&Vector3::z()).abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reseed_replays_detection() {
        let mut pts = grid(6);
        pts.extend(grid(4).into_iter().map(|p| Point3::new(p.z, p.x, p.y)));
        let mut det = PlaneDetector::<ChaCha8Rng>::seeded(PlaneDetectorParams::default(), 17);
        let first = det.try_detect(&pts).expect("plane");
        det.reseed(17);
        let again = det.try_detect(&pts).expect("plane");
        assert_eq!(first, again);
    }

    #[test]
    fn detect_swallows_errors() {
        let pts = grid(3);
        let mut det = PlaneDetector::<ChaCha8Rng>::seeded(PlaneDetectorParams::default(), 0);
        assert!(det.detect(&pts).is_none());
        assert_eq!(
            det.try_detect(&pts).unwrap_err(),
            PlaneDetectError::InsufficientData {
                points: 9,
                required: 10
            }
        );
    }
}
