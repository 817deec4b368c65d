//! Latest-frame-wins hand-off between a frame source and the detector.
//!
//! A sensor callback replaces the pending cloud whenever a new frame
//! arrives; the host's update loop runs at most one detection per tick on
//! whatever frame is pending. Frames that arrive while an older one is still
//! pending supersede it.

use nalgebra::Point3;
use rand::Rng;

use crate::{PlaneDetection, PlaneDetector};

/// Single-slot mailbox holding the most recent unprocessed frame.
#[derive(Clone, Debug, Default)]
pub struct FrameSlot {
    pending: Option<Vec<Point3<f64>>>,
    superseded: u64,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new frame, replacing any frame not yet processed.
    pub fn submit(&mut self, cloud: Vec<Point3<f64>>) {
        if self.pending.replace(cloud).is_some() {
            self.superseded += 1;
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames dropped because a newer one arrived first.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    /// Remove and return the pending frame.
    pub fn take(&mut self) -> Option<Vec<Point3<f64>>> {
        self.pending.take()
    }

    /// Run one detection pass on the pending frame, if there is one.
    ///
    /// Returns `None` both when no frame was pending and when the frame had
    /// no plane; use [`FrameSlot::has_pending`] beforehand to tell them apart.
    pub fn process<R: Rng>(&mut self, detector: &mut PlaneDetector<R>) -> Option<PlaneDetection> {
        let cloud = self.take()?;
        detector.detect(&cloud)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlaneDetectorParams;
    use rand_chacha::ChaCha8Rng;

    fn floor(z: f64) -> Vec<Point3<f64>> {
        (0..25)
            .map(|k| Point3::new((k % 5) as f64 * 0.2, (k / 5) as f64 * 0.2, z))
            .collect()
    }

    #[test]
    fn newer_frame_replaces_pending_one() {
        let mut slot = FrameSlot::new();
        slot.submit(floor(0.0));
        slot.submit(floor(1.0));
        assert_eq!(slot.superseded(), 1);

        let mut det = PlaneDetector::<ChaCha8Rng>::seeded(PlaneDetectorParams::default(), 4);
        let res = slot.process(&mut det).expect("plane");
        assert!((res.plane.point().z - 1.0).abs() < 1e-12);
        assert!(!slot.has_pending());
    }

    #[test]
    fn each_frame_is_processed_once() {
        let mut slot = FrameSlot::new();
        let mut det = PlaneDetector::<ChaCha8Rng>::seeded(PlaneDetectorParams::default(), 4);
        assert!(slot.process(&mut det).is_none());

        slot.submit(floor(0.3));
        assert!(slot.process(&mut det).is_some());
        assert!(slot.process(&mut det).is_none());
        assert_eq!(slot.superseded(), 0);
    }
}
