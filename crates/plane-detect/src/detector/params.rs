use serde::{Deserialize, Serialize};

use crate::ransac::RansacParams;
use crate::refine::RefineParams;

/// Which plane a successful detection reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneOutput {
    /// Least-squares plane over the consensus set, with an extent.
    #[default]
    Refined,
    /// The winning three-point hypothesis as sampled, without an extent.
    Raw,
}

/// Configuration for the plane detector.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneDetectorParams {
    /// Consensus search parameters.
    pub ransac: RansacParams,
    /// Least-squares refinement parameters. Unused for [`PlaneOutput::Raw`].
    pub refine: RefineParams,
    pub output: PlaneOutput,
}

impl PlaneDetectorParams {
    /// Defaults with the unrefined output.
    pub fn raw() -> Self {
        Self {
            output: PlaneOutput::Raw,
            ..Self::default()
        }
    }
}
