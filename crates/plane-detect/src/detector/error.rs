/// Reasons a frame produced no plane.
///
/// All variants are ordinary per-frame outcomes; none of them leave the
/// detector in a bad state.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneDetectError {
    #[error("not enough finite points (got {points}, need {required})")]
    InsufficientData { points: usize, required: usize },
    #[error("no plane reached consensus (best inliers={inliers}, required={required})")]
    NoConsensus { inliers: usize, required: usize },
    #[error("least-squares fit is degenerate (inliers={inliers})")]
    DegenerateFit { inliers: usize },
}
