pub mod boost;
pub mod completeness;
pub mod engagement;

pub use boost::{BoostBreakdown, BoostConfig, BoostScoreCalculator, BoostWeights};
pub use completeness::{CompletenessScorer, CompletenessWeights};
pub use engagement::{EngagementConfig, EngagementScorer, EngagementScores};
