pub mod calculator;
pub mod controversy;
pub mod decay;
pub mod quality;
pub mod weighted;

pub use calculator::{
    RangeAdjustment, ReputationAdjustment, ScoreBreakdown, ScoreCalculator, ScoreResult,
};
pub use controversy::{ControversyAdjustment, ControversyDetector};
pub use decay::{NewContentBoost, TimeDecay};
pub use quality::{apply_quality_bias, quality_ratio, QualityAdjustment};
pub use weighted::{ScoreTerm, WeightedScorer};
