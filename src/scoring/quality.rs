use serde::Serialize;

use crate::config::EngagementWeights;
use crate::metrics::EngagementMetrics;
use crate::scoring::weighted::clamp01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityAdjustment {
    pub ratio: f64,
    pub multiplier: f64,
}

/// Positive-leaning share of all engagement. 0.5 when there is none.
pub fn quality_ratio(metrics: &EngagementMetrics, weights: &EngagementWeights) -> f64 {
    let mut positive = metrics.likes as f64 + metrics.agrees as f64;
    if let Some(engagement) = &metrics.comment_engagement {
        positive += clamp01(engagement.comment_quality_score) * weights.comment_engagement.max(0.0);
    }
    if let Some(shares) = &metrics.share_metrics {
        positive += clamp01(shares.share_quality_score) * weights.enhanced_shares.max(0.0);
    }
    let negative = metrics.dislikes as f64 + metrics.disagrees as f64 + metrics.reports as f64;

    let total = positive + negative;
    if total <= 0.0 {
        return 0.5;
    }
    positive / total
}

/// Scales the score around a neutral ratio of 0.5 (multiplier 1.0). For
/// negative scores the multiplier is mirrored so a better ratio still raises
/// the score.
pub fn apply_quality_bias(score: f64, ratio: f64) -> (f64, QualityAdjustment) {
    let ratio = clamp01(ratio);
    let multiplier = if score >= 0.0 {
        0.5 + ratio
    } else {
        1.5 - ratio
    };
    (score * multiplier, QualityAdjustment { ratio, multiplier })
}
