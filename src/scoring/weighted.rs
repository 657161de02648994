use serde::Serialize;

use crate::config::EngagementWeights;
use crate::metrics::EngagementMetrics;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTerm {
    pub name: &'static str,
    pub value: f64,
    pub weight: f64,
    pub contribution: f64,
}

impl ScoreTerm {
    fn new(name: &'static str, value: f64, weight: f64) -> Self {
        Self {
            name,
            value,
            weight,
            contribution: value * weight,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeightedScorer {
    weights: EngagementWeights,
}

impl WeightedScorer {
    pub fn new(weights: EngagementWeights) -> Self {
        Self { weights }
    }

    /// One term per signal; sub-metric terms only when the sub-metric is present.
    pub fn terms(&self, metrics: &EngagementMetrics) -> Vec<ScoreTerm> {
        let w = &self.weights;
        let mut terms = vec![
            ScoreTerm::new("likes", metrics.likes as f64, w.likes),
            ScoreTerm::new("dislikes", metrics.dislikes as f64, w.dislikes),
            ScoreTerm::new("agrees", metrics.agrees as f64, w.agrees),
            ScoreTerm::new("disagrees", metrics.disagrees as f64, w.disagrees),
            ScoreTerm::new("comments", metrics.comments as f64, w.comments),
            ScoreTerm::new("shares", metrics.shares as f64, w.shares),
            ScoreTerm::new("views", metrics.views as f64, w.views),
            ScoreTerm::new("community_notes", metrics.community_notes as f64, w.community_notes),
            ScoreTerm::new("reports", metrics.reports as f64, -w.reports_weight.abs()),
        ];

        if let Some(engagement) = &metrics.comment_engagement {
            terms.push(ScoreTerm::new(
                "comment_engagement",
                clamp01(engagement.comment_quality_score),
                w.comment_engagement,
            ));
        }

        if let Some(shares) = &metrics.share_metrics {
            let boost = if shares.recent_shares_boost.is_finite() {
                shares.recent_shares_boost.max(1.0)
            } else {
                1.0
            };
            terms.push(ScoreTerm::new(
                "enhanced_shares",
                clamp01(shares.share_quality_score) * boost,
                w.enhanced_shares,
            ));
        }

        terms
    }

    pub fn score(&self, metrics: &EngagementMetrics) -> f64 {
        self.terms(metrics).iter().map(|term| term.contribution).sum()
    }
}

pub(crate) fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
