use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{calculate_comment_engagement, calculate_share_metrics};
use crate::config::{AggregationConfig, Algorithm, EngagementConfig};
use crate::metrics::{CommentRecord, EngagementMetrics, ShareRecord};
use crate::scoring::{ScoreCalculator, ScoreResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringItem {
    pub metrics: EngagementMetrics,
    pub created_at: DateTime<Utc>,
    pub author_reputation: Option<f64>,
}

impl ScoringItem {
    pub fn new(metrics: EngagementMetrics, created_at: DateTime<Utc>) -> Self {
        Self {
            metrics,
            created_at,
            author_reputation: None,
        }
    }

    pub fn with_reputation(mut self, reputation: f64) -> Self {
        self.author_reputation = Some(reputation);
        self
    }

    /// Derives comment and share sub-metrics from raw records. Pass the
    /// aggregation section of the same config the item is scored under.
    pub fn with_records(
        mut self,
        comments: Option<&[CommentRecord]>,
        shares: Option<&[ShareRecord]>,
        aggregation: &AggregationConfig,
        now: DateTime<Utc>,
    ) -> Self {
        if let Some(comments) = comments {
            self.metrics.comment_engagement = Some(calculate_comment_engagement(comments));
        }
        if let Some(shares) = shares {
            self.metrics.share_metrics = Some(calculate_share_metrics(
                shares,
                self.created_at,
                now,
                aggregation,
            ));
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreDistribution {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub standard_deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmMetrics {
    pub algorithm: Algorithm,
    pub total_posts: usize,
    pub score_distribution: ScoreDistribution,
    pub config: EngagementConfig,
}

/// Scores every item under `config`. Output order matches input order. With
/// `scale_to_range` the batch's own min/max are the source bounds.
pub fn batch_calculate_scores(
    config: &EngagementConfig,
    items: &[ScoringItem],
    now: DateTime<Utc>,
) -> Vec<ScoreResult> {
    let calculator = ScoreCalculator::new(config);
    let mut breakdowns: Vec<_> = items
        .iter()
        .map(|item| {
            calculator.evaluate(
                &item.metrics,
                item.created_at,
                now,
                item.author_reputation,
            )
        })
        .collect();

    let bounds = if config.adjustments.scale_to_range {
        let combined: Vec<f64> = breakdowns.iter().map(|b| b.combined_score).collect();
        let distribution = score_distribution(&combined);
        (distribution.min, distribution.max)
    } else {
        (config.adjustments.typical_min, config.adjustments.typical_max)
    };

    for breakdown in breakdowns.iter_mut() {
        calculator.adjust(breakdown, bounds);
    }

    debug!(
        algorithm = %config.algorithm,
        items = items.len(),
        "batch scored"
    );

    breakdowns
        .into_iter()
        .map(|breakdown| calculator.finish(breakdown))
        .collect()
}

pub fn algorithm_metrics(
    config: &EngagementConfig,
    items: &[ScoringItem],
    now: DateTime<Utc>,
) -> AlgorithmMetrics {
    let scores: Vec<f64> = batch_calculate_scores(config, items, now)
        .iter()
        .map(|result| result.score)
        .collect();

    AlgorithmMetrics {
        algorithm: config.algorithm,
        total_posts: items.len(),
        score_distribution: score_distribution(&scores),
        config: config.clone(),
    }
}

/// Population statistics; an empty slice yields all zeros.
pub fn score_distribution(scores: &[f64]) -> ScoreDistribution {
    if scores.is_empty() {
        return ScoreDistribution::default();
    }

    let average = mean(scores);
    let variance = scores
        .iter()
        .map(|score| (score - average).powi(2))
        .sum::<f64>()
        / scores.len() as f64;

    ScoreDistribution {
        min: scores.iter().copied().fold(f64::INFINITY, f64::min),
        max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        average,
        standard_deviation: variance.sqrt(),
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
