pub mod aggregate;
pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod scoring;
pub mod trending;

use chrono::{DateTime, Duration, Utc};

pub use aggregate::{calculate_comment_engagement, calculate_share_metrics};
pub use batch::{AlgorithmMetrics, ScoreDistribution, ScoringItem};
pub use config::{
    AggregationConfig, Algorithm, ConfigUpdate, EngagementConfig, EngagementWeights,
    ScoreAdjustments, ScoringModifiers,
};
pub use engine::EngagementEngine;
pub use error::{Result, ScoringError};
pub use metrics::{
    CommentEngagement, CommentRecord, EngagementMetrics, RawEngagementCounts, ShareMetrics,
    ShareRecord, ShareType,
};
pub use scoring::{ScoreBreakdown, ScoreCalculator, ScoreResult};
pub use trending::{CommentScore, TrendingComment, TrendingComments, TrendingOptions, TrendingStats};

/// Elapsed hours from `start` to `end`, floored at zero for future timestamps.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    ((end - start).num_milliseconds() as f64 / 3_600_000.0).max(0.0)
}

/// The instant `hours` before `now`. Spans reaching past the representable
/// range saturate at the earliest UTC timestamp.
pub fn hours_before(now: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    Duration::try_milliseconds((hours.max(0.0) * 3_600_000.0) as i64)
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round() as i64;
    let mut chars: Vec<char> = rounded.unsigned_abs().to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }
    if rounded < 0 {
        result.push('-');
    }

    result.chars().rev().collect()
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
