use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::batch::mean;
use crate::config::EngagementConfig;
use crate::hours_before;
use crate::metrics::CommentRecord;
use crate::scoring::{ScoreBreakdown, ScoreCalculator};

pub const DEFAULT_TIME_WINDOW_HOURS: f64 = 24.0;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingOptions {
    pub time_window_hours: f64,
    pub min_score: Option<f64>,
    pub limit: usize,
}

impl Default for TrendingOptions {
    fn default() -> Self {
        Self {
            time_window_hours: DEFAULT_TIME_WINDOW_HOURS,
            min_score: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentScore {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingComment {
    #[serde(flatten)]
    pub comment: CommentRecord,
    pub engagement_data: CommentScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendingStats {
    pub total_comments: usize,
    pub recent_comments: usize,
    pub qualifying_comments: usize,
    pub average_score: f64,
    pub time_window_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingComments {
    pub trending_comments: Vec<TrendingComment>,
    pub stats: TrendingStats,
}

/// Scores a comment's own reactions, with replies as the comments signal.
pub fn calculate_comment_score(
    config: &EngagementConfig,
    comment: &CommentRecord,
    author_reputation: Option<f64>,
    now: DateTime<Utc>,
) -> CommentScore {
    let result = ScoreCalculator::new(config).score(
        &comment.to_metrics(),
        comment.created_at,
        now,
        author_reputation,
    );
    CommentScore {
        score: result.score,
        breakdown: result.breakdown,
    }
}

pub fn find_trending_comments(
    config: &EngagementConfig,
    comments: &[CommentRecord],
    options: &TrendingOptions,
    now: DateTime<Utc>,
) -> TrendingComments {
    let window_hours = options.time_window_hours.max(0.0);
    let cutoff = hours_before(now, window_hours);

    let recent: Vec<&CommentRecord> = comments
        .iter()
        .filter(|comment| comment.created_at >= cutoff)
        .collect();
    let recent_comments = recent.len();

    let mut qualifying: Vec<TrendingComment> = recent
        .into_iter()
        .map(|comment| TrendingComment {
            comment: comment.clone(),
            engagement_data: calculate_comment_score(config, comment, None, now),
        })
        .filter(|candidate| match options.min_score {
            Some(min_score) => candidate.engagement_data.score >= min_score,
            None => true,
        })
        .collect();

    let scores: Vec<f64> = qualifying
        .iter()
        .map(|candidate| candidate.engagement_data.score)
        .collect();
    let qualifying_comments = qualifying.len();
    let average_score = mean(&scores);

    qualifying.sort_by(|a, b| {
        b.engagement_data
            .score
            .partial_cmp(&a.engagement_data.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.comment.created_at.cmp(&a.comment.created_at))
    });
    qualifying.truncate(options.limit);

    debug!(
        total = comments.len(),
        recent = recent_comments,
        qualifying = qualifying_comments,
        selected = qualifying.len(),
        "selected trending comments"
    );

    TrendingComments {
        trending_comments: qualifying,
        stats: TrendingStats {
            total_comments: comments.len(),
            recent_comments,
            qualifying_comments,
            average_score,
            time_window_hours: window_hours,
        },
    }
}
