use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

/// Validated per-item counter snapshot. Counts are unsigned, so a constructed
/// value can never carry a negative count; use [`RawEngagementCounts`] when the
/// input comes from an untrusted signed source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngagementMetrics {
    pub likes: u64,
    pub dislikes: u64,
    pub agrees: u64,
    pub disagrees: u64,
    pub comments: u64,
    pub shares: u64,
    pub views: u64,
    pub community_notes: u64,
    pub reports: u64,
    pub comment_engagement: Option<CommentEngagement>,
    pub share_metrics: Option<ShareMetrics>,
}

impl EngagementMetrics {
    pub fn with_comment_engagement(mut self, engagement: CommentEngagement) -> Self {
        self.comment_engagement = Some(engagement);
        self
    }

    pub fn with_share_metrics(mut self, metrics: ShareMetrics) -> Self {
        self.share_metrics = Some(metrics);
        self
    }
}

/// Signed counters as they arrive from callers. Converting into
/// [`EngagementMetrics`] rejects negative values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEngagementCounts {
    pub likes: i64,
    pub dislikes: i64,
    pub agrees: i64,
    pub disagrees: i64,
    pub comments: i64,
    pub shares: i64,
    pub views: i64,
    pub community_notes: i64,
    pub reports: i64,
    pub comment_engagement: Option<CommentEngagement>,
    pub share_metrics: Option<ShareMetrics>,
}

impl TryFrom<RawEngagementCounts> for EngagementMetrics {
    type Error = ScoringError;

    fn try_from(raw: RawEngagementCounts) -> Result<Self> {
        Ok(Self {
            likes: non_negative("likes", raw.likes)?,
            dislikes: non_negative("dislikes", raw.dislikes)?,
            agrees: non_negative("agrees", raw.agrees)?,
            disagrees: non_negative("disagrees", raw.disagrees)?,
            comments: non_negative("comments", raw.comments)?,
            shares: non_negative("shares", raw.shares)?,
            views: non_negative("views", raw.views)?,
            community_notes: non_negative("community_notes", raw.community_notes)?,
            reports: non_negative("reports", raw.reports)?,
            comment_engagement: raw.comment_engagement,
            share_metrics: raw.share_metrics,
        })
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| ScoringError::NegativeCount { field, value })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentEngagement {
    pub total_comment_reactions: u64,
    pub avg_reactions_per_comment: f64,
    pub comment_quality_score: f64,
}

impl Default for CommentEngagement {
    fn default() -> Self {
        Self {
            total_comment_reactions: 0,
            avg_reactions_per_comment: 0.0,
            comment_quality_score: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareMetrics {
    pub simple_shares_count: u64,
    pub quote_shares_count: u64,
    pub avg_quote_length: f64,
    pub recent_shares_boost: f64,
    pub share_quality_score: f64,
}

impl Default for ShareMetrics {
    fn default() -> Self {
        Self {
            simple_shares_count: 0,
            quote_shares_count: 0,
            avg_quote_length: 0.0,
            recent_shares_boost: 1.0,
            share_quality_score: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
    #[serde(default)]
    pub agrees: u64,
    #[serde(default)]
    pub disagrees: u64,
    #[serde(default)]
    pub reply_count: u64,
    pub created_at: DateTime<Utc>,
}

impl CommentRecord {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            author_id: None,
            content: None,
            likes: 0,
            dislikes: 0,
            agrees: 0,
            disagrees: 0,
            reply_count: 0,
            created_at,
        }
    }

    pub fn total_reactions(&self) -> u64 {
        self.likes
            .saturating_add(self.dislikes)
            .saturating_add(self.agrees)
            .saturating_add(self.disagrees)
    }

    pub fn positive_reactions(&self) -> u64 {
        self.likes.saturating_add(self.agrees)
    }

    /// A comment's own reactions scored as item metrics, with replies standing
    /// in for the comments signal.
    pub fn to_metrics(&self) -> EngagementMetrics {
        EngagementMetrics {
            likes: self.likes,
            dislikes: self.dislikes,
            agrees: self.agrees,
            disagrees: self.disagrees,
            comments: self.reply_count,
            ..EngagementMetrics::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    Simple,
    Quote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRecord {
    pub share_type: ShareType,
    #[serde(default)]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ShareRecord {
    pub fn simple(created_at: DateTime<Utc>) -> Self {
        Self {
            share_type: ShareType::Simple,
            content: None,
            created_at,
        }
    }

    pub fn quote(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            share_type: ShareType::Quote,
            content: Some(content.into()),
            created_at,
        }
    }

    pub fn quote_length(&self) -> usize {
        self.content
            .as_deref()
            .map(|content| content.trim().chars().count())
            .unwrap_or(0)
    }
}
