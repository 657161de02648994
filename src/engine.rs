use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::aggregate;
use crate::batch::{self, AlgorithmMetrics, ScoringItem};
use crate::config::{Algorithm, ConfigUpdate, EngagementConfig};
use crate::error::Result;
use crate::metrics::{CommentEngagement, CommentRecord, EngagementMetrics, ShareMetrics, ShareRecord};
use crate::scoring::{ScoreCalculator, ScoreResult};
use crate::trending::{self, CommentScore, TrendingComments, TrendingOptions};

/// Scoring service holding the process-wide configuration. Every operation
/// loads one configuration snapshot up front, so a concurrent update is either
/// entirely visible to a call or not at all.
pub struct EngagementEngine {
    config: ArcSwap<EngagementConfig>,
}

impl Default for EngagementEngine {
    fn default() -> Self {
        Self::new(EngagementConfig::default())
    }
}

impl EngagementEngine {
    pub fn new(config: EngagementConfig) -> Self {
        Self {
            config: ArcSwap::new(Arc::new(config)),
        }
    }

    pub fn with_preset(algorithm: Algorithm) -> Self {
        Self::new(EngagementConfig::preset(algorithm).unwrap_or_default())
    }

    /// Owned copy of the live configuration.
    pub fn get_config(&self) -> EngagementConfig {
        EngagementConfig::clone(&self.config.load())
    }

    pub fn snapshot(&self) -> Arc<EngagementConfig> {
        self.config.load_full()
    }

    /// Merges `update` into the live configuration. The merged result is
    /// validated before it is swapped in.
    pub fn update_config(&self, update: &ConfigUpdate) -> Result<()> {
        loop {
            let current = self.config.load_full();
            let next = Arc::new(update.merged_into(&current));
            next.validate()?;

            let previous = self.config.compare_and_swap(&current, Arc::clone(&next));
            if Arc::ptr_eq(&*previous, &current) {
                info!(
                    from = %current.algorithm,
                    to = %next.algorithm,
                    weights = update.weights.is_some(),
                    modifiers = update.modifiers.is_some(),
                    adjustments = update.adjustments.is_some(),
                    aggregation = update.aggregation.is_some(),
                    "engagement config updated"
                );
                return Ok(());
            }
        }
    }

    pub fn apply_preset(&self, algorithm: Algorithm) {
        match EngagementConfig::preset(algorithm) {
            Some(preset) => self.config.store(Arc::new(preset)),
            None => {
                self.config.rcu(|current| {
                    let mut next = EngagementConfig::clone(current);
                    next.algorithm = algorithm;
                    next
                });
            }
        }
        info!(%algorithm, "engagement preset applied");
    }

    pub fn apply_preset_named(&self, name: &str) -> Result<Algorithm> {
        let algorithm: Algorithm = name.parse()?;
        self.apply_preset(algorithm);
        Ok(algorithm)
    }

    pub fn calculate_score(
        &self,
        metrics: &EngagementMetrics,
        created_at: DateTime<Utc>,
        author_reputation: Option<f64>,
    ) -> ScoreResult {
        self.calculate_score_at(metrics, created_at, author_reputation, Utc::now())
    }

    pub fn calculate_score_at(
        &self,
        metrics: &EngagementMetrics,
        created_at: DateTime<Utc>,
        author_reputation: Option<f64>,
        now: DateTime<Utc>,
    ) -> ScoreResult {
        let config = self.config.load();
        ScoreCalculator::new(&config).score(metrics, created_at, now, author_reputation)
    }

    pub fn batch_calculate_scores(&self, items: &[ScoringItem]) -> Vec<ScoreResult> {
        self.batch_calculate_scores_at(items, Utc::now())
    }

    pub fn batch_calculate_scores_at(
        &self,
        items: &[ScoringItem],
        now: DateTime<Utc>,
    ) -> Vec<ScoreResult> {
        let config = self.config.load_full();
        batch::batch_calculate_scores(&config, items, now)
    }

    pub fn get_algorithm_metrics(&self, items: &[ScoringItem]) -> AlgorithmMetrics {
        self.get_algorithm_metrics_at(items, Utc::now())
    }

    pub fn get_algorithm_metrics_at(
        &self,
        items: &[ScoringItem],
        now: DateTime<Utc>,
    ) -> AlgorithmMetrics {
        let config = self.config.load_full();
        batch::algorithm_metrics(&config, items, now)
    }

    pub fn calculate_comment_engagement(&self, comments: &[CommentRecord]) -> CommentEngagement {
        aggregate::calculate_comment_engagement(comments)
    }

    pub fn calculate_share_metrics(
        &self,
        shares: &[ShareRecord],
        post_created_at: DateTime<Utc>,
    ) -> ShareMetrics {
        self.calculate_share_metrics_at(shares, post_created_at, Utc::now())
    }

    pub fn calculate_share_metrics_at(
        &self,
        shares: &[ShareRecord],
        post_created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ShareMetrics {
        let config = self.config.load();
        aggregate::calculate_share_metrics(shares, post_created_at, now, &config.aggregation)
    }

    pub fn calculate_comment_score(
        &self,
        comment: &CommentRecord,
        author_reputation: Option<f64>,
    ) -> CommentScore {
        self.calculate_comment_score_at(comment, author_reputation, Utc::now())
    }

    pub fn calculate_comment_score_at(
        &self,
        comment: &CommentRecord,
        author_reputation: Option<f64>,
        now: DateTime<Utc>,
    ) -> CommentScore {
        let config = self.config.load();
        trending::calculate_comment_score(&config, comment, author_reputation, now)
    }

    pub fn find_trending_comments(
        &self,
        comments: &[CommentRecord],
        options: &TrendingOptions,
    ) -> TrendingComments {
        self.find_trending_comments_at(comments, options, Utc::now())
    }

    pub fn find_trending_comments_at(
        &self,
        comments: &[CommentRecord],
        options: &TrendingOptions,
        now: DateTime<Utc>,
    ) -> TrendingComments {
        let config = self.config.load_full();
        trending::find_trending_comments(&config, comments, options, now)
    }
}
