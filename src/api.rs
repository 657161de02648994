use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use engagement_scoring::{
    hours_before, CommentRecord, EngagementConfig, EngagementMetrics, RawEngagementCounts,
    ScoreResult, ScoringItem, ShareRecord, TrendingOptions,
};

#[derive(Debug, Deserialize)]
pub struct ApiScoreRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub metrics: RawEngagementCounts,
    pub created_at: Option<DateTime<Utc>>,
    pub age_hours: Option<f64>,
    pub author_reputation: Option<f64>,
    pub comments: Option<Vec<CommentRecord>>,
    pub shares: Option<Vec<ShareRecord>>,
}

impl ApiScoreRequest {
    /// Validates counters and derives comment/share sub-metrics from raw
    /// records when the caller supplied them, using the aggregation settings
    /// of `config`.
    pub fn into_item(
        self,
        config: &EngagementConfig,
        now: DateTime<Utc>,
    ) -> Result<ScoringItem, String> {
        let created_at = match (self.created_at, self.age_hours) {
            (Some(created_at), _) => created_at,
            (None, Some(age_hours)) => {
                if !age_hours.is_finite() || age_hours < 0.0 {
                    return Err(format!("invalid age_hours: {}", age_hours));
                }
                hours_before(now, age_hours)
            }
            (None, None) => now,
        };

        let metrics = EngagementMetrics::try_from(self.metrics).map_err(|err| err.to_string())?;
        let mut item = ScoringItem::new(metrics, created_at).with_records(
            self.comments.as_deref(),
            self.shares.as_deref(),
            &config.aggregation,
            now,
        );
        item.author_reputation = self.author_reputation;
        Ok(item)
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiBatchRequest {
    pub items: Vec<ApiScoreRequest>,
}

impl ApiBatchRequest {
    pub fn into_items(
        self,
        config: &EngagementConfig,
        now: DateTime<Utc>,
    ) -> Result<(Vec<Option<String>>, Vec<ScoringItem>), String> {
        let mut ids = Vec::with_capacity(self.items.len());
        let mut items = Vec::with_capacity(self.items.len());
        for (index, request) in self.items.into_iter().enumerate() {
            ids.push(request.id.clone());
            let item = request
                .into_item(config, now)
                .map_err(|err| format!("item {}: {}", index, err))?;
            items.push(item);
        }
        Ok((ids, items))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiScoredItem {
    pub id: Option<String>,
    #[serde(flatten)]
    pub result: ScoreResult,
}

impl ApiScoredItem {
    pub fn zip(ids: Vec<Option<String>>, results: Vec<ScoreResult>) -> Vec<Self> {
        ids.into_iter()
            .zip(results)
            .map(|(id, result)| Self { id, result })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiPresetRequest {
    pub algorithm: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiTrendingRequest {
    pub comments: Vec<CommentRecord>,
    #[serde(default)]
    pub options: TrendingOptions,
}

#[derive(Debug, Deserialize)]
pub struct ApiCommentAggregateRequest {
    pub comments: Vec<CommentRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ApiShareAggregateRequest {
    pub shares: Vec<ShareRecord>,
    pub post_created_at: DateTime<Utc>,
}
