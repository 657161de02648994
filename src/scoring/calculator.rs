use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::{Algorithm, EngagementConfig, ScoreAdjustments};
use crate::hours_between;
use crate::metrics::EngagementMetrics;
use crate::scoring::controversy::{ControversyAdjustment, ControversyDetector};
use crate::scoring::decay::{NewContentBoost, TimeDecay};
use crate::scoring::quality::{apply_quality_bias, quality_ratio, QualityAdjustment};
use crate::scoring::weighted::{ScoreTerm, WeightedScorer};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReputationAdjustment {
    pub reputation: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeAdjustment {
    pub source_min: f64,
    pub source_max: f64,
    pub target_min: f64,
    pub target_max: f64,
}

/// Per-term accounting of how a score was composed. Modifier fields are
/// `None` when the modifier is disabled in the active configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub terms: Vec<ScoreTerm>,
    pub weighted_sum: f64,
    pub age_hours: f64,
    pub time_decay: Option<f64>,
    pub new_content_bonus: Option<f64>,
    pub controversy: Option<ControversyAdjustment>,
    pub quality: Option<QualityAdjustment>,
    pub reputation: Option<ReputationAdjustment>,
    pub combined_score: f64,
    pub range: Option<RangeAdjustment>,
    pub final_score: f64,
}

impl ScoreBreakdown {
    pub fn term(&self, name: &str) -> Option<&ScoreTerm> {
        self.terms.iter().find(|term| term.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub algorithm: Algorithm,
}

/// Scores items against one borrowed configuration snapshot.
#[derive(Debug, Clone)]
pub struct ScoreCalculator<'a> {
    config: &'a EngagementConfig,
    weighted: WeightedScorer,
}

impl<'a> ScoreCalculator<'a> {
    pub fn new(config: &'a EngagementConfig) -> Self {
        Self {
            config,
            weighted: WeightedScorer::new(config.weights.clone()),
        }
    }

    pub fn config(&self) -> &EngagementConfig {
        self.config
    }

    /// Full single-item score. Range scaling, when enabled, maps from the
    /// configured typical bounds.
    pub fn score(
        &self,
        metrics: &EngagementMetrics,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
        author_reputation: Option<f64>,
    ) -> ScoreResult {
        let mut breakdown = self.evaluate(metrics, created_at, now, author_reputation);
        let adjustments = &self.config.adjustments;
        self.adjust(
            &mut breakdown,
            (adjustments.typical_min, adjustments.typical_max),
        );
        debug!(
            algorithm = %self.config.algorithm,
            score = breakdown.final_score,
            weighted_sum = breakdown.weighted_sum,
            "scored item"
        );
        self.finish(breakdown)
    }

    /// Every step up to, but not including, range adjustments.
    pub fn evaluate(
        &self,
        metrics: &EngagementMetrics,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
        author_reputation: Option<f64>,
    ) -> ScoreBreakdown {
        let modifiers = &self.config.modifiers;
        let terms = self.weighted.terms(metrics);
        let weighted_sum = finite_or_zero(terms.iter().map(|term| term.contribution).sum());
        let age_hours = hours_between(created_at, now);

        let mut score = weighted_sum;

        let time_decay = if modifiers.time_decay_enabled {
            let decay = TimeDecay::new(modifiers.time_decay_factor).multiplier(age_hours);
            score *= decay;
            Some(decay)
        } else {
            None
        };

        let new_content_bonus = if modifiers.new_content_boost {
            let bonus = NewContentBoost::new(
                modifiers.new_content_bonus,
                modifiers.new_content_window_hours,
            )
            .bonus(age_hours);
            if let Some(bonus) = bonus {
                score += bonus;
            }
            bonus
        } else {
            None
        };

        let controversy = if modifiers.controversy_boost {
            let detector = ControversyDetector::from_modifiers(modifiers);
            let (boosted, adjustment) = detector.apply(score, metrics.agrees, metrics.disagrees);
            score = boosted;
            Some(adjustment)
        } else {
            None
        };

        let quality = if modifiers.quality_bias {
            let ratio = quality_ratio(metrics, &self.config.weights);
            let (biased, adjustment) = apply_quality_bias(score, ratio);
            score = biased;
            Some(adjustment)
        } else {
            None
        };

        let reputation = match author_reputation {
            Some(reputation)
                if reputation.is_finite() && modifiers.author_reputation_weight != 0.0 =>
            {
                let contribution = reputation * modifiers.author_reputation_weight;
                score += contribution;
                Some(ReputationAdjustment {
                    reputation,
                    weight: modifiers.author_reputation_weight,
                    contribution,
                })
            }
            _ => None,
        };

        let combined_score = finite_or_zero(score);
        ScoreBreakdown {
            terms,
            weighted_sum,
            age_hours,
            time_decay,
            new_content_bonus,
            controversy,
            quality,
            reputation,
            combined_score,
            range: None,
            final_score: combined_score,
        }
    }

    /// Applies the configured floor/ceiling, or rescales from `source_bounds`
    /// when `scale_to_range` is set.
    pub fn adjust(&self, breakdown: &mut ScoreBreakdown, source_bounds: (f64, f64)) {
        let (final_score, range) =
            apply_range(breakdown.combined_score, &self.config.adjustments, source_bounds);
        breakdown.final_score = final_score;
        breakdown.range = range;
    }

    pub fn finish(&self, breakdown: ScoreBreakdown) -> ScoreResult {
        ScoreResult {
            score: breakdown.final_score,
            breakdown,
            algorithm: self.config.algorithm,
        }
    }
}

fn apply_range(
    score: f64,
    adjustments: &ScoreAdjustments,
    (source_min, source_max): (f64, f64),
) -> (f64, Option<RangeAdjustment>) {
    match (adjustments.scale_to_range, adjustments.min_score, adjustments.max_score) {
        (true, Some(target_min), Some(target_max)) => {
            let position = if source_max > source_min {
                ((score - source_min) / (source_max - source_min)).clamp(0.0, 1.0)
            } else {
                0.5
            };
            let scaled = target_min + position * (target_max - target_min);
            (
                scaled,
                Some(RangeAdjustment {
                    source_min,
                    source_max,
                    target_min,
                    target_max,
                }),
            )
        }
        _ => {
            let mut clamped = score;
            if let Some(min) = adjustments.min_score {
                clamped = clamped.max(min);
            }
            if let Some(max) = adjustments.max_score {
                clamped = clamped.min(max);
            }
            (clamped, None)
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
