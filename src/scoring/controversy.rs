use serde::Serialize;

use crate::config::ScoringModifiers;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControversyAdjustment {
    pub divisiveness: f64,
    pub controversial: bool,
    pub multiplier: f64,
}

#[derive(Debug, Clone)]
pub struct ControversyDetector {
    threshold: f64,
    volume_floor: u64,
    multiplier: f64,
}

impl ControversyDetector {
    pub fn new(threshold: f64, volume_floor: u64, multiplier: f64) -> Self {
        Self {
            threshold: threshold.clamp(f64::EPSILON, 1.0),
            volume_floor,
            multiplier: multiplier.max(1.0),
        }
    }

    pub fn from_modifiers(modifiers: &ScoringModifiers) -> Self {
        Self::new(
            modifiers.controversy_threshold,
            modifiers.controversy_volume_floor,
            modifiers.controversy_multiplier,
        )
    }

    /// Minority share of the agree/disagree split relative to the majority,
    /// 0 for one-sided reactions and 1 for an exact tie.
    pub fn divisiveness(agrees: u64, disagrees: u64) -> f64 {
        let low = agrees.min(disagrees) as f64;
        let high = agrees.max(disagrees).max(1) as f64;
        low / high
    }

    pub fn is_controversial(&self, agrees: u64, disagrees: u64) -> bool {
        if agrees.saturating_add(disagrees) < self.volume_floor {
            return false;
        }
        Self::divisiveness(agrees, disagrees) >= self.threshold
    }

    /// Boosts positive scores of controversial items; negative scores are left
    /// alone so a boost never pushes an item further down.
    pub fn apply(&self, score: f64, agrees: u64, disagrees: u64) -> (f64, ControversyAdjustment) {
        let controversial = self.is_controversial(agrees, disagrees);
        let multiplier = if controversial && score > 0.0 {
            self.multiplier
        } else {
            1.0
        };
        (
            score * multiplier,
            ControversyAdjustment {
                divisiveness: Self::divisiveness(agrees, disagrees),
                controversial,
                multiplier,
            },
        )
    }
}
