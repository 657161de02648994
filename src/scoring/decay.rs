use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeDecay {
    pub factor: f64,
}

impl TimeDecay {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    /// `exp(-factor * age_hours)`, always in (0, 1].
    pub fn multiplier(&self, age_hours: f64) -> f64 {
        (-self.factor.max(0.0) * age_hours.max(0.0)).exp()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContentBoost {
    pub bonus: f64,
    pub window_hours: f64,
}

impl NewContentBoost {
    pub fn new(bonus: f64, window_hours: f64) -> Self {
        Self {
            bonus,
            window_hours,
        }
    }

    pub fn bonus(&self, age_hours: f64) -> Option<f64> {
        if age_hours < self.window_hours {
            Some(self.bonus)
        } else {
            None
        }
    }
}
