use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::error::{Result, ScoringError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Standard,
    Controversy,
    Quality,
    Balanced,
    Custom,
}

impl Algorithm {
    pub const PRESETS: [Algorithm; 4] = [
        Algorithm::Standard,
        Algorithm::Controversy,
        Algorithm::Quality,
        Algorithm::Balanced,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Standard => "standard",
            Algorithm::Controversy => "controversy",
            Algorithm::Quality => "quality",
            Algorithm::Balanced => "balanced",
            Algorithm::Custom => "custom",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "standard" => Ok(Algorithm::Standard),
            "controversy" => Ok(Algorithm::Controversy),
            "quality" => Ok(Algorithm::Quality),
            "balanced" => Ok(Algorithm::Balanced),
            "custom" => Ok(Algorithm::Custom),
            _ => Err(ScoringError::UnknownAlgorithm(value.to_string())),
        }
    }
}

/// Multiplier per signal. `reports_weight` is a magnitude: reports always
/// subtract from the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementWeights {
    pub likes: f64,
    pub dislikes: f64,
    pub agrees: f64,
    pub disagrees: f64,
    pub comments: f64,
    pub shares: f64,
    pub views: f64,
    pub community_notes: f64,
    pub reports_weight: f64,
    pub comment_engagement: f64,
    pub enhanced_shares: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self::standard()
    }
}

impl EngagementWeights {
    pub fn standard() -> Self {
        Self {
            likes: 1.0,
            dislikes: -0.5,
            agrees: 1.5,
            disagrees: -0.5,
            comments: 2.0,
            shares: 3.0,
            views: 0.01,
            community_notes: 1.5,
            reports_weight: 5.0,
            comment_engagement: 10.0,
            enhanced_shares: 10.0,
        }
    }

    pub fn controversy() -> Self {
        Self {
            likes: 0.8,
            dislikes: 0.0,
            agrees: 2.0,
            disagrees: 2.0,
            comments: 3.0,
            shares: 2.5,
            views: 0.005,
            community_notes: 2.0,
            reports_weight: 5.0,
            comment_engagement: 8.0,
            enhanced_shares: 8.0,
        }
    }

    pub fn quality() -> Self {
        Self {
            likes: 1.2,
            dislikes: -1.0,
            agrees: 1.5,
            disagrees: -0.8,
            comments: 2.5,
            shares: 2.0,
            views: 0.002,
            community_notes: 3.0,
            reports_weight: 8.0,
            comment_engagement: 25.0,
            enhanced_shares: 20.0,
        }
    }

    pub fn balanced() -> Self {
        Self::standard().blend(&Self::quality(), 0.5)
    }

    fn blend(&self, other: &Self, weight: f64) -> Self {
        let mix = |a: f64, b: f64| a * (1.0 - weight) + b * weight;
        Self {
            likes: mix(self.likes, other.likes),
            dislikes: mix(self.dislikes, other.dislikes),
            agrees: mix(self.agrees, other.agrees),
            disagrees: mix(self.disagrees, other.disagrees),
            comments: mix(self.comments, other.comments),
            shares: mix(self.shares, other.shares),
            views: mix(self.views, other.views),
            community_notes: mix(self.community_notes, other.community_notes),
            reports_weight: mix(self.reports_weight, other.reports_weight),
            comment_engagement: mix(self.comment_engagement, other.comment_engagement),
            enhanced_shares: mix(self.enhanced_shares, other.enhanced_shares),
        }
    }

    fn values(&self) -> [(&'static str, f64); 11] {
        [
            ("likes", self.likes),
            ("dislikes", self.dislikes),
            ("agrees", self.agrees),
            ("disagrees", self.disagrees),
            ("comments", self.comments),
            ("shares", self.shares),
            ("views", self.views),
            ("community_notes", self.community_notes),
            ("reports_weight", self.reports_weight),
            ("comment_engagement", self.comment_engagement),
            ("enhanced_shares", self.enhanced_shares),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringModifiers {
    pub time_decay_enabled: bool,
    /// Per-hour exponential decay rate.
    pub time_decay_factor: f64,
    pub controversy_boost: bool,
    /// Minimum minority/majority split, in (0, 1].
    pub controversy_threshold: f64,
    pub controversy_multiplier: f64,
    /// Agrees + disagrees needed before a split can count as controversial.
    pub controversy_volume_floor: u64,
    pub quality_bias: bool,
    pub new_content_boost: bool,
    pub new_content_bonus: f64,
    pub new_content_window_hours: f64,
    pub author_reputation_weight: f64,
}

impl Default for ScoringModifiers {
    fn default() -> Self {
        Self {
            time_decay_enabled: false,
            time_decay_factor: 0.05,
            controversy_boost: false,
            controversy_threshold: 0.7,
            controversy_multiplier: 1.5,
            controversy_volume_floor: 10,
            quality_bias: false,
            new_content_boost: false,
            new_content_bonus: 5.0,
            new_content_window_hours: 1.0,
            author_reputation_weight: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreAdjustments {
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub scale_to_range: bool,
    /// Expected raw score bounds used when a single call is rescaled.
    pub typical_min: f64,
    pub typical_max: f64,
}

impl Default for ScoreAdjustments {
    fn default() -> Self {
        Self {
            min_score: None,
            max_score: None,
            scale_to_range: false,
            typical_min: 0.0,
            typical_max: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub recent_share_window_hours: f64,
    pub max_recent_boost: f64,
    pub quote_share_weight: f64,
    pub simple_share_weight: f64,
    /// Quote length, in characters, that earns the full length credit.
    pub quote_length_target: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            recent_share_window_hours: 1.0,
            max_recent_boost: 3.0,
            quote_share_weight: 1.0,
            simple_share_weight: 0.4,
            quote_length_target: 280.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    pub algorithm: Algorithm,
    pub weights: EngagementWeights,
    pub modifiers: ScoringModifiers,
    pub adjustments: ScoreAdjustments,
    pub aggregation: AggregationConfig,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl EngagementConfig {
    /// Built-in preset for `algorithm`. `Custom` has no preset.
    pub fn preset(algorithm: Algorithm) -> Option<Self> {
        match algorithm {
            Algorithm::Standard => Some(Self::standard()),
            Algorithm::Controversy => Some(Self::controversy()),
            Algorithm::Quality => Some(Self::quality()),
            Algorithm::Balanced => Some(Self::balanced()),
            Algorithm::Custom => None,
        }
    }

    fn standard() -> Self {
        Self {
            algorithm: Algorithm::Standard,
            weights: EngagementWeights::standard(),
            modifiers: ScoringModifiers::default(),
            adjustments: ScoreAdjustments::default(),
            aggregation: AggregationConfig::default(),
        }
    }

    fn controversy() -> Self {
        Self {
            algorithm: Algorithm::Controversy,
            weights: EngagementWeights::controversy(),
            modifiers: ScoringModifiers {
                controversy_boost: true,
                controversy_threshold: 0.6,
                author_reputation_weight: 0.05,
                ..ScoringModifiers::default()
            },
            adjustments: ScoreAdjustments::default(),
            aggregation: AggregationConfig::default(),
        }
    }

    fn quality() -> Self {
        Self {
            algorithm: Algorithm::Quality,
            weights: EngagementWeights::quality(),
            modifiers: ScoringModifiers {
                quality_bias: true,
                author_reputation_weight: 0.2,
                ..ScoringModifiers::default()
            },
            adjustments: ScoreAdjustments::default(),
            aggregation: AggregationConfig::default(),
        }
    }

    fn balanced() -> Self {
        Self {
            algorithm: Algorithm::Balanced,
            weights: EngagementWeights::balanced(),
            modifiers: ScoringModifiers {
                time_decay_enabled: true,
                time_decay_factor: 0.03,
                new_content_boost: true,
                author_reputation_weight: 0.15,
                ..ScoringModifiers::default()
            },
            adjustments: ScoreAdjustments::default(),
            aggregation: AggregationConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.weights.values() {
            ensure_finite(name, value)?;
        }

        let modifiers = &self.modifiers;
        ensure_finite("time_decay_factor", modifiers.time_decay_factor)?;
        ensure_finite("controversy_multiplier", modifiers.controversy_multiplier)?;
        ensure_finite("new_content_bonus", modifiers.new_content_bonus)?;
        ensure_finite("new_content_window_hours", modifiers.new_content_window_hours)?;
        ensure_finite("author_reputation_weight", modifiers.author_reputation_weight)?;
        if modifiers.time_decay_factor < 0.0 {
            return Err(invalid("time_decay_factor must be >= 0"));
        }
        if !(modifiers.controversy_threshold > 0.0 && modifiers.controversy_threshold <= 1.0) {
            return Err(invalid("controversy_threshold must be in (0, 1]"));
        }
        if modifiers.controversy_multiplier < 1.0 {
            return Err(invalid("controversy_multiplier must be >= 1"));
        }

        let adjustments = &self.adjustments;
        ensure_finite("typical_min", adjustments.typical_min)?;
        ensure_finite("typical_max", adjustments.typical_max)?;
        if let Some(min) = adjustments.min_score {
            ensure_finite("min_score", min)?;
        }
        if let Some(max) = adjustments.max_score {
            ensure_finite("max_score", max)?;
        }
        if let (Some(min), Some(max)) = (adjustments.min_score, adjustments.max_score) {
            if !(min < max) {
                return Err(invalid("min_score must be below max_score"));
            }
        }
        if adjustments.scale_to_range
            && (adjustments.min_score.is_none() || adjustments.max_score.is_none())
        {
            return Err(invalid("scale_to_range requires min_score and max_score"));
        }
        if !(adjustments.typical_min < adjustments.typical_max) {
            return Err(invalid("typical_min must be below typical_max"));
        }

        let aggregation = &self.aggregation;
        ensure_finite("recent_share_window_hours", aggregation.recent_share_window_hours)?;
        ensure_finite("max_recent_boost", aggregation.max_recent_boost)?;
        ensure_finite("quote_share_weight", aggregation.quote_share_weight)?;
        ensure_finite("simple_share_weight", aggregation.simple_share_weight)?;
        ensure_finite("quote_length_target", aggregation.quote_length_target)?;
        if !(aggregation.recent_share_window_hours > 0.0) {
            return Err(invalid("recent_share_window_hours must be > 0"));
        }
        if !(aggregation.max_recent_boost >= 1.0) {
            return Err(invalid("max_recent_boost must be >= 1"));
        }
        if !(aggregation.quote_share_weight > 0.0) || aggregation.simple_share_weight < 0.0 {
            return Err(invalid("share weights must be positive"));
        }
        if !(aggregation.quote_length_target > 0.0) {
            return Err(invalid("quote_length_target must be > 0"));
        }

        Ok(())
    }

    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => {
                let contents =
                    std::fs::read_to_string(path).map_err(|source| ScoringError::ConfigRead {
                        path: path.clone(),
                        source,
                    })?;
                let config: EngagementConfig = toml::from_str(&contents)?;
                info!(path = %path.display(), algorithm = %config.algorithm, "loaded engagement config");
                config
            }
            _ => EngagementConfig::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let write_err = |source| ScoringError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let payload = toml::to_string_pretty(self)?;
        std::fs::write(path, payload).map_err(write_err)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(name) = env::var("ENGAGEMENT_ALGORITHM") {
            if !name.trim().is_empty() {
                match name.parse::<Algorithm>() {
                    Ok(algorithm) if algorithm != self.algorithm => {
                        match EngagementConfig::preset(algorithm) {
                            Some(preset) => *self = preset,
                            None => self.algorithm = algorithm,
                        }
                        info!(%algorithm, "algorithm overridden from environment");
                    }
                    Ok(_) => {}
                    Err(err) => warn!(error = %err, "ignoring ENGAGEMENT_ALGORITHM"),
                }
            }
        }
        if let Some(value) = env_f64("ENGAGEMENT_TIME_DECAY_FACTOR") {
            self.modifiers.time_decay_factor = value;
        }
        if let Some(value) = env_f64("ENGAGEMENT_CONTROVERSY_THRESHOLD") {
            self.modifiers.controversy_threshold = value;
        }
        if let Some(value) = env_f64("ENGAGEMENT_AUTHOR_REPUTATION_WEIGHT") {
            self.modifiers.author_reputation_weight = value;
        }
    }
}

/// Partial configuration replacement. Each present section replaces the whole
/// section of the live config; absent sections are retained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub algorithm: Option<Algorithm>,
    pub weights: Option<EngagementWeights>,
    pub modifiers: Option<ScoringModifiers>,
    pub adjustments: Option<ScoreAdjustments>,
    pub aggregation: Option<AggregationConfig>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.algorithm.is_none()
            && self.weights.is_none()
            && self.modifiers.is_none()
            && self.adjustments.is_none()
            && self.aggregation.is_none()
    }

    pub fn merged_into(&self, current: &EngagementConfig) -> EngagementConfig {
        let mut next = current.clone();
        if let Some(algorithm) = self.algorithm {
            next.algorithm = algorithm;
        }
        if let Some(weights) = &self.weights {
            next.weights = weights.clone();
        }
        if let Some(modifiers) = &self.modifiers {
            next.modifiers = modifiers.clone();
        }
        if let Some(adjustments) = &self.adjustments {
            next.adjustments = adjustments.clone();
        }
        if let Some(aggregation) = &self.aggregation {
            next.aggregation = aggregation.clone();
        }
        next
    }
}

fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(&format!("{} must be finite", name)))
    }
}

fn invalid(message: &str) -> ScoringError {
    ScoringError::InvalidConfig(message.to_string())
}

fn env_f64(key: &str) -> Option<f64> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring malformed numeric override");
            None
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("ENGAGEMENT_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/engagement.toml")))
}
