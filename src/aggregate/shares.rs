use chrono::{DateTime, Utc};

use crate::config::AggregationConfig;
use crate::{hours_before, hours_between};
use crate::metrics::{ShareMetrics, ShareRecord, ShareType};

const QUOTE_MIX_WEIGHT: f64 = 0.8;
const QUOTE_LENGTH_WEIGHT: f64 = 0.2;

pub fn calculate_share_metrics(
    shares: &[ShareRecord],
    post_created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    config: &AggregationConfig,
) -> ShareMetrics {
    if shares.is_empty() {
        return ShareMetrics::default();
    }

    let mut simple_shares_count = 0u64;
    let mut quote_shares_count = 0u64;
    let mut quote_length_total = 0usize;
    for share in shares {
        match share.share_type {
            ShareType::Simple => simple_shares_count += 1,
            ShareType::Quote => {
                quote_shares_count += 1;
                quote_length_total += share.quote_length();
            }
        }
    }

    let avg_quote_length = if quote_shares_count == 0 {
        0.0
    } else {
        quote_length_total as f64 / quote_shares_count as f64
    };

    ShareMetrics {
        simple_shares_count,
        quote_shares_count,
        avg_quote_length,
        recent_shares_boost: recent_shares_boost(shares, post_created_at, now, config),
        share_quality_score: share_quality_score(
            simple_shares_count,
            quote_shares_count,
            avg_quote_length,
            config,
        ),
    }
}

/// Ratio of the share fraction seen inside the recency window to the fraction
/// a uniform share rate over the post's lifetime would put there.
fn recent_shares_boost(
    shares: &[ShareRecord],
    post_created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    config: &AggregationConfig,
) -> f64 {
    let window_hours = config.recent_share_window_hours;
    let window_start = hours_before(now, window_hours);
    let recent = shares
        .iter()
        .filter(|share| share.created_at >= window_start)
        .count();
    if recent == 0 {
        return 1.0;
    }

    let post_age_hours = hours_between(post_created_at, now).max(window_hours);
    let expected_fraction = window_hours / post_age_hours;
    let recent_fraction = recent as f64 / shares.len() as f64;

    (recent_fraction / expected_fraction).clamp(1.0, config.max_recent_boost)
}

fn share_quality_score(
    simple: u64,
    quote: u64,
    avg_quote_length: f64,
    config: &AggregationConfig,
) -> f64 {
    let total = simple + quote;
    if total == 0 {
        return 0.0;
    }

    let weighted = quote as f64 * config.quote_share_weight
        + simple as f64 * config.simple_share_weight;
    let mix = (weighted / (total as f64 * config.quote_share_weight)).clamp(0.0, 1.0);
    let quote_fraction = quote as f64 / total as f64;
    let length_factor = (avg_quote_length / config.quote_length_target).min(1.0) * quote_fraction;

    (QUOTE_MIX_WEIGHT * mix + QUOTE_LENGTH_WEIGHT * length_factor).clamp(0.0, 1.0)
}
