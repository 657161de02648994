use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

use engagement_scoring::scoring::{apply_quality_bias, quality_ratio, ControversyDetector, TimeDecay};
use engagement_scoring::{
    Algorithm, CommentEngagement, EngagementConfig, EngagementMetrics, EngagementWeights,
    RawEngagementCounts, ScoreCalculator, ScoringError, ShareMetrics,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn hours_ago(hours: i64) -> DateTime<Utc> {
    now() - Duration::hours(hours)
}

fn preset(algorithm: Algorithm) -> EngagementConfig {
    EngagementConfig::preset(algorithm).unwrap()
}

fn scenario_metrics() -> EngagementMetrics {
    EngagementMetrics {
        likes: 100,
        dislikes: 5,
        agrees: 40,
        disagrees: 38,
        comments: 20,
        shares: 10,
        views: 1000,
        community_notes: 0,
        reports: 0,
        ..EngagementMetrics::default()
    }
}

#[test]
fn standard_scenario_is_weighted_sum_without_modifiers() {
    let config = preset(Algorithm::Standard);
    let result = ScoreCalculator::new(&config).score(&scenario_metrics(), hours_ago(2), now(), None);

    assert!((result.score - 218.5).abs() < 1e-9);
    assert_eq!(result.algorithm, Algorithm::Standard);
    assert!((result.breakdown.weighted_sum - 218.5).abs() < 1e-9);
    assert!(result.breakdown.time_decay.is_none());
    assert!(result.breakdown.controversy.is_none());
    assert!(result.breakdown.quality.is_none());
    assert!(result.breakdown.reputation.is_none());
    assert!((result.breakdown.age_hours - 2.0).abs() < 1e-9);
}

#[test]
fn controversy_preset_ranks_split_item_higher() {
    let standard = preset(Algorithm::Standard);
    let controversy = preset(Algorithm::Controversy);
    let metrics = scenario_metrics();

    let base = ScoreCalculator::new(&standard).score(&metrics, hours_ago(2), now(), None);
    let boosted = ScoreCalculator::new(&controversy).score(&metrics, hours_ago(2), now(), None);

    assert!(boosted.score > base.score);
    let adjustment = boosted.breakdown.controversy.unwrap();
    assert!(adjustment.controversial);
    assert!((adjustment.multiplier - 1.5).abs() < 1e-9);
    assert!((boosted.score - 326.0 * 1.5).abs() < 1e-9);
    assert_eq!(boosted.algorithm, Algorithm::Controversy);
}

#[test]
fn reports_always_subtract() {
    let config = preset(Algorithm::Standard);
    let metrics = EngagementMetrics {
        reports: 2,
        ..EngagementMetrics::default()
    };
    let result = ScoreCalculator::new(&config).score(&metrics, now(), now(), None);

    let term = result.breakdown.term("reports").unwrap();
    assert!((term.contribution + 10.0).abs() < 1e-9);
    assert!((result.score + 10.0).abs() < 1e-9);
}

#[test]
fn sub_metrics_add_their_own_terms() {
    let config = preset(Algorithm::Standard);
    let metrics = EngagementMetrics::default()
        .with_comment_engagement(CommentEngagement {
            total_comment_reactions: 10,
            avg_reactions_per_comment: 5.0,
            comment_quality_score: 0.8,
        })
        .with_share_metrics(ShareMetrics {
            simple_shares_count: 1,
            quote_shares_count: 1,
            avg_quote_length: 20.0,
            recent_shares_boost: 2.0,
            share_quality_score: 0.5,
        });

    let result = ScoreCalculator::new(&config).score(&metrics, now(), now(), None);

    let comment_term = result.breakdown.term("comment_engagement").unwrap();
    let share_term = result.breakdown.term("enhanced_shares").unwrap();
    assert!((comment_term.contribution - 8.0).abs() < 1e-9);
    assert!((share_term.contribution - 10.0).abs() < 1e-9);
    assert!((result.score - 18.0).abs() < 1e-9);
}

#[test]
fn missing_sub_metrics_have_no_terms() {
    let config = preset(Algorithm::Standard);
    let result = ScoreCalculator::new(&config).score(&scenario_metrics(), now(), now(), None);

    assert!(result.breakdown.term("comment_engagement").is_none());
    assert!(result.breakdown.term("enhanced_shares").is_none());
}

#[test]
fn balanced_preset_decays_with_age() {
    let config = preset(Algorithm::Balanced);
    let metrics = EngagementMetrics {
        likes: 100,
        ..EngagementMetrics::default()
    };
    let calculator = ScoreCalculator::new(&config);

    let fresh = calculator.score(&metrics, hours_ago(2), now(), None);
    let stale = calculator.score(&metrics, hours_ago(48), now(), None);

    assert!(fresh.score > stale.score);
    let decay = stale.breakdown.time_decay.unwrap();
    assert!((decay - (-0.03f64 * 48.0).exp()).abs() < 1e-9);
}

#[test]
fn new_content_bonus_only_inside_window() {
    let config = preset(Algorithm::Balanced);
    let calculator = ScoreCalculator::new(&config);
    let metrics = EngagementMetrics::default();

    let brand_new = calculator.score(&metrics, now() - Duration::minutes(30), now(), None);
    let older = calculator.score(&metrics, hours_ago(2), now(), None);

    assert_eq!(brand_new.breakdown.new_content_bonus, Some(5.0));
    assert!((brand_new.score - 5.0).abs() < 1e-9);
    assert!(older.breakdown.new_content_bonus.is_none());
    assert!(older.score.abs() < 1e-9);
}

#[test]
fn time_decay_multiplier_is_bounded() {
    let decay = TimeDecay::new(0.1);
    assert!((decay.multiplier(0.0) - 1.0).abs() < 1e-12);
    assert!(decay.multiplier(10.0) < decay.multiplier(1.0));
    assert!(decay.multiplier(1_000.0) > 0.0);
}

#[test]
fn one_sided_reactions_are_never_controversial() {
    for threshold in [0.01, 0.1, 0.5, 0.9, 1.0] {
        let detector = ControversyDetector::new(threshold, 10, 1.5);
        assert!(!detector.is_controversial(10, 0));
        assert!(!detector.is_controversial(0, 10));
    }
}

#[test]
fn near_even_split_is_controversial_up_to_its_ratio() {
    for threshold in [0.1, 0.5, 0.9, 0.97, 0.98] {
        let detector = ControversyDetector::new(threshold, 10, 1.5);
        assert!(detector.is_controversial(50, 49), "threshold {}", threshold);
    }
    let strict = ControversyDetector::new(0.99, 10, 1.5);
    assert!(!strict.is_controversial(50, 49));
}

#[test]
fn controversy_requires_volume_floor() {
    let detector = ControversyDetector::new(0.5, 10, 1.5);
    assert!(!detector.is_controversial(1, 1));
    assert!(!detector.is_controversial(4, 5));
    assert!(detector.is_controversial(5, 5));
}

#[test]
fn controversy_boost_leaves_negative_scores_alone() {
    let detector = ControversyDetector::new(0.5, 10, 2.0);
    let (score, adjustment) = detector.apply(-4.0, 20, 20);
    assert!(adjustment.controversial);
    assert!((score + 4.0).abs() < 1e-12);
    assert!((adjustment.multiplier - 1.0).abs() < 1e-12);
}

#[test]
fn quality_ratio_defaults_to_neutral() {
    let weights = EngagementWeights::quality();
    let ratio = quality_ratio(&EngagementMetrics::default(), &weights);
    assert!((ratio - 0.5).abs() < 1e-12);

    let (score, adjustment) = apply_quality_bias(10.0, ratio);
    assert!((score - 10.0).abs() < 1e-12);
    assert!((adjustment.multiplier - 1.0).abs() < 1e-12);
}

#[test]
fn quality_preset_rewards_positive_engagement() {
    let config = preset(Algorithm::Quality);
    let calculator = ScoreCalculator::new(&config);

    let mixed = EngagementMetrics {
        likes: 10,
        dislikes: 10,
        ..EngagementMetrics::default()
    };
    let positive = EngagementMetrics {
        likes: 10,
        ..EngagementMetrics::default()
    };

    let mixed_result = calculator.score(&mixed, now(), now(), None);
    let positive_result = calculator.score(&positive, now(), now(), None);

    assert!((mixed_result.score - 2.0).abs() < 1e-9);
    assert!((positive_result.score - 18.0).abs() < 1e-9);
    assert!((positive_result.breakdown.quality.unwrap().ratio - 1.0).abs() < 1e-12);
}

#[test]
fn author_reputation_is_additive() {
    let config = preset(Algorithm::Standard);
    let calculator = ScoreCalculator::new(&config);
    let metrics = EngagementMetrics {
        likes: 10,
        ..EngagementMetrics::default()
    };

    let with_reputation = calculator.score(&metrics, now(), now(), Some(50.0));
    let reputation = with_reputation.breakdown.reputation.unwrap();

    assert!((reputation.contribution - 5.0).abs() < 1e-9);
    assert!((with_reputation.score - 15.0).abs() < 1e-9);

    let mut silent = config.clone();
    silent.modifiers.author_reputation_weight = 0.0;
    let ignored = ScoreCalculator::new(&silent).score(&metrics, now(), now(), Some(50.0));
    assert!(ignored.breakdown.reputation.is_none());
    assert!((ignored.score - 10.0).abs() < 1e-9);
}

#[test]
fn scale_to_range_maps_typical_bounds() {
    let mut config = preset(Algorithm::Standard);
    config.adjustments.scale_to_range = true;
    config.adjustments.min_score = Some(0.0);
    config.adjustments.max_score = Some(100.0);

    let result = ScoreCalculator::new(&config).score(&scenario_metrics(), now(), now(), None);

    assert!((result.score - 21.85).abs() < 1e-9);
    assert!((result.breakdown.combined_score - 218.5).abs() < 1e-9);
    assert!(result.breakdown.range.is_some());
}

#[test]
fn min_score_acts_as_floor() {
    let mut config = preset(Algorithm::Standard);
    config.adjustments.min_score = Some(0.0);
    let metrics = EngagementMetrics {
        reports: 3,
        ..EngagementMetrics::default()
    };

    let result = ScoreCalculator::new(&config).score(&metrics, now(), now(), None);
    assert!((result.score - 0.0).abs() < 1e-12);
    assert!(result.breakdown.combined_score < 0.0);
}

#[test]
fn negative_counts_are_rejected() {
    let raw = RawEngagementCounts {
        likes: 4,
        reports: -1,
        ..RawEngagementCounts::default()
    };
    match EngagementMetrics::try_from(raw) {
        Err(ScoringError::NegativeCount { field, value }) => {
            assert_eq!(field, "reports");
            assert_eq!(value, -1);
        }
        other => panic!("expected negative count error, got {:?}", other),
    }
}

#[test]
fn scoring_is_deterministic() {
    for algorithm in Algorithm::PRESETS {
        let config = preset(algorithm);
        let calculator = ScoreCalculator::new(&config);
        let first = calculator.score(&scenario_metrics(), hours_ago(3), now(), Some(12.0));
        let second = calculator.score(&scenario_metrics(), hours_ago(3), now(), Some(12.0));
        assert_eq!(first, second);
    }
}

fn random_metrics(rng: &mut StdRng) -> EngagementMetrics {
    EngagementMetrics {
        likes: rng.gen_range(0..500),
        dislikes: rng.gen_range(0..500),
        agrees: rng.gen_range(0..200),
        disagrees: rng.gen_range(0..200),
        comments: rng.gen_range(0..100),
        shares: rng.gen_range(0..100),
        views: rng.gen_range(0..10_000),
        community_notes: rng.gen_range(0..5),
        reports: rng.gen_range(0..20),
        ..EngagementMetrics::default()
    }
}

#[test]
fn likes_never_lower_and_penalties_never_raise_scores() {
    let mut rng = StdRng::seed_from_u64(42);

    for algorithm in Algorithm::PRESETS {
        let config = preset(algorithm);
        let calculator = ScoreCalculator::new(&config);

        for _ in 0..200 {
            let base = random_metrics(&mut rng);
            let created_at = now() - Duration::minutes(rng.gen_range(0..6_000));
            let step = rng.gen_range(1..50);
            let score = |metrics: &EngagementMetrics| {
                calculator.score(metrics, created_at, now(), None).score
            };
            let before = score(&base);

            let mut more_likes = base.clone();
            more_likes.likes += step;
            assert!(score(&more_likes) >= before, "{} likes", algorithm);

            let mut more_dislikes = base.clone();
            more_dislikes.dislikes += step;
            assert!(score(&more_dislikes) <= before, "{} dislikes", algorithm);

            let mut more_reports = base.clone();
            more_reports.reports += step;
            assert!(score(&more_reports) <= before, "{} reports", algorithm);
        }
    }
}

#[test]
fn extreme_counts_score_without_overflow() {
    let metrics = EngagementMetrics::try_from(RawEngagementCounts {
        dislikes: i64::MAX,
        disagrees: i64::MAX,
        reports: i64::MAX,
        ..RawEngagementCounts::default()
    })
    .unwrap();

    let config = preset(Algorithm::Quality);
    assert_eq!(quality_ratio(&metrics, &config.weights), 0.0);
    let result = ScoreCalculator::new(&config).score(&metrics, hours_ago(2), now(), None);
    assert!(result.score.is_finite());
    assert!(result.score < 0.0);

    for algorithm in Algorithm::PRESETS {
        let config = preset(algorithm);
        let result = ScoreCalculator::new(&config).score(&metrics, hours_ago(2), now(), None);
        assert!(result.score.is_finite(), "{} overflowed", algorithm);
    }
}

#[test]
fn controversy_volume_check_saturates() {
    let detector = ControversyDetector::new(0.7, 10, 1.5);
    assert!(detector.is_controversial(u64::MAX, u64::MAX));
    assert!(!detector.is_controversial(u64::MAX, 0));
}
