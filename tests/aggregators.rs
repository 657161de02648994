use chrono::{DateTime, Duration, TimeZone, Utc};

use engagement_scoring::{
    calculate_comment_engagement, calculate_share_metrics, hours_before, AggregationConfig,
    CommentRecord, ShareRecord,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn comment(id: &str, likes: u64, dislikes: u64, agrees: u64, disagrees: u64) -> CommentRecord {
    let mut comment = CommentRecord::new(id, now() - Duration::hours(1));
    comment.likes = likes;
    comment.dislikes = dislikes;
    comment.agrees = agrees;
    comment.disagrees = disagrees;
    comment
}

#[test]
fn empty_comment_set_is_neutral() {
    let engagement = calculate_comment_engagement(&[]);
    assert_eq!(engagement.total_comment_reactions, 0);
    assert!((engagement.comment_quality_score - 0.5).abs() < 1e-12);
    assert!((engagement.avg_reactions_per_comment - 0.0).abs() < 1e-12);
}

#[test]
fn comments_without_reactions_are_neutral() {
    let comments = vec![comment("a", 0, 0, 0, 0), comment("b", 0, 0, 0, 0)];
    let engagement = calculate_comment_engagement(&comments);
    assert_eq!(engagement.total_comment_reactions, 0);
    assert!((engagement.comment_quality_score - 0.5).abs() < 1e-12);
}

#[test]
fn comment_engagement_sums_and_ratios() {
    let comments = vec![comment("a", 6, 0, 2, 0), comment("b", 0, 1, 0, 1)];
    let engagement = calculate_comment_engagement(&comments);

    assert_eq!(engagement.total_comment_reactions, 10);
    assert!((engagement.avg_reactions_per_comment - 5.0).abs() < 1e-12);
    assert!((engagement.comment_quality_score - 0.8).abs() < 1e-12);
}

#[test]
fn empty_share_set_has_finite_defaults() {
    let metrics = calculate_share_metrics(&[], now(), now(), &AggregationConfig::default());
    assert!((metrics.avg_quote_length - 0.0).abs() < 1e-12);
    assert!(metrics.share_quality_score.is_finite());
    assert!((metrics.recent_shares_boost - 1.0).abs() < 1e-12);
    assert_eq!(metrics.simple_shares_count + metrics.quote_shares_count, 0);
}

#[test]
fn share_metrics_partition_and_blend() {
    let old = now() - Duration::hours(24);
    let shares = vec![
        ShareRecord::quote("hello world", old),
        ShareRecord::quote("abc", old),
        ShareRecord::simple(old),
        ShareRecord::simple(old),
    ];
    let metrics = calculate_share_metrics(
        &shares,
        now() - Duration::hours(48),
        now(),
        &AggregationConfig::default(),
    );

    assert_eq!(metrics.quote_shares_count, 2);
    assert_eq!(metrics.simple_shares_count, 2);
    assert!((metrics.avg_quote_length - 7.0).abs() < 1e-12);
    assert!((metrics.recent_shares_boost - 1.0).abs() < 1e-12);
    assert!((metrics.share_quality_score - 0.5625).abs() < 1e-9);
}

#[test]
fn quote_shares_score_above_simple_reshares() {
    let at = now() - Duration::hours(5);
    let config = AggregationConfig::default();
    let quotes = vec![ShareRecord::quote("a thoughtful addition", at); 3];
    let simples = vec![ShareRecord::simple(at); 3];

    let quote_metrics = calculate_share_metrics(&quotes, now() - Duration::hours(10), now(), &config);
    let simple_metrics = calculate_share_metrics(&simples, now() - Duration::hours(10), now(), &config);

    assert!(quote_metrics.share_quality_score > simple_metrics.share_quality_score);
    assert!(quote_metrics.share_quality_score <= 1.0);
    assert!((simple_metrics.avg_quote_length - 0.0).abs() < 1e-12);
}

#[test]
fn recent_burst_earns_boost() {
    let config = AggregationConfig::default();
    let post_created_at = now() - Duration::hours(10);
    let shares = vec![
        ShareRecord::simple(now() - Duration::minutes(10)),
        ShareRecord::simple(now() - Duration::hours(6)),
        ShareRecord::simple(now() - Duration::hours(7)),
        ShareRecord::simple(now() - Duration::hours(8)),
    ];

    let metrics = calculate_share_metrics(&shares, post_created_at, now(), &config);
    assert!((metrics.recent_shares_boost - 2.5).abs() < 1e-9);
}

#[test]
fn recent_boost_is_capped() {
    let config = AggregationConfig::default();
    let shares = vec![
        ShareRecord::simple(now() - Duration::minutes(5)),
        ShareRecord::simple(now() - Duration::minutes(20)),
        ShareRecord::simple(now() - Duration::hours(9)),
    ];

    let metrics = calculate_share_metrics(&shares, now() - Duration::hours(10), now(), &config);
    assert!((metrics.recent_shares_boost - config.max_recent_boost).abs() < 1e-12);
}

#[test]
fn young_post_gets_no_recency_boost() {
    let config = AggregationConfig::default();
    let shares = vec![ShareRecord::simple(now() - Duration::minutes(5)); 4];

    let metrics = calculate_share_metrics(&shares, now() - Duration::minutes(30), now(), &config);
    assert!((metrics.recent_shares_boost - 1.0).abs() < 1e-12);
}

#[test]
fn oversized_share_window_counts_every_share_without_boost() {
    let config = AggregationConfig {
        recent_share_window_hours: 1.0e12,
        ..AggregationConfig::default()
    };
    let shares = vec![
        ShareRecord::simple(now() - Duration::minutes(5)),
        ShareRecord::simple(now() - Duration::hours(9)),
    ];

    let metrics = calculate_share_metrics(&shares, now() - Duration::hours(10), now(), &config);
    assert!((metrics.recent_shares_boost - 1.0).abs() < 1e-12);
}

#[test]
fn hours_before_saturates_at_earliest_timestamp() {
    assert_eq!(hours_before(now(), 2.0), now() - Duration::hours(2));
    assert_eq!(hours_before(now(), -3.0), now());
    assert_eq!(hours_before(now(), 1.0e12), DateTime::<Utc>::MIN_UTC);
    assert_eq!(hours_before(now(), f64::INFINITY), DateTime::<Utc>::MIN_UTC);
}

#[test]
fn saturated_comment_counts_keep_a_balanced_ratio() {
    let mut heavy = comment("a", u64::MAX, u64::MAX, 0, 0);
    heavy.agrees = u64::MAX;
    heavy.disagrees = u64::MAX;

    let engagement = calculate_comment_engagement(&[heavy.clone(), heavy]);
    assert_eq!(engagement.total_comment_reactions, u64::MAX);
    assert!((engagement.comment_quality_score - 0.5).abs() < 1e-12);
    assert!(engagement.avg_reactions_per_comment.is_finite());
}
