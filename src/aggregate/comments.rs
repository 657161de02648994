use crate::metrics::{CommentEngagement, CommentRecord};

/// Reduce a comment set to the sub-metrics the scorer consumes. An empty set,
/// or one without any reactions, yields a neutral 0.5 quality score.
pub fn calculate_comment_engagement(comments: &[CommentRecord]) -> CommentEngagement {
    if comments.is_empty() {
        return CommentEngagement::default();
    }

    let mut total_reactions = 0u64;
    let mut positive = 0.0;
    let mut total = 0.0;
    for comment in comments {
        total_reactions = total_reactions.saturating_add(comment.total_reactions());
        let liked = comment.likes as f64 + comment.agrees as f64;
        positive += liked;
        total += liked + comment.dislikes as f64 + comment.disagrees as f64;
    }

    let comment_quality_score = if total <= 0.0 { 0.5 } else { positive / total };

    CommentEngagement {
        total_comment_reactions: total_reactions,
        avg_reactions_per_comment: total / comments.len() as f64,
        comment_quality_score,
    }
}
