pub mod comments;
pub mod shares;

pub use comments::calculate_comment_engagement;
pub use shares::calculate_share_metrics;
