use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{
    ApiBatchRequest, ApiCommentAggregateRequest, ApiPresetRequest, ApiScoreRequest,
    ApiScoredItem, ApiShareAggregateRequest, ApiTrendingRequest,
};
use engagement_scoring::{
    batch, AlgorithmMetrics, CommentEngagement, ConfigUpdate, EngagementConfig,
    EngagementEngine, ScoreCalculator, ShareMetrics, TrendingComments,
};

type ApiError = (StatusCode, String);

#[derive(Clone)]
struct AppState {
    engine: Arc<EngagementEngine>,
}

pub async fn serve(args: crate::ServeArgs, engine: EngagementEngine) -> Result<(), String> {
    let state = AppState {
        engine: Arc::new(engine),
    };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/config", get(get_config).put(update_config))
        .route("/api/config/preset", post(apply_preset))
        .route("/api/score", post(score_handler))
        .route("/api/score/batch", post(batch_handler))
        .route("/api/metrics", post(metrics_handler))
        .route("/api/comments/trending", post(trending_handler))
        .route("/api/aggregate/comments", post(comment_aggregate_handler))
        .route("/api/aggregate/shares", post(share_aggregate_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    info!(%addr, "engagement scoring server listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        format!("failed to bind server: {}", err)
    })?, app)
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn get_config(State(state): State<AppState>) -> Json<EngagementConfig> {
    Json(state.engine.get_config())
}

async fn update_config(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<EngagementConfig>, ApiError> {
    if update.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "empty config update".to_string()));
    }
    state.engine.update_config(&update).map_err(bad_request)?;
    Ok(Json(state.engine.get_config()))
}

async fn apply_preset(
    State(state): State<AppState>,
    Json(request): Json<ApiPresetRequest>,
) -> Result<Json<EngagementConfig>, ApiError> {
    state
        .engine
        .apply_preset_named(&request.algorithm)
        .map_err(bad_request)?;
    Ok(Json(state.engine.get_config()))
}

async fn score_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiScoreRequest>,
) -> Result<Json<ApiScoredItem>, ApiError> {
    let now = Utc::now();
    let config = state.engine.snapshot();
    let id = request.id.clone();
    let item = request
        .into_item(&config, now)
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let result = ScoreCalculator::new(&config).score(
        &item.metrics,
        item.created_at,
        now,
        item.author_reputation,
    );
    Ok(Json(ApiScoredItem { id, result }))
}

async fn batch_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiBatchRequest>,
) -> Result<Json<Vec<ApiScoredItem>>, ApiError> {
    let now = Utc::now();
    let config = state.engine.snapshot();
    let (ids, items) = request
        .into_items(&config, now)
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let results = batch::batch_calculate_scores(&config, &items, now);
    Ok(Json(ApiScoredItem::zip(ids, results)))
}

async fn metrics_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiBatchRequest>,
) -> Result<Json<AlgorithmMetrics>, ApiError> {
    let now = Utc::now();
    let config = state.engine.snapshot();
    let (_, items) = request
        .into_items(&config, now)
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    Ok(Json(batch::algorithm_metrics(&config, &items, now)))
}

async fn trending_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiTrendingRequest>,
) -> Json<TrendingComments> {
    Json(
        state
            .engine
            .find_trending_comments(&request.comments, &request.options),
    )
}

async fn comment_aggregate_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiCommentAggregateRequest>,
) -> Json<CommentEngagement> {
    Json(state.engine.calculate_comment_engagement(&request.comments))
}

async fn share_aggregate_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiShareAggregateRequest>,
) -> Json<ShareMetrics> {
    Json(
        state
            .engine
            .calculate_share_metrics(&request.shares, request.post_created_at),
    )
}

fn bad_request(err: engagement_scoring::ScoringError) -> ApiError {
    (StatusCode::BAD_REQUEST, err.to_string())
}
