//! HTTP dispatch table.
//!
//! Handlers are deliberately thin: extract the path parameter, call the
//! service, serialize the result. All domain logic lives in the engines;
//! all error-to-status mapping lives on `ServiceError`.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use data_loader::ItemId;
use query_engine::{GenreUserReport, GenreYearPlaytime, RankedItem, SentimentBreakdown};
use recommender::ContentRecommendations;

use crate::error::ServiceError;
use crate::service::AnalyticsService;

/// Build the router over a ready service
pub fn router(service: AnalyticsService) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/PlayTimeGenre/:genre", get(play_time_genre))
        .route("/UserForGenre/:genre", get(user_for_genre))
        .route("/UsersRecommend/:year", get(users_recommend))
        .route("/UsersNotRecommend/:year", get(users_not_recommend))
        .route("/sentiment_analysis/:year", get(sentiment_analysis))
        .route("/recomendacion_juego/:item_id", get(game_recommendations))
        .route("/recomendacion_usuario/:user_id", get(user_recommendations))
        .with_state(service)
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Service descriptor for the root path
async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "service": "playlens",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/PlayTimeGenre/{genre}",
            "/UserForGenre/{genre}",
            "/UsersRecommend/{year}",
            "/UsersNotRecommend/{year}",
            "/sentiment_analysis/{year}",
            "/recomendacion_juego/{item_id}",
            "/recomendacion_usuario/{user_id}",
        ],
    }))
}

async fn play_time_genre(
    State(service): State<AnalyticsService>,
    Path(genre): Path<String>,
) -> Result<Json<GenreYearPlaytime>, ServiceError> {
    Ok(Json(service.play_time_genre(genre).await?))
}

async fn user_for_genre(
    State(service): State<AnalyticsService>,
    Path(genre): Path<String>,
) -> Result<Json<Option<GenreUserReport>>, ServiceError> {
    Ok(Json(service.user_for_genre(genre).await?))
}

async fn users_recommend(
    State(service): State<AnalyticsService>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<RankedItem>>, ServiceError> {
    Ok(Json(service.users_recommend(year).await?))
}

async fn users_not_recommend(
    State(service): State<AnalyticsService>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<RankedItem>>, ServiceError> {
    Ok(Json(service.users_not_recommend(year).await?))
}

async fn sentiment_analysis(
    State(service): State<AnalyticsService>,
    Path(year): Path<i32>,
) -> Result<Json<SentimentBreakdown>, ServiceError> {
    Ok(Json(service.sentiment_breakdown(year).await?))
}

async fn game_recommendations(
    State(service): State<AnalyticsService>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<ContentRecommendations>, ServiceError> {
    Ok(Json(service.recommend_for_item(item_id).await?))
}

async fn user_recommendations(
    State(service): State<AnalyticsService>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let mut recommendations: Vec<String> = service
        .recommend_for_user(user_id.clone())
        .await?
        .into_iter()
        .collect();
    // The engine contract is an unordered set; sort only so the JSON is
    // stable for clients that diff responses
    recommendations.sort();
    Ok(Json(json!({
        "user_id": user_id,
        "recommendations": recommendations,
    })))
}
