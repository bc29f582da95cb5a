use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::recommendations;
use crate::error::{AppError, AppResult, ValidationError};
use crate::models::{parse_relevance_date, Recommendation, RecommendationType};

use super::AppState;

/// Filters accepted by the list endpoint.
///
/// At most one predicate applies per request; earlier fields win when
/// several are supplied.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub user_segment: Option<String>,
    pub product_id: Option<i32>,
    pub user_id: Option<i32>,
    pub recommendation_type: Option<String>,
    pub viewed_in_last7d: Option<bool>,
    pub bought_in_last30d: Option<bool>,
    pub last_relevance_date: Option<String>,
    /// Inclusive lower bound on `last_relevance_date`.
    pub since: Option<String>,
}

/// Liveness probe.
pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": 200, "message": "Healthy" }))
}

/// Root URL descriptor naming the service and its primary path.
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "Recommendations REST API Service",
        "version": env!("CARGO_PKG_VERSION"),
        "paths": "/recommendations",
    }))
}

/// Lists recommendations, optionally narrowed by a single query filter.
pub async fn list_recommendations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Recommendation>>> {
    tracing::info!("request for recommendation list");
    let pool = &state.pool;

    let recs = if let Some(segment) = params.user_segment {
        recommendations::find_by_user_segment(pool, &segment).await?
    } else if let Some(product_id) = params.product_id {
        recommendations::find_by_product_id(pool, product_id).await?
    } else if let Some(user_id) = params.user_id {
        recommendations::find_by_user_id(pool, user_id).await?
    } else if let Some(name) = params.recommendation_type {
        let recommendation_type = RecommendationType::from_name(&name)
            .ok_or(ValidationError::UnknownType(name))?;
        recommendations::find_by_recommendation_type(pool, recommendation_type).await?
    } else if let Some(viewed) = params.viewed_in_last7d {
        recommendations::find_by_viewed_in_last7d(pool, viewed).await?
    } else if let Some(bought) = params.bought_in_last30d {
        recommendations::find_by_bought_in_last30d(pool, bought).await?
    } else if let Some(raw) = params.last_relevance_date {
        recommendations::find_by_last_relevance_date(pool, parse_relevance_date(&raw)?).await?
    } else if let Some(raw) = params.since {
        recommendations::find_since_relevance_date(pool, parse_relevance_date(&raw)?).await?
    } else {
        recommendations::all(pool).await?
    };

    tracing::info!(count = recs.len(), "returning recommendations");
    Ok(Json(recs))
}

/// Retrieves a single recommendation by id.
pub async fn get_recommendation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Recommendation>> {
    tracing::info!(id, "request for recommendation");
    let rec = recommendations::find(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(rec))
}

/// Creates a recommendation from the posted JSON body.
///
/// Responds 201 with the stored record and a `Location` header pointing at
/// it. The `Json` extractor rejects non-JSON content types with 415.
pub async fn create_recommendation(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("request to create a recommendation");
    let mut rec = Recommendation::from_json(&body)?;
    let id = recommendations::create(&state.pool, &mut rec).await?;

    let location = format!("/recommendations/{id}");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(rec),
    ))
}

/// Replaces an existing recommendation with the posted JSON body.
pub async fn update_recommendation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> AppResult<Json<Recommendation>> {
    tracing::info!(id, "request to update recommendation");
    if recommendations::find(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let mut rec = Recommendation::from_json(&body)?;
    rec.id = Some(id);
    recommendations::update(&state.pool, &rec).await?;
    Ok(Json(rec))
}

/// Deletes a recommendation. Responds 204 whether or not the id existed.
pub async fn delete_recommendation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    tracing::info!(id, "request to delete recommendation");
    recommendations::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("recommendation with id '{id}' was not found"))
}
