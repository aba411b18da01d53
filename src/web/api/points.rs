use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::channel::{Point, PointOrigin};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Number of records to return, clamped into [1, 100]. Defaults to 10.
    #[serde(default)]
    pub results: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub source: PointOrigin,
    pub count: usize,
    pub points: Vec<Point>,
}

#[utoipa::path(
    get,
    path = "/api/last",
    responses(
        (status = 200, description = "Most recent channel point", body = Point),
        (status = 422, description = "Upstream record has invalid coordinates", body = ErrorResponse),
        (status = 500, description = "Channel not configured or unreachable", body = ErrorResponse)
    ),
    tag = "points"
)]
pub async fn last(State(state): State<AppState>) -> ApiResult<Json<Point>> {
    let point = state.channel.latest().await?;
    Ok(Json(point))
}

#[utoipa::path(
    get,
    path = "/api/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Recent channel points, newest first", body = HistoryResponse),
        (status = 500, description = "Channel not configured or unreachable", body = ErrorResponse)
    ),
    tag = "points"
)]
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let points = state.channel.history(query.results).await?;
    Ok(Json(HistoryResponse {
        source: PointOrigin::Live,
        count: points.len(),
        points,
    }))
}
