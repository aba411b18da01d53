use utoipa::OpenApi;

use crate::channel::{Point, PointOrigin};

use super::api::error::ErrorResponse;
use super::api::points::HistoryResponse;

#[derive(OpenApi)]
#[openapi(
    paths(super::api::points::last, super::api::points::history),
    components(schemas(Point, PointOrigin, HistoryResponse, ErrorResponse)),
    info(
        title = "Trackline API",
        description = "Read-only proxy over one GPS telemetry channel",
        version = "0.1.0"
    ),
    tags(
        (name = "points", description = "Latest point and recent history")
    )
)]
pub struct ApiDoc;
