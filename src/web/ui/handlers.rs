use axum::{extract::State, response::IntoResponse};

use crate::web::server::AppState;

use super::templates::DashboardTemplate;

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let channel_label = state
        .config
        .channel
        .id
        .clone()
        .unwrap_or_else(|| "not configured".to_string());
    DashboardTemplate { channel_label }
}
