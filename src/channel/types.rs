use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PointOrigin {
    #[default]
    Live,
    Synthetic,
}

/// One normalized geographic reading. Coordinates are guaranteed finite and
/// in range by the parsing layer; `created_at` is the upstream timestamp
/// passed through verbatim (absent when upstream omits it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Point {
    #[serde(default)]
    pub source: PointOrigin,
    pub created_at: Option<String>,
    pub lat: f64,
    pub lng: f64,
}
