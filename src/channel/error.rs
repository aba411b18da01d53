use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel id is not configured")]
    MissingChannelId,
    #[error("invalid coordinates from channel: {0}")]
    Validation(String),
    #[error("channel returned status {status}")]
    Upstream { status: u16 },
    #[error("channel request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl ChannelError {
    /// HTTP status the facade reports for this failure. Upstream failures
    /// propagate the upstream status; everything else without a better code
    /// maps to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            ChannelError::Validation(_) => 422,
            ChannelError::Upstream { status } => *status,
            ChannelError::MissingChannelId | ChannelError::Network(_) => 500,
        }
    }
}
