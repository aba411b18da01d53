mod client;
mod error;
pub mod parsing;
mod types;

pub use client::{ChannelClient, ChannelConfig};
pub use error::ChannelError;
pub use types::{Point, PointOrigin};
