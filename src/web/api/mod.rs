pub mod error;
pub mod points;
