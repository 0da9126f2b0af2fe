//! Error types for bar construction.

use thiserror::Error;

/// Result type alias for barmill operations.
pub type Result<T> = std::result::Result<T, BarmillError>;

/// Errors raised while configuring or running bar construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BarmillError {
    /// The bucketing unit is not one of the supported measures.
    #[error("Unknown bar unit '{0}', expected one of: time, tick, value, volume")]
    UnknownUnit(String),

    /// The bucket width is zero, negative or not finite.
    #[error("Invalid bar quantity {0}: must be a finite number greater than zero")]
    InvalidQuantity(f64),
}
