use crate::types::ZoneId;
use std::time::Duration;
use thiserror::Error;

/// Result type for matrix operations
pub type Result<T> = std::result::Result<T, MatrixError>;

/// Errors that can occur when configuring or connecting to an HDMI matrix
#[derive(Error, Debug)]
pub enum MatrixError {
    /// Zone id outside 1-8
    #[error("Invalid zone id: {0}")]
    InvalidZoneId(u8),

    /// Source id outside 1-8
    #[error("Invalid source id: {0}")]
    InvalidSourceId(u8),

    /// Two sources were configured with the same name
    #[error("Duplicate source name: {0}")]
    DuplicateSourceName(String),

    /// No zones were configured
    #[error("No zones configured")]
    NoZones,

    /// Zone is not part of this matrix's configuration
    #[error("Unknown zone: {0}")]
    UnknownZone(ZoneId),

    /// Neither supported firmware dialect answered
    #[error("Error connecting to the HDMI matrix at {host}: no supported firmware dialect")]
    ProbeFailed {
        /// Host that was probed
        host: String,
    },

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a single HTTP exchange with the device
///
/// Every variant means "no data" to the caller.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Could not connect, or the connection failed mid-request
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Request did not complete within its timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Device answered with a non-2xx status
    #[error("HTTP status {0}")]
    Status(u16),
}
