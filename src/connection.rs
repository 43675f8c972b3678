use crate::error::{Result, TransportError};
use std::time::Duration;
use tokio::time::timeout;

/// Low-level HTTP transport to a matrix
///
/// Every request is a single GET with no retries. The caller-supplied timeout
/// bounds the whole exchange, body included.
#[derive(Clone)]
pub struct Connection {
    client: reqwest::Client,
}

impl Connection {
    /// Build a connection with a fresh HTTP client
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hdmi-matrix/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an existing `reqwest::Client`
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Issue a GET and return the raw response body
    pub async fn request(
        &self,
        url: &str,
        limit: Duration,
    ) -> std::result::Result<Vec<u8>, TransportError> {
        tracing::debug!("GET {}", url);

        let exchange = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| map_error(e, limit))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status(status.as_u16()));
            }

            let body = response.bytes().await.map_err(|e| map_error(e, limit))?;
            Ok::<_, TransportError>(body.to_vec())
        };

        let body = match timeout(limit, exchange).await {
            Ok(result) => result?,
            Err(_) => return Err(TransportError::Timeout(limit)),
        };

        tracing::debug!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

fn map_error(e: reqwest::Error, limit: Duration) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(limit)
    } else if let Some(status) = e.status() {
        TransportError::Status(status.as_u16())
    } else {
        TransportError::Connect(e.to_string())
    }
}
