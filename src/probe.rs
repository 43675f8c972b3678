use crate::connection::Connection;
use crate::error::{MatrixError, Result};
use crate::protocol::Dialect;
use std::time::Duration;

/// Build the URL of a device endpoint
pub(crate) fn device_url(host: &str, path: &str) -> String {
    format!("http://{}{}", host, path)
}

/// Determine which firmware dialect a matrix speaks
///
/// Each dialect's status endpoint is requested in [`Dialect::NEGOTIABLE`]
/// order and the first one whose body decodes into a complete routing table
/// wins. Nothing is cached; the caller keeps the result.
pub async fn probe(connection: &Connection, host: &str, limit: Duration) -> Result<Dialect> {
    tracing::info!("Probing HDMI matrix at {}", host);

    for dialect in Dialect::NEGOTIABLE {
        let Some(path) = dialect.status_path() else {
            continue;
        };

        match connection.request(&device_url(host, path), limit).await {
            Ok(body) if dialect.accepts(&body) => {
                tracing::info!("HDMI matrix at {} speaks {:?}", host, dialect);
                return Ok(dialect);
            }
            Ok(body) => {
                tracing::debug!("{} answered {} with {} unreadable bytes", host, path, body.len());
            }
            Err(e) => {
                tracing::debug!("{} did not answer {}: {}", host, path, e);
            }
        }
    }

    tracing::error!("Error connecting to the HDMI matrix at {}", host);
    Err(MatrixError::ProbeFailed {
        host: host.to_string(),
    })
}
