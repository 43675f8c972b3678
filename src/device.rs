use crate::connection::Connection;
use crate::error::Result;
use crate::probe::{device_url, probe};
use crate::protocol::Dialect;
use crate::types::{SourceId, SwitchState, ZoneId};
use std::time::Duration;

/// A matrix whose dialect has been negotiated
///
/// The dialect is fixed for the lifetime of the value.
pub struct Device {
    host: String,
    dialect: Dialect,
    connection: Connection,
    request_timeout: Duration,
}

impl Device {
    /// Probe `host` and bind it to the dialect it answers
    pub async fn connect(
        host: String,
        connection: Connection,
        probe_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let dialect = probe(&connection, &host, probe_timeout).await?;

        Ok(Self {
            host,
            dialect,
            connection,
            request_timeout,
        })
    }

    /// Get the device's host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the negotiated dialect
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Fetch the status table and decode one zone from it
    pub async fn poll(&self, zone: ZoneId) -> SwitchState {
        let Some(path) = self.dialect.status_path() else {
            return SwitchState::Unavailable;
        };

        match self
            .connection
            .request(&device_url(&self.host, path), self.request_timeout)
            .await
        {
            Ok(body) => self.dialect.decode(&body, zone),
            Err(e) => {
                tracing::warn!("Failed to poll zone {} on {}: {}", zone, self.host, e);
                SwitchState::Unavailable
            }
        }
    }

    /// Send a routing command without waiting for confirmation
    ///
    /// The firmware never acknowledges commands, so a failed request is only logged.
    pub async fn route(&self, zone: ZoneId, source: SourceId) {
        let Some(path) = self.dialect.command_path(zone, source) else {
            return;
        };

        tracing::debug!("Setting zone {} source to {}", zone, source);
        if let Err(e) = self
            .connection
            .request(&device_url(&self.host, &path), self.request_timeout)
            .await
        {
            tracing::warn!("Failed to send command to {}: {}", self.host, e);
        }
    }
}
