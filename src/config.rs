use crate::catalog::SourceCatalog;
use crate::error::{MatrixError, Result};
use crate::types::{SourceId, ZoneId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default timeout for each dialect probe request
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(4000);

/// Default timeout for status and command requests
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10000);

/// Configuration of one physical matrix
///
/// Mirrors the platform schema the matrix is usually configured with:
///
/// ```json
/// {
///   "host": "192.168.1.50",
///   "zones": { "1": { "name": "Living Room" }, "2": { "name": "Bar" } },
///   "sources": { "1": { "name": "Cable" }, "3": { "name": "Apple TV" } }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Host (address or `address:port`) of the matrix's web interface
    pub host: String,

    /// Zones keyed by output port
    pub zones: BTreeMap<ZoneId, ZoneConfig>,

    /// Sources keyed by input port
    pub sources: BTreeMap<SourceId, SourceConfig>,

    /// Timeout of each probe request, in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Timeout of status and command requests, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Zone configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Display name of the zone
    pub name: String,
}

/// Source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Display name of the source
    pub name: String,
}

fn default_probe_timeout_ms() -> u64 {
    millis(DEFAULT_PROBE_TIMEOUT)
}

fn default_request_timeout_ms() -> u64 {
    millis(DEFAULT_REQUEST_TIMEOUT)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl MatrixConfig {
    /// Create an empty configuration for a host
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            zones: BTreeMap::new(),
            sources: BTreeMap::new(),
            probe_timeout_ms: default_probe_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a zone
    pub fn with_zone(mut self, id: ZoneId, name: impl Into<String>) -> Self {
        self.zones.insert(id, ZoneConfig { name: name.into() });
        self
    }

    /// Add a source
    pub fn with_source(mut self, id: SourceId, name: impl Into<String>) -> Self {
        self.sources.insert(id, SourceConfig { name: name.into() });
        self
    }

    /// Override the probe and request timeouts
    pub fn with_timeouts(mut self, probe: Duration, request: Duration) -> Self {
        self.probe_timeout_ms = millis(probe);
        self.request_timeout_ms = millis(request);
        self
    }

    /// Get the probe timeout
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Get the status and command request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Check the configuration and build its source catalog
    pub fn validate(&self) -> Result<SourceCatalog> {
        if self.zones.is_empty() {
            return Err(MatrixError::NoZones);
        }

        SourceCatalog::new(
            self.sources
                .iter()
                .map(|(id, source)| (*id, source.name.clone())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_platform_schema() {
        let config = MatrixConfig::from_json(
            r#"{
                "host": "10.0.0.9",
                "zones": { "2": { "name": "Bar" }, "1": { "name": "Living Room" } },
                "sources": { "3": { "name": "Apple TV" }, "1": { "name": "Cable" } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.host, "10.0.0.9");
        let zone_ids: Vec<u8> = config.zones.keys().map(|id| id.get()).collect();
        assert_eq!(zone_ids, vec![1, 2]);
        assert_eq!(config.probe_timeout(), DEFAULT_PROBE_TIMEOUT);
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);

        let catalog = config.validate().unwrap();
        assert_eq!(catalog.names(), vec!["Cable", "Apple TV"]);
    }

    #[test]
    fn out_of_range_ids_fail_to_parse() {
        let result = MatrixConfig::from_json(
            r#"{ "host": "h", "zones": { "9": { "name": "Attic" } }, "sources": {} }"#,
        );
        assert!(matches!(result, Err(MatrixError::Json(_))));
    }

    #[test]
    fn validation_requires_zones_and_unique_names() {
        let empty = MatrixConfig::new("h");
        assert!(matches!(empty.validate(), Err(MatrixError::NoZones)));

        let duplicate = MatrixConfig::new("h")
            .with_zone(ZoneId::new(1).unwrap(), "Den")
            .with_source(SourceId::new(1).unwrap(), "TV")
            .with_source(SourceId::new(2).unwrap(), "TV");
        assert!(matches!(
            duplicate.validate(),
            Err(MatrixError::DuplicateSourceName(_))
        ));
    }
}
