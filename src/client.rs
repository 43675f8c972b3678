use crate::catalog::SourceCatalog;
use crate::config::MatrixConfig;
use crate::connection::Connection;
use crate::device::Device;
use crate::error::{MatrixError, Result};
use crate::protocol::Dialect;
use crate::types::{SwitchState, ZoneId};
use crate::zone::Zone;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Client for one HDMI matrix
///
/// Construction probes the device once. Every later call uses that dialect,
/// so a `MatrixClient` can never talk to a device before negotiation finished.
/// Clones share the device and the zones' cached state.
#[derive(Clone)]
pub struct MatrixClient {
    device: Arc<Device>,
    catalog: Arc<SourceCatalog>,
    zones: Arc<BTreeMap<ZoneId, Zone>>,
}

impl MatrixClient {
    /// Probe the configured host and build a client for it
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hdmi_matrix::{MatrixClient, MatrixConfig, SourceId, ZoneId};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = MatrixConfig::new("192.168.1.50")
    ///         .with_zone(ZoneId::new(1)?, "Living Room")
    ///         .with_source(SourceId::new(1)?, "Cable")
    ///         .with_source(SourceId::new(2)?, "Apple TV");
    ///
    ///     let matrix = MatrixClient::connect(config).await?;
    ///     matrix.select(ZoneId::new(1)?, "Apple TV").await?;
    ///     println!("{:?}", matrix.poll(ZoneId::new(1)?).await?);
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(config: MatrixConfig) -> Result<Self> {
        Self::connect_with(config, Connection::new()?).await
    }

    /// Same as [`MatrixClient::connect`] over an existing connection
    pub async fn connect_with(config: MatrixConfig, connection: Connection) -> Result<Self> {
        let catalog = Arc::new(config.validate()?);

        let device = Device::connect(
            config.host.clone(),
            connection,
            config.probe_timeout(),
            config.request_timeout(),
        )
        .await?;

        let zones: BTreeMap<ZoneId, Zone> = config
            .zones
            .into_iter()
            .map(|(id, zone)| {
                tracing::info!("Adding zone {} - {}", id, zone.name);
                (id, Zone::new(device.host(), id, zone.name, catalog.clone()))
            })
            .collect();

        Ok(Self {
            device: Arc::new(device),
            catalog,
            zones: Arc::new(zones),
        })
    }

    /// Get the host this client talks to
    pub fn host(&self) -> &str {
        self.device.host()
    }

    /// Get the negotiated firmware dialect
    pub fn dialect(&self) -> Dialect {
        self.device.dialect()
    }

    /// Get the source catalog
    pub fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }

    /// Source names ordered by ascending source id
    pub fn source_names(&self) -> Vec<String> {
        self.catalog.names()
    }

    /// Get handles for all configured zones, ordered by zone id
    pub fn zones(&self) -> Vec<Zone> {
        self.zones.values().cloned().collect()
    }

    /// Get the handle for a single zone, if it is configured
    pub fn zone(&self, id: ZoneId) -> Option<Zone> {
        self.zones.get(&id).cloned()
    }

    /// Poll the device for a zone's state and cache the result
    ///
    /// A device that is offline or answers garbage yields
    /// [`SwitchState::Unavailable`]; only an unconfigured zone is an error.
    pub async fn poll(&self, id: ZoneId) -> Result<SwitchState> {
        let zone = self.zones.get(&id).ok_or(MatrixError::UnknownZone(id))?;

        let result = self.device.poll(id).await;
        zone.update(result);
        Ok(result)
    }

    /// Poll every configured zone concurrently
    pub async fn poll_all(&self) -> Vec<(ZoneId, SwitchState)> {
        let polls = self.zones.values().map(|zone| async move {
            let result = self.device.poll(zone.id()).await;
            zone.update(result);
            (zone.id(), result)
        });

        join_all(polls).await
    }

    /// Route the named source to a zone
    ///
    /// Unknown source names are ignored. The command is sent once and never
    /// confirmed; send failures are logged, not returned.
    pub async fn select(&self, id: ZoneId, source_name: &str) -> Result<()> {
        if !self.zones.contains_key(&id) {
            return Err(MatrixError::UnknownZone(id));
        }

        let Some(source) = self.catalog.id_of(source_name) else {
            tracing::debug!("Ignoring unknown source {:?} for zone {}", source_name, id);
            return Ok(());
        };

        self.device.route(id, source).await;
        Ok(())
    }

    /// Route the named source to several zones
    ///
    /// `None` targets every configured zone. Listed zones that are not
    /// configured are skipped.
    pub async fn set_zone_source(
        &self,
        zones: Option<&[ZoneId]>,
        source_name: &str,
    ) -> Result<()> {
        let targets: Vec<ZoneId> = match zones {
            Some(ids) => ids
                .iter()
                .copied()
                .filter(|id| self.zones.contains_key(id))
                .collect(),
            None => self.zones.keys().copied().collect(),
        };

        for id in targets {
            self.select(id, source_name).await?;
        }

        Ok(())
    }
}
