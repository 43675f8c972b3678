//! Rust library for controlling networked HDMI matrix switches
//!
//! An HDMI matrix routes up to eight input sources to up to eight output
//! zones. Devices in the field run one of two incompatible web firmwares; this
//! library negotiates which one a device speaks and hides the difference:
//!
//! - Dialect probing against the device's status endpoints
//! - Per-zone state polling (current source, or unavailable when offline)
//! - Source selection, including the checksummed hex command frames
//! - Source id/name mapping for presentation
//!
//! # Quick Start
//!
//! ```no_run
//! use hdmi_matrix::{MatrixClient, MatrixConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MatrixConfig::from_json(r#"{
//!         "host": "192.168.1.50",
//!         "zones": { "1": { "name": "Living Room" }, "2": { "name": "Bar" } },
//!         "sources": { "1": { "name": "Cable" }, "2": { "name": "Apple TV" } }
//!     }"#)?;
//!
//!     // Probes the device once
//!     let matrix = MatrixClient::connect(config).await?;
//!     println!("Sources: {:?}", matrix.source_names());
//!
//!     // Route a source to every zone, then read back the routing
//!     matrix.set_zone_source(None, "Apple TV").await?;
//!     matrix.poll_all().await;
//!     for zone in matrix.zones() {
//!         println!("{}: {:?} {:?}", zone.name(), zone.power(), zone.source());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Client**: composition root, owns zones and the source catalog
//! - **Device**: a host bound to its negotiated dialect
//! - **Probe**: dialect negotiation
//! - **Protocol**: per-dialect status decoding and command encoding
//! - **Connection**: bounded-timeout HTTP GET transport

mod catalog;
mod client;
mod config;
mod connection;
mod device;
mod error;
mod probe;
mod protocol;
mod types;
mod zone;

// Public exports
pub use catalog::SourceCatalog;
pub use client::MatrixClient;
pub use config::{
    MatrixConfig, SourceConfig, ZoneConfig, DEFAULT_PROBE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
};
pub use connection::Connection;
pub use device::Device;
pub use error::{MatrixError, Result, TransportError};
pub use probe::probe;
pub use protocol::{cgi_checksum, cgi_frame, Dialect, AUTO_DATA_STATUS_PATH, CGI_STATUS_PATH};
pub use types::{PowerState, SourceId, SwitchState, ZoneId, ZoneState, MAX_PORT};
pub use zone::Zone;
