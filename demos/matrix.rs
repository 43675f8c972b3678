//! Poll an HDMI matrix and optionally route a source
//!
//! ```text
//! cargo run --example matrix -- 192.168.1.50
//! cargo run --example matrix -- 192.168.1.50 2 "Apple TV"
//! ```
//!
//! Zones and sources 1-8 are configured with generic names ("Zone 1",
//! "Input 1", ...). Set `RUST_LOG=hdmi_matrix=debug` to see the raw requests.

use hdmi_matrix::{MatrixClient, MatrixConfig, SourceId, ZoneId, MAX_PORT};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(host) = args.next() else {
        eprintln!("usage: matrix <host> [zone source-name]");
        std::process::exit(2);
    };

    let mut config = MatrixConfig::new(host);
    for id in 1..=MAX_PORT {
        config = config
            .with_zone(ZoneId::new(id)?, format!("Zone {}", id))
            .with_source(SourceId::new(id)?, format!("Input {}", id));
    }

    let matrix = MatrixClient::connect(config).await?;
    println!("Connected to {} ({:?})", matrix.host(), matrix.dialect());

    if let (Some(zone), Some(source)) = (args.next(), args.next()) {
        let zone = ZoneId::new(zone.parse()?)?;
        matrix.select(zone, &source).await?;
        println!("Routed {} to zone {}", source, zone);
    }

    matrix.poll_all().await;
    for zone in matrix.zones() {
        println!(
            "{:<8} {:?} {}",
            zone.name(),
            zone.power(),
            zone.source().unwrap_or_else(|| "-".to_string())
        );
    }

    Ok(())
}
