//! Natal chart HTTP server.
//!
//! Environment:
//! - `NATAL_CONFIG`: path to `chart.toml` (default: `configs/chart.toml`)
//! - `HOST` / `PORT`: bind address, overriding the config file
//! - `SWISS_EPHEMERIS_PATH`: ephemeris data directory when the config has none
//! - `RUST_LOG`: log filter (default: info)

mod http;

use anyhow::Context;
use log::{info, warn};
use natal_chart::aspects::AspectTable;
use natal_chart::ephemeris::{house_system_code, set_ephemeris_path, SwissEphemerisAdapter};
use natal_chart::time::{parse_zone, NominatimGeocoder, TimeApiResolver};
use natal_chart::{ChartService, TimeResolver};
use natal_config::{load_chart_settings, validate_ephemeris_path, ChartSettings, DEFAULT_TIMEZONE};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::http::{create_router, AppState};

fn build_service(settings: &ChartSettings) -> anyhow::Result<ChartService> {
    let ephemeris = SwissEphemerisAdapter::new(&settings.ephemeris.path)?;
    let house_system = house_system_code(&settings.ephemeris.house_system)?;
    info!(
        "Swiss Ephemeris at {} using {} houses",
        settings.ephemeris.path.display(),
        settings.ephemeris.house_system
    );

    let default_zone = match parse_zone(&settings.timezone.default_zone) {
        Some(zone) => zone,
        None => {
            warn!(
                "Configured default timezone '{}' is not an IANA zone; using {}",
                settings.timezone.default_zone, DEFAULT_TIMEZONE
            );
            parse_zone(DEFAULT_TIMEZONE).context("built-in default timezone")?
        }
    };

    let geocoder = NominatimGeocoder::new(&settings.geocoder)?;
    let timezones = TimeApiResolver::new(&settings.timezone)?;
    let lookup_bound = settings.geocoder.timeout.max(settings.timezone.timeout) * 2;
    let time = TimeResolver::new(Arc::new(geocoder), Arc::new(timezones), default_zone)
        .with_lookup_timeout(lookup_bound);

    Ok(ChartService::new(
        time,
        Arc::new(ephemeris),
        Arc::new(AspectTable::standard()),
        house_system,
    ))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting natal chart server");

    let settings = load_chart_settings()?;

    // Environment writes are only sound before the runtime spawns workers
    validate_ephemeris_path(&settings.ephemeris.path)?;
    set_ephemeris_path(&settings.ephemeris.path)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    runtime.block_on(serve(settings))
}

async fn serve(settings: ChartSettings) -> anyhow::Result<()> {
    let service = build_service(&settings)?;
    let app = create_router(AppState::new(Arc::new(service)));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", settings.server.host, settings.server.port))?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
