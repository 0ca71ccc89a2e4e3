use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

const CONFIG_PATHS: &[&str] = &["configs/chart.toml", "../../configs/chart.toml"];

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Appended to every query, e.g. "Brazil". Empty disables it.
    pub country_hint: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimezoneSettings {
    pub base_url: String,
    pub timeout: Duration,
    /// IANA zone used when the coordinate lookup comes back empty.
    pub default_zone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisConfig {
    pub path: PathBuf,
    pub house_system: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub server: ServerSettings,
    pub geocoder: GeocoderSettings,
    pub timezone: TimezoneSettings,
    pub ephemeris: EphemerisConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ServerToml {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GeocoderToml {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    user_agent: Option<String>,
    #[serde(default)]
    country_hint: Option<String>,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TimezoneToml {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default)]
    default_zone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EphemerisToml {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    house_system: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    server: Option<ServerToml>,
    #[serde(default)]
    geocoder: Option<GeocoderToml>,
    #[serde(default)]
    timezone: Option<TimezoneToml>,
    #[serde(default)]
    ephemeris: Option<EphemerisToml>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_ephemeris_path() -> PathBuf {
    env::var("SWISS_EPHEMERIS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
}

/// Read `chart.toml` from `NATAL_CONFIG` or the usual relative locations.
///
/// Returns `Ok(None)` when no file exists; the caller falls back to defaults.
pub fn read_chart_toml_text() -> anyhow::Result<Option<String>> {
    if let Ok(explicit) = env::var("NATAL_CONFIG") {
        let text = fs::read_to_string(&explicit)
            .map_err(|e| anyhow::anyhow!("Could not read NATAL_CONFIG={explicit}: {e}"))?;
        return Ok(Some(text));
    }
    for p in CONFIG_PATHS {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(Some(c));
        }
    }
    Ok(None)
}

pub fn parse_chart_settings(text: &str) -> anyhow::Result<ChartSettings> {
    let root: RootConfigToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse chart.toml: {e}"))?;
    Ok(settings_from_root(root))
}

fn settings_from_root(root: RootConfigToml) -> ChartSettings {
    let server = root.server.unwrap_or_else(|| ServerToml {
        host: default_host(),
        port: default_port(),
    });
    let geocoder = root.geocoder.unwrap_or_else(|| GeocoderToml {
        timeout_secs: default_timeout_secs(),
        ..GeocoderToml::default()
    });
    let timezone = root.timezone.unwrap_or_else(|| TimezoneToml {
        timeout_secs: default_timeout_secs(),
        ..TimezoneToml::default()
    });
    let ephemeris = root.ephemeris.unwrap_or_default();

    ChartSettings {
        server: ServerSettings {
            host: server.host,
            port: server.port,
        },
        geocoder: GeocoderSettings {
            base_url: geocoder
                .base_url
                .unwrap_or_else(|| "https://nominatim.openstreetmap.org".to_string()),
            user_agent: geocoder
                .user_agent
                .unwrap_or_else(|| format!("natal-chart/{}", env!("CARGO_PKG_VERSION"))),
            country_hint: geocoder.country_hint.filter(|c| !c.trim().is_empty()),
            timeout: Duration::from_secs(geocoder.timeout_secs),
        },
        timezone: TimezoneSettings {
            base_url: timezone
                .base_url
                .unwrap_or_else(|| "https://timeapi.io".to_string()),
            timeout: Duration::from_secs(timezone.timeout_secs),
            default_zone: timezone
                .default_zone
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        },
        ephemeris: EphemerisConfig {
            path: ephemeris.path.unwrap_or_else(default_ephemeris_path),
            house_system: ephemeris
                .house_system
                .unwrap_or_else(|| "placidus".to_string()),
        },
    }
}

/// `HOST` and `PORT` win over the file, matching how the server is deployed.
fn apply_env_overrides(settings: &mut ChartSettings) {
    if let Ok(host) = env::var("HOST") {
        settings.server.host = host;
    }
    if let Some(port) = env::var("PORT").ok().and_then(|p| p.parse().ok()) {
        settings.server.port = port;
    }
}

pub fn validate_ephemeris_path(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!(
            "Ephemeris path does not exist: {}. Install the Swiss Ephemeris data files or set SWISS_EPHEMERIS_PATH.",
            path.display()
        );
    }
    Ok(())
}

pub fn load_chart_settings() -> anyhow::Result<ChartSettings> {
    let mut settings = match read_chart_toml_text()? {
        Some(text) => parse_chart_settings(&text)?,
        None => {
            log::info!("No chart.toml found in {:?}; using defaults", CONFIG_PATHS);
            settings_from_root(RootConfigToml::default())
        }
    };
    apply_env_overrides(&mut settings);
    Ok(settings)
}
