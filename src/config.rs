//! Server configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). See the README for the full list of
//! configuration keys.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level server configuration.
///
/// Loaded once at startup via [`ServerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Directory holding the JSON data files (`events.json` and friends).
    pub data_dir: PathBuf,

    /// Secret key used to sign and verify v2 ticket tokens.
    pub ticket_signing_key: String,

    /// Master switch for the reminder scheduler.
    pub scheduler_enabled: bool,

    /// Seconds between reminder scheduler ticks.
    pub scheduler_tick_secs: u64,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let data_dir = PathBuf::from(
            std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
        );

        // Development fallback only. Production deployments must set their
        // own key or previously issued signed tickets stop verifying.
        let ticket_signing_key = std::env::var("TICKET_SIGNING_KEY")
            .unwrap_or_else(|_| "planora-dev-ticket-key".to_string());

        let scheduler_enabled = parse_env_bool("SCHEDULER_ENABLED", true);
        let scheduler_tick_secs = parse_env("SCHEDULER_TICK_SECS", 60);

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 10_000);

        Ok(Self {
            listen_addr,
            data_dir,
            ticket_signing_key,
            scheduler_enabled,
            scheduler_tick_secs,
            event_bus_capacity,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}
