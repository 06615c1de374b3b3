//! Service configuration.

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use clipcherry_core::payment::{PLACEHOLDER_BTC_XPUB, PLACEHOLDER_XRP_ACCOUNT};
use clipcherry_core::PlaceholderWallet;

/// Default session lifetime: one day.
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 60 * 60 * 24;

/// Upper bound on the configurable session lifetime: one year.
pub const MAX_SESSION_TTL_SECONDS: u64 = 60 * 60 * 24 * 365;

/// Where the front-end bundle is fetched from by default.
pub const DEFAULT_ASSETS_BASE_URL: &str =
    "https://raw.githubusercontent.com/carbidethegreate/clipcherry/main";

/// Which session store backs login sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// In-process map; sessions are lost on restart.
    Memory,
    /// `RocksDB` under `session_dir` (feature `rocksdb-backend`).
    Rocks,
}

impl FromStr for SessionBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "rocks" | "rocksdb" => Ok(Self::Rocks),
            other => Err(format!("unknown session backend: {other}")),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// `SQLite` database URL (default: "<sqlite://clipcherry.db?mode=rwc>").
    pub database_url: String,

    /// Session store backend (default: memory).
    pub session_backend: SessionBackend,

    /// Path to the `RocksDB` session directory (default: "data/sessions").
    pub session_dir: String,

    /// Session lifetime in seconds (default: 86400).
    pub session_ttl_seconds: u64,

    /// Interval between expired-session sweeps, in seconds (default: 300).
    pub session_sweep_seconds: u64,

    /// Server-side secret mixed into password digests (optional).
    pub password_pepper: Option<String>,

    /// Base URL static assets are fetched from.
    pub assets_base_url: String,

    /// Extended public key used for placeholder BTC deposit addresses.
    pub btc_xpub: String,

    /// Shared XRP account that receives tagged payments.
    pub xrp_account_address: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Wallet secrets file structure.
#[derive(Debug, Deserialize)]
struct WalletSecrets {
    btc_xpub: String,
    xrp_account_address: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let (btc_xpub, xrp_account_address) = load_wallet_secrets();
        let defaults = Self::default();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            session_backend: std::env::var("SESSION_BACKEND")
                .ok()
                .and_then(|s| {
                    s.parse()
                        .map_err(|e: String| tracing::warn!(error = %e, "Ignoring SESSION_BACKEND"))
                        .ok()
                })
                .unwrap_or(defaults.session_backend),
            session_dir: std::env::var("SESSION_DIR").unwrap_or(defaults.session_dir),
            session_ttl_seconds: env_parse("SESSION_TTL_SECONDS")
                .unwrap_or(defaults.session_ttl_seconds)
                .clamp(1, MAX_SESSION_TTL_SECONDS),
            session_sweep_seconds: env_parse("SESSION_SWEEP_SECONDS")
                .unwrap_or(defaults.session_sweep_seconds)
                .max(1),
            password_pepper: std::env::var("PASSWORD_PEPPER")
                .ok()
                .filter(|p| !p.is_empty()),
            assets_base_url: std::env::var("ASSETS_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.assets_base_url),
            btc_xpub,
            xrp_account_address,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: env_parse("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: env_parse("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }

    /// Session lifetime as a `chrono` duration.
    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        let secs = self.session_ttl_seconds.clamp(1, MAX_SESSION_TTL_SECONDS);
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000))
    }

    /// The wallet that hands out deposit destinations.
    #[must_use]
    pub fn wallet(&self) -> PlaceholderWallet {
        PlaceholderWallet::new(&self.btc_xpub, &self.xrp_account_address)
    }
}

/// Parse an environment variable, ignoring it when unset or malformed.
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key = %key, value = %raw, "Ignoring malformed setting");
            None
        }
    }
}

/// Load wallet settings from file or environment.
fn load_wallet_secrets() -> (String, String) {
    let secret_paths = [
        ".secrets/wallet.json",
        "clipcherry/.secrets/wallet.json",
        "../.secrets/wallet.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<WalletSecrets>(path) {
            tracing::info!(path = %path, "Loaded wallet secrets from file");
            return (secrets.btc_xpub, secrets.xrp_account_address);
        }
    }

    // Fall back to environment variables
    tracing::debug!("Wallet secrets file not found, using environment variables");
    (
        std::env::var("BTC_XPUB").unwrap_or_else(|_| PLACEHOLDER_BTC_XPUB.into()),
        std::env::var("XRP_ACCOUNT_ADDRESS").unwrap_or_else(|_| PLACEHOLDER_XRP_ACCOUNT.into()),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            database_url: "sqlite://clipcherry.db?mode=rwc".into(),
            session_backend: SessionBackend::Memory,
            session_dir: "data/sessions".into(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            session_sweep_seconds: 300,
            password_pepper: None,
            assets_base_url: DEFAULT_ASSETS_BASE_URL.into(),
            btc_xpub: PLACEHOLDER_BTC_XPUB.into(),
            xrp_account_address: PLACEHOLDER_XRP_ACCOUNT.into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
