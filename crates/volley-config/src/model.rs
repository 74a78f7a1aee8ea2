// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Volley dispatch engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

use volley_core::types::CarrierKind;

/// Top-level Volley configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VolleyConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Upstream carrier credentials and default selection.
    #[serde(default)]
    pub carriers: CarrierSettings,

    /// Batch dispatcher pacing and paging settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "volley".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("volley").join("volley.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("volley.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Credentials for every supported carrier plus the configured default.
///
/// This struct is threaded explicitly into the dispatch engine at call
/// time; there is no process-wide mutable credential state.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CarrierSettings {
    /// Carrier used when a send names none.
    #[serde(default = "default_carrier")]
    pub default: CarrierKind,

    /// Per-upstream-call HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub onbuka: OnbukaConfig,

    #[serde(default)]
    pub eims_1: EimsAccountConfig,

    #[serde(default)]
    pub eims_2: EimsAccountConfig,

    #[serde(default)]
    pub eims_3: EimsAccountConfig,
}

impl Default for CarrierSettings {
    fn default() -> Self {
        Self {
            default: default_carrier(),
            request_timeout_secs: default_request_timeout_secs(),
            onbuka: OnbukaConfig::default(),
            eims_1: EimsAccountConfig::default(),
            eims_2: EimsAccountConfig::default(),
            eims_3: EimsAccountConfig::default(),
        }
    }
}

fn default_carrier() -> CarrierKind {
    CarrierKind::Onbuka
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Onbuka carrier credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OnbukaConfig {
    /// API key sent in the `Api-Key` header. `None` disables the carrier.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API secret folded into the request signature.
    #[serde(default)]
    pub api_secret: Option<String>,

    /// Application id carried in every send body.
    #[serde(default)]
    pub app_id: Option<String>,

    /// API base URL. Overridable for self-hosted relays and tests.
    #[serde(default = "default_onbuka_base_url")]
    pub base_url: String,
}

impl Default for OnbukaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            app_id: None,
            base_url: default_onbuka_base_url(),
        }
    }
}

fn default_onbuka_base_url() -> String {
    "https://api.onbuka.com/v3".to_string()
}

/// One EIMS gateway account. Three independent accounts are supported.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EimsAccountConfig {
    /// Account name. `None` disables this EIMS slot.
    #[serde(default)]
    pub account: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Comma-separated server URLs; the first entry is used.
    #[serde(default)]
    pub servers: Option<String>,
}

/// Batch dispatcher paging and pacing configuration.
///
/// The delay between pages is part of the dispatch contract (upstream rate
/// limits), not an incidental detail.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Recipients fetched per page. Bounded by the carrier per-call ceiling.
    #[serde(default = "default_page_size")]
    pub page_size: i64,

    /// Pages processed per dispatcher invocation before yielding.
    #[serde(default = "default_max_pages_per_run")]
    pub max_pages_per_run: u32,

    /// Fixed delay between pages, in milliseconds.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages_per_run: default_max_pages_per_run(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

fn default_page_size() -> i64 {
    100
}

fn default_max_pages_per_run() -> u32 {
    10
}

fn default_page_delay_ms() -> u64 {
    100
}
