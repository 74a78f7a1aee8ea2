// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./volley.toml` > `~/.config/volley/volley.toml` >
//! `/etc/volley/volley.toml` with environment variable overrides via the
//! `VOLLEY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VolleyConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/volley/volley.toml` (system-wide)
/// 3. `~/.config/volley/volley.toml` (user XDG config)
/// 4. `./volley.toml` (local directory)
/// 5. `VOLLEY_*` environment variables
pub fn load_config() -> Result<VolleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VolleyConfig::default()))
        .merge(Toml::file("/etc/volley/volley.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("volley/volley.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("volley.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<VolleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VolleyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VolleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VolleyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `VOLLEY_CARRIERS_ONBUKA_API_KEY` must
/// map to `carriers.onbuka.api_key`, not `carriers.onbuka.api.key`, and the
/// `eims_1` section name itself contains an underscore.
fn env_provider() -> Env {
    Env::prefixed("VOLLEY_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: VOLLEY_CARRIERS_EIMS_1_ACCOUNT -> "carriers_eims_1_account"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("carriers_onbuka_", "carriers.onbuka.", 1)
            .replacen("carriers_eims_1_", "carriers.eims_1.", 1)
            .replacen("carriers_eims_2_", "carriers.eims_2.", 1)
            .replacen("carriers_eims_3_", "carriers.eims_3.", 1)
            .replacen("carriers_", "carriers.", 1)
            .replacen("service_", "service.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("dispatch_", "dispatch.", 1);
        mapped.into()
    })
}
