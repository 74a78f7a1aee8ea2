// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Carrier selection in one place.
//!
//! The registry maps a [`CarrierKind`] onto a live adapter built from the
//! configured credentials, so callers never branch on carrier identity.
//! Adapters are built lazily and cached; construction failures (missing
//! credentials) are configuration errors and are never cached.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use volley_config::model::CarrierSettings;
use volley_core::carrier::CarrierAdapter;
use volley_core::error::VolleyError;
use volley_core::types::CarrierKind;
use volley_eims::EimsCarrier;
use volley_onbuka::OnbukaCarrier;
use volley_smpp::SmppCarrier;

/// Config-driven carrier adapter registry.
pub struct CarrierRegistry {
    settings: CarrierSettings,
    timeout: Duration,
    adapters: DashMap<CarrierKind, Arc<dyn CarrierAdapter>>,
}

impl CarrierRegistry {
    /// Create a registry over the given carrier settings.
    pub fn from_settings(settings: CarrierSettings) -> Self {
        let timeout = Duration::from_secs(settings.request_timeout_secs);
        Self {
            settings,
            timeout,
            adapters: DashMap::new(),
        }
    }

    /// The carrier used when a send names none.
    pub fn default_carrier(&self) -> CarrierKind {
        self.settings.default
    }

    /// Pre-seed an adapter for a carrier slot, bypassing construction from
    /// settings. Used by embedded deployments and tests.
    pub fn register(&self, kind: CarrierKind, adapter: Arc<dyn CarrierAdapter>) {
        self.adapters.insert(kind, adapter);
    }

    /// Resolve the adapter for a carrier, building and caching it on first
    /// use. Missing credentials surface as a configuration error before any
    /// send is attempted.
    pub fn adapter_for(&self, kind: CarrierKind) -> Result<Arc<dyn CarrierAdapter>, VolleyError> {
        if let Some(adapter) = self.adapters.get(&kind) {
            return Ok(Arc::clone(adapter.value()));
        }

        let adapter: Arc<dyn CarrierAdapter> = match kind {
            CarrierKind::Onbuka => {
                Arc::new(OnbukaCarrier::new(&self.settings.onbuka, self.timeout)?)
            }
            CarrierKind::Eims1 => {
                Arc::new(EimsCarrier::new("eims_1", &self.settings.eims_1, self.timeout)?)
            }
            CarrierKind::Eims2 => {
                Arc::new(EimsCarrier::new("eims_2", &self.settings.eims_2, self.timeout)?)
            }
            CarrierKind::Eims3 => {
                Arc::new(EimsCarrier::new("eims_3", &self.settings.eims_3, self.timeout)?)
            }
            CarrierKind::Smpp => Arc::new(SmppCarrier::new()),
        };

        self.adapters.insert(kind, Arc::clone(&adapter));
        Ok(adapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_onbuka_is_a_config_error() {
        let registry = CarrierRegistry::from_settings(CarrierSettings::default());
        let err = registry.adapter_for(CarrierKind::Onbuka).unwrap_err();
        assert!(matches!(err, VolleyError::Config(_)));
    }

    #[test]
    fn unconfigured_eims_slots_name_themselves() {
        let registry = CarrierRegistry::from_settings(CarrierSettings::default());
        let err = registry.adapter_for(CarrierKind::Eims2).unwrap_err();
        assert!(err.to_string().contains("eims_2"));
    }

    #[test]
    fn smpp_always_resolves() {
        let registry = CarrierRegistry::from_settings(CarrierSettings::default());
        let adapter = registry.adapter_for(CarrierKind::Smpp).unwrap();
        assert_eq!(adapter.name(), "smpp");
    }

    #[test]
    fn configured_onbuka_resolves_and_is_cached() {
        let mut settings = CarrierSettings::default();
        settings.onbuka.api_key = Some("k".into());
        settings.onbuka.api_secret = Some("s".into());
        settings.onbuka.app_id = Some("a".into());

        let registry = CarrierRegistry::from_settings(settings);
        let first = registry.adapter_for(CarrierKind::Onbuka).unwrap();
        let second = registry.adapter_for(CarrierKind::Onbuka).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn registered_adapter_takes_precedence() {
        let registry = CarrierRegistry::from_settings(CarrierSettings::default());
        registry.register(CarrierKind::Onbuka, Arc::new(SmppCarrier::new()));
        let adapter = registry.adapter_for(CarrierKind::Onbuka).unwrap();
        assert_eq!(adapter.name(), "smpp");
    }

    #[test]
    fn default_carrier_comes_from_settings() {
        let mut settings = CarrierSettings::default();
        settings.default = CarrierKind::Eims3;
        let registry = CarrierRegistry::from_settings(settings);
        assert_eq!(registry.default_carrier(), CarrierKind::Eims3);
    }
}
