//! # Core Configuration Module
//!
//! Builder-pattern configuration for the Field Photo Core. The builder
//! enforces fail-fast validation: every required bridge must be provided (or
//! have a platform default) before a session can be created.
//!
//! ## Required Dependencies
//!
//! - endpoint URL of the remote folder webhook
//! - `SettingsStore` - last-location persistence
//!
//! ## Optional Dependencies (with defaults)
//!
//! - `HttpClient` - desktop default (reqwest) when the `desktop-shims`
//!   feature is enabled
//! - `Clock` - system clock
//! - `EventBus` - fresh bus with the default buffer
//! - `TranscodeConfig` - default payload ceiling and quality ladder
//!
//! ## Usage
//!
//! ```ignore
//! use core_service::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .endpoint_url("https://hook.example/folders")
//!     .settings_store(settings_store)
//!     .build()
//!     .expect("Failed to build config");
//! ```

use bridge_traits::http::HttpClient;
use bridge_traits::storage::SettingsStore;
use bridge_traits::time::{Clock, SystemClock};
use core_imaging::TranscodeConfig;
use core_runtime::events::EventBus;
use std::sync::Arc;

use crate::error::{CoreError, Result};

/// Core configuration for a photo session.
///
/// Use [`CoreConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Remote folder webhook endpoint
    pub endpoint_url: String,

    /// HTTP client for the remote store
    pub http_client: Arc<dyn HttpClient>,

    /// Local key-value persistence (required)
    pub settings_store: Arc<dyn SettingsStore>,

    /// Time source
    pub clock: Arc<dyn Clock>,

    /// Event bus shared with presentation-layer observers
    pub event_bus: Arc<EventBus>,

    /// Photo transcode pipeline settings
    pub transcode: TranscodeConfig,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("http_client", &"HttpClient { ... }")
            .field("settings_store", &"SettingsStore { ... }")
            .field("transcode", &self.transcode)
            .finish()
    }
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

/// Builder for [`CoreConfig`]
#[derive(Default)]
pub struct CoreConfigBuilder {
    endpoint_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    clock: Option<Arc<dyn Clock>>,
    event_bus: Option<Arc<EventBus>>,
    transcode: Option<TranscodeConfig>,
}

impl CoreConfigBuilder {
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    pub fn http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn settings_store(mut self, settings_store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(settings_store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn transcode(mut self, transcode: TranscodeConfig) -> Self {
        self.transcode = Some(transcode);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an actionable error when the endpoint URL or a required
    /// bridge capability is missing.
    pub fn build(self) -> Result<CoreConfig> {
        let endpoint_url = self
            .endpoint_url
            .ok_or_else(|| CoreError::Config("endpoint URL is required".to_string()))?;

        let settings_store = self.settings_store.ok_or_else(|| {
            CoreError::CapabilityMissing {
                capability: "SettingsStore".to_string(),
                message: "No settings store provided. \
                          Desktop: construct a SqliteSettingsStore. \
                          Other hosts: inject a platform adapter."
                    .to_string(),
            }
        })?;

        let http_client = match self.http_client {
            Some(http_client) => http_client,
            None => Self::default_http_client()?,
        };

        Ok(CoreConfig {
            endpoint_url,
            http_client,
            settings_store,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            event_bus: self.event_bus.unwrap_or_default(),
            transcode: self.transcode.unwrap_or_default(),
        })
    }

    #[cfg(feature = "desktop-shims")]
    fn default_http_client() -> Result<Arc<dyn HttpClient>> {
        Ok(Arc::new(bridge_desktop::ReqwestHttpClient::new()))
    }

    #[cfg(not(feature = "desktop-shims"))]
    fn default_http_client() -> Result<Arc<dyn HttpClient>> {
        Err(CoreError::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "No HTTP client provided. \
                      Desktop: enable the desktop-shims feature. \
                      Other hosts: inject a platform adapter."
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::{HttpRequest, HttpResponse};

    struct NoopHttp;

    #[async_trait]
    impl HttpClient for NoopHttp {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Err(bridge_traits::error::BridgeError::NotAvailable(
                "noop".to_string(),
            ))
        }
    }

    struct NoopSettings;

    #[async_trait]
    impl SettingsStore for NoopSettings {
        async fn set_string(&self, _key: &str, _value: &str) -> BridgeResult<()> {
            Ok(())
        }
        async fn get_string(&self, _key: &str) -> BridgeResult<Option<String>> {
            Ok(None)
        }
        async fn delete(&self, _key: &str) -> BridgeResult<()> {
            Ok(())
        }
        async fn list_keys(&self) -> BridgeResult<Vec<String>> {
            Ok(Vec::new())
        }
        async fn clear_all(&self) -> BridgeResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_endpoint_is_rejected() {
        let result = CoreConfig::builder()
            .settings_store(Arc::new(NoopSettings))
            .http_client(Arc::new(NoopHttp))
            .build();

        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_missing_settings_store_is_actionable() {
        let result = CoreConfig::builder()
            .endpoint_url("https://hook.example/x")
            .http_client(Arc::new(NoopHttp))
            .build();

        match result {
            Err(CoreError::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "SettingsStore");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_defaults_are_filled_in() {
        let config = CoreConfig::builder()
            .endpoint_url("https://hook.example/x")
            .settings_store(Arc::new(NoopSettings))
            .http_client(Arc::new(NoopHttp))
            .build()
            .unwrap();

        assert_eq!(config.transcode.quality_floor, 50);
        assert_eq!(config.event_bus.subscriber_count(), 0);
    }
}
