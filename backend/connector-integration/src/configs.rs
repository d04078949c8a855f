use std::path::Path;

use config::{Config, Environment, File};
use domain_types::{CustomResult, ProcessorError};
use error_stack::{report, ResultExt};
use hyperswitch_masking::{PeekInterface, Secret};
use serde::Deserialize;

pub const SANDBOX_BASE_URL: &str = "https://apitest.authorize.net/xml/v1/request.api";

fn default_base_url() -> String {
    SANDBOX_BASE_URL.to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_transaction_type() -> String {
    "authCaptureTransaction".to_string()
}

/// Merchant-level gateway configuration, supplied externally. The processor
/// fails fast on missing credentials before any network call is made.
#[derive(Clone, Debug, Deserialize)]
pub struct MerchantConfig {
    pub api_login_id: Secret<String>,
    pub transaction_key: Secret<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_transaction_type")]
    pub transaction_type: String,
    #[serde(default)]
    pub site_id: u32,
}

impl MerchantConfig {
    /// Load from an optional TOML file with `VENDOR__`-prefixed environment
    /// overrides, e.g. `VENDOR__TRANSACTION_KEY`.
    pub fn load(path: Option<&Path>) -> CustomResult<Self, ProcessorError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let loaded = builder
            .add_source(Environment::with_prefix("VENDOR").try_parsing(true))
            .build()
            .change_context(ProcessorError::ConfigurationError {
                field_name: "merchant configuration",
            })?;
        let config: Self =
            loaded
                .try_deserialize()
                .change_context(ProcessorError::ConfigurationError {
                    field_name: "merchant configuration",
                })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CustomResult<(), ProcessorError> {
        if self.api_login_id.peek().trim().is_empty() {
            return Err(report!(ProcessorError::ConfigurationError {
                field_name: "api_login_id",
            }));
        }
        if self.transaction_key.peek().trim().is_empty() {
            return Err(report!(ProcessorError::ConfigurationError {
                field_name: "transaction_key",
            }));
        }
        Ok(())
    }
}
