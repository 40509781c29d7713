use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::exchanges::bitget::{connector::BitgetConnector, signer::BitgetSigner};
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://api.bitget.com";

/// Builder for creating Bitget connectors
pub struct BitgetBuilder {
    config: ExchangeConfig,
    referral_code: Option<String>,
}

impl BitgetBuilder {
    pub fn new(config: ExchangeConfig) -> Self {
        Self {
            config,
            referral_code: None,
        }
    }

    /// Restrict customer lookups to one referral code
    pub fn with_referral_code(mut self, referral_code: Option<String>) -> Self {
        self.referral_code = referral_code;
        self
    }

    /// Build a Bitget connector backed by reqwest
    ///
    /// Every Bitget call is signed, so credentials and a passphrase are required.
    pub fn build(self) -> Result<BitgetConnector<ReqwestRest>, ExchangeError> {
        if !self.config.has_credentials() {
            return Err(ExchangeError::ConfigurationError(
                "Bitget API key and secret key are required".to_string(),
            ));
        }
        let passphrase = self.config.passphrase_value().ok_or_else(|| {
            ExchangeError::ConfigurationError("Bitget passphrase is required".to_string())
        })?;

        let base_url = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let rest_config = RestClientConfig::new(base_url, "bitget".to_string())
            .with_timeout(self.config.timeout_seconds);

        let signer = Arc::new(BitgetSigner::new(
            self.config.api_key().to_string(),
            self.config.secret_key().to_string(),
            passphrase.to_string(),
        ));

        let rest = RestClientBuilder::new(rest_config)
            .with_signer(signer)
            .build()?;

        Ok(BitgetConnector::new(rest, self.referral_code))
    }
}

/// Create a Bitget connector from configuration
pub fn build_connector(
    config: ExchangeConfig,
    referral_code: Option<String>,
) -> Result<BitgetConnector<ReqwestRest>, ExchangeError> {
    BitgetBuilder::new(config)
        .with_referral_code(referral_code)
        .build()
}
