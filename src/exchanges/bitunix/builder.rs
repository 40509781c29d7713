use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::exchanges::bitunix::{connector::BitunixConnector, signer::BitunixSigner};
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://partners.bitunix.com";

/// Create a Bitunix connector from configuration
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<BitunixConnector<ReqwestRest>, ExchangeError> {
    if !config.has_credentials() {
        return Err(ExchangeError::ConfigurationError(
            "Bitunix API key and secret key are required".to_string(),
        ));
    }

    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let rest_config =
        RestClientConfig::new(base_url, "bitunix".to_string()).with_timeout(config.timeout_seconds);

    let signer = Arc::new(BitunixSigner::new(
        config.api_key().to_string(),
        config.secret_key().to_string(),
    ));

    let rest = RestClientBuilder::new(rest_config)
        .with_signer(signer)
        .build()?;

    Ok(BitunixConnector::new(rest))
}
