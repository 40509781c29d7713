/// Transport layer shared by the exchange clients
///
/// The kernel holds only exchange-agnostic plumbing:
///
/// - `RestClient`: HTTP interface the exchange clients are generic over
/// - `ReqwestRest`: the reqwest-backed implementation with a fixed timeout
/// - `Signer`: pluggable request authentication
///
/// Exchange-specific canonical strings live next to each exchange.
///
/// ```rust,no_run
/// use refcheck::core::kernel::*;
/// use refcheck::exchanges::bitunix::signer::BitunixSigner;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = Arc::new(BitunixSigner::new("api_key".to_string(), "secret".to_string()));
/// let rest = RestClientBuilder::new(RestClientConfig::new(
///     "https://partners.bitunix.com".to_string(),
///     "bitunix".to_string(),
/// ))
/// .with_signer(signer)
/// .build()?;
///
/// let _value = rest
///     .get("/partner/api/v1/openapi/userList", &[("uid", "12345678")], true)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

pub use rest::{truncate_for_log, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{SignatureResult, Signer};
