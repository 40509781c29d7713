use crate::core::errors::ExchangeError;
use std::collections::HashMap;

/// Result type for signing operations: (headers, `query_params`)
pub type SignatureResult = Result<(HashMap<String, String>, Vec<(String, String)>), ExchangeError>;

/// Signer trait for request authentication
///
/// Each exchange has its own canonical string and digest. Implementations
/// return the headers to attach and the final query parameters to send,
/// which may include parameters added during signing (e.g. a timestamp).
pub trait Signer: Send + Sync {
    /// Sign a request and return headers and query parameters
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `endpoint` - API endpoint path
    /// * `query_params` - Query parameters in insertion order
    /// * `body` - Raw request body bytes
    /// * `timestamp` - Request timestamp in milliseconds
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult;
}

/// Join parameters as `k=v&k=v` without percent-encoding, the form exchanges
/// expect inside a canonical string.
pub fn create_query_string(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Copy borrowed parameters into owned pairs
pub fn to_owned_params(params: &[(&str, &str)]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
