use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{create_query_string, to_owned_params, SignatureResult};
use crate::core::kernel::Signer;
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;

type HmacSha256 = Hmac<Sha256>;

/// Bitget HMAC-SHA256 signer for broker API requests
pub struct BitgetSigner {
    api_key: String,
    secret_key: String,
    passphrase: String,
}

impl BitgetSigner {
    pub fn new(api_key: String, secret_key: String, passphrase: String) -> Self {
        Self {
            api_key,
            secret_key,
            passphrase,
        }
    }
}

/// Generate the signature for Bitget API requests
///
/// The prehash string is `timestamp + METHOD + requestPath + body`, signed
/// with HMAC-SHA256 and base64-encoded.
pub fn generate_signature(
    secret_key: &str,
    timestamp: &str,
    method: &str,
    request_path: &str,
    body: &str,
) -> Result<String, ExchangeError> {
    let prehash = format!(
        "{}{}{}{}",
        timestamp,
        method.to_uppercase(),
        request_path,
        body
    );

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| ExchangeError::AuthError(format!("Failed to create HMAC: {}", e)))?;

    mac.update(prehash.as_bytes());
    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

impl Signer for BitgetSigner {
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        let timestamp = timestamp.to_string();

        let query_string = create_query_string(query_params);
        let request_path = if query_string.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}?{}", endpoint, query_string)
        };

        let body_str = std::str::from_utf8(body)
            .map_err(|e| ExchangeError::AuthError(format!("Invalid body encoding: {}", e)))?;

        let signature =
            generate_signature(&self.secret_key, &timestamp, method, &request_path, body_str)?;

        let mut headers = HashMap::new();
        headers.insert("ACCESS-KEY".to_string(), self.api_key.clone());
        headers.insert("ACCESS-SIGN".to_string(), signature);
        headers.insert("ACCESS-TIMESTAMP".to_string(), timestamp);
        headers.insert("ACCESS-PASSPHRASE".to_string(), self.passphrase.clone());
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("locale".to_string(), "en-US".to_string());

        Ok((headers, to_owned_params(query_params)))
    }
}
