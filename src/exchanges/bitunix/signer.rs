use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{to_owned_params, SignatureResult};
use crate::core::kernel::Signer;
use sha1::{Digest, Sha1};
use std::collections::HashMap;

/// Bitunix partner API signer
///
/// Bitunix does not sign a query string. It sorts parameter keys by a rank
/// derived from their first character, then by the sum of their UTF-16 code
/// units, concatenates only the values, appends the secret and takes SHA-1.
pub struct BitunixSigner {
    api_key: String,
    secret_key: String,
}

impl BitunixSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key,
        }
    }
}

/// Rank of a parameter key: 1 digit-led, 2 lowercase-led, 3 anything else.
/// An empty key ranks 0.
pub fn key_rank(key: &str) -> u8 {
    match key.chars().next() {
        None => 0,
        Some(c) if c.is_ascii_digit() => 1,
        Some(c) if c.is_ascii_lowercase() => 2,
        Some(_) => 3,
    }
}

/// Sum of the key's UTF-16 code units
pub fn key_code_sum(key: &str) -> u32 {
    key.encode_utf16().map(u32::from).sum()
}

/// Order parameters for signing. The sort is stable, so equal keys keep
/// their insertion order.
pub fn sort_params<'a>(params: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut sorted = params.to_vec();
    sorted.sort_by_key(|(key, _)| (key_rank(key), key_code_sum(key)));
    sorted
}

/// Sign parameters: SHA-1 hex of the sorted values followed by the secret
pub fn sign_params(secret_key: &str, params: &[(&str, &str)]) -> String {
    let mut hasher = Sha1::new();
    for (_, value) in sort_params(params) {
        hasher.update(value.as_bytes());
    }
    hasher.update(secret_key.as_bytes());
    hex::encode(hasher.finalize())
}

impl Signer for BitunixSigner {
    fn sign_request(
        &self,
        method: &str,
        _endpoint: &str,
        query_params: &[(&str, &str)],
        _body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        // Bitunix timestamps are whole seconds
        let timestamp = (timestamp / 1000).to_string();

        if query_params.iter().any(|(key, _)| *key == "timestamp") {
            return Err(ExchangeError::InvalidParameters(
                "timestamp is added by the signer".to_string(),
            ));
        }

        let mut params = query_params.to_vec();
        params.push(("timestamp", timestamp.as_str()));

        let signature = sign_params(&self.secret_key, &params);

        let mut headers = HashMap::new();
        headers.insert("apiKey".to_string(), self.api_key.clone());
        headers.insert("signature".to_string(), signature);
        if method == "POST" {
            headers.insert(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded;charset=UTF-8".to_string(),
            );
        }

        Ok((headers, to_owned_params(&params)))
    }
}
