use crate::core::types::conversion::de_string_or_number;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success code in the Bitunix response envelope
pub const SUCCESS_CODE: &str = "0";

/// Bitunix partner API response wrapper
#[derive(Debug, Deserialize, Serialize)]
pub struct BitunixResponse<T> {
    #[serde(deserialize_with = "de_string_or_number")]
    pub code: String,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub result: Option<T>,
}

impl<T> BitunixResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Result of `/partner/api/v2/openapi/validateUser`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BitunixValidateResult {
    #[serde(default)]
    pub result: bool,
}

/// Paged list wrapper used by the v1 openapi endpoints
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BitunixItems<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// User entry from `/partner/api/v1/openapi/userList`
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BitunixUser {
    #[serde(deserialize_with = "de_string_or_number")]
    pub uid: String,
    #[serde(default)]
    pub register_time: Option<Value>,
}

/// Trade entry from `/partner/api/v1/openapi/transAmountList`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BitunixTrade {
    #[serde(default)]
    pub trans_volume: Option<Value>,
}
