use crate::core::types::conversion::de_string_or_number;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success code in the Bitget response envelope
pub const SUCCESS_CODE: &str = "00000";

/// Bitget API standard response wrapper
#[derive(Debug, Deserialize, Serialize)]
pub struct BitgetResponse<T> {
    #[serde(deserialize_with = "de_string_or_number")]
    pub code: String,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> BitgetResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// A payload that is sometimes a list and sometimes a single object
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// Customer entry from `/api/broker/v1/agent/customerList`
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BitgetCustomer {
    #[serde(deserialize_with = "de_string_or_number")]
    pub uid: String,
    #[serde(default)]
    pub register_time: Option<Value>, // epoch millis, string or number
}

/// Customer list request body
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BitgetCustomerListRequest {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

/// Trade volume entry from `/api/broker/v1/agent/customerTradeVolumnList`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BitgetTradeVolume {
    #[serde(default)]
    pub volumn: Option<Value>, // sic, the API's field name
}

/// Trade volume request body; times are epoch millis as strings
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BitgetTradeVolumeRequest {
    pub uid: String,
    pub start_time: String,
    pub end_time: String,
}
