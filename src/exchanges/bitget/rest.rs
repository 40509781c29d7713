use crate::core::errors::ExchangeError;
use crate::core::kernel::{truncate_for_log, RestClient};
use crate::core::types::{TimeWindow, Uid};
use crate::exchanges::bitget::types::{
    BitgetCustomer, BitgetCustomerListRequest, BitgetResponse, BitgetTradeVolume,
    BitgetTradeVolumeRequest, OneOrMany,
};
use crate::exchanges::Envelope;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{instrument, warn};

pub const CUSTOMER_LIST_ENDPOINT: &str = "/api/broker/v1/agent/customerList";
pub const TRADE_VOLUME_ENDPOINT: &str = "/api/broker/v1/agent/customerTradeVolumnList";

/// Bitget REST API client implementation
#[derive(Debug)]
pub struct BitgetRest<R: RestClient> {
    rest_client: R,
}

impl<R: RestClient> BitgetRest<R> {
    pub fn new(rest_client: R) -> Self {
        Self { rest_client }
    }

    /// Envelope codes that mean the request itself was not authenticated
    fn is_auth_code(code: &str) -> bool {
        matches!(code, "40006" | "40009" | "40011" | "40012" | "40037")
    }

    /// Bitget answers most rejections with an HTTP 4xx whose body is still a
    /// regular envelope; recover it so the code can be classified.
    fn recover_envelope(error: ExchangeError) -> Result<BitgetResponse<Value>, ExchangeError> {
        match error {
            ExchangeError::ApiError { code, message } => {
                match serde_json::from_str::<BitgetResponse<Value>>(&message) {
                    Ok(envelope) => Ok(envelope),
                    Err(_) if code == 401 || code == 403 => Err(ExchangeError::AuthError(
                        format!("HTTP {}: {}", code, truncate_for_log(&message)),
                    )),
                    Err(_) => Err(ExchangeError::ApiError {
                        code,
                        message: truncate_for_log(&message),
                    }),
                }
            }
            other => Err(other),
        }
    }

    /// Generic handler for Bitget API responses
    ///
    /// Authentication codes become `AuthError`; any other non-success code is
    /// returned as `Envelope::Rejected` for the caller to interpret.
    fn handle_response<T>(
        &self,
        response: Result<Value, ExchangeError>,
    ) -> Result<Envelope<T>, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let envelope = match response {
            Ok(value) => serde_json::from_value::<BitgetResponse<Value>>(value).map_err(|e| {
                ExchangeError::InvalidResponseFormat(format!(
                    "Failed to parse Bitget response: {}",
                    e
                ))
            })?,
            Err(error) => Self::recover_envelope(error)?,
        };

        let msg = envelope.msg.clone().unwrap_or_default();

        if Self::is_auth_code(&envelope.code) {
            return Err(ExchangeError::AuthError(format!(
                "Bitget rejected credentials: {} - {}",
                envelope.code, msg
            )));
        }

        if !envelope.is_success() {
            return Ok(Envelope::Rejected {
                code: envelope.code,
                msg,
            });
        }

        match envelope.data {
            None | Some(Value::Null) => Ok(Envelope::Empty),
            Some(data) => serde_json::from_value(data).map(Envelope::Ok).map_err(|e| {
                ExchangeError::InvalidResponseFormat(format!(
                    "Unexpected Bitget data shape: {}",
                    e
                ))
            }),
        }
    }

    /// Look up a customer by UID
    #[instrument(skip(self), fields(exchange = "bitget", uid = %uid))]
    pub async fn get_customer_list(
        &self,
        uid: &Uid,
        referral_code: Option<&str>,
    ) -> Result<Envelope<Vec<BitgetCustomer>>, ExchangeError> {
        let request = BitgetCustomerListRequest {
            uid: uid.to_string(),
            referral_code: referral_code.map(str::to_string),
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| ExchangeError::SerializationError(e.to_string()))?;

        let response = self
            .rest_client
            .post(CUSTOMER_LIST_ENDPOINT, &body, true)
            .await;

        Ok(self
            .handle_response::<OneOrMany<BitgetCustomer>>(response)?
            .map(OneOrMany::into_vec))
    }

    /// Trade volume entries of a customer inside `window`
    #[instrument(skip(self), fields(exchange = "bitget", uid = %uid))]
    pub async fn get_trade_volumes(
        &self,
        uid: &Uid,
        window: &TimeWindow,
    ) -> Result<Envelope<Vec<BitgetTradeVolume>>, ExchangeError> {
        let request = BitgetTradeVolumeRequest {
            uid: uid.to_string(),
            start_time: window.start.timestamp_millis().to_string(),
            end_time: window.end.timestamp_millis().to_string(),
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| ExchangeError::SerializationError(e.to_string()))?;

        let response = self
            .rest_client
            .post(TRADE_VOLUME_ENDPOINT, &body, true)
            .await;

        let envelope = self.handle_response::<Vec<BitgetTradeVolume>>(response)?;
        if let Envelope::Rejected { code, msg } = &envelope {
            warn!(uid = %uid, code = %code, msg = %msg, "Bitget volume query rejected");
        }
        Ok(envelope)
    }
}
