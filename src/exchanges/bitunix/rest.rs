use crate::core::errors::ExchangeError;
use crate::core::kernel::{truncate_for_log, RestClient};
use crate::core::types::{TimeWindow, Uid};
use crate::exchanges::bitunix::conversions::to_iso_string;
use crate::exchanges::bitunix::types::{
    BitunixItems, BitunixResponse, BitunixTrade, BitunixUser, BitunixValidateResult,
};
use crate::exchanges::Envelope;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{instrument, warn};

pub const VALIDATE_USER_ENDPOINT: &str = "/partner/api/v2/openapi/validateUser";
pub const USER_LIST_ENDPOINT: &str = "/partner/api/v1/openapi/userList";
pub const TRANS_AMOUNT_ENDPOINT: &str = "/partner/api/v1/openapi/transAmountList";

/// Bitunix partner REST API client
#[derive(Debug)]
pub struct BitunixRest<R: RestClient> {
    rest_client: R,
}

impl<R: RestClient> BitunixRest<R> {
    pub fn new(rest_client: R) -> Self {
        Self { rest_client }
    }

    /// Turn a raw response into an `Envelope`.
    ///
    /// HTTP 401/403 become `AuthError`, other HTTP failures pass through with
    /// a truncated body, and a non-"0" code is `Envelope::Rejected`.
    fn handle_response<T>(
        &self,
        response: Result<Value, ExchangeError>,
    ) -> Result<Envelope<T>, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let value = response.map_err(|error| match error {
            ExchangeError::ApiError { code, message } if code == 401 || code == 403 => {
                ExchangeError::AuthError(format!("HTTP {}: {}", code, truncate_for_log(&message)))
            }
            ExchangeError::ApiError { code, message } => ExchangeError::ApiError {
                code,
                message: truncate_for_log(&message),
            },
            other => other,
        })?;

        let envelope = serde_json::from_value::<BitunixResponse<Value>>(value).map_err(|e| {
            ExchangeError::InvalidResponseFormat(format!(
                "Failed to parse Bitunix response: {}",
                e
            ))
        })?;

        if !envelope.is_success() {
            return Ok(Envelope::Rejected {
                code: envelope.code,
                msg: envelope.msg.unwrap_or_default(),
            });
        }

        match envelope.result {
            None | Some(Value::Null) => Ok(Envelope::Empty),
            Some(result) => serde_json::from_value(result).map(Envelope::Ok).map_err(|e| {
                ExchangeError::InvalidResponseFormat(format!(
                    "Unexpected Bitunix result shape: {}",
                    e
                ))
            }),
        }
    }

    /// Ask Bitunix whether `uid` was invited under this partner account
    #[instrument(skip(self), fields(exchange = "bitunix", uid = %uid))]
    pub async fn validate_user(
        &self,
        uid: &Uid,
    ) -> Result<Envelope<BitunixValidateResult>, ExchangeError> {
        let params = [("account", uid.as_str())];
        let response = self
            .rest_client
            .signed_request(Method::POST, VALIDATE_USER_ENDPOINT, &params, &[])
            .await;

        self.handle_response(response)
    }

    /// Invited users matching `uid`
    #[instrument(skip(self), fields(exchange = "bitunix", uid = %uid))]
    pub async fn get_user_list(
        &self,
        uid: &Uid,
    ) -> Result<Envelope<Vec<BitunixUser>>, ExchangeError> {
        let params = [("uid", uid.as_str())];
        let response = self.rest_client.get(USER_LIST_ENDPOINT, &params, true).await;

        Ok(self
            .handle_response::<BitunixItems<BitunixUser>>(response)?
            .map(|page| page.items))
    }

    /// Trades of `uid` inside `window`
    #[instrument(skip(self), fields(exchange = "bitunix", uid = %uid))]
    pub async fn get_trades(
        &self,
        uid: &Uid,
        window: &TimeWindow,
    ) -> Result<Envelope<Vec<BitunixTrade>>, ExchangeError> {
        let start_time = to_iso_string(window.start);
        let end_time = to_iso_string(window.end);
        let params = [
            ("uid", uid.as_str()),
            ("startTime", start_time.as_str()),
            ("endTime", end_time.as_str()),
        ];
        let response = self
            .rest_client
            .get(TRANS_AMOUNT_ENDPOINT, &params, true)
            .await;

        let envelope = self
            .handle_response::<BitunixItems<BitunixTrade>>(response)?
            .map(|page| page.items);
        if let Envelope::Rejected { code, msg } = &envelope {
            warn!(uid = %uid, code = %code, msg = %msg, "Bitunix volume query rejected");
        }
        Ok(envelope)
    }
}
