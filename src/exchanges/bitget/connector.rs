use crate::core::aggregator::{
    aggregate_volumes, history_floor, VolumeQuery, VolumeWindows, WindowErrorPolicy,
};
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{ReferralVerifier, TradeVolumeSource};
use crate::core::types::{Exchange, TimeWindow, Uid, VerificationResult, VolumeSummary};
use crate::exchanges::bitget::conversions::{convert_customer_list, sum_trade_volumes};
use crate::exchanges::bitget::rest::BitgetRest;
use crate::exchanges::Envelope;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, instrument};

/// Bitget broker connector: referral verification plus volume lookups
pub struct BitgetConnector<R: RestClient> {
    rest: BitgetRest<R>,
    referral_code: Option<String>,
}

impl<R: RestClient> BitgetConnector<R> {
    pub fn new(rest: R, referral_code: Option<String>) -> Self {
        Self {
            rest: BitgetRest::new(rest),
            referral_code,
        }
    }
}

#[async_trait]
impl<R: RestClient> ReferralVerifier for BitgetConnector<R> {
    fn exchange(&self) -> Exchange {
        Exchange::Bitget
    }

    #[instrument(skip(self), fields(exchange = "bitget", uid = %uid))]
    async fn verify_uid(&self, uid: &Uid) -> Result<VerificationResult, ExchangeError> {
        let result = match self
            .rest
            .get_customer_list(uid, self.referral_code.as_deref())
            .await?
        {
            Envelope::Ok(customers) => convert_customer_list(uid, customers),
            Envelope::Empty => VerificationResult::not_verified(uid.clone(), "empty customer list"),
            Envelope::Rejected { code, msg } => {
                VerificationResult::not_verified(uid.clone(), format!("code {}: {}", code, msg))
            }
        };

        info!(verified = result.is_verified(), "Bitget UID check finished");
        Ok(result)
    }
}

#[async_trait]
impl<R: RestClient> VolumeQuery for BitgetConnector<R> {
    async fn window_volume(
        &self,
        uid: &Uid,
        window: &TimeWindow,
    ) -> Result<Decimal, ExchangeError> {
        Ok(match self.rest.get_trade_volumes(uid, window).await? {
            Envelope::Ok(entries) => sum_trade_volumes(&entries)?,
            Envelope::Empty | Envelope::Rejected { .. } => Decimal::ZERO,
        })
    }
}

#[async_trait]
impl<R: RestClient> TradeVolumeSource for BitgetConnector<R> {
    #[instrument(skip(self), fields(exchange = "bitget", uid = %uid))]
    async fn get_trade_volumes(
        &self,
        uid: &Uid,
        register_time: Option<DateTime<Utc>>,
    ) -> Result<VolumeSummary, ExchangeError> {
        let windows =
            VolumeWindows::new(Utc::now(), register_time.unwrap_or_else(history_floor))?;
        aggregate_volumes(self, uid, &windows, WindowErrorPolicy::Propagate).await
    }
}
