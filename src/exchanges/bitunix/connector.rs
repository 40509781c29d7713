use crate::core::aggregator::{
    aggregate_volumes, history_floor, VolumeQuery, VolumeWindows, WindowErrorPolicy,
};
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{ReferralVerifier, TradeVolumeSource};
use crate::core::types::{Exchange, TimeWindow, Uid, VerificationResult, VolumeSummary};
use crate::exchanges::bitunix::conversions::{find_register_time, sum_trade_volumes};
use crate::exchanges::bitunix::rest::BitunixRest;
use crate::exchanges::Envelope;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

/// Bitunix partner connector
pub struct BitunixConnector<R: RestClient> {
    rest: BitunixRest<R>,
}

impl<R: RestClient> BitunixConnector<R> {
    pub fn new(rest: R) -> Self {
        Self {
            rest: BitunixRest::new(rest),
        }
    }

    /// Registration time lookup. Never fails: problems are logged and
    /// reported as an unknown time.
    async fn lookup_register_time(&self, uid: &Uid) -> Option<DateTime<Utc>> {
        match self.rest.get_user_list(uid).await {
            Ok(Envelope::Ok(users)) => find_register_time(uid, &users),
            Ok(Envelope::Empty) => None,
            Ok(Envelope::Rejected { code, msg }) => {
                warn!(uid = %uid, code = %code, msg = %msg, "Bitunix user list rejected");
                None
            }
            Err(e) => {
                warn!(uid = %uid, error = %e, "Bitunix user list lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl<R: RestClient> ReferralVerifier for BitunixConnector<R> {
    fn exchange(&self) -> Exchange {
        Exchange::Bitunix
    }

    #[instrument(skip(self), fields(exchange = "bitunix", uid = %uid))]
    async fn verify_uid(&self, uid: &Uid) -> Result<VerificationResult, ExchangeError> {
        let result = match self.rest.validate_user(uid).await? {
            Envelope::Ok(validation) if validation.result => {
                VerificationResult::verified(uid.clone(), self.lookup_register_time(uid).await)
            }
            Envelope::Ok(_) => {
                VerificationResult::not_verified(uid.clone(), "not invited by this partner")
            }
            Envelope::Empty => VerificationResult::not_verified(uid.clone(), "empty result"),
            Envelope::Rejected { code, msg } => {
                VerificationResult::not_verified(uid.clone(), format!("code {}: {}", code, msg))
            }
        };

        info!(verified = result.is_verified(), "Bitunix UID check finished");
        Ok(result)
    }
}

#[async_trait]
impl<R: RestClient> VolumeQuery for BitunixConnector<R> {
    async fn window_volume(
        &self,
        uid: &Uid,
        window: &TimeWindow,
    ) -> Result<Decimal, ExchangeError> {
        Ok(match self.rest.get_trades(uid, window).await? {
            Envelope::Ok(trades) => sum_trade_volumes(&trades)?,
            Envelope::Empty | Envelope::Rejected { .. } => Decimal::ZERO,
        })
    }
}

#[async_trait]
impl<R: RestClient> TradeVolumeSource for BitunixConnector<R> {
    #[instrument(skip(self), fields(exchange = "bitunix", uid = %uid))]
    async fn get_trade_volumes(
        &self,
        uid: &Uid,
        register_time: Option<DateTime<Utc>>,
    ) -> Result<VolumeSummary, ExchangeError> {
        let windows =
            VolumeWindows::new(Utc::now(), register_time.unwrap_or_else(history_floor))?;
        aggregate_volumes(self, uid, &windows, WindowErrorPolicy::ZeroFill).await
    }
}
