use crate::core::{
    errors::ExchangeError,
    types::{Exchange, Uid, VerificationResult, VolumeSummary},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ReferralVerifier: Send + Sync {
    /// Which exchange this verifier talks to
    fn exchange(&self) -> Exchange;

    /// Check whether `uid` registered through our referral.
    ///
    /// A UID the exchange does not know is `Ok(NotVerified)`, not an error.
    async fn verify_uid(&self, uid: &Uid) -> Result<VerificationResult, ExchangeError>;
}

#[async_trait]
pub trait TradeVolumeSource: Send + Sync {
    /// Sum trade volume over the all-time, previous-month and current-month windows
    async fn get_trade_volumes(
        &self,
        uid: &Uid,
        register_time: Option<DateTime<Utc>>,
    ) -> Result<VolumeSummary, ExchangeError>;
}

/// Composite trait for everything the orchestrator needs from one exchange
pub trait ReferralConnector: ReferralVerifier + TradeVolumeSource {}

impl<T: ReferralVerifier + TradeVolumeSource> ReferralConnector for T {}
