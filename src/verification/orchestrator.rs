use crate::core::errors::ExchangeError;
use crate::core::kernel::truncate_for_log;
use crate::core::traits::ReferralConnector;
use crate::core::types::{Exchange, Uid, VerificationResult, VolumeSummary};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// How a verification error is surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Every error is reported as service unavailable
    Surface,
    /// Transport errors are acknowledged as a degraded success
    Degrade,
}

/// Where a verification request ends up.
///
/// Validation and the exchange request are the two steps before these:
/// `validate` then `verify_validated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationState {
    Succeeded,
    Failed,
    Degraded,
    Unavailable,
}

/// Terminal result of one verification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Input failed the format check; nothing was sent to the exchange
    InvalidUid { exchange: Exchange, input: String },
    Succeeded {
        exchange: Exchange,
        uid: Uid,
        register_time: Option<DateTime<Utc>>,
    },
    NotVerified {
        exchange: Exchange,
        uid: Uid,
        reason: String,
    },
    /// The exchange could not be reached and the UID was accepted unconfirmed
    Degraded { exchange: Exchange, uid: Uid },
    Unavailable {
        exchange: Exchange,
        uid: Uid,
        error: String,
    },
}

impl VerificationOutcome {
    pub const fn exchange(&self) -> Exchange {
        match self {
            Self::InvalidUid { exchange, .. }
            | Self::Succeeded { exchange, .. }
            | Self::NotVerified { exchange, .. }
            | Self::Degraded { exchange, .. }
            | Self::Unavailable { exchange, .. } => *exchange,
        }
    }

    /// State the request ended in. Invalid input stops in `Failed` without
    /// any exchange request.
    pub const fn state(&self) -> VerificationState {
        match self {
            Self::Succeeded { .. } => VerificationState::Succeeded,
            Self::InvalidUid { .. } | Self::NotVerified { .. } => VerificationState::Failed,
            Self::Degraded { .. } => VerificationState::Degraded,
            Self::Unavailable { .. } => VerificationState::Unavailable,
        }
    }
}

/// Terminal result of a volume report request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeOutcome {
    InvalidUid { exchange: Exchange, input: String },
    NotVerified { exchange: Exchange, uid: Uid },
    Report {
        exchange: Exchange,
        uid: Uid,
        summary: VolumeSummary,
    },
    Unavailable {
        exchange: Exchange,
        uid: Uid,
        error: String,
    },
}

struct Route {
    connector: Arc<dyn ReferralConnector>,
    fallback: FallbackPolicy,
}

/// Routes validated UIDs to the right exchange connector and maps results
/// and errors to user-facing outcomes.
#[derive(Default)]
pub struct Orchestrator {
    routes: HashMap<Exchange, Route>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connector under the exchange it reports
    pub fn register(
        mut self,
        connector: Arc<dyn ReferralConnector>,
        fallback: FallbackPolicy,
    ) -> Self {
        self.routes.insert(
            connector.exchange(),
            Route {
                connector,
                fallback,
            },
        );
        self
    }

    /// Format check. Runs before any network traffic.
    pub fn validate(&self, exchange: Exchange, raw: &str) -> Result<Uid, VerificationOutcome> {
        Uid::parse(raw).map_err(|_| VerificationOutcome::InvalidUid {
            exchange,
            input: raw.to_string(),
        })
    }

    /// Validate then verify
    pub async fn verify(&self, exchange: Exchange, raw: &str) -> VerificationOutcome {
        match self.validate(exchange, raw) {
            Ok(uid) => self.verify_validated(exchange, uid).await,
            Err(outcome) => outcome,
        }
    }

    /// Ask the exchange about an already validated UID
    #[instrument(skip(self), fields(exchange = exchange.id(), uid = %uid))]
    pub async fn verify_validated(&self, exchange: Exchange, uid: Uid) -> VerificationOutcome {
        let Some(route) = self.routes.get(&exchange) else {
            return unconfigured(exchange, uid);
        };

        match route.connector.verify_uid(&uid).await {
            Ok(VerificationResult::Verified { register_time, .. }) => {
                info!("UID verified");
                VerificationOutcome::Succeeded {
                    exchange,
                    uid,
                    register_time,
                }
            }
            Ok(VerificationResult::NotVerified { reason, .. }) => {
                info!(reason = %reason, "UID not verified");
                VerificationOutcome::NotVerified {
                    exchange,
                    uid,
                    reason,
                }
            }
            Err(e) if route.fallback == FallbackPolicy::Degrade && e.is_transport() => {
                warn!(
                    error = %truncate_for_log(&e.to_string()),
                    "exchange unreachable, accepting UID unconfirmed"
                );
                VerificationOutcome::Degraded { exchange, uid }
            }
            Err(e) => unavailable(exchange, uid, &e),
        }
    }

    /// Validate, verify, then aggregate trade volumes
    pub async fn volume_report(&self, exchange: Exchange, raw: &str) -> VolumeOutcome {
        let uid = match Uid::parse(raw) {
            Ok(uid) => uid,
            Err(_) => {
                return VolumeOutcome::InvalidUid {
                    exchange,
                    input: raw.to_string(),
                }
            }
        };
        self.volume_report_validated(exchange, uid).await
    }

    #[instrument(skip(self), fields(exchange = exchange.id(), uid = %uid))]
    pub async fn volume_report_validated(&self, exchange: Exchange, uid: Uid) -> VolumeOutcome {
        let Some(route) = self.routes.get(&exchange) else {
            return VolumeOutcome::Unavailable {
                exchange,
                uid,
                error: format!("{} is not configured", exchange),
            };
        };

        let register_time = match route.connector.verify_uid(&uid).await {
            Ok(VerificationResult::Verified { register_time, .. }) => register_time,
            Ok(VerificationResult::NotVerified { .. }) => {
                return VolumeOutcome::NotVerified { exchange, uid };
            }
            Err(e) => return volume_unavailable(exchange, uid, &e),
        };

        match route.connector.get_trade_volumes(&uid, register_time).await {
            Ok(summary) => {
                info!(total = %summary.total_volume, "volume report ready");
                VolumeOutcome::Report {
                    exchange,
                    uid,
                    summary,
                }
            }
            Err(e) => volume_unavailable(exchange, uid, &e),
        }
    }
}

fn unconfigured(exchange: Exchange, uid: Uid) -> VerificationOutcome {
    error!(exchange = exchange.id(), "no connector registered");
    VerificationOutcome::Unavailable {
        exchange,
        uid,
        error: format!("{} is not configured", exchange),
    }
}

fn unavailable(exchange: Exchange, uid: Uid, e: &ExchangeError) -> VerificationOutcome {
    let error = truncate_for_log(&e.to_string());
    error!(exchange = exchange.id(), uid = %uid, error = %error, "verification failed");
    VerificationOutcome::Unavailable {
        exchange,
        uid,
        error,
    }
}

fn volume_unavailable(exchange: Exchange, uid: Uid, e: &ExchangeError) -> VolumeOutcome {
    let error = truncate_for_log(&e.to_string());
    error!(exchange = exchange.id(), uid = %uid, error = %error, "volume report failed");
    VolumeOutcome::Unavailable {
        exchange,
        uid,
        error,
    }
}
