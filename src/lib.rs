pub mod bot;
pub mod core;
pub mod exchanges;
pub mod verification;

pub use core::{
    errors::{ChatError, ExchangeError},
    traits::{ReferralConnector, ReferralVerifier, TradeVolumeSource},
    types::*,
};
pub use exchanges::bitget::BitgetConnector;
pub use exchanges::bitunix::BitunixConnector;
pub use verification::{Orchestrator, VerificationOutcome};
