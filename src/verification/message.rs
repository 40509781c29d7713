use crate::core::config::AppConfig;
use crate::core::types::{Exchange, Uid, VolumeSummary};
use crate::verification::orchestrator::{VerificationOutcome, VolumeOutcome};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use rust_decimal::Decimal;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const SAMPLE_UID: &str = "12345678";

/// Chat command that verifies a UID on `exchange`
pub const fn verify_command(exchange: Exchange) -> &'static str {
    match exchange {
        Exchange::Bitget => "/verify",
        Exchange::Bitunix => "/bitunixuid",
    }
}

/// Chat command that reports trade volume on `exchange`
pub const fn volume_command(exchange: Exchange) -> &'static str {
    match exchange {
        Exchange::Bitget => "/volume",
        Exchange::Bitunix => "/bitunixvolume",
    }
}

/// Render a registration time in the display offset, or "unknown"
pub fn format_register_time(time: Option<DateTime<Utc>>, offset: &FixedOffset) -> String {
    time.map_or_else(
        || "unknown".to_string(),
        |t| t.with_timezone(offset).format(TIME_FORMAT).to_string(),
    )
}

fn format_volume(volume: Decimal) -> String {
    volume.round_dp(2).normalize().to_string()
}

/// Everything the reply texts need besides the outcome itself
#[derive(Debug, Clone)]
pub struct ReplySettings {
    pub reward_group_link: String,
    pub display_offset: FixedOffset,
    pub support_contact: String,
    pub bitget_referral_link: String,
    pub bitunix_referral_link: String,
}

impl ReplySettings {
    /// Offsets outside ±23h fall back to UTC.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            reward_group_link: config.reward_group_link.clone(),
            display_offset: FixedOffset::east_opt(config.display_utc_offset_hours * 3600)
                .unwrap_or_else(|| Utc.fix()),
            support_contact: config.menu.support_contact.clone(),
            bitget_referral_link: config.menu.bitget_referral_link.clone(),
            bitunix_referral_link: config.menu.bitunix_referral_link.clone(),
        }
    }

    pub fn referral_link(&self, exchange: Exchange) -> &str {
        match exchange {
            Exchange::Bitget => &self.bitget_referral_link,
            Exchange::Bitunix => &self.bitunix_referral_link,
        }
    }

    pub fn processing(&self, exchange: Exchange, uid: &Uid) -> String {
        format!("🔄 Verifying {} UID...\nUID: {}", exchange, uid)
    }

    pub fn private_chat_only(&self) -> String {
        "⚠️ Please message the bot privately to verify.".to_string()
    }

    pub fn usage(&self, command: &str) -> String {
        format!(
            "❌ Invalid format. Please send: {} UID\nExample: {} {}",
            command, command, SAMPLE_UID
        )
    }

    pub fn render(&self, outcome: &VerificationOutcome) -> String {
        match outcome {
            VerificationOutcome::InvalidUid { exchange, .. } => {
                self.usage(verify_command(*exchange))
            }
            VerificationOutcome::Succeeded {
                exchange,
                uid,
                register_time,
            } => format!(
                "🎉 {} verification succeeded!\n\n🆔 UID: {}\n📅 Registered: {}\n\n🔗 Join the free lifetime VIP group: {}",
                exchange,
                uid,
                format_register_time(*register_time, &self.display_offset),
                self.reward_group_link
            ),
            VerificationOutcome::NotVerified { exchange, uid, .. } => {
                self.not_verified(*exchange, uid)
            }
            VerificationOutcome::Degraded { exchange, uid } => format!(
                "🎉 {} UID accepted!\n\n🆔 UID: {}\n\n🔗 Join the free lifetime VIP group: {}\n\n💡 Note: {} could not be reached, so this UID was accepted without exchange confirmation.",
                exchange, uid, self.reward_group_link, exchange
            ),
            VerificationOutcome::Unavailable { exchange, .. } => self.unavailable(*exchange),
        }
    }

    pub fn render_volume(&self, outcome: &VolumeOutcome) -> String {
        match outcome {
            VolumeOutcome::InvalidUid { exchange, .. } => self.usage(volume_command(*exchange)),
            VolumeOutcome::NotVerified { exchange, uid } => self.not_verified(*exchange, uid),
            VolumeOutcome::Report {
                exchange,
                uid,
                summary,
            } => self.volume_report(*exchange, uid, summary),
            VolumeOutcome::Unavailable { exchange, .. } => self.unavailable(*exchange),
        }
    }

    fn not_verified(&self, exchange: Exchange, uid: &Uid) -> String {
        format!(
            "❌ {} verification failed: UID {} did not pass.\nPlease make sure you registered through the official referral link: {}",
            exchange,
            uid,
            self.referral_link(exchange)
        )
    }

    fn unavailable(&self, exchange: Exchange) -> String {
        format!(
            "⚠️ {} verification service is temporarily unavailable.\nPlease try again later or contact {}",
            exchange, self.support_contact
        )
    }

    fn volume_report(&self, exchange: Exchange, uid: &Uid, summary: &VolumeSummary) -> String {
        format!(
            "📊 {} trading volume\n\n🆔 UID: {}\n• Total: {} USDT\n• Last month: {} USDT\n• This month: {} USDT",
            exchange,
            uid,
            format_volume(summary.total_volume),
            format_volume(summary.last_month_volume),
            format_volume(summary.current_month_volume)
        )
    }
}
