use crate::bot::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::core::config::MenuConfig;
use crate::core::types::Exchange;
use crate::verification::verify_command;

const WELCOME_TEXT: &str = "Hello, friend.\nThank you for supporting the Billionaire Growth Plan!\n\n\
🔵 Join the Tycoon Premium VIP group\n\
🔵 Follow the free channel\n\
🔵 Custom investment plans\n\
🔺 Other questions\n\
🔺 Business cooperation";

/// Inline menu buttons and their callback payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    JoinVip,
    JoinFreeVip,
    FollowChannel,
    InvestmentPlan,
    OtherQuestions,
    BusinessCooperation,
    BitgetUidHelp,
    BitunixUidHelp,
}

impl MenuAction {
    pub const ALL: [Self; 8] = [
        Self::JoinVip,
        Self::JoinFreeVip,
        Self::FollowChannel,
        Self::InvestmentPlan,
        Self::OtherQuestions,
        Self::BusinessCooperation,
        Self::BitgetUidHelp,
        Self::BitunixUidHelp,
    ];

    pub const fn callback_data(self) -> &'static str {
        match self {
            Self::JoinVip => "join_vip",
            Self::JoinFreeVip => "join_free_vip",
            Self::FollowChannel => "follow_channel",
            Self::InvestmentPlan => "investment_plan",
            Self::OtherQuestions => "other_questions",
            Self::BusinessCooperation => "business_cooperation",
            Self::BitgetUidHelp => "bitget_uid_verification",
            Self::BitunixUidHelp => "bitunix_uid_verification",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.callback_data() == data)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::JoinVip => "Join the Tycoon Premium VIP group",
            Self::JoinFreeVip => "Join the free lifetime VIP group",
            Self::FollowChannel => "Follow the free channel",
            Self::InvestmentPlan => "Custom investment plans",
            Self::OtherQuestions => "Other questions",
            Self::BusinessCooperation => "Business cooperation",
            Self::BitgetUidHelp => "Bitget UID verification",
            Self::BitunixUidHelp => "Bitunix UID verification",
        }
    }

    fn button(self) -> InlineKeyboardButton {
        InlineKeyboardButton {
            text: self.label().to_string(),
            callback_data: self.callback_data().to_string(),
        }
    }
}

/// Welcome message, keyboard and button replies
#[derive(Debug, Clone)]
pub struct Menu {
    config: MenuConfig,
}

impl Menu {
    pub fn new(config: MenuConfig) -> Self {
        Self { config }
    }

    pub fn welcome_text(&self) -> &'static str {
        WELCOME_TEXT
    }

    pub fn welcome_photo_url(&self) -> &str {
        &self.config.welcome_photo_url
    }

    pub fn keyboard(&self) -> InlineKeyboardMarkup {
        let row = |actions: &[MenuAction]| -> Vec<InlineKeyboardButton> {
            actions.iter().map(|a| a.button()).collect()
        };
        let rows = vec![
            row(&[MenuAction::JoinVip]),
            row(&[MenuAction::JoinFreeVip]),
            row(&[MenuAction::FollowChannel]),
            row(&[MenuAction::InvestmentPlan]),
            row(&[MenuAction::OtherQuestions, MenuAction::BusinessCooperation]),
            row(&[MenuAction::BitgetUidHelp]),
            row(&[MenuAction::BitunixUidHelp]),
        ];
        InlineKeyboardMarkup {
            inline_keyboard: rows,
        }
    }

    pub fn reply(&self, action: MenuAction) -> String {
        let contact = &self.config.support_contact;
        match action {
            MenuAction::JoinVip => {
                format!("💎 To join the premium VIP group contact: {}", contact)
            }
            MenuAction::InvestmentPlan => format!("💰 Investment plan enquiries: {}", contact),
            MenuAction::OtherQuestions => format!("❓ Other questions: {}", contact),
            MenuAction::BusinessCooperation => format!("🤝 Business cooperation: {}", contact),
            MenuAction::FollowChannel => format!("📢 Free channel: {}", self.config.channel_link),
            MenuAction::JoinFreeVip => format!(
                "How to join the free lifetime VIP group:\n\n\
                 Option A:\n1. Register on Bitunix with the referral link\n\
                 Referral link: {}\n\
                 🧧 Enjoy fee discounts and sign-up cash rewards\n\
                 2. After registering, send {} UID\n\n\
                 Option B:\n1. Register on Bitget with the referral link\n\
                 Referral link: {}\n\
                 🧧 Enjoy fee discounts\n\
                 2. After registering, send {} UID\n\n\
                 ❗️ A VPN node in Japan, Hong Kong or Taiwan is recommended",
                self.config.bitunix_referral_link,
                verify_command(Exchange::Bitunix),
                self.config.bitget_referral_link,
                verify_command(Exchange::Bitget),
            ),
            MenuAction::BitgetUidHelp => uid_help(Exchange::Bitget),
            MenuAction::BitunixUidHelp => uid_help(Exchange::Bitunix),
        }
    }

    /// Sent when a button reply could not be delivered
    pub fn callback_failed(&self) -> String {
        format!(
            "⚠️ That button did not work, please try again later or contact {}",
            self.config.support_contact
        )
    }
}

fn uid_help(exchange: Exchange) -> String {
    let command = verify_command(exchange);
    format!(
        "🔍 {} UID verification:\nPlease send {} UID\nExample: {} 12345678",
        exchange, command, command
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_data_round_trips() {
        for action in MenuAction::ALL {
            assert_eq!(
                MenuAction::from_callback_data(action.callback_data()),
                Some(action)
            );
        }
        assert_eq!(MenuAction::from_callback_data("nope"), None);
    }

    #[test]
    fn test_keyboard_has_every_action_once() {
        let menu = Menu::new(MenuConfig::default());
        let data: Vec<String> = menu
            .keyboard()
            .inline_keyboard
            .into_iter()
            .flatten()
            .map(|b| b.callback_data)
            .collect();
        assert_eq!(data.len(), MenuAction::ALL.len());
        for action in MenuAction::ALL {
            assert!(data.iter().any(|d| d == action.callback_data()));
        }
    }

    #[test]
    fn test_replies_use_configured_links() {
        let config = MenuConfig {
            support_contact: "@helpdesk".to_string(),
            channel_link: "https://t.me/channel".to_string(),
            welcome_photo_url: "https://img.example/welcome.png".to_string(),
            bitget_referral_link: "https://bitget.example/ref".to_string(),
            bitunix_referral_link: "https://bitunix.example/ref".to_string(),
        };
        let menu = Menu::new(config);

        assert!(menu.reply(MenuAction::JoinVip).contains("@helpdesk"));
        assert!(menu
            .reply(MenuAction::FollowChannel)
            .contains("https://t.me/channel"));

        let free = menu.reply(MenuAction::JoinFreeVip);
        assert!(free.contains("https://bitget.example/ref"));
        assert!(free.contains("https://bitunix.example/ref"));
        assert!(free.contains("/bitunixuid UID"));
        assert!(free.contains("/verify UID"));

        assert!(menu
            .reply(MenuAction::BitunixUidHelp)
            .contains("/bitunixuid 12345678"));
        assert!(menu.callback_failed().contains("@helpdesk"));
    }
}
