use crate::core::types::Exchange;

/// Chat command with its raw argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Menu,
    Verify { exchange: Exchange, arg: String },
    Volume { exchange: Exchange, arg: String },
    Unknown(String),
}

impl Command {
    /// Parse a message text. Returns `None` for text that is not a command.
    ///
    /// `/verify@my_bot 123` is read as `/verify 123`; only the first argument
    /// is kept and a missing argument is an empty string.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?.strip_prefix('/')?;
        let name = head.split_once('@').map_or(head, |(name, _)| name);
        let arg = parts.next().unwrap_or_default().to_string();

        Some(match name {
            "start" => Self::Start,
            "menu" => Self::Menu,
            "verify" => Self::Verify {
                exchange: Exchange::Bitget,
                arg,
            },
            "bitunixuid" => Self::Verify {
                exchange: Exchange::Bitunix,
                arg,
            },
            "volume" => Self::Volume {
                exchange: Exchange::Bitget,
                arg,
            },
            "bitunixvolume" => Self::Volume {
                exchange: Exchange::Bitunix,
                arg,
            },
            other => Self::Unknown(other.to_string()),
        })
    }
}
