pub mod command;
pub mod menu;
pub mod shell;
pub mod telegram;

pub use command::Command;
pub use menu::{Menu, MenuAction};
pub use shell::BotShell;
pub use telegram::{ChatTransport, TelegramClient};
