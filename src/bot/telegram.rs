use crate::core::errors::ChatError;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{instrument, trace};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
/// Seconds Telegram holds a `getUpdates` call open
pub const LONG_POLL_SECONDS: u64 = 30;
const HTTP_TIMEOUT_SECONDS: u64 = LONG_POLL_SECONDS + 10;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.kind == "private"
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct TelegramResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

/// Outbound chat operations used by the bot shell
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Long-poll for updates with `update_id >= offset`
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, ChatError>;

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, ChatError>;

    async fn send_photo(
        &self,
        chat_id: i64,
        photo_url: &str,
        caption: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, ChatError>;

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), ChatError>;

    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), ChatError>;
}

/// Telegram Bot API client over reqwest
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: Secret<String>,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl TelegramClient {
    pub fn new(token: Secret<String>) -> Result<Self, ChatError> {
        Self::with_base_url(token, DEFAULT_API_URL.to_string())
    }

    pub fn with_base_url(token: Secret<String>, base_url: String) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| ChatError::HttpError(e.without_url()))?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Call a Bot API method. The URL embeds the token, so it is stripped
    /// from every error before it can reach a log line.
    #[instrument(skip(self, payload), fields(method = %method))]
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &Value,
    ) -> Result<T, ChatError> {
        let url = format!(
            "{}/bot{}/{}",
            self.base_url,
            self.token.expose_secret(),
            method
        );

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ChatError::HttpError(e.without_url()))?;
        trace!(status = %response.status(), "Telegram responded");

        let body: TelegramResponse<T> = response
            .json()
            .await
            .map_err(|e| ChatError::HttpError(e.without_url()))?;

        if !body.ok {
            return Err(ChatError::ApiError(
                body.description
                    .unwrap_or_else(|| format!("{} failed", method)),
            ));
        }
        body.result
            .ok_or_else(|| ChatError::ApiError(format!("{} returned no result", method)))
    }
}

fn with_keyboard(
    mut payload: Value,
    keyboard: Option<&InlineKeyboardMarkup>,
) -> Result<Value, ChatError> {
    if let (Some(keyboard), Value::Object(map)) = (keyboard, &mut payload) {
        map.insert("reply_markup".to_string(), serde_json::to_value(keyboard)?);
    }
    Ok(payload)
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, ChatError> {
        let mut payload = json!({
            "timeout": LONG_POLL_SECONDS,
            "allowed_updates": ["message", "callback_query"],
        });
        if let (Some(offset), Value::Object(map)) = (offset, &mut payload) {
            map.insert("offset".to_string(), json!(offset));
        }
        self.call("getUpdates", &payload).await
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, ChatError> {
        let payload = with_keyboard(
            json!({
                "chat_id": chat_id,
                "text": text,
                "disable_web_page_preview": true,
            }),
            keyboard,
        )?;
        self.call("sendMessage", &payload).await
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo_url: &str,
        caption: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, ChatError> {
        let payload = with_keyboard(
            json!({
                "chat_id": chat_id,
                "photo": photo_url,
                "caption": caption,
            }),
            keyboard,
        )?;
        self.call("sendPhoto", &payload).await
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), ChatError> {
        self.call::<bool>(
            "deleteMessage",
            &json!({ "chat_id": chat_id, "message_id": message_id }),
        )
        .await
        .map(|_| ())
    }

    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), ChatError> {
        self.call::<bool>(
            "answerCallbackQuery",
            &json!({ "callback_query_id": callback_query_id }),
        )
        .await
        .map(|_| ())
    }
}
