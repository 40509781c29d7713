//! In-memory fakes shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use refcheck::bot::telegram::{
    CallbackQuery, Chat, ChatTransport, InlineKeyboardMarkup, Message, Update,
};
use refcheck::core::errors::{ChatError, ExchangeError};
use refcheck::core::kernel::RestClient;
use refcheck::core::traits::{ReferralVerifier, TradeVolumeSource};
use refcheck::core::types::{Exchange, Uid, VerificationResult, VolumeSummary};
use refcheck::verification::ReplySettings;
use reqwest::Method;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// RestClient

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub authenticated: bool,
}

impl RecordedCall {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct MockRestInner {
    responses: Mutex<VecDeque<Result<Value, ExchangeError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Scripted `RestClient`: answers calls in order from a queue and records them
#[derive(Clone, Default)]
pub struct MockRest {
    inner: Arc<MockRestInner>,
}

impl MockRest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: Result<Value, ExchangeError>) -> Self {
        self.inner.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn ok(self, body: Value) -> Self {
        self.respond(Ok(body))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.calls.lock().unwrap().clone()
    }

    fn next(&self, call: RecordedCall) -> Result<Value, ExchangeError> {
        self.inner.calls.lock().unwrap().push(call);
        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ExchangeError::NetworkError("no scripted response".to_string())))
    }
}

fn owned(params: &[(&str, &str)]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[async_trait]
impl RestClient for MockRest {
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.next(RecordedCall {
            method: "GET".to_string(),
            endpoint: endpoint.to_string(),
            query: owned(query_params),
            body: None,
            authenticated,
        })
    }

    async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.next(RecordedCall {
            method: "POST".to_string(),
            endpoint: endpoint.to_string(),
            query: Vec::new(),
            body: Some(body.clone()),
            authenticated,
        })
    }

    async fn signed_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: &[u8],
    ) -> Result<Value, ExchangeError> {
        let body = if body.is_empty() {
            None
        } else {
            serde_json::from_slice(body).ok()
        };
        self.next(RecordedCall {
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            query: owned(query_params),
            body,
            authenticated: true,
        })
    }
}

pub fn timeout_error() -> ExchangeError {
    ExchangeError::NetworkError("Request timed out: operation timed out".to_string())
}

// ---------------------------------------------------------------------------
// ReferralConnector

pub enum Scripted {
    Verified(Option<DateTime<Utc>>),
    NotVerified,
    Fail(fn() -> ExchangeError),
}

/// Connector that answers every request the same way and counts calls
pub struct FakeConnector {
    exchange: Exchange,
    verify: Scripted,
    volumes: Result<VolumeSummary, fn() -> ExchangeError>,
    delay: Option<std::time::Duration>,
    pub verify_calls: AtomicUsize,
    pub volume_calls: AtomicUsize,
}

impl FakeConnector {
    pub fn new(exchange: Exchange, verify: Scripted) -> Self {
        Self {
            exchange,
            verify,
            volumes: Ok(VolumeSummary::default()),
            delay: None,
            verify_calls: AtomicUsize::new(0),
            volume_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_volumes(mut self, volumes: Result<VolumeSummary, fn() -> ExchangeError>) -> Self {
        self.volumes = volumes;
        self
    }

    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn verify_count(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn volume_count(&self) -> usize {
        self.volume_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferralVerifier for FakeConnector {
    fn exchange(&self) -> Exchange {
        self.exchange
    }

    async fn verify_uid(&self, uid: &Uid) -> Result<VerificationResult, ExchangeError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.verify {
            Scripted::Verified(time) => Ok(VerificationResult::verified(uid.clone(), *time)),
            Scripted::NotVerified => Ok(VerificationResult::not_verified(uid.clone(), "unknown")),
            Scripted::Fail(make) => Err(make()),
        }
    }
}

#[async_trait]
impl TradeVolumeSource for FakeConnector {
    async fn get_trade_volumes(
        &self,
        _uid: &Uid,
        _register_time: Option<DateTime<Utc>>,
    ) -> Result<VolumeSummary, ExchangeError> {
        self.volume_calls.fetch_add(1, Ordering::SeqCst);
        match &self.volumes {
            Ok(summary) => Ok(*summary),
            Err(make) => Err(make()),
        }
    }
}

pub fn reply_settings() -> ReplySettings {
    ReplySettings {
        reward_group_link: "https://t.me/+reward".to_string(),
        display_offset: chrono::FixedOffset::east_opt(8 * 3600).unwrap(),
        support_contact: "@support".to_string(),
        bitget_referral_link: "https://bitget.example/ref".to_string(),
        bitunix_referral_link: "https://bitunix.example/ref".to_string(),
    }
}

// ---------------------------------------------------------------------------
// ChatTransport

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Message {
        chat_id: i64,
        text: String,
        keyboard: bool,
    },
    Photo {
        chat_id: i64,
        caption: String,
    },
    Deleted {
        chat_id: i64,
        message_id: i64,
    },
    Answered(String),
}

#[derive(Default)]
pub struct FakeTransport {
    pub sent: Mutex<Vec<Sent>>,
    pub batches: Mutex<VecDeque<Vec<Update>>>,
    pub offsets: Mutex<Vec<Option<i64>>>,
    pub fail_photo: bool,
    pub fail_answer: bool,
    pub next_id: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn message(&self, chat_id: i64) -> Message {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 100;
        Message {
            message_id: id,
            chat: Chat {
                id: chat_id,
                kind: "private".to_string(),
            },
            text: None,
        }
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, ChatError> {
        self.offsets.lock().unwrap().push(offset);
        let batch = self.batches.lock().unwrap().pop_front();
        match batch {
            Some(batch) => Ok(batch),
            None => {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, ChatError> {
        self.sent.lock().unwrap().push(Sent::Message {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.is_some(),
        });
        Ok(self.message(chat_id))
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        _photo_url: &str,
        caption: &str,
        _keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, ChatError> {
        if self.fail_photo {
            return Err(ChatError::ApiError("wrong file identifier".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id,
            caption: caption.to_string(),
        });
        Ok(self.message(chat_id))
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), ChatError> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Deleted { chat_id, message_id });
        Ok(())
    }

    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), ChatError> {
        if self.fail_answer {
            return Err(ChatError::ApiError("query is too old".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Answered(callback_query_id.to_string()));
        Ok(())
    }
}

pub fn text_update(update_id: i64, chat_id: i64, chat_kind: &str, text: &str) -> Update {
    Update {
        update_id,
        message: Some(Message {
            message_id: update_id * 10,
            chat: Chat {
                id: chat_id,
                kind: chat_kind.to_string(),
            },
            text: Some(text.to_string()),
        }),
        callback_query: None,
    }
}

pub fn callback_update(update_id: i64, chat_id: i64, data: &str) -> Update {
    Update {
        update_id,
        message: None,
        callback_query: Some(CallbackQuery {
            id: format!("cb{}", update_id),
            message: Some(Message {
                message_id: 1,
                chat: Chat {
                    id: chat_id,
                    kind: "private".to_string(),
                },
                text: None,
            }),
            data: Some(data.to_string()),
        }),
    }
}
