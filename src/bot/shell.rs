use crate::bot::command::Command;
use crate::bot::menu::{Menu, MenuAction};
use crate::bot::telegram::{CallbackQuery, Chat, ChatTransport, Message, Update};
use crate::core::errors::ChatError;
use crate::core::types::{Exchange, Uid};
use crate::verification::{Orchestrator, ReplySettings, VolumeOutcome};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, instrument, warn};

/// Pause after a failed `getUpdates` before polling again
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

/// How long in-flight updates may keep running after shutdown is requested
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Routes chat updates to the menu and the verification orchestrator
pub struct BotShell<T: ChatTransport> {
    transport: Arc<T>,
    orchestrator: Arc<Orchestrator>,
    replies: ReplySettings,
    menu: Menu,
}

impl<T: ChatTransport + 'static> BotShell<T> {
    pub fn new(
        transport: Arc<T>,
        orchestrator: Arc<Orchestrator>,
        replies: ReplySettings,
        menu: Menu,
    ) -> Self {
        Self {
            transport,
            orchestrator,
            replies,
            menu,
        }
    }

    /// Poll for updates until `shutdown` resolves. Every update is handled on
    /// its own task; tasks still running at shutdown get `SHUTDOWN_GRACE` to
    /// finish before they are aborted.
    pub async fn run<F>(self: Arc<Self>, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(shutdown);
        let mut offset: Option<i64> = None;
        let mut tasks = JoinSet::new();
        info!("bot polling started");

        loop {
            let polled = tokio::select! {
                () = &mut shutdown => break,
                polled = self.transport.get_updates(offset) => polled,
            };

            while let Some(joined) = tasks.try_join_next() {
                log_task_exit(joined);
            }

            match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        let shell = Arc::clone(&self);
                        tasks.spawn(async move { shell.handle_update(update).await });
                    }
                }
                Err(e) => {
                    warn!(error = %e, "getUpdates failed");
                    tokio::select! {
                        () = &mut shutdown => break,
                        () = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                    }
                }
            }
        }

        info!(in_flight = tasks.len(), "bot polling stopped");
        let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
            while let Some(joined) = tasks.join_next().await {
                log_task_exit(joined);
            }
        })
        .await;
        if drained.is_err() {
            warn!(aborted = tasks.len(), "in-flight updates did not finish in time");
            tasks.abort_all();
        }
    }

    #[instrument(skip(self, update), fields(update_id = update.update_id))]
    pub async fn handle_update(&self, update: Update) {
        if let Some(query) = update.callback_query {
            self.handle_callback(query).await;
        } else if let Some(message) = update.message {
            self.handle_message(message).await;
        }
    }

    async fn handle_message(&self, message: Message) {
        let Some(text) = message.text.as_deref() else {
            return;
        };

        match Command::parse(text) {
            Some(Command::Start | Command::Menu) => self.send_welcome(message.chat.id).await,
            Some(Command::Verify { exchange, arg }) => {
                self.handle_verify(&message.chat, exchange, &arg).await;
            }
            Some(Command::Volume { exchange, arg }) => {
                self.handle_volume(&message.chat, exchange, &arg).await;
            }
            Some(Command::Unknown(name)) => debug!(command = %name, "ignoring unknown command"),
            None if message.chat.is_private() => self.send_welcome(message.chat.id).await,
            None => {}
        }
    }

    async fn handle_verify(&self, chat: &Chat, exchange: Exchange, arg: &str) {
        if !chat.is_private() {
            self.reply(chat.id, &self.replies.private_chat_only()).await;
            return;
        }

        let uid = match self.orchestrator.validate(exchange, arg) {
            Ok(uid) => uid,
            Err(invalid) => {
                self.reply(chat.id, &self.replies.render(&invalid)).await;
                return;
            }
        };

        let processing = self.send_processing(chat.id, exchange, &uid).await;
        let outcome = self.orchestrator.verify_validated(exchange, uid).await;
        self.clear_processing(chat.id, processing).await;

        self.reply(chat.id, &self.replies.render(&outcome)).await;
    }

    async fn handle_volume(&self, chat: &Chat, exchange: Exchange, arg: &str) {
        if !chat.is_private() {
            self.reply(chat.id, &self.replies.private_chat_only()).await;
            return;
        }

        let Ok(uid) = Uid::parse(arg) else {
            let invalid = VolumeOutcome::InvalidUid {
                exchange,
                input: arg.to_string(),
            };
            self.reply(chat.id, &self.replies.render_volume(&invalid)).await;
            return;
        };

        let processing = self.send_processing(chat.id, exchange, &uid).await;
        let outcome = self.orchestrator.volume_report_validated(exchange, uid).await;
        self.clear_processing(chat.id, processing).await;

        self.reply(chat.id, &self.replies.render_volume(&outcome)).await;
    }

    async fn handle_callback(&self, query: CallbackQuery) {
        let Some(chat_id) = query.message.as_ref().map(|m| m.chat.id) else {
            self.acknowledge(&query.id).await;
            return;
        };

        let Some(action) = query.data.as_deref().and_then(MenuAction::from_callback_data) else {
            debug!(data = ?query.data, "unknown callback");
            self.acknowledge(&query.id).await;
            return;
        };

        if let Err(e) = self.answer_action(&query.id, chat_id, action).await {
            warn!(action = action.callback_data(), error = %e, "menu callback failed");
            self.reply(chat_id, &self.menu.callback_failed()).await;
        }
    }

    async fn answer_action(
        &self,
        query_id: &str,
        chat_id: i64,
        action: MenuAction,
    ) -> Result<(), ChatError> {
        self.transport.answer_callback_query(query_id).await?;
        self.transport
            .send_message(chat_id, &self.menu.reply(action), None)
            .await?;
        Ok(())
    }

    /// Welcome photo with the menu keyboard, or plain text when the photo fails
    async fn send_welcome(&self, chat_id: i64) {
        let keyboard = self.menu.keyboard();
        let photo = self
            .transport
            .send_photo(
                chat_id,
                self.menu.welcome_photo_url(),
                self.menu.welcome_text(),
                Some(&keyboard),
            )
            .await;

        if let Err(e) = photo {
            warn!(error = %e, "welcome photo failed, sending text");
            if let Err(e) = self
                .transport
                .send_message(chat_id, self.menu.welcome_text(), Some(&keyboard))
                .await
            {
                warn!(chat_id, error = %e, "welcome message failed");
            }
        }
    }

    async fn send_processing(&self, chat_id: i64, exchange: Exchange, uid: &Uid) -> Option<i64> {
        match self
            .transport
            .send_message(chat_id, &self.replies.processing(exchange, uid), None)
            .await
        {
            Ok(message) => Some(message.message_id),
            Err(e) => {
                warn!(chat_id, error = %e, "failed to send progress message");
                None
            }
        }
    }

    async fn clear_processing(&self, chat_id: i64, message_id: Option<i64>) {
        if let Some(message_id) = message_id {
            if let Err(e) = self.transport.delete_message(chat_id, message_id).await {
                debug!(chat_id, message_id, error = %e, "failed to delete progress message");
            }
        }
    }

    async fn acknowledge(&self, query_id: &str) {
        if let Err(e) = self.transport.answer_callback_query(query_id).await {
            debug!(error = %e, "failed to answer callback");
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.transport.send_message(chat_id, text, None).await {
            warn!(chat_id, error = %e, "failed to send reply");
        }
    }
}

fn log_task_exit(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            error!(error = %e, "update handler panicked");
        }
    }
}
