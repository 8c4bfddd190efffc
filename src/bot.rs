use std::sync::Arc;

use anyhow::Context;
use teloxide::{
    dispatching::UpdateFilterExt,
    payloads,
    prelude::*,
    requests::JsonRequest,
    types::{CallbackQuery, ChatMemberStatus, Me, Message, MessageId, UserId},
    utils::command::BotCommands,
};
use tokio::sync::Mutex;

use crate::{
    cmd::Command,
    config::Config,
    game::{CallbackOutcome, GameState},
    janitor::Janitor,
    menu::CallbackAction,
    question::QuestionBank,
};

pub struct Bot(Arc<Mutex<BotInner>>);

impl Clone for Bot {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl Bot {
    pub fn new(config: &Config, bank: QuestionBank) -> anyhow::Result<Self> {
        Ok(Self(Arc::new(Mutex::new(BotInner::new(config, bank)?))))
    }

    pub async fn run_active(&self) -> anyhow::Result<()> {
        let bot_instance = {
            let inner = self.0.lock().await;
            inner.bot.clone()
        };

        if let Err(err) = bot_instance.set_my_commands(Command::bot_commands()).send().await {
            tracing::warn!("Failed to register command list: {err}");
        }

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint({
                let bot = self.clone();

                move |msg: Message, me: Me| {
                    let bot = bot.clone();

                    async move { bot.0.lock().await.handle_message(msg, me).await }
                }
            }))
            .branch(Update::filter_callback_query().endpoint({
                let bot = self.clone();

                move |q: CallbackQuery| {
                    let bot = bot.clone();

                    async move { bot.0.lock().await.handle_callback(q).await }
                }
            }));

        tracing::info!("Bot is running...");

        Dispatcher::builder(bot_instance, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        tracing::info!("Bot is stopped");
        Ok(())
    }
}

struct BotInner {
    bot: teloxide::Bot,
    game: GameState,
    janitor: Janitor,
}

type SendMessage = JsonRequest<payloads::SendMessage>;

trait SendMessageExt {
    async fn remove_later(
        self, inner: &BotInner, from_msg_id: MessageId, bot_id: UserId,
    ) -> anyhow::Result<Message>;
}

impl SendMessageExt for SendMessage {
    async fn remove_later(
        self, inner: &BotInner, from_msg_id: MessageId, bot_id: UserId,
    ) -> anyhow::Result<Message> {
        let sent = self.send().await?;

        let chat_id = sent.chat.id;
        if !inner.can_remove_in(chat_id, bot_id).await {
            return Ok(sent);
        }

        let bot = inner.bot.clone();
        let msg_id = sent.id;

        inner.janitor.schedule(async move {
            bot.delete_messages(chat_id, vec![msg_id, from_msg_id])
                .send()
                .await
                .with_context(|| removal_failure_context(chat_id))?;
            Ok(())
        });

        tracing::debug!(
            chat_id = chat_id.0,
            delay_secs = inner.janitor.delay().as_secs(),
            "Scheduled message removal"
        );

        Ok(sent)
    }
}

fn removal_failure_context(chat_id: ChatId) -> String {
    format!(
        "chat {}: bot may lack the right to delete other users' messages",
        chat_id.0
    )
}

impl BotInner {
    fn new(config: &Config, bank: QuestionBank) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .https_only(true)
            .http2_adaptive_window(true)
            .build()
            .context("failed to build http client")?;

        let bot = teloxide::Bot::with_client(config.bot_token.clone(), http_client);

        Ok(Self {
            bot,
            game: GameState::new(bank, config.access, config.notice.clone()),
            janitor: Janitor::new(config.delete_after),
        })
    }

    async fn handle_message(&mut self, msg: Message, me: Me) -> anyhow::Result<()> {
        let Some(cmd) = msg
            .text()
            .and_then(|text| Command::parse(text, me.username()).ok())
        else {
            return Ok(());
        };

        let caller = msg.from.as_ref().map(|user| user.id);
        let reply = self.game.handle_command(&cmd, caller);

        let mut request = self.bot.send_message(msg.chat.id, reply.text);
        if let Some(keyboard) = reply.keyboard {
            request = request.reply_markup(keyboard);
        }

        if reply.auto_delete {
            request.remove_later(self, msg.id, me.user.id).await?;
        } else {
            request.send().await?;
        }

        Ok(())
    }

    async fn handle_callback(&mut self, q: CallbackQuery) -> anyhow::Result<()> {
        let Some(action) = q
            .data
            .as_deref()
            .and_then(|data| data.parse::<CallbackAction>().ok())
        else {
            tracing::debug!(data = ?q.data, "Ignoring unknown callback");
            self.bot.answer_callback_query(q.id.clone()).send().await?;
            return Ok(());
        };

        match self.game.handle_callback(action, q.from.id) {
            CallbackOutcome::Denied(text) => {
                self.bot
                    .answer_callback_query(q.id.clone())
                    .text(text)
                    .show_alert(true)
                    .send()
                    .await?;
            }
            CallbackOutcome::Edit { text, keyboard } => {
                self.bot.answer_callback_query(q.id.clone()).send().await?;

                let Some(message) = &q.message else {
                    return Ok(());
                };

                if let Err(err) = self
                    .bot
                    .edit_message_text(message.chat().id, message.id(), text)
                    .reply_markup(keyboard)
                    .send()
                    .await
                {
                    tracing::warn!("Failed to update settings menu: {err}");
                }
            }
        }

        Ok(())
    }

    /// Only members and admins get their messages cleaned up.
    async fn can_remove_in(&self, chat_id: ChatId, bot_id: UserId) -> bool {
        match self.bot.get_chat_member(chat_id, bot_id).send().await {
            Ok(member) => match member.kind.status() {
                ChatMemberStatus::Administrator | ChatMemberStatus::Member => true,
                status => {
                    tracing::warn!(
                        chat_id = chat_id.0,
                        ?status,
                        "Bot is not a member of the chat, unable to delete messages"
                    );
                    false
                }
            },
            Err(err) => {
                tracing::warn!(chat_id = chat_id.0, "Failed to check bot membership: {err}");
                false
            }
        }
    }
}
