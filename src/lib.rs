use anyhow::Context;
use bot::Bot;
use tracing_subscriber::fmt::time::ChronoLocal;

mod bot;
pub mod cmd;
pub mod config;
pub mod game;
pub mod janitor;
pub mod menu;
mod msg_prelude;
pub mod question;
pub mod settings;

pub use config::Config;
pub use msg_prelude::*;
pub use question::{Category, QuestionBank};

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_timer(ChronoLocal::rfc_3339()).with_max_level(tracing::Level::INFO).init();

    if let Err(err) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {err}");
    }

    let config = Config::from_env()?;

    let bank = QuestionBank::load(&config.questions_path).with_context(|| {
        format!("failed to load questions from {}", config.questions_path.display())
    })?;

    tracing::info!(
        truths = bank.prompts(Category::Truth).len(),
        dares = bank.prompts(Category::Dare).len(),
        access = ?config.access,
        "Question bank loaded"
    );

    let bot: Bot = Bot::new(&config, bank)?;
    bot.run_active().await
}
