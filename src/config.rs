use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use teloxide::types::UserId;

use crate::settings::Access;

pub const DEFAULT_QUESTIONS_PATH: &str = "questions.json";
pub const DEFAULT_DELETE_AFTER: Duration = Duration::from_secs(5 * 60);

pub struct Config {
    pub bot_token: String,
    pub access: Access,
    pub questions_path: PathBuf,
    pub delete_after: Duration,
    pub notice: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .filter(|token| !token.is_empty())
            .context("TELEGRAM_BOT_TOKEN must be set")?;

        let access = match lookup("CREATOR_USER_ID").filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                let id: u64 = id
                    .trim()
                    .parse()
                    .context("CREATOR_USER_ID must be a numeric user id")?;
                Access::Creator(UserId(id))
            }
            None => Access::Open,
        };

        let questions_path = lookup("QUESTIONS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_QUESTIONS_PATH));

        let delete_after = match lookup("DELETE_AFTER_SECS") {
            Some(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .context("DELETE_AFTER_SECS must be a number of seconds")?,
            ),
            None => DEFAULT_DELETE_AFTER,
        };

        let notice = lookup("CREATOR_NOTICE").filter(|notice| !notice.is_empty());

        Ok(Self {
            bot_token,
            access,
            questions_path,
            delete_after,
            notice,
        })
    }
}
