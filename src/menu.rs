use std::str::FromStr;

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::settings::Settings;

/// Button payloads understood by the callback handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    BotConfig,
    ToggleBot,
    ToggleDelete,
    EnableBot,
    BackToMain,
}

impl CallbackAction {
    pub fn as_str(self) -> &'static str {
        match self {
            CallbackAction::BotConfig => "bot_config",
            CallbackAction::ToggleBot => "toggle_bot",
            CallbackAction::ToggleDelete => "toggle_delete",
            CallbackAction::EnableBot => "enable_bot",
            CallbackAction::BackToMain => "back_to_main",
        }
    }

    fn button(self, text: impl Into<String>) -> InlineKeyboardButton {
        InlineKeyboardButton::callback(text, self.as_str())
    }
}

impl FromStr for CallbackAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bot_config" => Ok(CallbackAction::BotConfig),
            "toggle_bot" => Ok(CallbackAction::ToggleBot),
            "toggle_delete" => Ok(CallbackAction::ToggleDelete),
            "enable_bot" => Ok(CallbackAction::EnableBot),
            "back_to_main" => Ok(CallbackAction::BackToMain),
            other => Err(anyhow::anyhow!("unknown callback data: {other}")),
        }
    }
}

fn deletion_label(settings: &Settings) -> &'static str {
    if settings.delete_messages() {
        "Disable Deletion"
    } else {
        "Enable Deletion"
    }
}

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        [CallbackAction::BotConfig.button("Bot Configuration")],
        [CallbackAction::ToggleDelete.button("Toggle Delete")],
    ])
}

pub fn bot_config_menu(settings: &Settings) -> InlineKeyboardMarkup {
    let bot_label = if settings.bot_enabled() {
        "Disable Bot"
    } else {
        "Enable Bot"
    };

    InlineKeyboardMarkup::new([
        [CallbackAction::ToggleBot.button(bot_label)],
        [CallbackAction::ToggleDelete.button(deletion_label(settings))],
        [CallbackAction::BackToMain.button("Back to Main")],
    ])
}

/// Attached under every served prompt.
pub fn prompt_controls(settings: &Settings) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[CallbackAction::ToggleDelete.button(deletion_label(settings))]])
}

pub fn disabled_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[CallbackAction::EnableBot.button("Enable Bot")]])
}
