use teloxide::types::UserId;

/// Runtime switches. Memory only, back to defaults on restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    delete_messages: bool,
    bot_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    pub fn new() -> Self {
        Self {
            delete_messages: true,
            bot_enabled: true,
        }
    }

    pub fn delete_messages(&self) -> bool {
        self.delete_messages
    }

    pub fn bot_enabled(&self) -> bool {
        self.bot_enabled
    }

    pub fn toggle_delete(&mut self) -> bool {
        self.delete_messages = !self.delete_messages;
        tracing::info!(delete_messages = self.delete_messages, "Message deletion toggled");
        self.delete_messages
    }

    pub fn toggle_bot(&mut self) -> bool {
        self.bot_enabled = !self.bot_enabled;
        tracing::info!(bot_enabled = self.bot_enabled, "Bot toggled");
        self.bot_enabled
    }

    pub fn enable_bot(&mut self) {
        if !self.bot_enabled {
            tracing::info!("Bot enabled");
        }
        self.bot_enabled = true;
    }

    pub fn summary(&self, tense: &str) -> String {
        format!(
            "Bot is {} {} and message deletion is {} {}",
            tense,
            status(self.bot_enabled),
            tense,
            status(self.delete_messages)
        )
    }
}

pub fn status(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

/// Who may change settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Creator(UserId),
    Open,
}

impl Access {
    pub fn permits(&self, caller: Option<UserId>) -> bool {
        match self {
            Access::Open => true,
            Access::Creator(creator) => caller == Some(*creator),
        }
    }
}
