use rand::{Rng, SeedableRng, rngs::StdRng};
use teloxide::{
    types::{InlineKeyboardMarkup, UserId},
    utils::command::BotCommands,
};

use crate::{
    WithNoticeExt,
    cmd::Command,
    menu::{self, CallbackAction},
    question::{Category, Pick, QuestionBank, QuestionTracker},
    settings::{Access, Settings, status},
};

const DISABLED: &str = "Bot is currently disabled. Use the buttons below to enable it.";
const WELCOME: &str = "Welcome to Truth or Dare! Send /truth or /dare to get started.";
const UNAUTHORIZED: &str = "You are not authorized to access the configuration.";
const CONFIG_PROMPT: &str = "Choose a configuration option:";
const CALLBACK_DENIED: &str = "You are not authorized to change the configuration.";

/// What to send back for a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
    /// Remove the reply (and the command) later. Already false when deletion is off.
    pub auto_delete: bool,
}

impl Reply {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            auto_delete: false,
        }
    }

    fn keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    fn auto_delete(mut self, settings: &Settings) -> Self {
        self.auto_delete = settings.delete_messages();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    Edit {
        text: String,
        keyboard: InlineKeyboardMarkup,
    },
    Denied(String),
}

/// Everything the bot remembers between updates.
pub struct GameState<R = StdRng> {
    tracker: QuestionTracker,
    settings: Settings,
    access: Access,
    notice: Option<String>,
    rng: R,
}

impl GameState<StdRng> {
    pub fn new(bank: QuestionBank, access: Access, notice: Option<String>) -> Self {
        Self::with_rng(bank, access, notice, StdRng::from_os_rng())
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng(bank: QuestionBank, access: Access, notice: Option<String>, rng: R) -> Self {
        Self {
            tracker: QuestionTracker::new(bank),
            settings: Settings::new(),
            access,
            notice,
            rng,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tracker(&self) -> &QuestionTracker {
        &self.tracker
    }

    fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn handle_command(&mut self, cmd: &Command, caller: Option<UserId>) -> Reply {
        tracing::debug!(?cmd, caller = caller.map(|id| id.0), "Handling command");

        match cmd {
            Command::Help => {
                Reply::new(Command::descriptions().to_string().with_notice(self.notice()))
            }
            Command::ToggleDelete | Command::ToggleBot | Command::Config => {
                self.handle_settings_command(cmd, caller)
            }
            _ if !self.settings.bot_enabled() => {
                Reply::new(DISABLED).keyboard(menu::disabled_menu())
            }
            Command::Start => Reply::new(WELCOME.with_notice(self.notice())),
            Command::Truth => self.serve(Category::Truth),
            Command::Dare => self.serve(Category::Dare),
            Command::Random => {
                let category = Category::random(&mut self.rng);
                self.serve(category)
            }
            Command::RemainingTruths => self.remaining(Category::Truth),
            Command::RemainingDares => self.remaining(Category::Dare),
        }
    }

    fn serve(&mut self, category: Category) -> Reply {
        let keyboard = menu::prompt_controls(&self.settings);

        match self.tracker.pick(category, &mut self.rng) {
            Pick::Prompt(prompt) => Reply::new(format!("{}: {}", category, prompt))
                .keyboard(keyboard)
                .auto_delete(&self.settings),
            Pick::Exhausted => Reply::new(format!(
                "No more available {} questions. Ask for more later!",
                category
            ))
            .keyboard(keyboard),
        }
    }

    fn remaining(&self, category: Category) -> Reply {
        Reply::new(format!(
            "Remaining {} questions: {}",
            category,
            self.tracker.remaining_count(category)
        ))
        .keyboard(menu::prompt_controls(&self.settings))
        .auto_delete(&self.settings)
    }

    fn handle_settings_command(&mut self, cmd: &Command, caller: Option<UserId>) -> Reply {
        if !self.access.permits(caller) {
            tracing::warn!(caller = caller.map(|id| id.0), ?cmd, "Rejected settings command");
            return Reply::new(UNAUTHORIZED);
        }

        let text = match cmd {
            Command::ToggleDelete => {
                let enabled = self.settings.toggle_delete();
                format!("Message deletion is now {}", status(enabled))
            }
            Command::ToggleBot => {
                let enabled = self.settings.toggle_bot();
                format!("Bot is now {}", status(enabled))
            }
            _ => return Reply::new(CONFIG_PROMPT).keyboard(menu::main_menu()),
        };

        Reply::new(text.with_notice(self.notice())).keyboard(menu::bot_config_menu(&self.settings))
    }

    pub fn handle_callback(&mut self, action: CallbackAction, caller: UserId) -> CallbackOutcome {
        if !self.access.permits(Some(caller)) {
            tracing::warn!(caller = caller.0, ?action, "Rejected settings callback");
            return CallbackOutcome::Denied(CALLBACK_DENIED.to_string());
        }

        let tense = match action {
            CallbackAction::BackToMain => {
                return CallbackOutcome::Edit {
                    text: CONFIG_PROMPT.to_string(),
                    keyboard: menu::main_menu(),
                };
            }
            CallbackAction::BotConfig => "currently",
            CallbackAction::ToggleBot => {
                self.settings.toggle_bot();
                "now"
            }
            CallbackAction::ToggleDelete => {
                self.settings.toggle_delete();
                "now"
            }
            CallbackAction::EnableBot => {
                self.settings.enable_bot();
                "now"
            }
        };

        CallbackOutcome::Edit {
            text: self.settings.summary(tense).with_notice(self.notice()),
            keyboard: menu::bot_config_menu(&self.settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATOR: UserId = UserId(1000);
    const STRANGER: UserId = UserId(2000);

    fn game(access: Access) -> GameState {
        let bank = QuestionBank::new(
            vec!["A".into(), "B".into()],
            vec!["X".into(), "Y".into(), "Z".into()],
        )
        .unwrap();
        GameState::with_rng(bank, access, Some("Created by test".into()), StdRng::seed_from_u64(9))
    }

    #[test]
    fn truth_cycles_through_bank() {
        let mut game = game(Access::Open);

        let first = game.handle_command(&Command::Truth, None);
        let second = game.handle_command(&Command::Truth, None);
        assert!(first.auto_delete && second.auto_delete);
        assert_ne!(first.text, second.text);
        for reply in [&first, &second] {
            assert!(reply.text == "Truth: A" || reply.text == "Truth: B");
        }

        let third = game.handle_command(&Command::Truth, None);
        assert_eq!(third.text, "No more available Truth questions. Ask for more later!");
        assert!(!third.auto_delete);

        let fourth = game.handle_command(&Command::Truth, None);
        assert!(fourth.text.starts_with("Truth: "));
    }

    #[test]
    fn remaining_counts_reported() {
        let mut game = game(Access::Open);
        game.handle_command(&Command::Dare, None);

        let reply = game.handle_command(&Command::RemainingDares, None);
        assert_eq!(reply.text, "Remaining Dare questions: 2");
        assert!(reply.auto_delete);

        let reply = game.handle_command(&Command::RemainingTruths, None);
        assert_eq!(reply.text, "Remaining Truth questions: 2");
    }

    #[test]
    fn disabled_bot_refuses_prompts() {
        let mut game = game(Access::Open);

        let reply = game.handle_command(&Command::ToggleBot, None);
        assert!(reply.text.starts_with("Bot is now disabled"));
        assert!(!game.settings().bot_enabled());

        for cmd in [
            Command::Truth,
            Command::Dare,
            Command::Random,
            Command::Start,
            Command::RemainingTruths,
            Command::RemainingDares,
        ] {
            let reply = game.handle_command(&cmd, None);
            assert_eq!(reply.text, DISABLED);
            assert_eq!(reply.keyboard, Some(menu::disabled_menu()));
        }
        assert_eq!(game.tracker().remaining_count(Category::Truth), 2);

        assert!(game.handle_command(&Command::Help, None).text.contains("/truth"));
    }

    #[test]
    fn toggle_delete_flips_flag() {
        let mut game = game(Access::Open);

        let reply = game.handle_command(&Command::ToggleDelete, None);
        assert_eq!(reply.text, "Message deletion is now disabled\nCreated by test");
        assert!(!game.settings().delete_messages());

        for cmd in [Command::Truth, Command::Dare, Command::RemainingTruths] {
            let reply = game.handle_command(&cmd, None);
            assert!(!reply.auto_delete, "{cmd:?} still scheduled for removal");
        }

        game.handle_command(&Command::ToggleDelete, None);
        assert!(game.handle_command(&Command::Truth, None).auto_delete);
    }

    #[test]
    fn stranger_cannot_configure() {
        let mut game = game(Access::Creator(CREATOR));

        for cmd in [Command::Config, Command::ToggleBot, Command::ToggleDelete] {
            let reply = game.handle_command(&cmd, Some(STRANGER));
            assert_eq!(reply.text, UNAUTHORIZED);
            assert_eq!(reply.keyboard, None);
        }

        let outcome = game.handle_callback(CallbackAction::ToggleBot, STRANGER);
        assert_eq!(outcome, CallbackOutcome::Denied(CALLBACK_DENIED.to_string()));
        assert_eq!(*game.settings(), Settings::new());
    }

    #[test]
    fn creator_opens_config_menu() {
        let mut game = game(Access::Creator(CREATOR));

        let reply = game.handle_command(&Command::Config, Some(CREATOR));
        assert_eq!(reply.text, CONFIG_PROMPT);
        assert_eq!(reply.keyboard, Some(menu::main_menu()));
    }

    #[test]
    fn callbacks_change_settings() {
        let mut game = game(Access::Creator(CREATOR));

        let CallbackOutcome::Edit { text, .. } =
            game.handle_callback(CallbackAction::BotConfig, CREATOR)
        else {
            panic!("expected an edit");
        };
        assert_eq!(
            text,
            "Bot is currently enabled and message deletion is currently enabled\nCreated by test"
        );

        game.handle_callback(CallbackAction::ToggleBot, CREATOR);
        assert!(!game.settings().bot_enabled());
        game.handle_callback(CallbackAction::EnableBot, CREATOR);
        assert!(game.settings().bot_enabled());

        let CallbackOutcome::Edit { text, keyboard } =
            game.handle_callback(CallbackAction::ToggleDelete, CREATOR)
        else {
            panic!("expected an edit");
        };
        assert!(text.starts_with("Bot is now enabled and message deletion is now disabled"));
        assert_eq!(keyboard, menu::bot_config_menu(game.settings()));

        let outcome = game.handle_callback(CallbackAction::BackToMain, CREATOR);
        assert_eq!(
            outcome,
            CallbackOutcome::Edit {
                text: CONFIG_PROMPT.to_string(),
                keyboard: menu::main_menu(),
            }
        );
    }

    #[test]
    fn random_splits_evenly() {
        let bank = QuestionBank::new(
            (0..10_000).map(|i| format!("t{i}")).collect(),
            (0..10_000).map(|i| format!("d{i}")).collect(),
        )
        .unwrap();
        let mut game = GameState::with_rng(bank, Access::Open, None, StdRng::seed_from_u64(11));

        let samples = 10_000;
        let truths = (0..samples)
            .filter(|_| {
                game.handle_command(&Command::Random, None)
                    .text
                    .starts_with("Truth: ")
            })
            .count();

        let ratio = truths as f64 / samples as f64;
        assert!((0.47..0.53).contains(&ratio), "ratio was {ratio}");
    }
}
