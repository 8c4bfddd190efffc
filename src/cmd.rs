use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the game")]
    Start,
    #[command(description = "Show this help message")]
    Help,
    #[command(description = "Get a random Truth question")]
    Truth,
    #[command(description = "Get a random Dare question")]
    Dare,
    #[command(description = "Check remaining available Truth questions")]
    RemainingTruths,
    #[command(description = "Check remaining available Dare questions")]
    RemainingDares,
    #[command(description = "Randomly choose between Truth and Dare")]
    Random,
    #[command(description = "Toggle automatic message deletion")]
    ToggleDelete,
    #[command(description = "Toggle bot on/off")]
    ToggleBot,
    #[command(description = "Configure bot settings")]
    Config,
}
