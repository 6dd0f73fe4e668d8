//! Start a game in the terminal UI.

use std::path::PathBuf;
use std::sync::Arc;

use parley_dialogue::{DialogueConfig, Dispatcher, InteractionController};
use parley_llm::{ClientConfig, OpenAiClient};
use parley_tui::app::TuiApp;
use parley_tui::keys::KEY_HELP;
use parley_tui::pane::TextPane;
use tokio::runtime::Runtime;

/// Command-line settings for a game.
pub struct PlayOptions {
    pub world: Option<PathBuf>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub options: u8,
    pub log_file: PathBuf,
}

pub fn run(opts: PlayOptions) -> Result<(), String> {
    let world = super::load_world(opts.world.as_deref())?;

    let mut client_config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(model) = opts.model {
        client_config = client_config.with_model(model);
    }
    if let Some(url) = opts.base_url {
        client_config = client_config.with_base_url(url);
    }

    crate::logging::init(&opts.log_file)?;
    tracing::info!(
        world = %world.name,
        entities = world.entity_count(),
        model = %client_config.model,
        base_url = %client_config.base_url,
        "starting game"
    );

    let client = OpenAiClient::new(client_config).map_err(|e| e.to_string())?;
    let runtime = Runtime::new().map_err(|e| format!("cannot start async runtime: {e}"))?;
    let dispatcher = Dispatcher::new(Arc::new(client), runtime.handle().clone());

    let config = DialogueConfig::default()
        .with_option_count(opts.options)
        .with_help_text(KEY_HELP);
    let intro = format!(
        "Welcome to {}.\n\nWalk with the arrow keys and press Enter next to someone to talk.\n\
         Press ? for help.",
        world.name
    );
    let controller =
        InteractionController::new(world, config, dispatcher, TextPane::with_text(intro));

    let result = parley_tui::terminal::run(TuiApp::new(controller));

    // Replies still being generated are abandoned.
    runtime.shutdown_background();
    tracing::info!("game over");
    result
}
