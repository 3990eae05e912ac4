//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and dispatches to the chat loop
//! or to one of the non-interactive subcommands.

pub mod config_cmd;
pub mod export;
pub mod model_list;
pub mod preset_list;
pub mod say;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::config_cmd::{run_config, ConfigCommands};
use crate::cli::export::export_snapshot;
use crate::cli::model_list::list_models;
use crate::cli::preset_list::list_presets;
use crate::cli::say::run_say;
use crate::core::app::AppInitConfig;
use crate::core::backend::BackendKind;
use crate::core::config::Settings;
use crate::ui::chat_loop::run_chat;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "nova")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A small terminal chat front-end for local and hosted language models")]
#[command(
    long_about = "Nova forwards your messages to a language model and prints the reply. \
The local backend streams from an Ollama-compatible server; the hosted backend makes \
one request per turn to an OpenAI-style Responses API.\n\n\
Environment Variables:\n\
  NOVA_BACKEND          local or hosted (default: local)\n\
  OLLAMA_BASE_URL       Local server URL (default: http://localhost:11434)\n\
  NOVA_MODEL            Default local model (default: llama3.1:8b)\n\
  OPENAI_API_KEY        API key for the hosted backend\n\
  NOVA_HOSTED_BASE_URL  Hosted API base URL (default: https://api.openai.com/v1)\n\
  NOVA_HOSTED_MODEL     Hosted model (default: gpt-4o-mini)\n\
  NOVA_ACCESS_CODE      Access code required before the hosted chat starts\n\
  NOVA_SESSIONS_DIR     Where exports and snapshots are written\n\
  NOVA_CONFIG           Path to the config file\n\
  RUST_LOG              Diagnostic log filter (default: warn)\n\n\
Commands inside the chat:\n\
  /help                 List all commands\n\
  /preset <name>        Switch the system prompt preset\n\
  /export [file]        Write the conversation as Markdown\n\
  /quit                 Leave Nova"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend to talk to
    #[arg(short = 'b', long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Model to use for chat
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Preset id or name (see `nova presets`)
    #[arg(short = 'p', long, global = true, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Sampling temperature between 0.0 and 1.0
    #[arg(short = 't', long, global = true, value_name = "TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Session title used for exports
    #[arg(long, global = true, value_name = "TITLE")]
    pub title: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat {
        /// Continue from a saved JSON snapshot
        #[arg(long, value_name = "FILE")]
        resume: Option<PathBuf>,
    },
    /// Send one message and print the reply
    Say {
        /// The message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        prompt: Vec<String>,
    },
    /// List models available on the local server
    Models,
    /// List the built-in presets
    Presets,
    /// Render a saved snapshot as Markdown
    Export {
        /// Snapshot written by /save or autosave
        snapshot: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Show or change the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Args {
    fn init_config(&self) -> AppInitConfig {
        AppInitConfig {
            model: self.model.clone(),
            preset: self.preset.clone(),
            temperature: self.temperature,
            title: self.title.clone(),
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    crate::logging::init_logging();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let init_config = args.init_config();

    match args.command.unwrap_or(Commands::Chat { resume: None }) {
        Commands::Chat { resume } => {
            let settings = Settings::load(args.backend)?;
            run_chat(&settings, init_config, resume).await
        }
        Commands::Say { prompt } => {
            let settings = Settings::load(args.backend)?;
            run_say(&settings, init_config, prompt).await
        }
        Commands::Models => list_models(&Settings::load(args.backend)?).await,
        Commands::Presets => list_presets(),
        Commands::Export { snapshot, output } => export_snapshot(&snapshot, output.as_deref()),
        Commands::Config { command } => run_config(command),
    }
}
