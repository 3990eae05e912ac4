//! `nova config` subcommands.

use std::error::Error;

use clap::Subcommand;

use crate::core::config::data::{path_display, Config, CONFIG_KEYS};

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the config file (secrets are masked)
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        value: Vec<String>,
    },
    /// Remove a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// List the keys `set` and `unset` accept
    Keys,
}

pub fn run_config(command: ConfigCommands) -> Result<(), Box<dyn Error>> {
    match command {
        ConfigCommands::Show => {
            let path = Config::get_config_path()?;
            let config = Config::load_from_path(&path)?;
            println!("Config file: {}", path_display(&path));
            config.print_all();
        }
        ConfigCommands::Set { key, value } => {
            let value = value.join(" ");
            let mut config = Config::load()?;
            if let Err(message) = config.set_value(&key, &value) {
                eprintln!("❌ {message}");
                std::process::exit(1);
            }
            let path = config.save()?;
            println!("✅ Set {key} to: {value} ({})", path_display(path));
        }
        ConfigCommands::Unset { key } => {
            let mut config = Config::load()?;
            if let Err(message) = config.unset_value(&key) {
                eprintln!("❌ {message}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
        }
        ConfigCommands::Keys => {
            for key in CONFIG_KEYS {
                println!("{key}");
            }
        }
    }
    Ok(())
}
