//! One-shot "say" command

use std::error::Error;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::core::app::{self, AppInitConfig};
use crate::core::config::Settings;
use crate::core::conversation::TurnOutcome;

pub async fn run_say(
    settings: &Settings,
    init_config: AppInitConfig,
    prompt: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: nova say <prompt>");
        std::process::exit(1);
    }

    let mut app = app::new_with_settings(init_config, settings).await?;

    if app.is_locked() {
        eprint!("🔒 Access code: ");
        io::stderr().flush()?;
        let mut code = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut code)
            .await?;
        if !app.unlock(code.trim_end_matches(['\r', '\n'])) {
            eprintln!("❌ Incorrect access code.");
            std::process::exit(1);
        }
    }

    let mut stdout = io::stdout();
    let outcome = app
        .send(&prompt, &mut |fragment: &str| {
            let mut out = io::stdout();
            let _ = out.write_all(fragment.as_bytes());
            let _ = out.flush();
        })
        .await;

    match outcome {
        TurnOutcome::Replied(_) => {
            writeln!(stdout)?;
            Ok(())
        }
        TurnOutcome::Failed(text) => {
            writeln!(stdout)?;
            eprintln!("{text}");
            std::process::exit(1);
        }
        TurnOutcome::Skipped => Ok(()),
    }
}
