//! Line-oriented chat loop.
//!
//! Reads one line at a time, routes slash commands through
//! [`crate::commands`], and streams assistant fragments to the output as they
//! arrive. The loop is generic over its input and output so tests can drive a
//! whole conversation from a byte slice.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::commands::{process_input, CommandResult};
use crate::core::app::{self, App, AppInitConfig};
use crate::core::backend::BackendKind;
use crate::core::config::Settings;
use crate::core::conversation::TurnOutcome;
use crate::core::export::load_snapshot;
use crate::core::session::Session;

const PROMPT: &str = "> ";

/// Build the app from `settings` and run the loop on stdin/stdout.
pub async fn run_chat(
    settings: &Settings,
    init_config: AppInitConfig,
    resume: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut app = app::new_with_settings(init_config, settings).await?;

    if let Some(path) = resume {
        let snapshot = load_snapshot(&path)?;
        debug!(path = %path.display(), messages = snapshot.messages.len(), "Resuming session");
        app.restore(Session::restore(snapshot.title, snapshot.messages));
    }

    let input = BufReader::new(tokio::io::stdin());
    let mut output = io::stdout();
    run_loop(&mut app, input, &mut output).await
}

/// Drive the conversation until `/quit` or end of input.
pub async fn run_loop<R, W>(app: &mut App, mut input: R, output: &mut W) -> Result<(), Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send,
{
    print_banner(app, output)?;

    if app.is_locked() && !unlock(app, &mut input, output).await? {
        return Ok(());
    }

    let mut line = String::new();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            writeln!(output)?;
            break;
        }

        match process_input(app, &line) {
            CommandResult::Continue(text) => {
                if !text.is_empty() {
                    writeln!(output, "{text}")?;
                }
            }
            CommandResult::ProcessAsMessage(message) => {
                send_message(app, &message, output).await?;
            }
            CommandResult::ListModels => {
                print_models(app, output).await?;
            }
            CommandResult::Exit => break,
        }
    }

    output.flush()?;
    Ok(())
}

fn print_banner<W: Write>(app: &App, output: &mut W) -> io::Result<()> {
    writeln!(output, "Nova · {}", app.session.title)?;
    writeln!(
        output,
        "Backend: {} · Model: {} · Preset: {} · Temperature: {:.2}",
        app.backend_kind(),
        app.model(),
        app.preset().name,
        app.temperature()
    )?;
    if !app.session.is_empty() {
        writeln!(output, "Resumed {} messages.", app.session.len())?;
    }
    writeln!(output, "Type /help for commands, /quit to leave.")?;
    Ok(())
}

/// Ask for the access code until it matches. Returns false on end of input
/// or `/quit`.
async fn unlock<R, W>(app: &mut App, input: &mut R, output: &mut W) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(output, "🔒 Access code: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            writeln!(output)?;
            return Ok(false);
        }

        let code = line.trim_end_matches(['\r', '\n']);
        if matches!(code.trim(), "/quit" | "/exit") {
            return Ok(false);
        }
        if app.unlock(code) {
            writeln!(output, "✅ Access granted.")?;
            return Ok(true);
        }
        writeln!(output, "Incorrect access code.")?;
    }
}

async fn send_message<W: Write + Send>(app: &mut App, message: &str, output: &mut W) -> io::Result<()> {
    if message.trim().is_empty() {
        return Ok(());
    }

    write!(output, "Nova: ")?;
    output.flush()?;

    let mut write_error: Option<io::Error> = None;
    let mut streamed = false;
    let outcome = {
        let mut on_fragment = |fragment: &str| {
            if write_error.is_some() {
                return;
            }
            streamed = true;
            if let Err(err) = write!(output, "{fragment}").and_then(|_| output.flush()) {
                write_error = Some(err);
            }
        };
        app.send(message, &mut on_fragment).await
    };

    if let Some(err) = write_error {
        return Err(err);
    }

    match outcome {
        TurnOutcome::Replied(_) | TurnOutcome::Skipped => writeln!(output)?,
        TurnOutcome::Failed(text) => {
            if streamed {
                writeln!(output)?;
            }
            writeln!(output, "{text}")?;
        }
    }
    Ok(())
}

async fn print_models<W: Write>(app: &App, output: &mut W) -> io::Result<()> {
    let models = app.available_models().await;
    if models.is_empty() {
        let hint = match app.backend_kind() {
            BackendKind::Local => {
                "No models found. Is the local model server running? Pull a model first, e.g. `ollama pull llama3.1:8b`."
            }
            BackendKind::Hosted => "The hosted backend does not list models; use /model <name>.",
        };
        writeln!(output, "{hint}")?;
        return Ok(());
    }

    for model in models {
        let marker = if model == app.model() { "*" } else { " " };
        writeln!(output, "{marker} {model}")?;
    }
    Ok(())
}
