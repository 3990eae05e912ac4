use super::usage_status;
use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::App;

const USAGE_TEMPERATURE: &str = "Usage: /temperature [0.0-1.0]";

pub(crate) fn handle_preset(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        let preset = app.preset();
        return CommandResult::Continue(format!("Preset: {} ({})", preset.name, preset.id));
    }

    match app.set_preset(invocation.args) {
        Ok(preset) => CommandResult::Continue(format!(
            "Preset switched to {}. It applies from the next message.",
            preset.name
        )),
        Err(message) => CommandResult::Continue(message),
    }
}

pub(crate) fn handle_presets(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let active = app.preset().id.clone();
    let lines: Vec<String> = app
        .presets()
        .list()
        .iter()
        .map(|preset| {
            let marker = if preset.id == active { "*" } else { " " };
            format!("{marker} {:<12} {}", preset.id, preset.name)
        })
        .collect();
    CommandResult::Continue(lines.join("\n"))
}

pub(crate) fn handle_model(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::Continue(format!("Model: {}", app.model()));
    }

    match app.set_model(invocation.args) {
        Ok(()) => CommandResult::Continue(format!("Model set to: {}", app.model())),
        Err(message) => CommandResult::Continue(message),
    }
}

pub(crate) fn handle_models(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::ListModels
}

pub(crate) fn handle_temperature(
    app: &mut App,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    match invocation.args_len() {
        0 => CommandResult::Continue(format!("Temperature: {:.2}", app.temperature())),
        1 => {
            let Some(Ok(value)) = invocation.arg(0).map(str::parse::<f32>) else {
                return usage_status(USAGE_TEMPERATURE);
            };
            match app.set_temperature(value) {
                Ok(()) => CommandResult::Continue(format!(
                    "Temperature set to {:.2}",
                    app.temperature()
                )),
                Err(message) => CommandResult::Continue(message),
            }
        }
        _ => usage_status(USAGE_TEMPERATURE),
    }
}
