use std::error::Error;

use tracing::warn;

use crate::core::config::Config;
use crate::core::preset::{Preset, PresetRegistry};

/// List the built-in presets. Only `default_preset` is read from the config
/// file, so a broken file costs the marker and nothing else.
pub fn list_presets() -> Result<(), Box<dyn Error>> {
    let default_preset = match Config::load() {
        Ok(config) => config.default_preset,
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable config while listing presets");
            None
        }
    };

    let registry = PresetRegistry::builtin();
    let selected = selected_preset_id(&registry, default_preset.as_deref());

    println!("📋 Presets");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for preset in registry.list() {
        println!("{}", format_preset_line(preset, preset.id == selected));
    }
    println!();
    println!("* = default preset. Choose another with --preset <id> or /preset <id>.");
    Ok(())
}

/// The configured default, or the first preset when it is unset or unknown.
fn selected_preset_id(registry: &PresetRegistry, requested: Option<&str>) -> String {
    registry
        .resolve(requested)
        .or_else(|_| registry.resolve(None))
        .map(|preset| preset.id.clone())
        .unwrap_or_default()
}

fn format_preset_line(preset: &Preset, selected: bool) -> String {
    let marker = if selected { "*" } else { " " };
    format!("{marker} {:<12} {}", preset.id, preset.name)
}
