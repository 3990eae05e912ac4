use crate::core::preset::Preset;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BuiltinPresetConfig {
    presets: Vec<Preset>,
}

pub fn load_builtin_presets() -> Vec<Preset> {
    const CONFIG_CONTENT: &str = include_str!("../builtins/presets.toml");
    let config: BuiltinPresetConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtins/presets.toml");
    config.presets
}
