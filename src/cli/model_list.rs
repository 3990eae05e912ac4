//! Model listing functionality
//!
//! Lists the models the local server reports through `/api/tags`.

use std::error::Error;

use crate::api::models::{fetch_models, select_initial_model};
use crate::api::ModelInfo;
use crate::core::backend::BackendKind;
use crate::core::config::Settings;

pub async fn list_models(settings: &Settings) -> Result<(), Box<dyn Error>> {
    if settings.backend == BackendKind::Hosted {
        println!(
            "The hosted backend uses a fixed model: {} (change it with NOVA_HOSTED_MODEL).",
            settings.hosted_model
        );
        return Ok(());
    }

    let client = reqwest::Client::new();
    println!("🤖 Models on {}", settings.base_url);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let models = match fetch_models(&client, &settings.base_url).await {
        Ok(response) => response.models,
        Err(e) => {
            eprintln!("❌ Could not reach the local model server: {e}");
            eprintln!("Make sure it is running (e.g. `ollama serve`) and OLLAMA_BASE_URL is correct.");
            std::process::exit(1);
        }
    };

    if models.is_empty() {
        println!("No models installed. Pull one first, e.g. `ollama pull {}`.", settings.default_model);
        return Ok(());
    }

    let names: Vec<String> = models.iter().map(|m| m.name.clone()).collect();
    let selected = select_initial_model(&names, &settings.default_model);
    for model in &models {
        println!("{}", format_model_line(model, model.name == selected));
    }
    println!();
    println!("* = model a new chat starts with");
    Ok(())
}

fn format_model_line(model: &ModelInfo, selected: bool) -> String {
    let marker = if selected { "*" } else { " " };
    match model.size {
        Some(bytes) => format!("{marker} {:<32} {}", model.name, human_size(bytes)),
        None => format!("{marker} {}", model.name),
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
