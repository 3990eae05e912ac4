use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::access::AccessGate;
use crate::core::backend::{BackendKind, ChatBackend};
use crate::core::config::data::validate_temperature;
use crate::core::config::Settings;
use crate::core::conversation::{run_turn, TurnOutcome, TurnParams};
use crate::core::export::{self, ExportError};
use crate::core::preset::{Preset, PresetRegistry};
use crate::core::session::{Session, DEFAULT_SESSION_TITLE};

pub mod session;

pub use session::{build_backend, resolve_initial_model};

/// Startup selections that may come from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppInitConfig {
    pub model: Option<String>,
    pub preset: Option<String>,
    pub temperature: Option<f32>,
    pub title: Option<String>,
}

/// Files written by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub markdown: PathBuf,
    /// Present when autosave wrote a JSON snapshot alongside the Markdown.
    pub snapshot: Option<PathBuf>,
}

/// State of one interactive run: the session plus the selections that
/// apply to the next turn.
pub struct App {
    pub session: Session,
    presets: PresetRegistry,
    preset_index: usize,
    model: String,
    temperature: f32,
    backend: Box<dyn ChatBackend>,
    gate: AccessGate,
    sessions_dir: PathBuf,
    autosave: bool,
}

/// Resolve the backend and initial selections from `settings`.
pub async fn new_with_settings(
    init_config: AppInitConfig,
    settings: &Settings,
) -> Result<App, Box<dyn std::error::Error>> {
    let backend = build_backend(settings)?;
    let model = resolve_initial_model(backend.as_ref(), settings, init_config.model.as_deref()).await;
    let app = App::new(backend, PresetRegistry::builtin(), model, &init_config, settings)?;
    info!(
        backend = %app.backend_kind(),
        model = app.model(),
        preset = %app.preset().id,
        "Session ready"
    );
    Ok(app)
}

impl App {
    pub fn new(
        backend: Box<dyn ChatBackend>,
        presets: PresetRegistry,
        model: String,
        init_config: &AppInitConfig,
        settings: &Settings,
    ) -> Result<Self, String> {
        let requested = init_config
            .preset
            .as_deref()
            .or(settings.default_preset.as_deref());
        let preset_id = presets.resolve(requested)?.id.clone();
        let preset_index = presets
            .list()
            .iter()
            .position(|p| p.id == preset_id)
            .unwrap_or_default();

        let temperature =
            validate_temperature(init_config.temperature.unwrap_or(settings.temperature))?;

        // The shared secret only guards the hosted backend.
        let gate = match backend.kind() {
            BackendKind::Hosted => AccessGate::new(settings.access_code.clone()),
            BackendKind::Local => AccessGate::new(None),
        };

        let title = init_config
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string());

        Ok(Self {
            session: Session::new(title),
            presets,
            preset_index,
            model,
            temperature,
            backend,
            gate,
            sessions_dir: settings.sessions_dir.clone(),
            autosave: settings.autosave,
        })
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: &str) -> Result<(), String> {
        let model = model.trim();
        if model.is_empty() {
            return Err("model name cannot be empty".to_string());
        }
        self.model = model.to_string();
        Ok(())
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn set_temperature(&mut self, value: f32) -> Result<(), String> {
        self.temperature = validate_temperature(value)?;
        Ok(())
    }

    pub fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    pub fn preset(&self) -> &Preset {
        &self.presets.list()[self.preset_index]
    }

    /// Switch the preset used from the next turn on. History is untouched.
    pub fn set_preset(&mut self, key: &str) -> Result<&Preset, String> {
        let id = self
            .presets
            .find(key)
            .map(|p| p.id.clone())
            .ok_or_else(|| format!("Unknown preset '{key}'. Use /presets to list them."))?;
        self.preset_index = self
            .presets
            .list()
            .iter()
            .position(|p| p.id == id)
            .unwrap_or_default();
        Ok(self.preset())
    }

    pub fn is_locked(&self) -> bool {
        !self.gate.is_unlocked()
    }

    pub fn unlock(&mut self, code: &str) -> bool {
        self.gate.try_unlock(code)
    }

    pub async fn available_models(&self) -> Vec<String> {
        self.backend.list_models().await
    }

    /// Run one turn. Nothing is sent while the access gate is locked.
    pub async fn send(
        &mut self,
        input: &str,
        on_fragment: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> TurnOutcome {
        if self.is_locked() {
            debug!("Ignoring input while the access gate is locked");
            return TurnOutcome::Skipped;
        }

        let params = TurnParams {
            model: &self.model,
            preset: &self.presets.list()[self.preset_index],
            temperature: self.temperature,
        };
        run_turn(
            &mut self.session,
            self.backend.as_ref(),
            params,
            input,
            on_fragment,
        )
        .await
    }

    /// Start over with an empty session.
    pub fn new_session(&mut self, title: Option<&str>) {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_SESSION_TITLE);
        self.session = Session::new(title);
    }

    pub fn restore(&mut self, session: Session) {
        self.session = session;
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    pub fn save_snapshot(&self) -> Result<PathBuf, ExportError> {
        export::save_snapshot(
            &self.sessions_dir,
            &self.session.title,
            self.session.messages(),
        )
    }

    /// Write the Markdown export, to `target` or into the sessions directory,
    /// plus a JSON snapshot when autosave is on.
    pub fn export(&self, target: Option<&Path>) -> Result<ExportReport, ExportError> {
        let markdown = match target {
            Some(path) => path.to_path_buf(),
            None => self
                .sessions_dir
                .join(export::markdown_filename(&self.session.title)),
        };
        export::write_markdown(&markdown, &self.session.title, self.session.messages())?;

        let snapshot = if self.autosave {
            Some(self.save_snapshot()?)
        } else {
            None
        };

        Ok(ExportReport { markdown, snapshot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::conversation::tests::ScriptedBackend;
    use crate::core::message::Message;
    use tempfile::TempDir;

    fn settings(dir: &Path, pairs: &[(&str, &str)]) -> Settings {
        let mut pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        pairs.push((
            "NOVA_SESSIONS_DIR".to_string(),
            dir.to_string_lossy().into_owned(),
        ));
        Settings::resolve(&Config::default(), move |key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    fn app_with(backend: ScriptedBackend, settings: &Settings) -> App {
        App::new(
            Box::new(backend),
            PresetRegistry::builtin(),
            "test-model".to_string(),
            &AppInitConfig::default(),
            settings,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn send_runs_a_turn_with_current_selections() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(ScriptedBackend::replying(&["Hi!"]), &settings(dir.path(), &[]));

        let outcome = app.send("Hello", &mut |_: &str| {}).await;

        assert_eq!(outcome, TurnOutcome::Replied("Hi!".to_string()));
        assert_eq!(
            app.session.messages(),
            &[Message::user("Hello"), Message::assistant("Hi!")]
        );
        assert_eq!(app.preset().id, "default");
        assert_eq!(app.temperature(), 0.3);
    }

    #[test]
    fn unknown_preset_at_startup_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = App::new(
            Box::new(ScriptedBackend::replying(&[])),
            PresetRegistry::builtin(),
            "m".to_string(),
            &AppInitConfig {
                preset: Some("pirate".to_string()),
                ..Default::default()
            },
            &settings(dir.path(), &[]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn preset_switch_keeps_history() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(ScriptedBackend::replying(&[]), &settings(dir.path(), &[]));
        app.session.push(Message::user("q"));
        app.session.push(Message::assistant("a"));

        let preset = app.set_preset("LAWYER").unwrap();
        assert_eq!(preset.id, "lawyer");
        assert_eq!(app.session.len(), 2);
        assert!(app.set_preset("astronaut").is_err());
        assert_eq!(app.preset().id, "lawyer");
    }

    #[test]
    fn temperature_and_model_are_validated() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(ScriptedBackend::replying(&[]), &settings(dir.path(), &[]));

        assert!(app.set_temperature(1.2).is_err());
        assert!(app.set_temperature(0.9).is_ok());
        assert_eq!(app.temperature(), 0.9);
        assert!(app.set_model("  ").is_err());
        app.set_model("qwen2").unwrap();
        assert_eq!(app.model(), "qwen2");
    }

    #[test]
    fn local_backend_ignores_access_code() {
        let dir = TempDir::new().unwrap();
        let app = app_with(
            ScriptedBackend::replying(&[]),
            &settings(dir.path(), &[("NOVA_ACCESS_CODE", "secret")]),
        );
        assert!(!app.is_locked());
    }

    #[test]
    fn new_session_resets_history_and_title() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(ScriptedBackend::replying(&[]), &settings(dir.path(), &[]));
        app.session.push(Message::user("q"));

        app.new_session(Some("Budget review"));
        assert!(app.session.is_empty());
        assert_eq!(app.session.title, "Budget review");

        app.new_session(Some("   "));
        assert_eq!(app.session.title, DEFAULT_SESSION_TITLE);
    }

    #[tokio::test]
    async fn export_writes_markdown_and_autosaves_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(ScriptedBackend::replying(&["fine"]), &settings(dir.path(), &[]));
        app.send("how are you?", &mut |_: &str| {}).await;

        let report = app.export(None).unwrap();
        assert_eq!(report.markdown, dir.path().join("Nova_Session.md"));
        let markdown = std::fs::read_to_string(&report.markdown).unwrap();
        assert!(markdown.starts_with("# Nova Session"));

        let snapshot_path = report.snapshot.expect("autosave should write a snapshot");
        let snapshot = export::load_snapshot(&snapshot_path).unwrap();
        assert_eq!(snapshot.messages, app.session.messages());
    }

    #[test]
    fn export_without_autosave_skips_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut settings = settings(dir.path(), &[]);
        settings.autosave = false;
        let app = app_with(ScriptedBackend::replying(&[]), &settings);

        let target = dir.path().join("out").join("chat.md");
        let report = app.export(Some(&target)).unwrap();
        assert_eq!(report.markdown, target);
        assert!(report.snapshot.is_none());
        assert!(target.exists());
    }
}
