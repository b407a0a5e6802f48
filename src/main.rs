mod census;
mod code;
mod config;
mod core;
mod db;
mod ui;

use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing_subscriber::EnvFilter;

use crate::census::cache::CachedSource;
use crate::census::{CensusClient, StatSource};
use crate::config::Config;
use crate::core::IndicatorSpec;
use crate::core::pipeline::ScoreEngine;
use crate::core::session::Session;
use crate::db::SharedDatabase;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("statescore=info")),
        )
        .init();

    tracing::info!("StateScore starting...");

    // Load configuration
    let config = Config::load("statescore.toml");
    tracing::info!("Config: {:?}", config);

    // Open fetch cache / code history database
    let db = open_database(&config.database.path);

    // Create Census client
    let client = match CensusClient::new(config.census.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Census client configured for {}", config.census.dataset_key());

    let source: Arc<dyn StatSource> = Arc::new(CachedSource::new(
        client,
        db.clone(),
        config.census.dataset_key(),
        chrono::Duration::hours(config.database.cache_ttl_hours),
    ));

    let mut session = Session::from_config(&config);
    label_unnamed(source.as_ref(), &mut session);
    if config.ui.restore_last_code {
        restore_last_code(&mut session, db.as_ref());
    }

    let engine = ScoreEngine::new(source, config.census.scaffold_variable.clone());

    // Store handles in globals so the Dioxus app can grab them
    UI_CONFIG.set(config).ok();
    UI_ENGINE.set(engine).ok();
    UI_DB.set(db).ok();
    UI_SESSION.set(Mutex::new(Some(session))).ok();

    // Launch Dioxus desktop app (blocks)
    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new().with_window(
                dioxus::desktop::tao::window::WindowBuilder::new()
                    .with_title("States Statistics Viewer")
                    .with_inner_size(dioxus::desktop::tao::dpi::LogicalSize::new(1280.0, 860.0)),
            ),
        )
        .launch(ui::App);
}

fn open_database(path: &str) -> Option<SharedDatabase> {
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Failed to create database directory {}: {e}", parent.display());
        }
    }
    match SharedDatabase::open(db_path) {
        Ok(db) => {
            tracing::info!("Database opened at {path}");
            Some(db)
        }
        Err(e) => {
            tracing::warn!("Failed to open database at {path}: {e}; running without a persistent cache");
            None
        }
    }
}

/// Re-register indicators the config left unnamed, using the API's variable labels.
/// Labels are cached, so only the first start with a new indicator waits on the network.
fn label_unnamed(source: &dyn StatSource, session: &mut Session) {
    let unnamed: Vec<IndicatorSpec> = session
        .registry
        .ordered()
        .into_iter()
        .filter(|i| i.spec.display_name.is_empty())
        .map(|i| i.spec.clone())
        .collect();
    for mut spec in unnamed {
        match source.variable_label(&spec.source_id) {
            Ok(label) => {
                spec.display_name = label;
                session.register(spec);
            }
            Err(e) => tracing::warn!("No label for {}: {e}", spec.source_id),
        }
    }
}

fn restore_last_code(session: &mut Session, db: Option<&SharedDatabase>) {
    let Some(db) = db else { return };
    match db.last_code() {
        Ok(Some(code)) => match session.apply_code(&code) {
            Ok(()) => tracing::info!("Restored weights from last code {code}"),
            Err(e) => tracing::warn!("Last code {code} no longer fits the indicators: {e}"),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!("Failed to read last code: {e}"),
    }
}

/// Global config for UI access.
static UI_CONFIG: OnceLock<Config> = OnceLock::new();

/// Shared score engine for UI recomputes.
static UI_ENGINE: OnceLock<ScoreEngine> = OnceLock::new();

/// Database handle for the UI, if one could be opened.
static UI_DB: OnceLock<Option<SharedDatabase>> = OnceLock::new();

/// One-shot global to pass the initial session into the Dioxus app.
static UI_SESSION: OnceLock<Mutex<Option<Session>>> = OnceLock::new();

/// Get the global config.
pub fn get_config() -> &'static Config {
    UI_CONFIG.get_or_init(Config::default)
}

pub fn get_engine() -> Option<&'static ScoreEngine> {
    UI_ENGINE.get()
}

pub fn get_db() -> Option<&'static SharedDatabase> {
    UI_DB.get()?.as_ref()
}

/// Take the initial session (can only be called once).
pub fn take_session() -> Option<Session> {
    UI_SESSION
        .get()?
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}
