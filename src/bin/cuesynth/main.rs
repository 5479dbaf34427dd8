//! cuesynth - fire UI sound cues from the terminal
//!
//! Run with: cargo run
//! Logs go to `cuesynth.log` (filter with `RUST_LOG`).

mod app;
mod ui;

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use app::App;
use cuesynth::{output::DeviceBackend, EngineConfig, SoundEngine};

const LOG_FILE: &str = "cuesynth.log";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    let config = load_config()?;
    let engine = SoundEngine::new(DeviceBackend::new(), config);

    let mut terminal = ratatui::init();
    let result = App::new(engine).run(&mut terminal);
    ratatui::restore();
    result
}

fn init_logging() -> EyreResult<()> {
    let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// `cuesynth [config.toml]` when built with the `serde` feature.
fn load_config() -> EyreResult<EngineConfig> {
    #[cfg(feature = "serde")]
    {
        if let Some(path) = std::env::args().nth(1) {
            let source = std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("failed to read {path}"))?;
            return EngineConfig::from_toml_str(&source)
                .wrap_err_with(|| format!("invalid engine config in {path}"));
        }
    }
    Ok(EngineConfig::default())
}
