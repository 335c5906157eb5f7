//! Driver binary for the Omega 144D engine.
//!
//! Loads configuration, builds an engine, initializes it, runs a bounded
//! number of steps, and logs each step. With `run.emit_json` enabled, every
//! step record is also written to stdout as one JSON line.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$OMEGA_CONFIG` or `omega-config.yaml`
//! 2. Initialize structured logging (tracing, to stderr)
//! 3. Construct the engine from the `engine` section
//! 4. Initialize the engine with `run.initial_vector`
//! 5. Build the external input source from the `input` section
//! 6. Run `run.steps` steps, tagging step `k` as `{tag_prefix}{k}`
//! 7. Log the result

mod error;
mod trace_observer;

use std::io;
use std::path::PathBuf;

use omega_core::config::OmegaConfig;
use omega_core::{OmegaEngine, input, run_steps};
use omega_types::Regime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::trace_observer::TraceObserver;

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "OMEGA_CONFIG";

/// Configuration file used when `OMEGA_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "omega-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, engine construction, a step, or
/// writing the step trace fails.
fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let (config, config_source) = load_config()?;

    // 2. Initialize structured logging. Logs go to stderr so stdout carries
    //    only the JSON step trace.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    info!("omega-engine starting");
    info!(
        source = %config_source,
        run_id = %config.run.run_id,
        n_domains = config.engine.n_domains,
        domain_size = config.engine.domain_size,
        coupling = config.engine.coupling,
        damping = config.engine.damping,
        max_events = config.engine.max_events,
        "Configuration loaded"
    );

    // 3. Construct the engine.
    let mut engine = OmegaEngine::new(config.engine)?;

    // 4. Initialize it.
    engine.initialize(&config.run.initial_vector)?;

    // 5. External input source.
    let mut source = input::from_config(&config.input)?;
    info!(
        amplitude = config.input.amplitude,
        seed = config.input.seed,
        "Input source ready"
    );

    // 6. Run.
    let sink = config.run.emit_json.then(|| io::stdout().lock());
    let mut observer = TraceObserver::new(sink);
    let summary = run_steps(
        &mut engine,
        config.run.steps,
        source.as_mut(),
        &config.run.tag_prefix,
        &mut observer,
    )?;
    let lines_written = observer.lines_written();
    observer.finish()?;

    // 7. Log results.
    info!(
        run_id = %config.run.run_id,
        total_steps = summary.total_steps,
        regime_changes = summary.regime_changes,
        final_regime = summary.final_regime().map(Regime::as_str),
        events_retained = engine.history().len(),
        last_event_step = engine.history().latest().map(|e| e.step_index),
        last_event_coherence = engine.history().latest().map(|e| e.coherence),
        lines_written,
        "omega-engine finished"
    );

    Ok(())
}

/// Load configuration.
///
/// `$OMEGA_CONFIG`, when set, must name a readable file. Otherwise
/// `omega-config.yaml` in the working directory is used if present, and
/// defaults if not. Returns the config and a description of its source.
fn load_config() -> Result<(OmegaConfig, String), EngineError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        let config = OmegaConfig::from_file(&path)?;
        return Ok((config, path.display().to_string()));
    }

    let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        let config = OmegaConfig::from_file(&default_path)?;
        Ok((config, default_path.display().to_string()))
    } else {
        Ok((OmegaConfig::default(), "defaults".to_owned()))
    }
}
