//! The `clarity` binary: load a config, seed a cube, and run until the
//! window closes (or `max_frames` is reached).
//!
//! ```text
//! CLARITY_CONFIG=clarity.json RUST_LOG=debug cargo run -p clarity
//! ```

use std::process::ExitCode;

use clarity::config::EngineConfig;
use clarity::diag;
use clarity::engine::Engine;

fn main() -> ExitCode {
    diag::init_logger();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let max_frames = config.max_frames;

    let mut engine = match Engine::new(config) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if !engine.startup() {
        log::error!("engine failed to start");
        return ExitCode::FAILURE;
    }

    let mut frames = 0u64;
    while max_frames.is_none_or(|max| frames < max) && engine.run() {
        frames += 1;
    }

    if !engine.exit() {
        log::error!("engine failed to shut down cleanly");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
