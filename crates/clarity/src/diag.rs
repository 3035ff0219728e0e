//! Logging setup and engine snapshots.
//!
//! [`init_logger`] installs `env_logger`, honouring `RUST_LOG` and defaulting
//! to `info`. [`DiagSnapshot`] is a serializable picture of a running engine
//! (frame timing, entity and system counts, memory counters) that the engine
//! writes to the log at `debug` level.

use serde::Serialize;

use crate::memory::MemoryStats;

/// Install the global logger. Safe to call more than once.
pub fn init_logger() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagSnapshot {
    pub frame_count: u64,
    pub fps: f32,
    pub elapsed_secs: f32,
    pub entity_count: usize,
    pub pending_events: usize,
    pub systems: Vec<SystemSnapshot>,
    pub memory: MemoryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub name: String,
    pub entity_count: usize,
    pub initialized: bool,
}

impl DiagSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
    }

    pub fn log(&self) {
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("{}", self.to_json());
        }
    }
}
