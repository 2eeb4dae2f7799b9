//! Memory-tagged log messages
//!
//! Long listings and aggregations report resident memory alongside progress.
//! Reading the figure can fail (unsupported platform, restricted `/proc`);
//! such failures are logged and never returned to the caller.

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::Level;

/// Log `message` at info level together with the current resident memory
pub fn mem_check(message: &str) {
    mem_check_at(Level::INFO, message);
}

pub fn mem_check_at(level: Level, message: &str) {
    match resident_memory_mb() {
        Some(memory) => {
            if level == Level::DEBUG {
                tracing::debug!("[{message}] RAM usage: {memory} MB");
            } else {
                tracing::info!("[{message}] RAM usage: {memory} MB");
            }
        }
        None => tracing::error!("[{message}] unable to read process memory usage"),
    }
}

/// Resident set size of this process in megabytes
pub fn resident_memory_mb() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        false,
        ProcessRefreshKind::new().with_memory(),
    );
    let process = system.process(pid)?;
    Some(process.memory() / 1024 / 1024)
}
