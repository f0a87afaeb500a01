//! Process force-kill by PID

use super::{OsError, OsResult};
use sysinfo::{Pid, System};
use tokio::task;
use tracing::debug;

/// Kill the given processes. Our own PID is never signalled.
/// Returns the number of processes signalled.
pub async fn kill_pids(pids: &[u32]) -> OsResult<usize> {
    let own_pid = std::process::id();
    let targets: Vec<u32> = pids.iter().copied().filter(|pid| *pid != own_pid).collect();
    if targets.is_empty() {
        return Err(OsError::NotFound("no process to kill".to_string()));
    }

    let requested = targets.len();
    let killed = task::spawn_blocking(move || {
        let mut system = System::new();
        system.refresh_processes();
        targets
            .iter()
            .filter_map(|pid| system.process(Pid::from_u32(*pid)))
            .filter(|process| process.kill())
            .count()
    })
    .await
    .map_err(|e| OsError::OperationFailed(e.to_string()))?;

    debug!(requested, killed, "Force close");
    if killed == 0 {
        return Err(OsError::NotFound(format!(
            "none of {requested} process(es) could be signalled"
        )));
    }
    Ok(killed)
}
