//! Hyprland dispatch - launching programs and closing windows

use super::desktop::{clients, HyprClient};
use super::{process, validate_name, OsError, OsResult};
use tokio::process::Command;
use tracing::{debug, warn};

fn validate_address(address: &str) -> OsResult<()> {
    let hex = address.strip_prefix("0x").unwrap_or("");
    if hex.is_empty() || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(OsError::InvalidArgument(format!(
            "invalid window address: {address}"
        )));
    }
    Ok(())
}

async fn dispatch(args: &[&str]) -> OsResult<()> {
    let output = Command::new("hyprctl").arg("dispatch").args(args).output().await?;

    // hyprctl reports dispatcher errors on stdout with a zero exit code
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() || stdout.trim_start().starts_with("error") {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(OsError::OperationFailed(format!(
            "{} {}",
            stdout.trim(),
            stderr.trim()
        )));
    }

    Ok(())
}

/// Execute a program in Hyprland
pub async fn exec(command: &str) -> OsResult<()> {
    validate_name(command, "command")?;
    dispatch(&["exec", command]).await
}

/// Close a single window by its client address
pub async fn close_window(address: &str) -> OsResult<()> {
    validate_address(address)?;
    dispatch(&["closewindow", &format!("address:{address}")]).await
}

/// Clients whose title contains `title` (case-insensitive).
pub fn matching_clients<'a>(all: &'a [HyprClient], title: &str) -> Vec<&'a HyprClient> {
    let key = title.trim().to_lowercase();
    if key.is_empty() {
        return Vec::new();
    }
    all.iter()
        .filter(|c| c.title.to_lowercase().contains(&key))
        .collect()
}

/// Distinct owner PIDs of the clients whose title matches.
pub fn matching_pids(all: &[HyprClient], title: &str) -> Vec<u32> {
    let mut pids: Vec<u32> = matching_clients(all, title)
        .into_iter()
        .filter_map(|c| u32::try_from(c.pid).ok())
        .filter(|pid| *pid > 0)
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}

/// Kill the processes owning windows whose title matches. Unrelated processes
/// that merely share a name fragment are left alone.
pub async fn kill_windows_matching(title: &str) -> OsResult<usize> {
    validate_name(title, "window title")?;
    let all = clients().await?;
    let pids = matching_pids(&all, title);
    if pids.is_empty() {
        return Err(OsError::NotFound(format!("no window matching '{title}'")));
    }
    process::kill_pids(&pids).await
}

/// Gracefully close every window whose title matches. Returns how many were asked to close.
pub async fn close_windows_matching(title: &str) -> OsResult<usize> {
    validate_name(title, "window title")?;
    let all = clients().await?;
    let targets = matching_clients(&all, title);
    if targets.is_empty() {
        return Err(OsError::NotFound(format!("no window matching '{title}'")));
    }

    let mut closed = 0;
    let mut errors = Vec::new();
    for client in targets {
        match close_window(&client.address).await {
            Ok(()) => {
                debug!(address = %client.address, title = %client.title, "Close requested");
                closed += 1;
            }
            Err(e) => {
                warn!("Error closing {}: {}", client.title, e);
                errors.push(format!("{}: {}", client.title, e));
            }
        }
    }

    if closed == 0 {
        return Err(OsError::OperationFailed(errors.join("; ")));
    }
    Ok(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::os_capabilities::desktop::parse_clients;

    #[test]
    fn address_must_be_hex() {
        assert!(validate_address("0x55d1a2").is_ok());
        assert!(validate_address("55d1").is_err());
        assert!(validate_address("0x55;rm").is_err());
        assert!(validate_address("0x").is_err());
    }

    #[test]
    fn matches_titles_case_insensitively() {
        let all = parse_clients(
            br#"[{"address":"0x1","title":"Mozilla Firefox"},{"address":"0x2","title":"kitty"}]"#,
        )
        .unwrap();
        let hits = matching_clients(&all, "firefox");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].address, "0x1");
        assert!(matching_clients(&all, "  ").is_empty());
    }

    #[test]
    fn test_force_close_targets_only_matching_window_owners() {
        let all = parse_clients(
            br#"[
                {"address":"0x1","title":"Untitled - Notepad","pid":42},
                {"address":"0x2","title":"notes.txt - Notepad","pid":42},
                {"address":"0x3","title":"kitty","pid":77},
                {"address":"0x4","title":"Notepad helper","pid":0},
                {"address":"0x5","title":"Mozilla Firefox","pid":91}
            ]"#,
        )
        .unwrap();
        assert_eq!(matching_pids(&all, "notepad"), vec![42]);
        assert_eq!(matching_pids(&all, "e"), vec![42, 91]);
        assert!(matching_pids(&all, "code").is_empty());
        assert!(matching_pids(&all, " ").is_empty());
    }
}
