//! Desktop inspection - window listing and screen capture.

use super::{OsError, OsResult};
use serde::Deserialize;
use tokio::process::Command;
use vai_verifier::WindowInfo;

fn default_true() -> bool {
    true
}

/// One entry of `hyprctl clients -j`.
#[derive(Debug, Clone, Deserialize)]
pub struct HyprClient {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_true")]
    pub mapped: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub pid: i64,
}

impl HyprClient {
    pub fn to_window_info(&self) -> WindowInfo {
        WindowInfo::new(self.title.clone(), self.hidden || !self.mapped)
    }
}

pub fn parse_clients(raw: &[u8]) -> OsResult<Vec<HyprClient>> {
    serde_json::from_slice(raw).map_err(|e| OsError::OperationFailed(e.to_string()))
}

pub(crate) async fn command_exists(command: &str) -> bool {
    Command::new("which")
        .arg(command)
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

pub(crate) async fn run_checked(command: &str, args: &[&str]) -> OsResult<()> {
    let output = Command::new(command).args(args).output().await?;
    if output.status.success() {
        return Ok(());
    }
    Err(OsError::OperationFailed(
        String::from_utf8_lossy(&output.stderr).to_string(),
    ))
}

/// Hyprland clients with their addresses.
pub async fn clients() -> OsResult<Vec<HyprClient>> {
    let output = Command::new("hyprctl")
        .args(["clients", "-j"])
        .output()
        .await?;
    if !output.status.success() {
        return Err(OsError::OperationFailed(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }
    parse_clients(&output.stdout)
}

/// Top-level windows as title/minimized pairs.
pub async fn list_windows() -> OsResult<Vec<WindowInfo>> {
    Ok(clients().await?.iter().map(HyprClient::to_window_info).collect())
}

/// Capture current screen to file and return saved path.
pub async fn capture_screen(path: Option<&str>) -> OsResult<String> {
    let target = path.map(|s| s.to_string()).unwrap_or_else(|| {
        std::env::temp_dir()
            .join(format!(
                "vai-shot-{}-{}.png",
                chrono::Utc::now().timestamp_millis(),
                uuid::Uuid::new_v4().simple()
            ))
            .display()
            .to_string()
    });

    if command_exists("grim").await {
        run_checked("grim", &[&target]).await?;
        return Ok(target);
    }
    if command_exists("hyprshot").await {
        run_checked("hyprshot", &["-m", "output", "-o", &target]).await?;
        return Ok(target);
    }
    Err(OsError::Unavailable(
        "No screenshot backend found (install 'grim' or 'hyprshot')".to_string(),
    ))
}
