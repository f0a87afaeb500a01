//! Action primitives behind the verified tools.
//!
//! Each primitive returns a human-readable status string. The string is never
//! trusted as proof of success; verification decides that.

use crate::os_capabilities::{filesystem, hyprland, OsError};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::info;

#[async_trait]
pub trait ActionBackend: Send + Sync {
    async fn open_app(&self, app: &str) -> Result<String, OsError>;
    async fn close_app(&self, window: &str) -> Result<String, OsError>;
    /// Stronger variant used when a graceful close did not stick.
    async fn force_close_app(&self, window: &str) -> Result<String, OsError>;
    async fn open_path(&self, path: &str) -> Result<String, OsError>;
    async fn open_folder(&self, path: &str) -> Result<String, OsError>;
}

pub fn default_app_aliases() -> HashMap<String, String> {
    [
        ("notepad", "gnome-text-editor"),
        ("calculator", "gnome-calculator"),
        ("chrome", "google-chrome-stable"),
        ("browser", "firefox"),
        ("vlc", "vlc"),
        ("terminal", "kitty"),
        ("files", "nautilus"),
        ("settings", "gnome-control-center"),
        ("vs code", "code"),
        ("postman", "postman"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub struct HyprlandBackend {
    aliases: HashMap<String, String>,
}

impl HyprlandBackend {
    pub fn new(aliases: HashMap<String, String>) -> Self {
        let aliases = aliases
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();
        Self { aliases }
    }

    /// Launch command for a spoken app name; unknown names launch as-is.
    pub fn resolve(&self, app: &str) -> String {
        let key = app.trim().to_lowercase();
        self.aliases.get(&key).cloned().unwrap_or(key)
    }
}

impl Default for HyprlandBackend {
    fn default() -> Self {
        Self::new(default_app_aliases())
    }
}

#[async_trait]
impl ActionBackend for HyprlandBackend {
    async fn open_app(&self, app: &str) -> Result<String, OsError> {
        let command = self.resolve(app);
        info!(app, command = %command, "Launching app");
        hyprland::exec(&command).await?;
        Ok(format!(
            "⏳ {app} launch command executed. Please verify visually."
        ))
    }

    async fn close_app(&self, window: &str) -> Result<String, OsError> {
        let closed = hyprland::close_windows_matching(window).await?;
        Ok(format!(
            "⏳ Close command executed for {closed} window(s) matching '{window}'. Please verify visually."
        ))
    }

    async fn force_close_app(&self, window: &str) -> Result<String, OsError> {
        match hyprland::kill_windows_matching(window).await {
            Ok(killed) => Ok(format!(
                "⏳ Force-killed {killed} process(es) owning windows matching '{window}'. Please verify visually."
            )),
            Err(OsError::NotFound(_)) => self.close_app(window).await,
            Err(e) => Err(e),
        }
    }

    async fn open_path(&self, path: &str) -> Result<String, OsError> {
        let name = filesystem::open_path(path).await?;
        Ok(format!("⏳ Opened {name}. Please verify visually."))
    }

    async fn open_folder(&self, path: &str) -> Result<String, OsError> {
        let name = filesystem::open_folder(path).await?;
        Ok(format!("⏳ Opened folder {name}. Please verify visually."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_aliases_case_insensitively() {
        let backend = HyprlandBackend::default();
        assert_eq!(backend.resolve("Calculator"), "gnome-calculator");
        assert_eq!(backend.resolve(" VS Code "), "code");
        assert_eq!(backend.resolve("Blender"), "blender");
    }

    #[test]
    fn custom_alias_keys_are_normalized() {
        let mut aliases = HashMap::new();
        aliases.insert("  Editor ".to_string(), "zed".to_string());
        let backend = HyprlandBackend::new(aliases);
        assert_eq!(backend.resolve("editor"), "zed");
    }
}
