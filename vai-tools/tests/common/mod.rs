#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use vai_tools::os_capabilities::filesystem::display_name;
use vai_tools::os_capabilities::OsError;
use vai_tools::{ActionBackend, ToolPolicies, VerifiedToolContext};
use vai_verifier::{
    ActionVerifier, VerifierSettings, VerifyError, VisionService, WindowInfo, WindowSource,
};

/// In-memory desktop shared by the fake backend, window source and vision model.
#[derive(Default)]
pub struct FakeDesktop {
    pub windows: Mutex<Vec<String>>,
    pub pending: Mutex<Vec<String>>,
    /// Window listings that still miss a freshly launched app.
    pub slow_polls: Mutex<u32>,
    pub calls: Mutex<Vec<String>>,
    pub broken_launch: bool,
    pub close_is_ignored: bool,
}

impl FakeDesktop {
    pub fn with_windows(titles: &[&str]) -> Self {
        let desktop = Self::default();
        *desktop.windows.lock() = titles.iter().map(|t| t.to_string()).collect();
        desktop
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn remove(&self, title: &str) -> usize {
        let mut windows = self.windows.lock();
        let before = windows.len();
        windows.retain(|w| !w.contains(title));
        before - windows.len()
    }
}

pub struct FakeBackend(pub Arc<FakeDesktop>);

#[async_trait]
impl ActionBackend for FakeBackend {
    async fn open_app(&self, app: &str) -> Result<String, OsError> {
        self.0.record(format!("open {app}"));
        if self.0.broken_launch {
            return Err(OsError::OperationFailed(format!("{app}: command not found")));
        }
        self.0.pending.lock().push(app.to_string());
        Ok(format!("⏳ {app} launch command executed."))
    }

    async fn close_app(&self, window: &str) -> Result<String, OsError> {
        self.0.record(format!("close {window}"));
        if self.0.close_is_ignored {
            return Ok("⏳ Close command executed.".into());
        }
        match self.0.remove(window) {
            0 => Err(OsError::NotFound(format!("no window matching '{window}'"))),
            n => Ok(format!("⏳ Closed {n} window(s).")),
        }
    }

    async fn force_close_app(&self, window: &str) -> Result<String, OsError> {
        self.0.record(format!("force {window}"));
        self.0.remove(window);
        Ok("⏳ Force-killed.".into())
    }

    async fn open_path(&self, path: &str) -> Result<String, OsError> {
        self.0.record(format!("open_path {path}"));
        self.0.pending.lock().push(display_name(path));
        Ok("⏳ Opened.".into())
    }

    async fn open_folder(&self, path: &str) -> Result<String, OsError> {
        self.0.record(format!("open_folder {path}"));
        self.0
            .pending
            .lock()
            .push(format!("{} - Files", display_name(path)));
        Ok("⏳ Opened folder.".into())
    }
}

pub struct FakeWindows(pub Arc<FakeDesktop>);

#[async_trait]
impl WindowSource for FakeWindows {
    async fn list_windows(&self) -> Result<Vec<WindowInfo>, VerifyError> {
        let desktop = &self.0;
        {
            let mut slow = desktop.slow_polls.lock();
            if *slow > 0 {
                *slow -= 1;
            } else {
                let arrived: Vec<String> = desktop.pending.lock().drain(..).collect();
                desktop.windows.lock().extend(arrived);
            }
        }
        Ok(desktop
            .windows
            .lock()
            .iter()
            .map(|t| WindowInfo::visible(t.clone()))
            .collect())
    }
}

/// Says "open and visible" when a window title is mentioned in the question.
pub struct FakeVision(pub Arc<FakeDesktop>);

#[async_trait]
impl VisionService for FakeVision {
    async fn query(&self, question: &str) -> Result<String, VerifyError> {
        let question = question.to_lowercase();
        let seen = self
            .0
            .windows
            .lock()
            .iter()
            .any(|t| {
                let subject = t.split(" - ").next().unwrap_or(t).to_lowercase();
                question.contains(&subject)
            });
        Ok(if seen {
            "Yes, it is open and visible.".to_string()
        } else {
            "It is not visible on screen.".to_string()
        })
    }
}

pub fn tool_context(desktop: Arc<FakeDesktop>) -> VerifiedToolContext {
    let verifier = ActionVerifier::new(
        Arc::new(FakeWindows(desktop.clone())),
        Arc::new(FakeVision(desktop.clone())),
        VerifierSettings::immediate(),
    );
    VerifiedToolContext::new(Arc::new(verifier), Arc::new(FakeBackend(desktop)))
        .with_policies(ToolPolicies::immediate())
}
