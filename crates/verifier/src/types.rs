use serde::{Deserialize, Serialize};
use std::fmt;

/// A top-level window as reported by the window manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub title: String,
    pub minimized: bool,
}

impl WindowInfo {
    pub fn new(title: impl Into<String>, minimized: bool) -> Self {
        Self {
            title: title.into(),
            minimized,
        }
    }

    pub fn visible(title: impl Into<String>) -> Self {
        Self::new(title, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    App,
    File,
    Folder,
}

impl TargetKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "app" | "application" => Some(Self::App),
            "file" => Some(Self::File),
            "folder" | "dir" | "directory" => Some(Self::Folder),
            _ => None,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App => write!(f, "app"),
            Self::File => write!(f, "file"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Opened,
    Closed,
}

impl Intent {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "opened" | "open" => Some(Self::Opened),
            "closed" | "close" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened => write!(f, "opened"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Evidence gathered for one verification call. Never cached.
///
/// Only `vision_text` (answers from queries that succeeded) is classified.
/// Failed queries are kept apart in `vision_errors` so their wording can
/// never count as a positive or negative observation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceBundle {
    pub local_hit: bool,
    pub vision_text: String,
    pub vision_errors: Vec<String>,
}

impl EvidenceBundle {
    pub fn new(local_hit: bool, vision_text: impl Into<String>) -> Self {
        Self {
            local_hit,
            vision_text: vision_text.into(),
            vision_errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.vision_errors = errors;
        self
    }

    /// Answers followed by one `vision error: ...` line per failed query.
    pub fn report_text(&self) -> String {
        let mut lines = Vec::with_capacity(1 + self.vision_errors.len());
        if !self.vision_text.is_empty() {
            lines.push(self.vision_text.clone());
        }
        lines.extend(self.vision_errors.iter().map(|e| format!("vision error: {e}")));
        lines.join("\n")
    }
}

/// Terminal state of a verification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Confirmed,
    Negative,
    Ambiguous,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub success: bool,
    pub outcome: Outcome,
    pub message: String,
}

impl Verdict {
    pub fn confirmed(message: String) -> Self {
        Self {
            success: true,
            outcome: Outcome::Confirmed,
            message,
        }
    }

    pub fn negative(message: String) -> Self {
        Self {
            success: false,
            outcome: Outcome::Negative,
            message,
        }
    }

    pub fn ambiguous(message: String) -> Self {
        Self {
            success: false,
            outcome: Outcome::Ambiguous,
            message,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            outcome: Outcome::Error,
            message,
        }
    }

    pub fn into_tuple(self) -> (bool, String) {
        (self.success, self.message)
    }
}

impl From<Verdict> for (bool, String) {
    fn from(verdict: Verdict) -> Self {
        verdict.into_tuple()
    }
}

impl From<(bool, String)> for Verdict {
    fn from((success, message): (bool, String)) -> Self {
        if success {
            Self::confirmed(message)
        } else {
            Self::negative(message)
        }
    }
}

/// First `max` characters of `text`, on char boundaries.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
