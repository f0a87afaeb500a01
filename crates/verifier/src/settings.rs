use std::time::Duration;

/// Maximum vision queries issued per evidence collection.
pub const MAX_VISION_QUERIES: usize = 2;

/// Characters of raw vision text embedded in verdict messages.
pub const DEFAULT_EVIDENCE_CHARS: usize = 200;

/// Characters of an error diagnostic embedded in error verdicts.
pub const DEFAULT_ERROR_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct VerifierSettings {
    pub inter_query_delay: Duration,
    pub evidence_chars: usize,
    pub error_chars: usize,
    /// Upper bound for one whole verification call; `None` waits forever.
    pub timeout: Option<Duration>,
    /// Window title fragments that identify a file manager.
    pub file_manager_hints: Vec<String>,
}

impl Default for VerifierSettings {
    fn default() -> Self {
        Self {
            inter_query_delay: Duration::from_millis(300),
            evidence_chars: DEFAULT_EVIDENCE_CHARS,
            error_chars: DEFAULT_ERROR_CHARS,
            timeout: Some(Duration::from_secs(60)),
            file_manager_hints: default_file_manager_hints(),
        }
    }
}

impl VerifierSettings {
    /// Settings with every delay removed, for tests and dry runs.
    pub fn immediate() -> Self {
        Self {
            inter_query_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

pub fn default_file_manager_hints() -> Vec<String> {
    ["explorer", "nautilus", "thunar", "dolphin", "nemo"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
