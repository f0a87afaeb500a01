//! Evidence collection: local window titles and screen-vision answers.

use crate::settings::MAX_VISION_QUERIES;
use crate::traits::{VisionService, WindowSource};
use crate::types::WindowInfo;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Lowercased, trimmed titles of windows that are not minimized.
pub fn visible_titles_lower(windows: &[WindowInfo]) -> Vec<String> {
    windows
        .iter()
        .filter(|w| !w.minimized)
        .map(|w| w.title.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Case-insensitive containment of `keyword` in any title. Empty keywords never match.
pub fn title_matches(keyword: &str, titles: &[String]) -> bool {
    let key = keyword.trim().to_lowercase();
    if key.is_empty() {
        return false;
    }
    titles.iter().any(|t| t.contains(&key))
}

pub struct EvidenceCollector {
    windows: Arc<dyn WindowSource>,
    vision: Arc<dyn VisionService>,
    inter_query_delay: Duration,
}

impl EvidenceCollector {
    pub fn new(
        windows: Arc<dyn WindowSource>,
        vision: Arc<dyn VisionService>,
        inter_query_delay: Duration,
    ) -> Self {
        Self {
            windows,
            vision,
            inter_query_delay,
        }
    }

    /// Titles of visible windows; any enumeration failure yields an empty list.
    pub async fn visible_titles(&self) -> Vec<String> {
        match self.windows.list_windows().await {
            Ok(windows) => visible_titles_lower(&windows),
            Err(e) => {
                warn!("Window enumeration failed, treating as no local evidence: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn collect_local_evidence(&self, target: &str) -> bool {
        self.collect_local_evidence_any(&[target]).await
    }

    /// True if any of `keywords` appears in a visible window title.
    pub async fn collect_local_evidence_any(&self, keywords: &[&str]) -> bool {
        let titles = self.visible_titles().await;
        let hit = keywords.iter().any(|k| title_matches(k, &titles));
        debug!(?keywords, windows = titles.len(), hit, "Local window evidence");
        hit
    }

    /// Runs up to two queries in order. Answers are merged; failures are
    /// reported separately and never mixed into the answer text.
    pub async fn collect_vision_evidence(&self, queries: &[String]) -> VisionEvidence {
        let mut answers = Vec::with_capacity(MAX_VISION_QUERIES);
        let mut errors = Vec::new();
        for (idx, query) in queries.iter().take(MAX_VISION_QUERIES).enumerate() {
            if idx > 0 && !self.inter_query_delay.is_zero() {
                sleep(self.inter_query_delay).await;
            }
            match self.vision.query(query).await {
                Ok(answer) => answers.push(answer),
                Err(e) => {
                    warn!("Vision query {} failed: {}", idx + 1, e);
                    errors.push(e.detail());
                }
            }
        }
        VisionEvidence {
            text: answers.join("\n").trim().to_string(),
            errors,
        }
    }
}

/// Merged answers of the vision queries that succeeded, plus the detail of each failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisionEvidence {
    pub text: String,
    pub errors: Vec<String>,
}
