//! Public verification entry points.

use crate::decision::{blank_target, decide};
use crate::error::VerifyError;
use crate::evidence::EvidenceCollector;
use crate::settings::VerifierSettings;
use crate::traits::{VisionService, WindowSource};
use crate::types::{truncate_chars, EvidenceBundle, Intent, TargetKind, Verdict};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, error, info};

/// The two differently phrased questions asked for one target state.
pub fn vision_queries(kind: TargetKind, intent: Intent, name: &str) -> Vec<String> {
    match (kind, intent) {
        (TargetKind::App, Intent::Opened) => vec![
            format!("Check strictly: Is a window for '{name}' visible and active? Answer explicitly visible/not visible."),
            format!("Look for the '{name}' app UI or title bar. Is it currently on screen? Answer clearly visible/not visible."),
        ],
        (TargetKind::App, Intent::Closed) => vec![
            format!("Check strictly: Is any '{name}' window visible? Answer clearly: visible/not visible."),
            format!("Do you see '{name}' interface or title anywhere? Answer clearly: visible/not visible."),
        ],
        (TargetKind::File, Intent::Opened) => vec![
            format!("Is there a window showing the file '{name}' content? Answer visible/not visible."),
            format!("Check viewers/players/editors for '{name}'. Is it on screen? Answer visible/not visible."),
        ],
        (TargetKind::Folder, Intent::Opened) => vec![
            format!("Is a file manager showing the folder '{name}' visible? Answer visible/not visible."),
            format!("Look for a file explorer window with '{name}'. Answer visible/not visible."),
        ],
        (TargetKind::File | TargetKind::Folder, Intent::Closed) => vec![
            format!("Is any window showing '{name}' still visible? Answer clearly: visible/not visible."),
            format!("Look for '{name}' in any viewer, editor or file manager. Answer clearly: visible/not visible."),
        ],
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub struct ActionVerifier {
    collector: EvidenceCollector,
    settings: VerifierSettings,
}

impl ActionVerifier {
    pub fn new(
        windows: Arc<dyn WindowSource>,
        vision: Arc<dyn VisionService>,
        settings: VerifierSettings,
    ) -> Self {
        Self {
            collector: EvidenceCollector::new(windows, vision, settings.inter_query_delay),
            settings,
        }
    }

    pub async fn verify_app_opened(&self, name: &str) -> Verdict {
        self.verify(TargetKind::App, Intent::Opened, name).await
    }

    pub async fn verify_app_closed(&self, name: &str) -> Verdict {
        self.verify(TargetKind::App, Intent::Closed, name).await
    }

    pub async fn verify_file_opened(&self, name: &str) -> Verdict {
        self.verify(TargetKind::File, Intent::Opened, name).await
    }

    pub async fn verify_folder_opened(&self, name: &str) -> Verdict {
        self.verify(TargetKind::Folder, Intent::Opened, name).await
    }

    /// Collects evidence and decides. Never panics and never returns an error:
    /// failures become a `success == false` verdict.
    pub async fn verify(&self, kind: TargetKind, intent: Intent, name: &str) -> Verdict {
        info!(%kind, %intent, target = name, "Verifying action");
        if name.trim().is_empty() {
            return blank_target(kind, intent, "not queried");
        }
        let work = AssertUnwindSafe(self.evaluate(kind, intent, name)).catch_unwind();

        let caught = match self.settings.timeout {
            Some(limit) => match timeout(limit, work).await {
                Ok(caught) => caught,
                Err(_) => {
                    let err = VerifyError::Timeout(limit.as_secs());
                    return self.error_verdict(kind, intent, name, &err.to_string());
                }
            },
            None => work.await,
        };

        match caught {
            Ok(verdict) => {
                debug!(outcome = ?verdict.outcome, "Verification finished");
                verdict
            }
            Err(payload) => {
                let err = VerifyError::Aborted(panic_message(payload));
                self.error_verdict(kind, intent, name, &err.to_string())
            }
        }
    }

    /// Gathers a fresh evidence bundle for one target state.
    pub async fn collect(&self, kind: TargetKind, intent: Intent, name: &str) -> EvidenceBundle {
        let local_hit = match kind {
            TargetKind::Folder => {
                let mut keywords: Vec<&str> = vec![name];
                keywords.extend(self.settings.file_manager_hints.iter().map(String::as_str));
                self.collector.collect_local_evidence_any(&keywords).await
            }
            TargetKind::App | TargetKind::File => self.collector.collect_local_evidence(name).await,
        };
        let vision = self
            .collector
            .collect_vision_evidence(&vision_queries(kind, intent, name))
            .await;
        EvidenceBundle::new(local_hit, vision.text).with_errors(vision.errors)
    }

    async fn evaluate(&self, kind: TargetKind, intent: Intent, name: &str) -> Verdict {
        let evidence = self.collect(kind, intent, name).await;
        decide(kind, intent, name, &evidence, self.settings.evidence_chars)
    }

    fn error_verdict(&self, kind: TargetKind, intent: Intent, name: &str, err: &str) -> Verdict {
        error!(%kind, %intent, target = name, "Verification failed: {}", err);
        Verdict::error(format!(
            "❌ Could not verify {kind} '{name}' is {intent}: {}",
            truncate_chars(err, self.settings.error_chars)
        ))
    }
}
