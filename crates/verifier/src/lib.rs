//! Action verification core.
//!
//! Decides whether a desktop action really happened by combining window-title
//! enumeration with screen-vision answers, and retries the action a bounded
//! number of times when it did not.

pub mod decision;
pub mod error;
pub mod evidence;
pub mod guard;
pub mod retry;
pub mod settings;
pub mod traits;
pub mod types;
pub mod verifier;

pub use decision::{classify, decide, EvidenceSignal};
pub use error::VerifyError;
pub use evidence::EvidenceCollector;
pub use guard::{ActivationGuard, InputController};
pub use retry::{run_with_verification, RetryMode, RetryOrchestrator, RetryOutcome, RetryPolicy};
pub use settings::VerifierSettings;
pub use traits::{VisionService, WindowSource};
pub use types::{EvidenceBundle, Intent, Outcome, TargetKind, Verdict, WindowInfo};
pub use verifier::ActionVerifier;
