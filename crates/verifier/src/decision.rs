//! Consensus policy over local and vision evidence.
//!
//! Vision answers are free text, so they are first reduced to an
//! [`EvidenceSignal`] by keyword search. The decision table only looks at the
//! signal and the local window hit, never at the raw text.

use crate::types::{truncate_chars, EvidenceBundle, Intent, TargetKind, Verdict};

#[derive(Debug, Clone, Copy)]
pub struct Indicators {
    pub positive: &'static [&'static str],
    pub negative: &'static [&'static str],
}

const APP_INDICATORS: Indicators = Indicators {
    positive: &["visible", "open", "active"],
    negative: &["not visible", "not found", "closed", "no"],
};

const FILE_INDICATORS: Indicators = Indicators {
    positive: &["visible", "open"],
    negative: &["not visible", "not found", "closed"],
};

const FOLDER_INDICATORS: Indicators = Indicators {
    positive: &["explorer", "folder", "visible"],
    negative: &["not visible", "not found"],
};

pub fn indicators(kind: TargetKind) -> Indicators {
    match kind {
        TargetKind::App => APP_INDICATORS,
        TargetKind::File => FILE_INDICATORS,
        TargetKind::Folder => FOLDER_INDICATORS,
    }
}

/// Vision text reduced to two independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvidenceSignal {
    pub positive: bool,
    pub negative: bool,
}

/// Keyword classification of a vision answer.
///
/// A positive word only counts when the target name also appears in the text.
pub fn classify(kind: TargetKind, target: &str, vision_text: &str) -> EvidenceSignal {
    let text = vision_text.to_lowercase();
    let name = target.trim().to_lowercase();
    let set = indicators(kind);

    let mentions_target = !name.is_empty() && text.contains(&name);
    let positive = mentions_target && set.positive.iter().any(|ind| text.contains(ind));
    let negative = set.negative.iter().any(|ind| text.contains(ind));

    EvidenceSignal { positive, negative }
}

fn subject(kind: TargetKind, name: &str, sentence_start: bool) -> String {
    match (kind, sentence_start) {
        (TargetKind::App, _) => name.to_string(),
        (TargetKind::File, true) => format!("File '{name}'"),
        (TargetKind::File, false) => format!("file '{name}'"),
        (TargetKind::Folder, true) => format!("Folder '{name}'"),
        (TargetKind::Folder, false) => format!("folder '{name}'"),
    }
}

/// Applies the consensus table to one evidence bundle.
///
/// Only successful vision answers are classified; failed queries show up in
/// the message but carry no signal. A blank target never confirms.
pub fn decide(
    kind: TargetKind,
    intent: Intent,
    target: &str,
    evidence: &EvidenceBundle,
    evidence_chars: usize,
) -> Verdict {
    let report_text = evidence.report_text();
    let vision = truncate_chars(&report_text, evidence_chars);
    if target.trim().is_empty() {
        return blank_target(kind, intent, &vision);
    }
    let signal = classify(kind, target, &evidence.vision_text);
    let local = evidence.local_hit;
    let head = subject(kind, target, true);
    let inner = subject(kind, target, false);

    match intent {
        Intent::Opened => {
            if (local || signal.positive) && !signal.negative {
                Verdict::confirmed(format!(
                    "✅ {head} appears open. Local={local}, Vision says: {vision}"
                ))
            } else if signal.negative && !local {
                Verdict::negative(format!(
                    "❌ {head} not confirmed open. Vision says: {vision}"
                ))
            } else {
                Verdict::ambiguous(format!(
                    "⚠️ Could not confidently confirm {inner} is open. Local={local}. Vision: {vision}"
                ))
            }
        }
        Intent::Closed => {
            if signal.negative && !local {
                Verdict::confirmed(format!(
                    "✅ {head} appears closed. Local={local}, Vision: {vision}"
                ))
            } else if local || signal.positive {
                Verdict::negative(format!(
                    "❌ {head} seems still present. Local={local}. Vision: {vision}"
                ))
            } else {
                Verdict::ambiguous(format!(
                    "⚠️ Could not confidently confirm {inner} is closed. Local={local}. Vision: {vision}"
                ))
            }
        }
    }
}

pub(crate) fn blank_target(kind: TargetKind, intent: Intent, vision: &str) -> Verdict {
    Verdict::ambiguous(format!(
        "⚠️ Could not confirm {kind} is {intent}: no target name given. Vision: {vision}"
    ))
}
