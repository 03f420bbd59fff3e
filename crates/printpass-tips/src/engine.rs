//! Tip selection

use printpass_core::PrinterSnapshot;
use serde::Serialize;
use tracing::debug;

use crate::rules::{builtin_rules, TipRule};

/// Returned when no rule applies at all
pub const FALLBACK_TIP: &str = "🔧 System operational. Monitor print parameters for optimal results.";

/// A rule that applied, with its rendered text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TipMatch {
    pub rule_id: &'static str,
    pub priority: i32,
    pub text: String,
}

/// Evaluates an ordered rule list against printer snapshots.
///
/// Selection is by highest priority; among equal priorities the rule declared
/// first wins.
#[derive(Debug, Clone)]
pub struct TipEngine {
    rules: Vec<TipRule>,
}

impl Default for TipEngine {
    fn default() -> Self {
        Self::new(builtin_rules())
    }
}

impl TipEngine {
    pub fn new(rules: Vec<TipRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[TipRule] {
        &self.rules
    }

    /// Every applicable tip, in rule declaration order
    pub fn candidates(&self, snapshot: &PrinterSnapshot) -> Vec<TipMatch> {
        self.rules
            .iter()
            .filter_map(|rule| {
                rule.evaluate(snapshot).map(|text| TipMatch {
                    rule_id: rule.id,
                    priority: rule.priority,
                    text,
                })
            })
            .collect()
    }

    /// The winning tip, or `None` when no rule applies
    pub fn evaluate_match(&self, snapshot: &PrinterSnapshot) -> Option<TipMatch> {
        let mut best: Option<TipMatch> = None;
        for candidate in self.candidates(snapshot) {
            if best.as_ref().is_none_or(|b| candidate.priority > b.priority) {
                best = Some(candidate);
            }
        }

        if let Some(tip) = &best {
            debug!("Selected tip {} (priority {})", tip.rule_id, tip.priority);
        }
        best
    }

    /// The winning tip's text, or [`FALLBACK_TIP`]
    pub fn evaluate(&self, snapshot: &PrinterSnapshot) -> String {
        self.evaluate_match(snapshot)
            .map(|tip| tip.text)
            .unwrap_or_else(|| FALLBACK_TIP.to_string())
    }
}

/// Evaluate the built-in rules against one snapshot.
pub fn evaluate_smart_tips(snapshot: &PrinterSnapshot) -> String {
    TipEngine::default().evaluate(snapshot)
}
