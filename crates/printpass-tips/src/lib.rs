//! # PrintPass Tips
//!
//! Picks one piece of advice for a printer from its current telemetry.
//! Every rule pairs a predicate with a message; among the rules that hold,
//! the one with the highest priority wins.

pub mod engine;
pub mod rules;
pub mod template;

pub use engine::{evaluate_smart_tips, TipEngine, TipMatch, FALLBACK_TIP};
pub use rules::{builtin_rules, TipRule};
pub use template::{fill_placeholders, MessageFn, TipTemplate};
