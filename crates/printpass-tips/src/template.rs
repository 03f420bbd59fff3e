//! Tip message templates

use printpass_core::PrinterSnapshot;
use serde_json::Value;

/// Builds a message from a snapshot, or `None` when a needed field is absent
pub type MessageFn = fn(&PrinterSnapshot) -> Option<String>;

/// How a rule produces its text
#[derive(Clone, Copy)]
pub enum TipTemplate {
    /// Literal text with `{fieldName}` placeholders filled from the snapshot
    Text(&'static str),
    /// Text computed from the snapshot
    Computed(MessageFn),
}

impl TipTemplate {
    pub fn render(&self, snapshot: &PrinterSnapshot) -> Option<String> {
        match self {
            Self::Text(text) => fill_placeholders(text, snapshot),
            Self::Computed(build) => build(snapshot),
        }
    }
}

impl std::fmt::Debug for TipTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Replace each `{key}` in `template` with the snapshot field of that wire name.
///
/// Returns `None` if a placeholder names a field that is missing or null, or
/// if a brace is left unclosed.
pub fn fill_placeholders(template: &str, snapshot: &PrinterSnapshot) -> Option<String> {
    if !template.contains('{') {
        return Some(template.to_string());
    }

    let value = serde_json::to_value(snapshot).ok()?;
    let fields = value.as_object()?;

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}')?;
        out.push_str(&render_field(fields.get(&after[..end])?)?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}

fn render_field(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_f64().map(|v| v.to_string()),
        other => Some(other.to_string()),
    }
}
