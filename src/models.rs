use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A package document: string keys to arbitrary JSON, in insertion order.
pub type Document = Map<String, Value>;

/// Marker field of a canonical document, derived from `_npmUser`.
pub const LAST_PUBLISHER: &str = "lastPublisher";
/// Derived star count, the number of keys in `users`.
pub const STARS_COUNT: &str = "starsCount";
/// Catch-all bucket for registry-only fields.
pub const OTHER: &str = "other";
/// Never allowed to survive normalization; it would shadow [`crate::Package::valid`].
pub const VALID: &str = "valid";

/// One entry of the canonical `versions` sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub number: String,
    pub date: String,
}

impl From<VersionEntry> for Value {
    fn from(entry: VersionEntry) -> Self {
        let mut map = Map::new();
        map.insert("number".to_string(), Value::String(entry.number));
        map.insert("date".to_string(), Value::String(entry.date));
        Value::Object(map)
    }
}

/// A single schema violation reported by [`crate::Schema::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Name of the offending (or missing) top-level property; empty for the root.
    pub property: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.property.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.property, self.message)
        }
    }
}

/// Outcome of checking one document, used by the CLI reports.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub source: String,
    pub name: Option<String>,
    pub version: Option<String>,
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.valid { "valid" } else { "invalid" };
        match &self.name {
            Some(name) => write!(f, "{} ({}): {}", self.source, name, verdict),
            None => write!(f, "{}: {}", self.source, verdict),
        }
    }
}
