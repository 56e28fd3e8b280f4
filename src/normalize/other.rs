use serde_json::Value;

use crate::models::{Document, OTHER};

/// Registry-only fields that never stay at the top level of a canonical
/// document. Present ones are moved, untouched, into the `other` bucket.
pub const OTHER_FIELDS: &[&str] = &[
    "_attachments",
    "_from",
    "_id",
    "_nodeVersion",
    "_npmOperationalInternal",
    "_npmUser",
    "_npmVersion",
    "_rev",
    "_shasum",
    "author",
    "bugs",
    "contributors",
    "directories",
    "dist-tags",
    "dist",
    "maintainers",
    "readmeFilename",
    "time",
    "users",
];

/// Whether `field` belongs in the `other` bucket.
pub fn is_other_field(field: &str) -> bool {
    OTHER_FIELDS.contains(&field)
}

/// Move every [`OTHER_FIELDS`] entry of `pkg` into `pkg.other`.
///
/// An existing `other` mapping is extended rather than replaced, so running
/// this twice is a no-op. An empty bucket is removed.
pub fn relocate_other_fields(pkg: &mut Document) {
    let mut other = match pkg.shift_remove(OTHER) {
        Some(Value::Object(existing)) => existing,
        Some(foreign) => {
            // a non-mapping `other` from the source is kept as data, not as the bucket
            let mut bucket = Document::new();
            bucket.insert(OTHER.to_string(), foreign);
            bucket
        }
        None => Document::new(),
    };

    let listed: Vec<String> = pkg.keys().filter(|k| is_other_field(k)).cloned().collect();
    for field in listed {
        if let Some(value) = pkg.shift_remove(&field) {
            other.insert(field, value);
        }
    }

    if !other.is_empty() {
        pkg.insert(OTHER.to_string(), Value::Object(other));
    }
}
