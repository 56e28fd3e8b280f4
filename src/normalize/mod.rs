//! The clean transform: raw registry documents and package.json manifests in,
//! one canonical document shape out.
//!
//! - [`github`] — turns `repository.url` spellings into GitHub coordinates.
//! - [`other`] — the denylist of registry-only fields and the `other` bucket.
//!
//! Normalization is pure. The caller's document is only ever borrowed, and every
//! transformed result is a freshly owned [`Document`].

pub mod github;
pub mod other;

use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::models::{Document, VersionEntry, LAST_PUBLISHER, STARS_COUNT, VALID};

/// The kind of document handed to [`Normalizer::normalize`], decided once up front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// Carries `lastPublisher`; it has been through the transform already.
    AlreadyCanonical,
    /// A full registry export; `manifest` is `versions[latest]`.
    Registry {
        latest: &'a str,
        manifest: &'a Document,
    },
    /// A single package.json.
    Manifest,
    /// Neither of the above. Passed through with only `valid` stripped.
    Incomplete,
}

impl std::fmt::Display for Shape<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::AlreadyCanonical => write!(f, "canonical"),
            Shape::Registry { latest, .. } => write!(f, "registry (latest {})", latest),
            Shape::Manifest => write!(f, "manifest"),
            Shape::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// Result of [`Normalizer::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<'a> {
    /// Input was already canonical and is handed back as-is.
    Unchanged(&'a Document),
    /// A registry or manifest document, fully cleaned.
    Canonical(Document),
    /// An incomplete document, copied with any `valid` field removed.
    PassThrough(Document),
    /// Input was not a mapping.
    Undefined,
}

impl<'a> Normalized<'a> {
    /// Take ownership of the resulting document, cloning only when borrowed.
    pub fn into_document(self) -> Option<Document> {
        match self {
            Normalized::Unchanged(doc) => Some(doc.clone()),
            Normalized::Canonical(doc) | Normalized::PassThrough(doc) => Some(doc),
            Normalized::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Normalized::Undefined)
    }
}

/// Shape detection and cleaning rules.
///
/// The default detects a manifest by `name` alone; [`Normalizer::strict`]
/// also requires `description`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    require_description: bool,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            require_description: true,
        }
    }

    pub fn requires_description(&self) -> bool {
        self.require_description
    }

    /// Classify `raw` without transforming it.
    pub fn detect<'a>(&self, raw: &'a Document) -> Shape<'a> {
        if raw.get(LAST_PUBLISHER).is_some_and(is_set) {
            return Shape::AlreadyCanonical;
        }

        let latest = raw
            .get("dist-tags")
            .and_then(|tags| tags.get("latest"))
            .and_then(Value::as_str)
            .filter(|latest| !latest.is_empty());
        if let Some(latest) = latest {
            let manifest = raw
                .get("versions")
                .and_then(|versions| versions.get(latest))
                .and_then(Value::as_object);
            if let Some(manifest) = manifest {
                return Shape::Registry { latest, manifest };
            }
        }

        let has_name = raw.get("name").is_some_and(is_set);
        let has_description = raw.get("description").is_some_and(is_set);
        if has_name && (has_description || !self.require_description) {
            Shape::Manifest
        } else {
            Shape::Incomplete
        }
    }

    /// Normalize any JSON value. Non-mappings yield [`Normalized::Undefined`].
    pub fn normalize<'a>(&self, raw: &'a Value) -> Normalized<'a> {
        match raw.as_object() {
            Some(doc) => self.normalize_document(doc),
            None => {
                debug!("document is not a mapping, nothing to normalize");
                Normalized::Undefined
            }
        }
    }

    /// Normalize a document that is already known to be a mapping.
    pub fn normalize_document<'a>(&self, raw: &'a Document) -> Normalized<'a> {
        let shape = self.detect(raw);
        debug!(%shape, "detected document shape");

        match shape {
            Shape::AlreadyCanonical => Normalized::Unchanged(raw),
            Shape::Registry { manifest, .. } => {
                // top-level fields win over the version manifest
                let mut pkg = manifest.clone();
                for (key, value) in raw {
                    pkg.insert(key.clone(), value.clone());
                }
                Normalized::Canonical(clean(pkg))
            }
            Shape::Manifest => Normalized::Canonical(clean(raw.clone())),
            Shape::Incomplete => {
                let mut pkg = raw.clone();
                pkg.shift_remove(VALID);
                Normalized::PassThrough(pkg)
            }
        }
    }
}

/// Normalize with the default (name-only) detection rule.
pub fn normalize(raw: &Value) -> Normalized<'_> {
    Normalizer::default().normalize(raw)
}

/// Derive the canonical fields of a registry or manifest working copy.
fn clean(mut pkg: Document) -> Document {
    normalize_repository(&mut pkg);

    if let Some(Value::Object(users)) = pkg.get("users") {
        let stars = users.len();
        pkg.insert(STARS_COUNT.to_string(), json!(stars));
    }

    if let Some(Value::Object(time)) = pkg.get("time") {
        let versions: Vec<Value> = time
            .iter()
            .filter_map(|(key, date)| {
                let number = version_number(key)?;
                date.as_str().map(|date| {
                    Value::from(VersionEntry {
                        number,
                        date: date.to_string(),
                    })
                })
            })
            .collect();
        let created = time.get("created").filter(|v| !v.is_null()).cloned();
        let modified = time.get("modified").filter(|v| !v.is_null()).cloned();

        pkg.insert("versions".to_string(), Value::Array(versions));
        if let Some(created) = created {
            pkg.insert("created".to_string(), created);
        }
        if let Some(modified) = modified {
            pkg.insert("modified".to_string(), modified);
        }
    }

    if let Some(publisher @ Value::Object(_)) = pkg.get("_npmUser") {
        let publisher = publisher.clone();
        pkg.insert(LAST_PUBLISHER.to_string(), publisher);
    }

    if let Some(maintainers @ Value::Array(_)) = pkg.get("maintainers") {
        let owners = maintainers.clone();
        pkg.insert("owners".to_string(), owners);
    }

    other::relocate_other_fields(&mut pkg);
    pkg.shift_remove(VALID);
    pkg
}

/// The SemVer text of a `time` key, after dropping the `v` / `=` prefixes
/// registries tolerate (`v1.0.0` -> `1.0.0`). `None` for non-version keys.
fn version_number(key: &str) -> Option<String> {
    let number = key.trim().trim_start_matches(|c: char| c == 'v' || c == '=' || c.is_whitespace());
    semver::Version::parse(number).ok()?;
    Some(number.to_string())
}

/// Replace a GitHub `repository` with its HTTPS URL. Anything else is left alone.
fn normalize_repository(pkg: &mut Document) {
    let Some(url) = pkg
        .get("repository")
        .and_then(|repo| repo.get("url"))
        .and_then(Value::as_str)
    else {
        return;
    };

    match github::parse_github_url(url) {
        Ok(repo) => {
            let https_url = repo.https_url();
            pkg.insert("repository".to_string(), Value::String(https_url));
        }
        Err(err) => trace!(%err, "keeping repository as-is"),
    }
}

/// Presence in the loose sense used by registry data: `null`, `false`, `0` and
/// `""` all count as unset.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::normalize::other::OTHER_FIELDS;

    fn express() -> Value {
        serde_json::from_str(include_str!("../../tests/fixtures/express.json")).unwrap()
    }

    fn fixture(name: &str) -> Value {
        let text = match name {
            "spectron" => include_str!("../../tests/fixtures/spectron.json"),
            "sparse" => include_str!("../../tests/fixtures/sparse.json"),
            "bitbucket" => include_str!("../../tests/fixtures/bitbucket.json"),
            "disallowed-valid-property" => {
                include_str!("../../tests/fixtures/disallowed-valid-property.json")
            }
            _ => unreachable!("unknown fixture {}", name),
        };
        serde_json::from_str(text).unwrap()
    }

    fn canonical(raw: &Value) -> Document {
        match normalize(raw) {
            Normalized::Canonical(doc) => doc,
            other => panic!("expected canonical document, got {:?}", other),
        }
    }

    #[test]
    fn test_non_mapping_is_undefined() {
        assert!(normalize(&Value::Null).is_undefined());
        assert!(normalize(&json!("express")).is_undefined());
        assert!(normalize(&json!([1, 2, 3])).is_undefined());
        assert_eq!(normalize(&json!(42)).into_document(), None);
    }

    #[test]
    fn test_already_canonical_is_returned_as_is() {
        let raw = json!({ "name": "x", "lastPublisher": { "name": "dougwilson" }, "_id": "x" });
        let doc = raw.as_object().unwrap();
        match normalize(&raw) {
            Normalized::Unchanged(out) => assert!(std::ptr::eq(out, doc)),
            other => panic!("expected unchanged, got {:?}", other),
        }
    }

    #[test]
    fn test_detects_shapes() {
        let normalizer = Normalizer::default();
        let express = express();
        assert!(matches!(
            normalizer.detect(express.as_object().unwrap()),
            Shape::Registry { latest: "4.14.0", .. }
        ));
        let spectron = fixture("spectron");
        assert_eq!(
            normalizer.detect(spectron.as_object().unwrap()),
            Shape::Manifest
        );
        let sparse = fixture("sparse");
        assert_eq!(
            normalizer.detect(sparse.as_object().unwrap()),
            Shape::Incomplete
        );
    }

    #[test]
    fn test_dangling_latest_tag_falls_back_to_manifest() {
        let raw = json!({ "name": "ghost", "dist-tags": { "latest": "9.9.9" }, "versions": {} });
        let doc = canonical(&raw);
        assert_eq!(doc["name"], json!("ghost"));
        assert_eq!(doc["other"]["dist-tags"], json!({ "latest": "9.9.9" }));
    }

    #[test]
    fn test_strict_detection_requires_description() {
        let raw = json!({ "name": "foo" });
        let doc = raw.as_object().unwrap();
        assert_eq!(Normalizer::default().detect(doc), Shape::Manifest);
        assert_eq!(Normalizer::strict().detect(doc), Shape::Incomplete);

        let described = json!({ "name": "foo", "description": "bar" });
        assert_eq!(
            Normalizer::strict().detect(described.as_object().unwrap()),
            Shape::Manifest
        );
    }

    #[test]
    fn test_registry_overlay_keeps_top_level_fields() {
        let doc = canonical(&express());
        assert_eq!(doc["name"], json!("express"));
        assert_eq!(doc["version"], json!("4.14.0"));
        assert!(doc["readme"].as_str().unwrap().contains("minimalist"));
        assert!(doc["dependencies"].get("finalhandler").is_some());
        assert!(doc["devDependencies"].get("istanbul").is_some());
    }

    #[test]
    fn test_registry_does_not_touch_input() {
        let raw = express();
        let before = raw.clone();
        let _ = canonical(&raw);
        assert_eq!(raw, before);
    }

    #[test]
    fn test_versions_from_time() {
        let raw = json!({
            "name": "foo",
            "time": {
                "created": "2010-12-29T19:38:25.450Z",
                "modified": "2016-07-20T21:50:58.231Z",
                "1.0.0": "2011-01-01T00:00:00.000Z",
                "not-a-version": "2012-01-01T00:00:00.000Z"
            }
        });
        let doc = canonical(&raw);
        assert_eq!(
            doc["versions"],
            json!([{ "number": "1.0.0", "date": "2011-01-01T00:00:00.000Z" }])
        );
        assert_eq!(doc["created"], json!("2010-12-29T19:38:25.450Z"));
        assert_eq!(doc["modified"], json!("2016-07-20T21:50:58.231Z"));
    }

    #[test]
    fn test_prefixed_version_keys_are_cleaned() {
        let raw = json!({
            "name": "foo",
            "time": {
                "v1.0.0": "2011-01-01T00:00:00.000Z",
                "=1.1.0": "2011-02-01T00:00:00.000Z",
                "vnext": "2011-03-01T00:00:00.000Z"
            }
        });
        let doc = canonical(&raw);
        assert_eq!(
            doc["versions"],
            json!([
                { "number": "1.0.0", "date": "2011-01-01T00:00:00.000Z" },
                { "number": "1.1.0", "date": "2011-02-01T00:00:00.000Z" }
            ])
        );
        assert_eq!(version_number("created"), None);
        assert_eq!(version_number(" v2.0.0-beta.1 ").as_deref(), Some("2.0.0-beta.1"));
    }

    #[test]
    fn test_versions_follow_time_order() {
        let doc = canonical(&express());
        let numbers: Vec<&str> = doc["versions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["number"].as_str().unwrap())
            .collect();
        assert_eq!(numbers, vec!["4.13.4", "4.14.0", "5.0.0-alpha.2"]);
        assert!(numbers.iter().all(|n| semver::Version::parse(n).is_ok()));
    }

    #[test]
    fn test_stars_count() {
        let raw = json!({ "name": "foo", "users": { "alice": true, "bob": true } });
        let doc = canonical(&raw);
        assert_eq!(doc["starsCount"], json!(2));
        assert_eq!(doc["other"]["users"], json!({ "alice": true, "bob": true }));
    }

    #[test]
    fn test_github_repository_becomes_url() {
        let doc = canonical(&express());
        assert_eq!(
            doc["repository"],
            json!("https://github.com/expressjs/express")
        );
    }

    #[test]
    fn test_non_github_repository_is_kept() {
        let doc = canonical(&fixture("bitbucket"));
        assert_eq!(
            doc["repository"],
            json!({ "type": "git", "url": "https://bitbucket.org/monkey/business.git" })
        );
    }

    #[test]
    fn test_string_repository_is_kept() {
        let doc = canonical(&json!({ "name": "foo", "repository": "foo/bar" }));
        assert_eq!(doc["repository"], json!("foo/bar"));
    }

    #[test]
    fn test_publisher_and_owners() {
        let doc = canonical(&express());
        assert_eq!(doc["lastPublisher"]["name"], json!("dougwilson"));
        let owners = doc["owners"].as_array().unwrap();
        assert!(owners.iter().any(|o| o["name"] == json!("dougwilson")));
    }

    #[test]
    fn test_non_array_maintainers_are_not_owners() {
        let doc = canonical(&json!({ "name": "foo", "maintainers": "dougwilson" }));
        assert!(doc.get("owners").is_none());
        assert_eq!(doc["other"]["maintainers"], json!("dougwilson"));
    }

    #[test]
    fn test_denylisted_fields_go_to_other() {
        let doc = canonical(&express());
        for field in OTHER_FIELDS {
            assert!(!doc.contains_key(*field), "{} left at top level", field);
        }
        let other = doc["other"].as_object().unwrap();
        for field in ["_id", "_from", "_shasum", "_npmUser", "maintainers", "time", "users"] {
            assert!(other.contains_key(field), "{} missing from other", field);
        }
    }

    #[test]
    fn test_empty_other_is_omitted() {
        let doc = canonical(&json!({ "name": "foo", "description": "bar" }));
        assert!(!doc.contains_key("other"));
    }

    #[test]
    fn test_valid_field_is_stripped() {
        let doc = canonical(&fixture("disallowed-valid-property"));
        assert!(!doc.contains_key("valid"));

        let sparse = json!({ "dependencies": { "request": "*" }, "valid": true });
        match normalize(&sparse) {
            Normalized::PassThrough(doc) => {
                assert!(!doc.contains_key("valid"));
                assert_eq!(doc["dependencies"], json!({ "request": "*" }));
            }
            other => panic!("expected pass-through, got {:?}", other),
        }
    }

    #[test]
    fn test_cobbled_on_fields_survive() {
        let mut raw = express();
        raw["fooProp"] = json!(1);
        raw["barProp"] = json!(2);
        let doc = canonical(&raw);
        assert_eq!(doc["fooProp"], json!(1));
        assert_eq!(doc["barProp"], json!(2));
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            express(),
            fixture("spectron"),
            fixture("bitbucket"),
            fixture("sparse"),
            json!({ "name": "foo", "time": { "1.0.0": "2011-01-01T00:00:00.000Z" } }),
        ] {
            let once = normalize(&raw).into_document().unwrap();
            let twice = normalize(&Value::Object(once.clone()))
                .into_document()
                .unwrap();
            assert_eq!(twice, once);
        }
    }
}
