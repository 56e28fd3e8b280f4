use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::fields::PackageOptions;
use crate::models::{Document, ValidationIssue};
use crate::normalize::Normalizer;
use crate::schema::Schema;

/// A cleaned package document plus the queries built on top of it.
///
/// Fields are plain owned state: callers may insert and remove them freely, and
/// every query reads the current fields rather than a construction-time snapshot.
#[derive(Debug, Clone)]
pub struct Package {
    fields: Document,
    schema: Schema,
}

impl Package {
    /// Clean `raw` with the default normalizer and schema.
    ///
    /// A non-mapping `raw` produces a package with no fields.
    pub fn new(raw: &Value, options: &PackageOptions) -> Self {
        Self::with_schema(raw, options, &Normalizer::default(), Schema::default())
    }

    pub fn with_schema(
        raw: &Value,
        options: &PackageOptions,
        normalizer: &Normalizer,
        schema: Schema,
    ) -> Self {
        let fields = normalizer
            .normalize(raw)
            .into_document()
            .unwrap_or_default()
            .into_iter()
            .filter(|(key, _)| options.keeps(key))
            .collect();
        Self { fields, schema }
    }

    pub fn fields(&self) -> &Document {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Document {
        &mut self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.shift_remove(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_document(self) -> Document {
        self.fields
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.get("version").and_then(Value::as_str)
    }

    /// Sorted names of `dependencies`.
    pub fn dep_names(&self) -> Vec<String> {
        self.sorted_keys("dependencies")
    }

    /// Sorted names of `devDependencies`.
    pub fn dev_dep_names(&self) -> Vec<String> {
        self.sorted_keys("devDependencies")
    }

    /// `dep_names` followed by `dev_dep_names`, sorted together. A name listed
    /// in both sections appears twice.
    pub fn all_dep_names(&self) -> Vec<String> {
        let mut names = self.dep_names();
        names.extend(self.dev_dep_names());
        names.sort();
        names
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.section_contains("dependencies", name)
    }

    pub fn dev_depends_on(&self, name: &str) -> bool {
        self.section_contains("devDependencies", name)
    }

    pub fn depends_somehow_on(&self, name: &str) -> bool {
        self.depends_on(name) || self.dev_depends_on(name)
    }

    /// Case-insensitive substring search over the whole serialized field set.
    pub fn mentions(&self, text: &str) -> bool {
        let haystack = match serde_json::to_string(&self.fields) {
            Ok(s) => s.to_lowercase(),
            Err(_) => return false,
        };
        haystack.contains(&text.to_lowercase())
    }

    pub fn valid(&self) -> bool {
        self.schema.is_valid(&self.fields)
    }

    pub fn validation_errors(&self) -> Vec<ValidationIssue> {
        self.schema.validate(&self.fields)
    }

    fn sorted_keys(&self, section: &str) -> Vec<String> {
        let mut names: Vec<String> = match self.fields.get(section) {
            Some(Value::Object(deps)) => deps.keys().cloned().collect(),
            _ => Vec::new(),
        };
        names.sort();
        names
    }

    fn section_contains(&self, section: &str, name: &str) -> bool {
        matches!(self.fields.get(section), Some(Value::Object(deps)) if deps.contains_key(name))
    }
}

impl Serialize for Package {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
