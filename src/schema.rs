//! Validation of package documents against a JSON Schema.
//!
//! The built-in schemas only pin down required fields and a few types; a
//! project can replace them with its own schema file (see `[schema] path` in the
//! config).

use std::path::Path;
use std::sync::Arc;

use jsonschema::error::ValidationErrorKind;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::error::SchemaError;
use crate::models::{Document, ValidationIssue};

static DEFAULT_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::from_value(builtin_definition(&["name"])).expect("built-in schema compiles")
});

static STRICT_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::from_value(builtin_definition(&["name", "description"]))
        .expect("built-in strict schema compiles")
});

fn builtin_definition(required: &[&str]) -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": required,
        "properties": {
            "name": { "type": "string", "minLength": 1 },
            "description": { "type": "string" },
            "version": { "type": "string" },
            "dependencies": { "type": "object" },
            "devDependencies": { "type": "object" }
        }
    })
}

/// A compiled schema. Cheap to clone; clones share the compiled validator.
#[derive(Clone)]
pub struct Schema {
    definition: Arc<Value>,
    validator: Arc<jsonschema::Validator>,
}

impl Schema {
    /// Compile a JSON Schema definition.
    pub fn from_value(definition: Value) -> Result<Self, SchemaError> {
        let validator =
            jsonschema::validator_for(&definition).map_err(|e| SchemaError::Invalid(e.to_string()))?;
        Ok(Self {
            definition: Arc::new(definition),
            validator: Arc::new(validator),
        })
    }

    /// Read and compile a JSON Schema file.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_value(serde_json::from_str(&content)?)
    }

    /// Built-in schema requiring `name` and `description`.
    pub fn strict() -> Self {
        STRICT_SCHEMA.clone()
    }

    pub fn definition(&self) -> &Value {
        &self.definition
    }

    /// Every violation of the schema, in the order the validator reports them.
    pub fn validate(&self, doc: &Document) -> Vec<ValidationIssue> {
        let instance = Value::Object(doc.clone());
        self.validator
            .iter_errors(&instance)
            .map(|error| {
                let property = match &error.kind {
                    ValidationErrorKind::Required { property } => match property {
                        Value::String(name) => name.clone(),
                        other => other.to_string(),
                    },
                    _ => top_level_property(&error.instance_path.to_string()),
                };
                ValidationIssue {
                    property,
                    message: error.to_string(),
                }
            })
            .collect()
    }

    pub fn is_valid(&self, doc: &Document) -> bool {
        self.validator.is_valid(&Value::Object(doc.clone()))
    }
}

impl Default for Schema {
    /// Built-in schema requiring only `name`.
    fn default() -> Self {
        DEFAULT_SCHEMA.clone()
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// `/dependencies/foo` -> `dependencies`
fn top_level_property(pointer: &str) -> String {
    pointer
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
        .replace("~1", "/")
        .replace("~0", "~")
}
