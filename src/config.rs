use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use pkgnorm::{Normalizer, PackageOptions, Schema};

/// Root configuration structure, deserialized from `.pkgnorm/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schema: SchemaConfig,
    /// Default field selection for `clean`; CLI flags replace it.
    #[serde(default)]
    pub output: PackageOptions,
}

/// Which documents count as manifests, and what makes one valid.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaConfig {
    /// Require `description` alongside `name`.
    #[serde(default)]
    pub strict: bool,
    /// JSON Schema file replacing the built-in schema. Relative paths resolve
    /// against the directory holding the config file.
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn normalizer(&self) -> Normalizer {
        if self.schema.strict {
            Normalizer::strict()
        } else {
            Normalizer::default()
        }
    }

    pub fn load_schema(&self) -> Result<Schema> {
        match &self.schema.path {
            Some(path) => Schema::from_path(path)
                .with_context(|| format!("loading schema {}", path.display())),
            None if self.schema.strict => Ok(Schema::strict()),
            None => Ok(Schema::default()),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.pkgnorm/config.toml`
/// 3. `~/.config/pkgnorm/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".pkgnorm").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("pkgnorm").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    debug!("no config file found, using defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "reading config");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let mut config: Config =
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?;

    if let (Some(schema_path), Some(dir)) = (&config.schema.path, path.parent()) {
        if schema_path.is_relative() {
            config.schema.path = Some(dir.join(schema_path));
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgnorm::FieldList;
    use tempfile::TempDir;

    fn write_project_config(dir: &TempDir, content: &str) {
        let config_dir = dir.path().join(".pkgnorm");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("config.toml"), content).unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.schema.strict);
        assert_eq!(config.normalizer(), Normalizer::default());
        assert!(config.output.pick.is_none());
        assert!(config.output.omit.is_none());
    }

    #[test]
    fn test_project_config() {
        let dir = TempDir::new().unwrap();
        write_project_config(
            &dir,
            r#"
[schema]
strict = true

[output]
omit = "readme, other"
"#,
        );

        let config = load_config(dir.path(), None).unwrap();
        assert!(config.schema.strict);
        assert!(config.normalizer().requires_description());
        assert_eq!(
            config.output.omit,
            Some(FieldList::from(vec!["readme", "other"]))
        );
        assert!(!config.load_schema().unwrap().is_valid(
            serde_json::json!({ "name": "foo" }).as_object().unwrap()
        ));
    }

    #[test]
    fn test_override_and_relative_schema_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("schema.json"),
            r#"{ "type": "object", "required": ["license"] }"#,
        )
        .unwrap();
        let config_path = dir.path().join("custom.toml");
        std::fs::write(
            &config_path,
            "[schema]\npath = \"schema.json\"\n\n[output]\npick = [\"name\", \"license\"]\n",
        )
        .unwrap();

        let config = load_config(Path::new("/nonexistent"), Some(&config_path)).unwrap();
        assert_eq!(config.schema.path, Some(dir.path().join("schema.json")));
        assert_eq!(
            config.output.pick,
            Some(FieldList::from(vec!["name", "license"]))
        );

        let schema = config.load_schema().unwrap();
        let doc = serde_json::json!({ "name": "foo" });
        assert_eq!(schema.validate(doc.as_object().unwrap())[0].property, "license");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_project_config(&dir, "[schema]\nstrict = \"yes please\"\n");
        assert!(load_config(dir.path(), None).is_err());
    }
}
