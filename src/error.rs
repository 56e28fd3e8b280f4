use thiserror::Error;

/// Failure to build a [`crate::Schema`].
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema file could not be read.
    #[error("cannot read schema {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The schema file is not JSON.
    #[error("schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON is not a usable JSON Schema.
    #[error("invalid schema: {0}")]
    Invalid(String),
}

/// Failure to read a repository URL as a GitHub reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoUrlError {
    #[error("repository url is empty")]
    Empty,
    #[error("'{0}' does not point at github.com")]
    NotGitHub(String),
    #[error("'{0}' is missing a user or repository segment")]
    MissingSegment(String),
}

/// Failure to load a raw document from disk or stdin.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
