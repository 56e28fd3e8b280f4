//! `pkgnorm` — normalize npm registry documents and package.json manifests.
//!
//! # Flow
//! 1. A raw document is classified once ([`normalize::Shape`]).
//! 2. The [`normalize::Normalizer`] builds a canonical document from it.
//! 3. A [`Package`] keeps the (optionally picked or omitted) fields and answers
//!    dependency, search and [`Schema`] validity queries against them.

pub mod error;
pub mod fields;
pub mod models;
pub mod normalize;
pub mod package;
pub mod schema;

pub use error::{RepoUrlError, SchemaError, SourceError};
pub use fields::{FieldList, PackageOptions};
pub use models::{CheckResult, Document, ValidationIssue, VersionEntry};
pub use normalize::{normalize, Normalized, Normalizer, Shape};
pub use package::Package;
pub use schema::Schema;
