//! Report renderers for `pkgnorm check`.
//!
//! - [`terminal`] — colored, tabular output with summary box; respects `--verbose` / `--quiet`.
//! - JSON output is a plain `serde_json` dump of the results and lives in `main`.

pub mod terminal;
