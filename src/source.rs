use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;

use pkgnorm::SourceError;

/// Expand directories into the `*.json` files they contain (non-recursive,
/// sorted). Plain files and `-` are kept as given.
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, SourceError> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let entries = std::fs::read_dir(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut found: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        found.sort();
        files.extend(found);
    }

    Ok(files)
}

/// Read one raw document. `-` reads stdin.
pub fn load_document(path: &Path) -> Result<Value, SourceError> {
    let display = path.display().to_string();
    let io_err = |source: std::io::Error| SourceError::Io {
        path: display.clone(),
        source,
    };

    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(io_err)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(io_err)?
    };

    serde_json::from_str(&content).map_err(|source| SourceError::Json {
        path: display.clone(),
        source,
    })
}
