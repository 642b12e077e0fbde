//! Structure templates: named JSON documents describing a structure's shape.
//!
//! Templates live one per file as `<dir>/<name>.json`. They are read through on
//! every request and never cached or mutated here.

use std::path::{Path, PathBuf};

const TEMPLATE_EXTENSION: &str = "json";

/// Errors from template operations.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("structure template not found: {0}")]
    NotFound(String),
    #[error("invalid structure template format: {0}")]
    InvalidFormat(#[source] serde_json::Error),
    #[error("invalid structure template name: {0:?}")]
    InvalidName(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only access to the template directory.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the template called `name`.
    pub fn load(&self, name: &str) -> Result<serde_json::Value, TemplateError> {
        let path = self.path_for(name)?;
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TemplateError::NotFound(name.to_string()));
            }
            Err(e) => return Err(TemplateError::Io(e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(template = name, error = %e, "malformed structure template");
            TemplateError::InvalidFormat(e)
        })
    }

    /// Names of all templates, sorted. A missing directory has no templates.
    pub fn list(&self) -> Result<Vec<String>, TemplateError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TemplateError::Io(e)),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, TemplateError> {
        let single_segment = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        if !single_segment {
            return Err(TemplateError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{name}.{TEMPLATE_EXTENSION}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, TemplateStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(tmp.path().join("structures"));
        std::fs::create_dir_all(store.root()).unwrap();
        (tmp, store)
    }

    #[test]
    fn load_existing_template() {
        let (_tmp, store) = store();
        std::fs::write(
            store.root().join("tower.json"),
            r#"{"blocks": [[0,0,0],[0,1,0]], "material": "stone"}"#,
        )
        .unwrap();
        let doc = store.load("tower").unwrap();
        assert_eq!(doc["material"], "stone");
        assert_eq!(doc["blocks"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn missing_template_is_not_found() {
        let (_tmp, store) = store();
        match store.load("castle") {
            Err(TemplateError::NotFound(name)) => assert_eq!(name, "castle"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn malformed_template_is_invalid_format() {
        let (_tmp, store) = store();
        std::fs::write(store.root().join("ruin.json"), "{ broken").unwrap();
        assert!(matches!(
            store.load("ruin"),
            Err(TemplateError::InvalidFormat(_))
        ));
    }

    #[test]
    fn path_escapes_are_rejected() {
        let (_tmp, store) = store();
        for name in ["", "..", "../world", "a/b", "a\\b"] {
            assert!(
                matches!(store.load(name), Err(TemplateError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn list_returns_sorted_json_stems() {
        let (_tmp, store) = store();
        std::fs::write(store.root().join("wall.json"), "{}").unwrap();
        std::fs::write(store.root().join("arch.json"), "{}").unwrap();
        std::fs::write(store.root().join("notes.txt"), "ignore me").unwrap();
        assert_eq!(store.list().unwrap(), vec!["arch", "wall"]);
    }

    #[test]
    fn list_of_missing_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(tmp.path().join("nope"));
        assert!(store.list().unwrap().is_empty());
    }
}
