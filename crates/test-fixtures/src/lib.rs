//! Shared test support for the CivicFix workspace.
//!
//! - Golden JSON loaders for classifier and verifier payloads.
//! - Document builders with sensible defaults.
//! - Fakes for the classifier, verifier, weather, embedding, and store
//!   boundaries, including failing and hanging variants.

pub mod builders;
pub mod fakes;

use std::path::PathBuf;

use serde::de::DeserializeOwned;

/// Root directory of the golden payloads.
fn fixtures_root() -> PathBuf {
    // Any crate in the workspace: walk up until the fixtures crate is found.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .unwrap_or_else(|_| env!("CARGO_MANIFEST_DIR").to_string());
    let mut path = PathBuf::from(&manifest_dir);
    loop {
        let candidate = path.join("crates").join("test-fixtures").join("golden");
        if candidate.exists() {
            return candidate;
        }
        if path.join("golden").exists() && path.ends_with("test-fixtures") {
            return path.join("golden");
        }
        if !path.pop() {
            return PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("golden");
        }
    }
}

/// Load and deserialize a golden JSON file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a golden file as raw text, for tests that exercise parsing.
pub fn load_fixture_raw(relative_path: &str) -> String {
    let path = fixtures_root().join(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// All JSON files in a golden subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    paths.sort();
    paths
}
