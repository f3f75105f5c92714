//! Static reference-data lookups.
//!
//! # Responsibility
//! - Load JSON reference documents (quotes, formulas, shortcut lists) by
//!   file name and serve opaque key lookups.
//!
//! # Invariants
//! - Content is never interpreted beyond key lookup; documents render
//!   verbatim downstream.
//! - Missing or malformed files degrade to an empty document, mirroring
//!   the permissive behavior reference pages rely on.

use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use std::path::PathBuf;

/// Motivational quotes shown when no quote file is available.
const FALLBACK_QUOTES: &[&str] = &[
    "The secret of getting ahead is getting started. - Mark Twain",
    "Success is not final, failure is not fatal. - Winston Churchill",
];

/// Read-only library of JSON reference documents under one data
/// directory.
#[derive(Debug, Clone)]
pub struct ReferenceLibrary {
    data_dir: PathBuf,
}

impl ReferenceLibrary {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Loads one JSON document by file name.
    ///
    /// Missing or unparseable files yield an empty JSON object; the
    /// failure is logged, never propagated.
    pub fn load(&self, file_name: &str) -> Value {
        let path = self.data_dir.join(file_name);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    "event=reference_load module=reference status=missing file={file_name} error={err}"
                );
                return Value::Object(serde_json::Map::new());
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=reference_load module=reference status=malformed file={file_name} error={err}"
                );
                Value::Object(serde_json::Map::new())
            }
        }
    }

    /// Fetches a nested value by key path from a loaded document.
    pub fn lookup<'v>(document: &'v Value, path: &[&str]) -> Option<&'v Value> {
        let mut current = document;
        for key in path {
            current = current.get(key)?;
        }
        Some(current)
    }

    /// Picks one motivational quote, falling back to built-ins when the
    /// quote file has none.
    pub fn random_quote<R: Rng>(&self, rng: &mut R) -> String {
        let document = self.load("quotes.json");
        let quotes: Vec<String> = Self::lookup(&document, &["quotes"])
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if quotes.is_empty() {
            return FALLBACK_QUOTES
                .choose(rng)
                .copied()
                .unwrap_or(FALLBACK_QUOTES[0])
                .to_string();
        }
        quotes
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| FALLBACK_QUOTES[0].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ReferenceLibrary;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use std::fs;

    #[test]
    fn missing_files_degrade_to_an_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let library = ReferenceLibrary::new(dir.path());
        let document = library.load("formulas.json");
        assert!(document.as_object().unwrap().is_empty());
    }

    #[test]
    fn malformed_files_degrade_to_an_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let library = ReferenceLibrary::new(dir.path());
        let document = library.load("broken.json");
        assert!(document.as_object().unwrap().is_empty());
    }

    #[test]
    fn lookup_walks_nested_keys() {
        let document = json!({"mathematics": {"algebra": [{"name": "quadratic"}]}});
        let section = ReferenceLibrary::lookup(&document, &["mathematics", "algebra"]).unwrap();
        assert!(section.is_array());
        assert!(ReferenceLibrary::lookup(&document, &["physics"]).is_none());
    }

    #[test]
    fn random_quote_prefers_the_quote_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("quotes.json"),
            serde_json::to_string(&json!({"quotes": ["Keep going."]})).unwrap(),
        )
        .unwrap();
        let library = ReferenceLibrary::new(dir.path());
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(library.random_quote(&mut rng), "Keep going.");
    }

    #[test]
    fn random_quote_falls_back_to_built_ins() {
        let dir = tempfile::tempdir().unwrap();
        let library = ReferenceLibrary::new(dir.path());
        let mut rng = StdRng::seed_from_u64(3);
        let quote = library.random_quote(&mut rng);
        assert!(quote.contains(" - "));
    }
}
