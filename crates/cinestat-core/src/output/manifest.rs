//! # Generation Manifest
//!
//! After `cinestat generate` fills the store it writes a small JSON file
//! next to it (`movies.db.manifest.json`) recording the seed, the row count
//! per table and the dataset fingerprint. Re-running with the recorded seed
//! reproduces the store exactly; the fingerprint lets you confirm it.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CinestatError, Result};
use crate::schema::types::Dataset;

/// Suffix appended to the store file name.
pub const MANIFEST_SUFFIX: &str = ".manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Random seed used for generation.
    pub seed: u64,
    /// cinestat version that produced the store.
    pub cinestat_version: String,
    /// Row count per table. BTreeMap for stable key order in the JSON.
    pub row_counts: BTreeMap<String, usize>,
    /// SHA-256 of the dataset, see [`Dataset::fingerprint`].
    pub fingerprint: String,
    /// Local time the store was generated, `YYYY-MM-DD HH:MM:SS`.
    pub generated_at: String,
}

impl Manifest {
    pub fn new(seed: u64, dataset: &Dataset, generated_at: chrono::NaiveDateTime) -> Self {
        Self {
            seed,
            cinestat_version: env!("CARGO_PKG_VERSION").to_string(),
            row_counts: dataset
                .table_counts()
                .into_iter()
                .map(|(name, count)| (name.to_string(), count))
                .collect(),
            fingerprint: dataset.fingerprint(),
            generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Manifest path for a store URL such as `sqlite://data/movies.db`.
///
/// Returns `None` for in-memory stores, which have no file to sit beside.
pub fn manifest_path(db_url: &str) -> Option<PathBuf> {
    let path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(format!("{}{}", path, MANIFEST_SUFFIX)))
}

/// Write the manifest atomically: temp file in the same directory, then rename.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest)
        .map_err(|e| CinestatError::Other(format!("Failed to serialize manifest: {}", e)))?;

    let tmp_path = path.with_extension("json.tmp");

    let mut file = fs::File::create(&tmp_path).map_err(|e| CinestatError::Output {
        message: "Failed to create temp manifest".to_string(),
        path: tmp_path.clone(),
        source: e,
    })?;
    file.write_all(json.as_bytes())
        .map_err(|e| CinestatError::Output {
            message: "Failed to write temp manifest".to_string(),
            path: tmp_path.clone(),
            source: e,
        })?;
    file.sync_all().map_err(|e| CinestatError::Output {
        message: "Failed to sync manifest to disk".to_string(),
        path: tmp_path.clone(),
        source: e,
    })?;

    fs::rename(&tmp_path, path).map_err(|e| CinestatError::Output {
        message: format!("Failed to rename {}", tmp_path.display()),
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Read a manifest back from disk.
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(path).map_err(|e| CinestatError::Output {
        message: "Failed to read manifest".to_string(),
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content)
        .map_err(|e| CinestatError::Other(format!("Failed to parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::engine::{generate_dataset, GenerateOptions};

    fn fixed_time() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_manifest_path_from_url() {
        assert_eq!(
            manifest_path("sqlite://data/movies.db"),
            Some(PathBuf::from("data/movies.db.manifest.json"))
        );
        assert_eq!(
            manifest_path("sqlite:movies.db?mode=rwc"),
            Some(PathBuf::from("movies.db.manifest.json"))
        );
        assert_eq!(manifest_path("sqlite::memory:"), None);
    }

    #[test]
    fn test_manifest_records_counts_and_seed() {
        let dataset = generate_dataset(&GenerateOptions::with_seed(8)).unwrap();
        let manifest = Manifest::new(8, &dataset, fixed_time());
        assert_eq!(manifest.seed, 8);
        assert_eq!(manifest.row_counts["movies"], 44);
        assert_eq!(manifest.row_counts["movie_ratings"], dataset.ratings.len());
        assert_eq!(manifest.fingerprint, dataset.fingerprint());
        assert_eq!(manifest.generated_at, "2025-01-01 09:30:00");
    }

    #[test]
    fn test_write_and_read_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.db.manifest.json");
        let dataset = generate_dataset(&GenerateOptions::with_seed(2)).unwrap();
        let manifest = Manifest::new(2, &dataset, fixed_time());

        write_manifest(&manifest, &path).unwrap();
        assert!(!dir.path().join("movies.db.manifest.json.tmp").exists());

        let loaded = read_manifest(&path).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_read_manifest_missing_file() {
        let err = read_manifest(Path::new("/nonexistent/movies.db.manifest.json")).unwrap_err();
        assert!(format!("{}", err).contains("Failed to read manifest"));
    }
}
