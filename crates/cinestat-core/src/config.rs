//! # Configuration File Parser
//!
//! Reads `cinestat.toml`, the optional file that sets defaults so the CLI
//! can run without flags. Supports:
//!
//! - `[database]`: store URL
//! - `[generate]`: seed plus ratings-per-movie and cast-size ranges
//! - `[output]`: report path and chart directory
//!
//! Example `cinestat.toml`:
//!
//! ```toml
//! [database]
//! url = "sqlite://movies.db"
//!
//! [generate]
//! seed = 42
//! min_ratings = 50
//! max_ratings = 200
//! min_cast = 2
//! max_cast = 4
//!
//! [output]
//! report = "movie_analysis_report.html"
//! charts_dir = "charts"
//! ```
//!
//! Every key is optional. Command-line flags win over the file, and the
//! file wins over built-in defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CinestatError, Result};
use crate::generate::catalog;
use crate::generate::engine::GenerateOptions;
use crate::schema::DEFAULT_DB_URL;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "cinestat.toml";

/// Environment variable consulted for the store URL when `--db` is absent.
pub const DB_ENV_VAR: &str = "CINESTAT_DB";

/// Top-level cinestat.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CinestatConfig {
    pub database: DatabaseConfig,
    pub generate: GenerateConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Store URL (e.g., "sqlite://data/movies.db").
    pub url: Option<String>,
}

/// Generation defaults. Unset bounds fall back to [`GenerateOptions::with_seed`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Fixed random seed for reproducible stores.
    pub seed: Option<u64>,
    pub min_ratings: Option<usize>,
    pub max_ratings: Option<usize>,
    pub min_cast: Option<usize>,
    pub max_cast: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Where `cinestat report` writes the HTML document.
    pub report: Option<PathBuf>,
    /// Directory `cinestat charts` writes its PNG files into.
    pub charts_dir: Option<PathBuf>,
}

/// Read and parse a cinestat.toml file from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed or fails
/// [`CinestatConfig::validate`].
pub fn read_config(dir: &Path) -> Result<Option<CinestatConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| CinestatError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let config: CinestatConfig = toml::from_str(&content).map_err(|e| CinestatError::Config {
        message: format!("Failed to parse {}: {}", path.display(), e),
    })?;

    config.validate()?;
    tracing::debug!("Loaded {}", path.display());

    Ok(Some(config))
}

impl CinestatConfig {
    /// Validate semantic constraints that serde cannot enforce.
    pub fn validate(&self) -> Result<()> {
        let cfg = &self.generate;
        let defaults = GenerateOptions::with_seed(0);

        let min_ratings = cfg.min_ratings.unwrap_or(*defaults.ratings_per_movie.start());
        let max_ratings = cfg.max_ratings.unwrap_or(*defaults.ratings_per_movie.end());
        if min_ratings > max_ratings {
            return Err(CinestatError::Config {
                message: format!(
                    "generate.min_ratings ({}) is greater than generate.max_ratings ({})",
                    min_ratings, max_ratings
                ),
            });
        }

        let min_cast = cfg.min_cast.unwrap_or(*defaults.cast_size.start());
        let max_cast = cfg.max_cast.unwrap_or(*defaults.cast_size.end());
        if min_cast == 0 {
            return Err(CinestatError::Config {
                message: "generate.min_cast must be at least 1".to_string(),
            });
        }
        if min_cast > max_cast {
            return Err(CinestatError::Config {
                message: format!(
                    "generate.min_cast ({}) is greater than generate.max_cast ({})",
                    min_cast, max_cast
                ),
            });
        }
        if max_cast > catalog::ACTORS.len() {
            return Err(CinestatError::Config {
                message: format!(
                    "generate.max_cast ({}) exceeds the {} available actors",
                    max_cast,
                    catalog::ACTORS.len()
                ),
            });
        }
        Ok(())
    }

    /// Generation options for `seed`, with the file's ranges applied.
    pub fn generate_options(&self, seed: u64) -> GenerateOptions {
        let cfg = &self.generate;
        let defaults = GenerateOptions::with_seed(seed);
        GenerateOptions {
            seed,
            ratings_per_movie: cfg.min_ratings.unwrap_or(*defaults.ratings_per_movie.start())
                ..=cfg.max_ratings.unwrap_or(*defaults.ratings_per_movie.end()),
            cast_size: cfg.min_cast.unwrap_or(*defaults.cast_size.start())
                ..=cfg.max_cast.unwrap_or(*defaults.cast_size.end()),
        }
    }
}

/// Resolve the store URL: an explicit value (the `--db` flag or the
/// [`DB_ENV_VAR`] variable, which clap merges), then the config file, then
/// [`DEFAULT_DB_URL`].
pub fn resolve_db_url(explicit: Option<&str>, config: Option<&CinestatConfig>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| config.and_then(|c| c.database.url.clone()))
        .unwrap_or_else(|| DEFAULT_DB_URL.to_string())
}
