pub mod analyze;
pub mod charts;
pub mod generate;
pub mod report;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use cinestat_core::config::{self, CinestatConfig};
use cinestat_core::schema::sqlite;

/// Load the optional cinestat.toml from the working directory and resolve
/// the store URL against it.
pub(crate) fn load_context(db: Option<&str>) -> Result<(Option<CinestatConfig>, String)> {
    let config = config::read_config(Path::new("."))?;
    let db_url = sqlite::store_url(&config::resolve_db_url(db, config.as_ref()))?;
    tracing::debug!("Using store {}", db_url);
    Ok((config, db_url))
}

pub(crate) fn spinner(prefix: &'static str, message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} [{prefix}] {msg}")?);
    pb.set_prefix(prefix);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
