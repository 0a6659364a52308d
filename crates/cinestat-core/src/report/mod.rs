//! # Report
//!
//! Turns an [`AnalysisBundle`](crate::analytics::AnalysisBundle) into a
//! single self-contained HTML page.

pub mod html;
pub mod summary;

use std::fs;
use std::path::Path;

use crate::error::{CinestatError, Result};

pub use html::{escape_html, format_money, render_html};
pub use summary::{
    genre_rollup, genre_summary, season_rollup, season_summary, GenreSummary, ReportSummary,
    SeasonSummary,
};

pub const DEFAULT_REPORT_PATH: &str = "movie_analysis_report.html";

/// Write a rendered report to `path`, replacing any existing file.
pub fn write_report(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CinestatError::Output {
            message: "Failed to create report directory".to_string(),
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, html).map_err(|e| CinestatError::Output {
        message: "Failed to write report".to_string(),
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!("wrote report ({} bytes) to {}", html.len(), path.display());
    Ok(())
}
