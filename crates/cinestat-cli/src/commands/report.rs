use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use cinestat_core::analytics::MovieAnalytics;
use cinestat_core::report::{render_html, write_report, DEFAULT_REPORT_PATH};

use super::{load_context, spinner};
use crate::args::ReportArgs;

pub async fn run(args: &ReportArgs) -> Result<()> {
    let (config, db_url) = load_context(args.db.as_deref())?;
    let output = args
        .output
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.output.report.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));

    let pb = spinner("1/2", "Running analytics queries...")?;
    let bundle = MovieAnalytics::new(db_url.clone())
        .run_all()
        .await
        .with_context(|| format!("Failed to analyze {}", db_url))?;
    pb.finish_with_message(format!(
        "Running analytics queries... ✓ {} movies",
        bundle.rating_distribution.len()
    ));

    let pb2 = spinner("2/2", "Rendering report...")?;
    let html = render_html(&bundle, Local::now().naive_local());
    write_report(&output, &html)?;
    pb2.finish_with_message("Rendering report... ✓");

    println!("HTML report generated successfully: {}", output.display());
    Ok(())
}
