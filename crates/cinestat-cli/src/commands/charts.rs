use std::path::PathBuf;

use anyhow::{Context, Result};

use cinestat_core::analytics::MovieAnalytics;
use cinestat_core::charts;

use super::{load_context, spinner};
use crate::args::ChartsArgs;

pub async fn run(args: &ChartsArgs) -> Result<()> {
    let (config, db_url) = load_context(args.db.as_deref())?;
    let out_dir = args
        .out_dir
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.output.charts_dir.clone()))
        .unwrap_or_else(|| PathBuf::from("."));

    let pb = spinner("1/2", "Running analytics queries...")?;
    let bundle = MovieAnalytics::new(db_url.clone())
        .run_all()
        .await
        .with_context(|| format!("Failed to analyze {}", db_url))?;
    pb.finish_with_message("Running analytics queries... ✓");

    let pb2 = spinner("2/2", "Rendering charts...")?;
    let written = charts::render_all(&bundle, &out_dir)
        .with_context(|| format!("Failed to render charts into {}", out_dir.display()))?;
    pb2.finish_with_message(format!("Rendering charts... ✓ {} files", written.len()));

    for path in &written {
        println!("  {}", path.display());
    }
    println!("All visualizations saved as PNG files!");
    Ok(())
}
