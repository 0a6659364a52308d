use anyhow::{Context, Result};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};

use cinestat_core::generate::{generate_dataset, seed_from_clock, GenerateOptions};
use cinestat_core::output::direct::insert_dataset;
use cinestat_core::output::manifest::{manifest_path, write_manifest, Manifest};

use super::{load_context, spinner};
use crate::args::GenerateArgs;

pub async fn run(args: &GenerateArgs) -> Result<()> {
    let (config, db_url) = load_context(args.db.as_deref())?;

    // --seed, then cinestat.toml, then the clock
    let seed = args
        .seed
        .or_else(|| config.as_ref().and_then(|c| c.generate.seed))
        .unwrap_or_else(seed_from_clock);
    let options = match &config {
        Some(cfg) => cfg.generate_options(seed),
        None => GenerateOptions::with_seed(seed),
    };

    // Phase 1: Generate
    let pb = spinner("1/3", "Generating dataset...")?;
    let dataset = generate_dataset(&options)?;
    let total_rows = dataset.total_rows();
    pb.finish_with_message(format!(
        "Generating dataset... ✓ {} rows (seed {})",
        total_rows, seed
    ));

    // Phase 2: Insert
    let pb2 = ProgressBar::new(total_rows as u64);
    pb2.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.cyan} [2/3] Inserting into store... {bar:40.cyan/dim} {pos}/{len} ({eta})",
            )?
            .progress_chars("█▓░"),
    );
    insert_dataset(
        &dataset,
        &db_url,
        Some(&|current, _total| {
            pb2.set_position(current as u64);
        }),
    )
    .await
    .with_context(|| format!("Failed to populate {}", db_url))?;
    pb2.finish_with_message(format!("Inserting into store... ✓ ({} rows)", total_rows));

    // Phase 3: Manifest
    let pb3 = spinner("3/3", "Writing manifest...")?;
    match manifest_path(&db_url) {
        Some(path) => {
            let manifest = Manifest::new(seed, &dataset, Local::now().naive_local());
            write_manifest(&manifest, &path)?;
            pb3.finish_with_message(format!("Writing manifest... ✓ {}", path.display()));
        }
        None => pb3.finish_with_message("Writing manifest... skipped (in-memory store)"),
    }

    println!("\nDatabase created successfully with sample data!");
    for (table, count) in dataset.table_counts() {
        println!("  {:<14} {:>6}", table, count);
    }
    println!("Reproduce with: cinestat generate --seed {}", seed);

    Ok(())
}
