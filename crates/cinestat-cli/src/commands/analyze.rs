use std::io;

use anyhow::{Context, Result};
use comfy_table::Table as ComfyTable;
use serde::Serialize;

use cinestat_core::analytics::rows::ResultTable;
use cinestat_core::analytics::{AnalysisBundle, MovieAnalytics};
use cinestat_core::output::csv::write_csv_section;
use cinestat_core::output::json::{write_json, JsonSections};

use super::{load_context, spinner};
use crate::args::{AnalyzeArgs, AnalyzeFormat};

/// Cell width limit in table output; longer values are cut with "...".
const MAX_CELL_CHARS: usize = 40;

pub async fn run(args: &AnalyzeArgs) -> Result<()> {
    let (_, db_url) = load_context(args.db.as_deref())?;
    let analytics = MovieAnalytics::new(db_url.clone());

    let pb = spinner("1/1", "Running analytics queries...")?;
    let bundle = if args.all {
        analytics.run_all().await
    } else {
        run_core(&analytics).await
    }
    .with_context(|| format!("Failed to analyze {}", db_url))?;
    pb.finish_and_clear();

    let mut printer = Printer::new(args.format, args.rows);
    printer.emit("Genre Popularity Analysis", &bundle.genre_trends)?;
    printer.emit("Director Performance", &bundle.director_metrics)?;
    printer.emit("Rating Distribution", &bundle.rating_distribution)?;
    if args.all {
        printer.emit("Actor Collaboration Network", &bundle.collaborations)?;
        printer.emit("Seasonal Release Patterns", &bundle.seasonal_patterns)?;
        printer.emit("Budget vs Rating Correlation", &bundle.budget_correlation)?;
    }
    printer.finish()
}

/// The three analyses printed without `--all`.
async fn run_core(analytics: &MovieAnalytics) -> cinestat_core::Result<AnalysisBundle> {
    Ok(AnalysisBundle {
        genre_trends: analytics.genre_trends().await?,
        director_metrics: analytics.director_metrics().await?,
        rating_distribution: analytics.rating_distribution().await?,
        ..Default::default()
    })
}

struct Printer {
    format: AnalyzeFormat,
    rows: usize,
    printed: usize,
    sections: JsonSections,
}

impl Printer {
    fn new(format: AnalyzeFormat, rows: usize) -> Self {
        Self {
            format,
            rows,
            printed: 0,
            sections: JsonSections::new(),
        }
    }

    fn emit<T: ResultTable + Serialize>(&mut self, title: &str, rows: &[T]) -> Result<()> {
        self.printed += 1;
        let head = &rows[..rows.len().min(self.rows)];

        match self.format {
            AnalyzeFormat::Table => {
                println!(
                    "\n{}. {} ({} of {} rows):",
                    self.printed,
                    title,
                    head.len(),
                    rows.len()
                );
                let mut t = ComfyTable::new();
                t.set_header(T::headers().to_vec());
                for row in head {
                    t.add_row(row.cells().into_iter().map(|c| clip(&c)).collect::<Vec<_>>());
                }
                println!("{}", t);
            }
            AnalyzeFormat::Csv => {
                write_csv_section(&mut io::stdout().lock(), head)?;
            }
            AnalyzeFormat::Json => {
                self.sections.push(head)?;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        if self.format == AnalyzeFormat::Json {
            write_json(&mut io::stdout().lock(), &self.sections)?;
        }
        Ok(())
    }
}

fn clip(value: &str) -> String {
    match value.char_indices().nth(MAX_CELL_CHARS - 3) {
        Some((idx, _)) if value.chars().count() > MAX_CELL_CHARS => format!("{}...", &value[..idx]),
        _ => value.to_string(),
    }
}
