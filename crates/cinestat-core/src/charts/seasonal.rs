use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{
    chart_error, column_panel, money_label, pie_panel, pivot, plain_label, stacked_panel,
    DrawResult, Stacked, GRID_SIZE, LIGHT_GREEN, ORANGE, SEASONAL_FILE,
};
use crate::analytics::rows::SeasonalPatternRow;
use crate::error::Result;
use crate::report::summary::season_rollup;

/// Release share per season, mean rating per season, genre mix per season
/// and mean box office per season.
pub fn seasonal_chart(rows: &[SeasonalPatternRow], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, GRID_SIZE).into_drawing_area();
    draw(&root, rows).map_err(|e| chart_error(SEASONAL_FILE, e))
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    rows: &[SeasonalPatternRow],
) -> DrawResult<(), DB> {
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    let seasons = season_rollup(rows);
    let labels: Vec<String> = seasons.iter().map(|s| s.season.to_string()).collect();
    let counts: Vec<(String, f64)> = seasons
        .iter()
        .map(|s| (s.season.to_string(), s.movie_count as f64))
        .collect();
    let ratings: Vec<f64> = seasons.iter().map(|s| s.avg_rating).collect();
    let box_office: Vec<f64> = seasons.iter().map(|s| s.avg_box_office).collect();

    pie_panel(&panels[0], "Movie Releases by Season", &counts)?;
    column_panel(
        &panels[1],
        "Average Rating by Season",
        &labels,
        &ratings,
        &[LIGHT_GREEN],
        "Average Rating",
        &plain_label,
    )?;
    stacked_panel(
        &panels[2],
        "Genre Distribution by Season",
        &genres_by_season(rows),
        "Season",
        "Number of Movies",
    )?;
    column_panel(
        &panels[3],
        "Average Box Office by Season",
        &labels,
        &box_office,
        &[ORANGE],
        "Average Box Office ($)",
        &money_label,
    )?;

    root.present()?;
    Ok(())
}

fn genres_by_season(rows: &[SeasonalPatternRow]) -> Stacked {
    pivot(
        rows.iter()
            .map(|r| (r.season.to_string(), r.genre.clone(), r.movie_count as f64)),
    )
}
