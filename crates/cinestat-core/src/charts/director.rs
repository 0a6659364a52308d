use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{
    bar_panel, chart_error, column_panel, empty_panel, money_label, padded_range, plain_label,
    DrawResult, ACCENT, CAPTION_SIZE, DIRECTOR_FILE, FONT, GRID_SIZE, LIGHT_GREEN,
};
use crate::analytics::rows::DirectorMetricsRow;
use crate::error::Result;

/// How many directors the ranking panels show.
const TOP_N: usize = 8;

/// Rating against box office, top directors by rating and by profit, and
/// output against quality.
pub fn director_chart(rows: &[DirectorMetricsRow], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, GRID_SIZE).into_drawing_area();
    draw(&root, rows).map_err(|e| chart_error(DIRECTOR_FILE, e))
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    rows: &[DirectorMetricsRow],
) -> DrawResult<(), DB> {
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    rating_vs_box_office(&panels[0], rows)?;

    let top = top_by_rating(rows, TOP_N);
    let names: Vec<String> = top.iter().map(|d| d.director_name.clone()).collect();
    let ratings: Vec<f64> = top.iter().map(|d| d.avg_director_rating).collect();
    let profits: Vec<f64> = top.iter().map(|d| d.avg_profit).collect();

    bar_panel(
        &panels[1],
        "Top Directors by Average Rating",
        &names,
        &ratings,
        ACCENT,
        "Average Rating",
    )?;
    column_panel(
        &panels[2],
        "Average Profit by Top Directors",
        &names,
        &profits,
        &[LIGHT_GREEN],
        "Average Profit ($)",
        &money_label,
    )?;
    productivity_vs_quality(&panels[3], rows)?;

    root.present()?;
    Ok(())
}

/// Highest average rating first; ties keep query order.
fn top_by_rating(rows: &[DirectorMetricsRow], n: usize) -> Vec<&DirectorMetricsRow> {
    let mut sorted: Vec<&DirectorMetricsRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.avg_director_rating.total_cmp(&a.avg_director_rating));
    sorted.truncate(n);
    sorted
}

/// Marker radius grows with the number of films.
fn marker_radius(total_movies: i64) -> i32 {
    4 + 2 * total_movies.clamp(0, 10) as i32
}

fn rating_vs_box_office<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[DirectorMetricsRow],
) -> DrawResult<(), DB> {
    let title = "Director Rating vs Box Office Performance";
    if rows.is_empty() {
        return empty_panel(area, title);
    }
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(
            padded_range(rows.iter().map(|d| d.avg_director_rating)),
            padded_range(rows.iter().map(|d| d.avg_box_office)),
        )?;
    chart
        .configure_mesh()
        .x_desc("Average Rating")
        .y_desc("Average Box Office ($)")
        .y_label_formatter(&money_label)
        .draw()?;

    chart.draw_series(rows.iter().map(|d| {
        EmptyElement::at((d.avg_director_rating, d.avg_box_office))
            + Circle::new((0, 0), marker_radius(d.total_movies), ACCENT.mix(0.6).filled())
            + Text::new(d.director_name.clone(), (6, -14), (FONT, 12).into_font())
    }))?;
    Ok(())
}

fn productivity_vs_quality<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[DirectorMetricsRow],
) -> DrawResult<(), DB> {
    let title = "Productivity vs Quality";
    if rows.is_empty() {
        return empty_panel(area, title);
    }
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            padded_range(rows.iter().map(|d| d.total_movies as f64)),
            padded_range(rows.iter().map(|d| d.avg_director_rating)),
        )?;
    chart
        .configure_mesh()
        .x_desc("Total Movies Directed")
        .y_desc("Average Rating")
        .x_label_formatter(&plain_label)
        .draw()?;

    chart.draw_series(rows.iter().map(|d| {
        Circle::new(
            (d.total_movies as f64, d.avg_director_rating),
            6,
            ACCENT.mix(0.7).filled(),
        )
    }))?;
    Ok(())
}
