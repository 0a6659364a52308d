use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{bar_panel, chart_error, pivot, stacked_panel, DrawResult, Stacked, GENRE_FILE, SKY, WIDE_SIZE};
use crate::analytics::rows::GenreTrendRow;
use crate::error::Result;
use crate::report::summary::genre_rollup;

/// Movie count per genre by year, and mean rating per genre.
pub fn genre_chart(rows: &[GenreTrendRow], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, WIDE_SIZE).into_drawing_area();
    draw(&root, rows).map_err(|e| chart_error(GENRE_FILE, e))
}

fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, rows: &[GenreTrendRow]) -> DrawResult<(), DB> {
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    stacked_panel(
        &panels[0],
        "Movie Count by Genre Over Time",
        &counts_by_year(rows),
        "Release Year",
        "Number of Movies",
    )?;

    let (labels, values): (Vec<String>, Vec<f64>) = ratings_ascending(rows).into_iter().unzip();
    bar_panel(&panels[1], "Average Rating by Genre", &labels, &values, SKY, "Average Rating")?;

    root.present()?;
    Ok(())
}

fn counts_by_year(rows: &[GenreTrendRow]) -> Stacked {
    pivot(
        rows.iter()
            .map(|r| (r.release_year.to_string(), r.genre.clone(), r.movie_count as f64)),
    )
}

/// Mean of the yearly ratings per genre, lowest first.
fn ratings_ascending(rows: &[GenreTrendRow]) -> Vec<(String, f64)> {
    let mut ratings: Vec<(String, f64)> = genre_rollup(rows)
        .into_iter()
        .map(|g| (g.genre, g.avg_rating))
        .collect();
    ratings.sort_by(|a, b| a.1.total_cmp(&b.1));
    ratings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(genre: &str, year: i32, count: i64, rating: f64) -> GenreTrendRow {
        GenreTrendRow {
            genre: genre.to_string(),
            release_year: year,
            movie_count: count,
            avg_genre_rating: rating,
            total_box_office: 0,
        }
    }

    #[test]
    fn test_counts_by_year() {
        let table = counts_by_year(&[row("Drama", 2018, 2, 7.0), row("Horror", 2016, 1, 6.0)]);
        assert_eq!(table.groups, vec!["2016", "2018"]);
        assert_eq!(table.series[0], ("Drama".to_string(), vec![0.0, 2.0]));
        assert_eq!(table.series[1], ("Horror".to_string(), vec![1.0, 0.0]));
    }

    #[test]
    fn test_ratings_ascending() {
        let ratings = ratings_ascending(&[
            row("Drama", 2018, 2, 8.0),
            row("Drama", 2019, 1, 7.0),
            row("Horror", 2016, 1, 6.0),
            row("Comedy", 2016, 1, 9.0),
        ]);
        let names: Vec<&str> = ratings.iter().map(|r| r.0.as_str()).collect();
        assert_eq!(names, vec!["Horror", "Drama", "Comedy"]);
        assert!((ratings[1].1 - 7.5).abs() < 1e-9);
    }
}
