use std::collections::BTreeMap;

use serde::Serialize;

use crate::analytics::rows::{GenreTrendRow, Season, SeasonalPatternRow};
use crate::analytics::AnalysisBundle;

/// Top-line figures shown in the report's stat cards and insight boxes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_movies: usize,
    /// Mean of the per-movie average ratings. `None` when nothing was rated.
    pub avg_rating: Option<f64>,
    /// Genre with the highest summed movie count across all years.
    pub top_genre: Option<String>,
    pub best_director: Option<String>,
    pub most_profitable_movie: Option<String>,
    pub directors_analyzed: usize,
}

impl ReportSummary {
    pub fn from_bundle(bundle: &AnalysisBundle) -> Self {
        let movies = &bundle.rating_distribution;

        let avg_rating = if movies.is_empty() {
            None
        } else {
            Some(movies.iter().map(|m| m.avg_rating).sum::<f64>() / movies.len() as f64)
        };

        // First maximum wins on ties, in alphabetical genre order.
        let top_genre = genre_summary(bundle)
            .into_iter()
            .fold(None::<GenreSummary>, |best, g| match best {
                Some(b) if b.movie_count >= g.movie_count => Some(b),
                _ => Some(g),
            })
            .map(|g| g.genre);

        let best_director = first_max_by(&bundle.director_metrics, |d| d.avg_director_rating)
            .map(|d| d.director_name.clone());

        let most_profitable_movie =
            first_max_by(movies, |m| m.profit as f64).map(|m| m.title.clone());

        Self {
            total_movies: movies.len(),
            avg_rating,
            top_genre,
            best_director,
            most_profitable_movie,
            directors_analyzed: bundle.director_metrics.len(),
        }
    }
}

/// Per-genre rollup of the genre trend rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreSummary {
    pub genre: String,
    pub movie_count: i64,
    /// Unweighted mean of the yearly group ratings.
    pub avg_rating: f64,
    pub total_box_office: i64,
}

/// Per-season rollup of the seasonal pattern rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: Season,
    pub movie_count: i64,
    pub avg_rating: f64,
    /// Unweighted mean of the per-genre box office averages.
    pub avg_box_office: f64,
}

/// Group genre trend rows by genre, sorted by genre name.
pub fn genre_summary(bundle: &AnalysisBundle) -> Vec<GenreSummary> {
    genre_rollup(&bundle.genre_trends)
}

pub fn genre_rollup(rows: &[GenreTrendRow]) -> Vec<GenreSummary> {
    let mut groups: BTreeMap<&str, (i64, Vec<f64>, i64)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(row.genre.as_str()).or_default();
        entry.0 += row.movie_count;
        entry.1.push(row.avg_genre_rating);
        entry.2 += row.total_box_office;
    }
    groups
        .into_iter()
        .map(|(genre, (count, ratings, box_office))| GenreSummary {
            genre: genre.to_string(),
            movie_count: count,
            avg_rating: mean(&ratings),
            total_box_office: box_office,
        })
        .collect()
}

/// Group seasonal rows by season, sorted by season name.
pub fn season_summary(bundle: &AnalysisBundle) -> Vec<SeasonSummary> {
    season_rollup(&bundle.seasonal_patterns)
}

pub fn season_rollup(rows: &[SeasonalPatternRow]) -> Vec<SeasonSummary> {
    let mut groups: BTreeMap<&str, (Season, i64, Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        let entry = groups
            .entry(row.season.as_str())
            .or_insert_with(|| (row.season, 0, Vec::new(), Vec::new()));
        entry.1 += row.movie_count;
        entry.2.push(row.avg_rating);
        entry.3.push(row.avg_box_office);
    }
    groups
        .into_values()
        .map(|(season, count, ratings, box_office)| SeasonSummary {
            season,
            movie_count: count,
            avg_rating: mean(&ratings),
            avg_box_office: mean(&box_office),
        })
        .collect()
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// First element with the largest key; later ties do not displace it.
fn first_max_by<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<&T> {
    items.iter().fold(None, |best: Option<&T>, item| match best {
        Some(b) if key(b) >= key(item) => Some(b),
        _ => Some(item),
    })
}
