//! Result-set row types for the six analytics queries, plus the pure
//! bucketing rules (season, rating category, budget category) they use.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CinestatError;

/// Tabular view of a result row, shared by the terminal, CSV and HTML
/// renderers.
pub trait ResultTable {
    /// Stable snake_case name of the analysis.
    const NAME: &'static str;

    fn headers() -> &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// Bucketing rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Map a calendar month (1-12) to its season. December joins January and
    /// February in Winter; anything outside Dec-Aug falls through to Fall.
    pub fn from_month(month: u32) -> Season {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = CinestatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Season::ALL
            .iter()
            .copied()
            .find(|season| season.as_str() == s)
            .ok_or_else(|| CinestatError::Other(format!("Unknown season '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RatingCategory {
    Excellent,
    Good,
    Average,
    Poor,
}

impl RatingCategory {
    pub const ALL: [RatingCategory; 4] = [
        RatingCategory::Excellent,
        RatingCategory::Good,
        RatingCategory::Average,
        RatingCategory::Poor,
    ];

    /// Each band includes its lower bound: 8.0 is Excellent, 7.0 Good,
    /// 6.0 Average, anything below 6.0 Poor.
    pub fn from_avg(avg_rating: f64) -> RatingCategory {
        if avg_rating >= 8.0 {
            RatingCategory::Excellent
        } else if avg_rating >= 7.0 {
            RatingCategory::Good
        } else if avg_rating >= 6.0 {
            RatingCategory::Average
        } else {
            RatingCategory::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingCategory::Excellent => "Excellent",
            RatingCategory::Good => "Good",
            RatingCategory::Average => "Average",
            RatingCategory::Poor => "Poor",
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BudgetCategory {
    #[serde(rename = "Low Budget")]
    Low,
    #[serde(rename = "Medium Budget")]
    Medium,
    #[serde(rename = "High Budget")]
    High,
}

impl BudgetCategory {
    pub const ALL: [BudgetCategory; 3] =
        [BudgetCategory::Low, BudgetCategory::Medium, BudgetCategory::High];

    /// Low below 20M, Medium below 100M, High otherwise.
    pub fn from_budget(budget: i64) -> BudgetCategory {
        if budget < 20_000_000 {
            BudgetCategory::Low
        } else if budget < 100_000_000 {
            BudgetCategory::Medium
        } else {
            BudgetCategory::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetCategory::Low => "Low Budget",
            BudgetCategory::Medium => "Medium Budget",
            BudgetCategory::High => "High Budget",
        }
    }
}

impl fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One (genre, release year) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreTrendRow {
    pub genre: String,
    pub release_year: i32,
    pub movie_count: i64,
    /// Mean of the per-movie average ratings in this group.
    pub avg_genre_rating: f64,
    pub total_box_office: i64,
}

impl ResultTable for GenreTrendRow {
    const NAME: &'static str = "genre_trends";

    fn headers() -> &'static [&'static str] {
        &["genre", "release_year", "movie_count", "avg_genre_rating", "total_box_office"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.genre.clone(),
            self.release_year.to_string(),
            self.movie_count.to_string(),
            format!("{:.2}", self.avg_genre_rating),
            self.total_box_office.to_string(),
        ]
    }
}

/// Aggregates for a director with at least two rated movies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorMetricsRow {
    pub director_name: String,
    pub total_movies: i64,
    pub avg_director_rating: f64,
    pub avg_box_office: f64,
    pub total_box_office: i64,
    pub avg_profit: f64,
    pub first_movie: NaiveDate,
    pub latest_movie: NaiveDate,
}

impl ResultTable for DirectorMetricsRow {
    const NAME: &'static str = "director_metrics";

    fn headers() -> &'static [&'static str] {
        &[
            "director_name",
            "total_movies",
            "avg_director_rating",
            "avg_box_office",
            "total_box_office",
            "avg_profit",
            "first_movie",
            "latest_movie",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.director_name.clone(),
            self.total_movies.to_string(),
            format!("{:.2}", self.avg_director_rating),
            format!("{:.0}", self.avg_box_office),
            self.total_box_office.to_string(),
            format!("{:.0}", self.avg_profit),
            self.first_movie.to_string(),
            self.latest_movie.to_string(),
        ]
    }
}

/// Rating statistics for a single movie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingDistributionRow {
    pub title: String,
    pub genre: String,
    pub release_year: i32,
    pub director: String,
    pub avg_rating: f64,
    pub total_ratings: i64,
    pub min_rating: f64,
    pub max_rating: f64,
    pub profit: i64,
    pub rating_category: RatingCategory,
}

impl ResultTable for RatingDistributionRow {
    const NAME: &'static str = "rating_distribution";

    fn headers() -> &'static [&'static str] {
        &[
            "title",
            "genre",
            "release_year",
            "director",
            "avg_rating",
            "total_ratings",
            "min_rating",
            "max_rating",
            "profit",
            "rating_category",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.genre.clone(),
            self.release_year.to_string(),
            self.director.clone(),
            format!("{:.2}", self.avg_rating),
            self.total_ratings.to_string(),
            format!("{:.1}", self.min_rating),
            format!("{:.1}", self.max_rating),
            self.profit.to_string(),
            self.rating_category.to_string(),
        ]
    }
}

/// A pair of actors who appeared together in at least two movies.
///
/// `actor1_id` is always strictly less than `actor2_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaborationRow {
    pub actor1_id: i64,
    pub actor2_id: i64,
    pub actor1: String,
    pub actor2: String,
    pub collaborations: i64,
    pub avg_collab_rating: f64,
    /// Shared titles joined with ", ".
    pub movies_together: String,
}

impl ResultTable for CollaborationRow {
    const NAME: &'static str = "collaboration_network";

    fn headers() -> &'static [&'static str] {
        &["actor1", "actor2", "collaborations", "avg_collab_rating", "movies_together"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.actor1.clone(),
            self.actor2.clone(),
            self.collaborations.to_string(),
            format!("{:.2}", self.avg_collab_rating),
            self.movies_together.clone(),
        ]
    }
}

/// One (season, genre) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalPatternRow {
    pub season: Season,
    pub genre: String,
    pub movie_count: i64,
    pub avg_rating: f64,
    pub avg_box_office: f64,
    pub avg_profit: f64,
}

impl ResultTable for SeasonalPatternRow {
    const NAME: &'static str = "seasonal_patterns";

    fn headers() -> &'static [&'static str] {
        &["season", "genre", "movie_count", "avg_rating", "avg_box_office", "avg_profit"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.season.to_string(),
            self.genre.clone(),
            self.movie_count.to_string(),
            format!("{:.2}", self.avg_rating),
            format!("{:.0}", self.avg_box_office),
            format!("{:.0}", self.avg_profit),
        ]
    }
}

/// Budget, returns and rating for a single movie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetCorrelationRow {
    pub title: String,
    pub budget: i64,
    pub box_office: i64,
    pub profit: i64,
    pub avg_rating: f64,
    pub rating_count: i64,
    pub budget_category: BudgetCategory,
}

impl BudgetCorrelationRow {
    /// Box office as a percentage of budget. `None` for a zero budget.
    pub fn roi(&self) -> Option<f64> {
        if self.budget == 0 {
            None
        } else {
            Some(self.box_office as f64 / self.budget as f64 * 100.0)
        }
    }
}

impl ResultTable for BudgetCorrelationRow {
    const NAME: &'static str = "budget_correlation";

    fn headers() -> &'static [&'static str] {
        &[
            "title",
            "budget",
            "box_office",
            "profit",
            "avg_rating",
            "rating_count",
            "budget_category",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.budget.to_string(),
            self.box_office.to_string(),
            self.profit.to_string(),
            format!("{:.2}", self.avg_rating),
            self.rating_count.to_string(),
            self.budget_category.to_string(),
        ]
    }
}
