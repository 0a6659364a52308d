//! # Analytics Queries
//!
//! Six independent join-and-aggregate queries over the movie store. Each
//! query opens its own connection, runs one SQL statement and closes the
//! connection again before returning, so a `MovieAnalytics` value holds no
//! live resources between calls.
//!
//! Per-movie averages are computed in a `movie_ratings` subquery and joined
//! back with an inner join. A movie without any rating therefore never
//! appears in any result set.

pub mod rows;

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use crate::error::{CinestatError, Result};
use crate::schema::{sqlite, DEFAULT_DB_URL};

use self::rows::*;

const GENRE_TRENDS_SQL: &str = "
SELECT
    m.genre AS genre,
    CAST(strftime('%Y', m.release_date) AS INTEGER) AS release_year,
    COUNT(*) AS movie_count,
    AVG(mr.avg_rating) AS avg_genre_rating,
    SUM(m.box_office) AS total_box_office
FROM movies m
JOIN (
    SELECT movie_id, AVG(rating) AS avg_rating
    FROM movie_ratings
    GROUP BY movie_id
) mr ON m.movie_id = mr.movie_id
GROUP BY m.genre, release_year
ORDER BY release_year, movie_count DESC";

const DIRECTOR_METRICS_SQL: &str = "
SELECT
    d.name AS director_name,
    COUNT(m.movie_id) AS total_movies,
    AVG(mr.avg_rating) AS avg_director_rating,
    CAST(AVG(m.box_office) AS REAL) AS avg_box_office,
    SUM(m.box_office) AS total_box_office,
    CAST(AVG(m.box_office - m.budget) AS REAL) AS avg_profit,
    MIN(m.release_date) AS first_movie,
    MAX(m.release_date) AS latest_movie
FROM directors d
JOIN movies m ON d.director_id = m.director_id
JOIN (
    SELECT movie_id, AVG(rating) AS avg_rating
    FROM movie_ratings
    GROUP BY movie_id
) mr ON m.movie_id = mr.movie_id
GROUP BY d.director_id, d.name
HAVING COUNT(m.movie_id) >= 2
ORDER BY avg_director_rating DESC";

const RATING_DISTRIBUTION_SQL: &str = "
SELECT
    m.title AS title,
    m.genre AS genre,
    CAST(strftime('%Y', m.release_date) AS INTEGER) AS release_year,
    d.name AS director,
    CAST(AVG(mr.rating) AS REAL) AS avg_rating,
    COUNT(mr.rating) AS total_ratings,
    CAST(MIN(mr.rating) AS REAL) AS min_rating,
    CAST(MAX(mr.rating) AS REAL) AS max_rating,
    (m.box_office - m.budget) AS profit
FROM movies m
JOIN directors d ON m.director_id = d.director_id
JOIN movie_ratings mr ON m.movie_id = mr.movie_id
GROUP BY m.movie_id, m.title, m.genre, release_year, d.name, profit
ORDER BY avg_rating DESC";

const COLLABORATION_NETWORK_SQL: &str = "
SELECT
    a1.actor_id AS actor1_id,
    a2.actor_id AS actor2_id,
    a1.name AS actor1,
    a2.name AS actor2,
    COUNT(*) AS collaborations,
    AVG(mr.avg_rating) AS avg_collab_rating,
    GROUP_CONCAT(m.title, ', ') AS movies_together
FROM movie_actors ma1
JOIN movie_actors ma2 ON ma1.movie_id = ma2.movie_id AND ma1.actor_id < ma2.actor_id
JOIN actors a1 ON ma1.actor_id = a1.actor_id
JOIN actors a2 ON ma2.actor_id = a2.actor_id
JOIN movies m ON ma1.movie_id = m.movie_id
JOIN (
    SELECT movie_id, AVG(rating) AS avg_rating
    FROM movie_ratings
    GROUP BY movie_id
) mr ON m.movie_id = mr.movie_id
GROUP BY a1.actor_id, a2.actor_id, a1.name, a2.name
HAVING COUNT(*) >= 2
ORDER BY collaborations DESC, avg_collab_rating DESC";

const SEASONAL_PATTERNS_SQL: &str = "
SELECT
    CASE
        WHEN CAST(strftime('%m', m.release_date) AS INTEGER) IN (12, 1, 2) THEN 'Winter'
        WHEN CAST(strftime('%m', m.release_date) AS INTEGER) IN (3, 4, 5) THEN 'Spring'
        WHEN CAST(strftime('%m', m.release_date) AS INTEGER) IN (6, 7, 8) THEN 'Summer'
        ELSE 'Fall'
    END AS season,
    m.genre AS genre,
    COUNT(*) AS movie_count,
    AVG(mr.avg_rating) AS avg_rating,
    CAST(AVG(m.box_office) AS REAL) AS avg_box_office,
    CAST(AVG(m.box_office - m.budget) AS REAL) AS avg_profit
FROM movies m
JOIN (
    SELECT movie_id, AVG(rating) AS avg_rating
    FROM movie_ratings
    GROUP BY movie_id
) mr ON m.movie_id = mr.movie_id
GROUP BY season, m.genre
ORDER BY season, avg_rating DESC";

const BUDGET_CORRELATION_SQL: &str = "
SELECT
    m.title AS title,
    m.budget AS budget,
    m.box_office AS box_office,
    (m.box_office - m.budget) AS profit,
    CAST(AVG(mr.rating) AS REAL) AS avg_rating,
    COUNT(mr.rating) AS rating_count
FROM movies m
JOIN movie_ratings mr ON m.movie_id = mr.movie_id
GROUP BY m.movie_id, m.title, m.budget, m.box_office
ORDER BY m.budget DESC";

/// Read-only analytics over a movie store.
#[derive(Debug, Clone)]
pub struct MovieAnalytics {
    db_url: String,
}

impl Default for MovieAnalytics {
    fn default() -> Self {
        Self::new(DEFAULT_DB_URL)
    }
}

/// All six result sets, as consumed by the report and chart renderers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisBundle {
    pub genre_trends: Vec<GenreTrendRow>,
    pub director_metrics: Vec<DirectorMetricsRow>,
    pub rating_distribution: Vec<RatingDistributionRow>,
    pub collaborations: Vec<CollaborationRow>,
    pub seasonal_patterns: Vec<SeasonalPatternRow>,
    pub budget_correlation: Vec<BudgetCorrelationRow>,
}

impl MovieAnalytics {
    pub fn new(db_url: impl Into<String>) -> Self {
        Self {
            db_url: db_url.into(),
        }
    }

    pub fn db_url(&self) -> &str {
        &self.db_url
    }

    /// Movie count, mean rating and total box office per (genre, year),
    /// ordered by year then by count descending.
    pub async fn genre_trends(&self) -> Result<Vec<GenreTrendRow>> {
        let q = GenreTrendRow::NAME;
        self.fetch(q, GENRE_TRENDS_SQL)
            .await?
            .iter()
            .map(|row| {
                Ok(GenreTrendRow {
                    genre: col(row, q, "genre")?,
                    release_year: col(row, q, "release_year")?,
                    movie_count: col(row, q, "movie_count")?,
                    avg_genre_rating: col(row, q, "avg_genre_rating")?,
                    total_box_office: col(row, q, "total_box_office")?,
                })
            })
            .collect()
    }

    /// Per-director aggregates for directors with two or more rated movies,
    /// best rated first.
    pub async fn director_metrics(&self) -> Result<Vec<DirectorMetricsRow>> {
        let q = DirectorMetricsRow::NAME;
        self.fetch(q, DIRECTOR_METRICS_SQL)
            .await?
            .iter()
            .map(|row| {
                Ok(DirectorMetricsRow {
                    director_name: col(row, q, "director_name")?,
                    total_movies: col(row, q, "total_movies")?,
                    avg_director_rating: col(row, q, "avg_director_rating")?,
                    avg_box_office: col(row, q, "avg_box_office")?,
                    total_box_office: col(row, q, "total_box_office")?,
                    avg_profit: col(row, q, "avg_profit")?,
                    first_movie: col(row, q, "first_movie")?,
                    latest_movie: col(row, q, "latest_movie")?,
                })
            })
            .collect()
    }

    /// Rating spread and category for every rated movie, best rated first.
    pub async fn rating_distribution(&self) -> Result<Vec<RatingDistributionRow>> {
        let q = RatingDistributionRow::NAME;
        self.fetch(q, RATING_DISTRIBUTION_SQL)
            .await?
            .iter()
            .map(|row| {
                let avg_rating: f64 = col(row, q, "avg_rating")?;
                Ok(RatingDistributionRow {
                    title: col(row, q, "title")?,
                    genre: col(row, q, "genre")?,
                    release_year: col(row, q, "release_year")?,
                    director: col(row, q, "director")?,
                    avg_rating,
                    total_ratings: col(row, q, "total_ratings")?,
                    min_rating: col(row, q, "min_rating")?,
                    max_rating: col(row, q, "max_rating")?,
                    profit: col(row, q, "profit")?,
                    rating_category: RatingCategory::from_avg(avg_rating),
                })
            })
            .collect()
    }

    /// Actor pairs sharing at least two rated movies, most frequent first.
    pub async fn collaboration_network(&self) -> Result<Vec<CollaborationRow>> {
        let q = CollaborationRow::NAME;
        self.fetch(q, COLLABORATION_NETWORK_SQL)
            .await?
            .iter()
            .map(|row| {
                Ok(CollaborationRow {
                    actor1_id: col(row, q, "actor1_id")?,
                    actor2_id: col(row, q, "actor2_id")?,
                    actor1: col(row, q, "actor1")?,
                    actor2: col(row, q, "actor2")?,
                    collaborations: col(row, q, "collaborations")?,
                    avg_collab_rating: col(row, q, "avg_collab_rating")?,
                    movies_together: col(row, q, "movies_together")?,
                })
            })
            .collect()
    }

    /// Counts and means per (season, genre).
    pub async fn seasonal_patterns(&self) -> Result<Vec<SeasonalPatternRow>> {
        let q = SeasonalPatternRow::NAME;
        self.fetch(q, SEASONAL_PATTERNS_SQL)
            .await?
            .iter()
            .map(|row| {
                let season: String = col(row, q, "season")?;
                Ok(SeasonalPatternRow {
                    season: season.parse()?,
                    genre: col(row, q, "genre")?,
                    movie_count: col(row, q, "movie_count")?,
                    avg_rating: col(row, q, "avg_rating")?,
                    avg_box_office: col(row, q, "avg_box_office")?,
                    avg_profit: col(row, q, "avg_profit")?,
                })
            })
            .collect()
    }

    /// Budget, profit and rating per rated movie, biggest budget first.
    pub async fn budget_correlation(&self) -> Result<Vec<BudgetCorrelationRow>> {
        let q = BudgetCorrelationRow::NAME;
        self.fetch(q, BUDGET_CORRELATION_SQL)
            .await?
            .iter()
            .map(|row| {
                let budget: i64 = col(row, q, "budget")?;
                Ok(BudgetCorrelationRow {
                    title: col(row, q, "title")?,
                    budget,
                    box_office: col(row, q, "box_office")?,
                    profit: col(row, q, "profit")?,
                    avg_rating: col(row, q, "avg_rating")?,
                    rating_count: col(row, q, "rating_count")?,
                    budget_category: BudgetCategory::from_budget(budget),
                })
            })
            .collect()
    }

    /// Run all six queries in sequence.
    pub async fn run_all(&self) -> Result<AnalysisBundle> {
        Ok(AnalysisBundle {
            genre_trends: self.genre_trends().await?,
            director_metrics: self.director_metrics().await?,
            rating_distribution: self.rating_distribution().await?,
            collaborations: self.collaboration_network().await?,
            seasonal_patterns: self.seasonal_patterns().await?,
            budget_correlation: self.budget_correlation().await?,
        })
    }

    async fn fetch(&self, query: &str, sql: &str) -> Result<Vec<SqliteRow>> {
        let pool = sqlite::connect(&self.db_url, false).await?;
        let result = sqlx::query(sql)
            .fetch_all(&pool)
            .await
            .map_err(|e| CinestatError::Query {
                query: query.to_string(),
                source: e,
            });
        pool.close().await;

        if let Ok(rows) = &result {
            debug!(query, rows = rows.len(), "Analytics query finished");
        }
        result
    }
}

fn col<'r, T>(row: &'r SqliteRow, query: &str, column: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column).map_err(|e| CinestatError::Query {
        query: format!("{} (column {})", query, column),
        source: e,
    })
}
