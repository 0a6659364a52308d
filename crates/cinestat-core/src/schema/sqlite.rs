use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::error::{CinestatError, Result};

/// Drop order is child-first so foreign key enforcement never trips.
const DROP_STATEMENTS: &[&str] = &[
    "DROP TABLE IF EXISTS movie_ratings",
    "DROP TABLE IF EXISTS movie_actors",
    "DROP TABLE IF EXISTS movies",
    "DROP TABLE IF EXISTS directors",
    "DROP TABLE IF EXISTS actors",
];

const CREATE_STATEMENTS: &[&str] = &[
    "CREATE TABLE directors (
        director_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        birth_year INTEGER
    )",
    "CREATE TABLE movies (
        movie_id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        genre TEXT NOT NULL,
        release_date DATE,
        director_id INTEGER,
        budget INTEGER,
        box_office INTEGER,
        FOREIGN KEY (director_id) REFERENCES directors (director_id)
    )",
    "CREATE TABLE actors (
        actor_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        birth_year INTEGER
    )",
    "CREATE TABLE movie_actors (
        movie_id INTEGER,
        actor_id INTEGER,
        role_type TEXT,
        PRIMARY KEY (movie_id, actor_id),
        FOREIGN KEY (movie_id) REFERENCES movies (movie_id),
        FOREIGN KEY (actor_id) REFERENCES actors (actor_id)
    )",
    "CREATE TABLE movie_ratings (
        rating_id INTEGER PRIMARY KEY,
        movie_id INTEGER,
        user_id INTEGER,
        rating REAL CHECK (rating >= 1 AND rating <= 10),
        review_date DATE,
        FOREIGN KEY (movie_id) REFERENCES movies (movie_id)
    )",
];

/// Normalize a store location into a `sqlite://` URL.
///
/// Accepts full URLs (`sqlite://movies.db`, `sqlite:movies.db`,
/// `sqlite::memory:`) and bare file paths. Any other scheme is rejected.
pub fn store_url(location: &str) -> Result<String> {
    let location = location.trim();
    if location.starts_with("sqlite:") {
        return Ok(location.to_string());
    }
    if let Some((scheme, _)) = location.split_once("://") {
        return Err(CinestatError::UnsupportedStore {
            url: format!("{}://", scheme),
        });
    }
    Ok(format!("sqlite://{}", location))
}

/// Open a single-connection pool on the store.
///
/// `create` controls whether a missing database file is created. Queries
/// open with `create = false` so a typo in the path fails loudly instead of
/// running against an empty file.
pub async fn connect(url: &str, create: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| CinestatError::Connection {
            message: "Invalid SQLite URL".to_string(),
            connection_hint: url.to_string(),
            source: e,
        })?
        .create_if_missing(create)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| CinestatError::Connection {
            message: "Failed to open SQLite store".to_string(),
            connection_hint: url.to_string(),
            source: e,
        })
}

/// Drop and recreate all five tables. Destroys any existing data.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for statement in DROP_STATEMENTS.iter().chain(CREATE_STATEMENTS) {
        debug!("{}", first_line(statement));
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| CinestatError::Schema {
                statement: first_line(statement).to_string(),
                source: e,
            })?;
    }
    info!("Recreated {} store tables", CREATE_STATEMENTS.len());
    Ok(())
}

fn first_line(statement: &str) -> &str {
    statement.lines().next().unwrap_or(statement).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[test]
    fn test_store_url_accepts_sqlite_urls() {
        assert_eq!(store_url("sqlite://movies.db").unwrap(), "sqlite://movies.db");
        assert_eq!(store_url("sqlite::memory:").unwrap(), "sqlite::memory:");
    }

    #[test]
    fn test_store_url_wraps_bare_paths() {
        assert_eq!(store_url("data/movies.db").unwrap(), "sqlite://data/movies.db");
    }

    #[test]
    fn test_store_url_rejects_other_schemes() {
        let err = store_url("postgres://localhost/movies").unwrap_err();
        assert!(format!("{}", err).contains("postgres://"));
    }

    #[tokio::test]
    async fn test_create_schema_is_repeatable() {
        let pool = connect("sqlite::memory:", true).await.unwrap();
        create_schema(&pool).await.unwrap();

        sqlx::query("INSERT INTO directors (name, birth_year) VALUES ('A', 1970)")
            .execute(&pool)
            .await
            .unwrap();

        // Second run drops the data along with the tables.
        create_schema(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap()
        .iter()
        .map(|r| r.get("name"))
        .collect();
        assert_eq!(
            tables,
            vec!["actors", "directors", "movie_actors", "movie_ratings", "movies"]
        );

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM directors")
            .fetch_one(&pool)
            .await
            .unwrap()
            .get("n");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_rating_check_constraint_rejects_out_of_range() {
        let pool = connect("sqlite::memory:", true).await.unwrap();
        create_schema(&pool).await.unwrap();
        let result = sqlx::query("INSERT INTO movie_ratings (movie_id, user_id, rating) VALUES (NULL, 1, 10.5)")
            .execute(&pool)
            .await;
        assert!(result.is_err());
    }
}
