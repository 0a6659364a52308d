//! # Store Schema
//!
//! The five-table relational layout shared by the generator and the
//! analytics queries, plus the SQLite connection helpers that open it.

pub mod sqlite;
pub mod types;

pub const DIRECTORS: &str = "directors";
pub const ACTORS: &str = "actors";
pub const MOVIES: &str = "movies";
pub const MOVIE_ACTORS: &str = "movie_actors";
pub const MOVIE_RATINGS: &str = "movie_ratings";

/// Default store location when no URL is configured.
pub const DEFAULT_DB_URL: &str = "sqlite://movies.db";
