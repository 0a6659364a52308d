//! # Error Types
//!
//! Defines `CinestatError`, the unified error enum for every failure mode in
//! the cinestat pipeline. Each variant names the table, query, chart or path
//! involved so a failed run can be diagnosed from the message alone.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can occur in cinestat operations.
#[derive(Error, Debug)]
pub enum CinestatError {
    #[error("Database connection failed: {message}\n  Connection string: {connection_hint}\n  Cause: {source}")]
    Connection {
        message: String,
        connection_hint: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Schema setup failed on statement '{statement}': {source}")]
    Schema {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Insert failed on {table} row {row_index}: {message}\n  SQL: {sql_preview}\n  DB error: {source}")]
    InsertFailed {
        table: String,
        row_index: usize,
        message: String,
        sql_preview: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Analytics query '{query}' failed: {source}")]
    Query {
        query: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Unsupported store URL '{url}'. cinestat only supports sqlite:// URLs")]
    UnsupportedStore { url: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Output error: {message} ({}): {source}", .path.display())]
    Output {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Export failed while {message}: {source}")]
    Export {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render chart '{chart}': {message}")]
    Chart { chart: String, message: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CinestatError>;
