//! # Direct Store Insertion
//!
//! Writes a generated [`Dataset`] into the SQLite store. The schema is
//! recreated first (destroying any previous data), then every table is
//! filled with batched multi-row `INSERT` statements inside a single
//! transaction. If any batch fails the transaction is rolled back on drop,
//! so a failed run never leaves a half-populated store behind.
//!
//! Tables are written parent-first: directors, actors, movies, cast, and
//! ratings last.

use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::{QueryBuilder, Transaction};
use tracing::info;

use crate::error::{CinestatError, Result};
use crate::schema::types::Dataset;
use crate::schema::{self, sqlite};

/// Batch size for multi-row INSERT statements.
const INSERT_BATCH_SIZE: usize = 100;

/// Progress callback receiving (rows_inserted_so_far, total_rows).
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// Recreate the store at `db_url` and insert the whole dataset.
///
/// The database file is created if it does not exist yet.
pub async fn insert_dataset(
    dataset: &Dataset,
    db_url: &str,
    progress_callback: Option<ProgressFn<'_>>,
) -> Result<()> {
    let pool = sqlite::connect(db_url, true).await?;
    let result = insert_into_pool(&pool, dataset, progress_callback).await;
    pool.close().await;
    result
}

/// Same as [`insert_dataset`] but against an already opened pool.
pub async fn insert_into_pool(
    pool: &SqlitePool,
    dataset: &Dataset,
    progress_callback: Option<ProgressFn<'_>>,
) -> Result<()> {
    sqlite::create_schema(pool).await?;

    let total_rows = dataset.total_rows();
    let mut progress = Progress {
        inserted: 0,
        total: total_rows,
        callback: progress_callback,
    };

    let mut tx = pool.begin().await.map_err(|e| CinestatError::InsertFailed {
        table: "(session)".to_string(),
        row_index: 0,
        message: "Failed to begin transaction".to_string(),
        sql_preview: "BEGIN".to_string(),
        source: e,
    })?;

    insert_batches(
        &mut tx,
        schema::DIRECTORS,
        "INSERT INTO directors (director_id, name, birth_year) ",
        &dataset.directors,
        &mut progress,
        |mut b, d| {
            b.push_bind(d.director_id)
                .push_bind(d.name.clone())
                .push_bind(d.birth_year);
        },
    )
    .await?;

    insert_batches(
        &mut tx,
        schema::ACTORS,
        "INSERT INTO actors (actor_id, name, birth_year) ",
        &dataset.actors,
        &mut progress,
        |mut b, a| {
            b.push_bind(a.actor_id)
                .push_bind(a.name.clone())
                .push_bind(a.birth_year);
        },
    )
    .await?;

    insert_batches(
        &mut tx,
        schema::MOVIES,
        "INSERT INTO movies (movie_id, title, genre, release_date, director_id, budget, box_office) ",
        &dataset.movies,
        &mut progress,
        |mut b, m| {
            b.push_bind(m.movie_id)
                .push_bind(m.title.clone())
                .push_bind(m.genre.as_str())
                .push_bind(m.release_date)
                .push_bind(m.director_id)
                .push_bind(m.budget)
                .push_bind(m.box_office);
        },
    )
    .await?;

    insert_batches(
        &mut tx,
        schema::MOVIE_ACTORS,
        "INSERT INTO movie_actors (movie_id, actor_id, role_type) ",
        &dataset.cast,
        &mut progress,
        |mut b, c| {
            b.push_bind(c.movie_id)
                .push_bind(c.actor_id)
                .push_bind(c.role_type.as_str());
        },
    )
    .await?;

    insert_batches(
        &mut tx,
        schema::MOVIE_RATINGS,
        "INSERT INTO movie_ratings (rating_id, movie_id, user_id, rating, review_date) ",
        &dataset.ratings,
        &mut progress,
        |mut b, r| {
            b.push_bind(r.rating_id)
                .push_bind(r.movie_id)
                .push_bind(r.user_id)
                .push_bind(r.rating)
                .push_bind(r.review_date);
        },
    )
    .await?;

    tx.commit().await.map_err(|e| CinestatError::InsertFailed {
        table: "(session)".to_string(),
        row_index: progress.inserted,
        message: "Failed to commit transaction".to_string(),
        sql_preview: "COMMIT".to_string(),
        source: e,
    })?;

    info!("Inserted {} rows into the store", total_rows);
    Ok(())
}

struct Progress<'a> {
    inserted: usize,
    total: usize,
    callback: Option<ProgressFn<'a>>,
}

impl Progress<'_> {
    fn advance(&mut self, rows: usize) {
        self.inserted += rows;
        if let Some(cb) = self.callback {
            cb(self.inserted, self.total);
        }
    }
}

async fn insert_batches<T, F>(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    prefix: &str,
    rows: &[T],
    progress: &mut Progress<'_>,
    mut bind_row: F,
) -> Result<()>
where
    F: FnMut(sqlx::query_builder::Separated<'_, '_, Sqlite, &'static str>, &T),
{
    for (batch_idx, chunk) in rows.chunks(INSERT_BATCH_SIZE).enumerate() {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(prefix);
        builder.push_values(chunk, |b, row| bind_row(b, row));

        let sql_preview = truncate_sql(builder.sql(), 200);
        builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(|e| CinestatError::InsertFailed {
                table: table.to_string(),
                row_index: batch_idx * INSERT_BATCH_SIZE,
                message: "Batched INSERT failed".to_string(),
                sql_preview,
                source: e,
            })?;

        progress.advance(chunk.len());
    }
    Ok(())
}

fn truncate_sql(sql: &str, max_len: usize) -> String {
    match sql.char_indices().nth(max_len) {
        Some((idx, _)) => format!("{}...", &sql[..idx]),
        None => sql.to_string(),
    }
}
