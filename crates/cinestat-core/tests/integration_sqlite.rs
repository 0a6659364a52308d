//! End-to-end tests against a real SQLite store file.
//!
//! Each test writes a fixture dataset (or a generated one) into a store
//! inside a temp directory and runs the analytics queries against it.

use chrono::NaiveDate;
use sqlx::Row;

use cinestat_core::analytics::rows::{BudgetCategory, RatingCategory, Season};
use cinestat_core::analytics::MovieAnalytics;
use cinestat_core::generate::{generate_dataset, GenerateOptions};
use cinestat_core::output::direct::insert_dataset;
use cinestat_core::output::manifest::{manifest_path, read_manifest, write_manifest, Manifest};
use cinestat_core::report::{render_html, write_report};
use cinestat_core::schema::sqlite;
use cinestat_core::schema::types::Dataset;
use cinestat_testutil::{date, mixed_dataset, single_movie_dataset, temp_store};

fn fixed_time() -> chrono::NaiveDateTime {
    date(2025, 1, 1).and_hms_opt(12, 30, 0).unwrap()
}

async fn seeded(dataset: &Dataset) -> (tempfile::TempDir, MovieAnalytics) {
    let (dir, url) = temp_store();
    insert_dataset(dataset, &url, None)
        .await
        .expect("insert fixture dataset");
    (dir, MovieAnalytics::new(url))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn test_single_movie_scenario() {
    let (_dir, analytics) = seeded(&single_movie_dataset()).await;

    let movies = analytics.rating_distribution().await.unwrap();
    assert_eq!(movies.len(), 1);
    let m = &movies[0];
    assert_eq!(m.title, "The Silent Harbor");
    assert_eq!(m.release_year, 2020);
    assert_eq!(m.director, "Denis Villeneuve");
    assert!(close(m.avg_rating, 9.0));
    assert_eq!(m.total_ratings, 3);
    assert!(close(m.min_rating, 8.5));
    assert!(close(m.max_rating, 9.5));
    assert_eq!(m.profit, 40_000_000);
    assert_eq!(m.rating_category, RatingCategory::Excellent);

    let seasons = analytics.seasonal_patterns().await.unwrap();
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].season, Season::Summer);
    assert_eq!(seasons[0].genre, "Drama");
    assert_eq!(seasons[0].movie_count, 1);

    let budgets = analytics.budget_correlation().await.unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].budget_category, BudgetCategory::Low);
    assert_eq!(budgets[0].rating_count, 3);
    assert!(close(budgets[0].avg_rating, 9.0));
    assert_eq!(budgets[0].profit, 40_000_000);
    assert!(close(budgets[0].roi().unwrap(), 500.0));

    // One movie per director: no director qualifies.
    assert!(analytics.director_metrics().await.unwrap().is_empty());
    assert!(analytics.collaboration_network().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unrated_movie_never_appears() {
    let (_dir, analytics) = seeded(&mixed_dataset()).await;
    let bundle = analytics.run_all().await.unwrap();

    assert!(bundle
        .rating_distribution
        .iter()
        .all(|m| m.title != "The Unseen Cut"));
    assert!(bundle
        .budget_correlation
        .iter()
        .all(|m| m.title != "The Unseen Cut"));
    assert!(bundle.genre_trends.iter().all(|g| g.genre != "Horror"));
    assert!(bundle.seasonal_patterns.iter().all(|s| s.genre != "Horror"));
    assert!(bundle
        .collaborations
        .iter()
        .all(|c| !c.movies_together.contains("The Unseen Cut")));
    assert!(bundle
        .director_metrics
        .iter()
        .all(|d| d.director_name != "Jordan Peele"));
}

#[tokio::test]
async fn test_genre_trends_order_and_values() {
    let (_dir, analytics) = seeded(&mixed_dataset()).await;
    let rows = analytics.genre_trends().await.unwrap();

    let keys: Vec<(&str, i32)> = rows
        .iter()
        .map(|r| (r.genre.as_str(), r.release_year))
        .collect();
    assert_eq!(keys, vec![("Sci-Fi", 2016), ("Drama", 2017), ("Comedy", 2018)]);
    assert!(close(rows[0].avg_genre_rating, 8.5));
    assert_eq!(rows[0].total_box_office, 400_000_000);
    assert!(rows.iter().all(|r| r.movie_count == 1));
}

#[tokio::test]
async fn test_director_metrics_require_two_rated_movies() {
    let (_dir, analytics) = seeded(&mixed_dataset()).await;
    let rows = analytics.director_metrics().await.unwrap();

    assert_eq!(rows.len(), 1);
    let d = &rows[0];
    assert_eq!(d.director_name, "Rian Johnson");
    assert_eq!(d.total_movies, 2);
    assert!(close(d.avg_director_rating, 7.75));
    assert!(close(d.avg_box_office, 220_000_000.0));
    assert_eq!(d.total_box_office, 440_000_000);
    assert!(close(d.avg_profit, 120_000_000.0));
    assert_eq!(d.first_movie, NaiveDate::from_ymd_opt(2016, 12, 20).unwrap());
    assert_eq!(d.latest_movie, NaiveDate::from_ymd_opt(2017, 3, 10).unwrap());
}

#[tokio::test]
async fn test_rating_distribution_sorted_with_categories() {
    let (_dir, analytics) = seeded(&mixed_dataset()).await;
    let rows = analytics.rating_distribution().await.unwrap();

    let summary: Vec<(&str, RatingCategory)> = rows
        .iter()
        .map(|r| (r.title.as_str(), r.rating_category))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Crimson Horizon", RatingCategory::Excellent),
            ("Broken Compass", RatingCategory::Good),
            ("Paper Moon Rising", RatingCategory::Poor),
        ]
    );
    assert!(rows
        .windows(2)
        .all(|w| w[0].avg_rating >= w[1].avg_rating));
    assert_eq!(rows[1].total_ratings, 3);
    assert_eq!(rows[1].profit, -10_000_000);
}

#[tokio::test]
async fn test_collaborations_count_each_pair_once() {
    let (_dir, analytics) = seeded(&mixed_dataset()).await;
    let rows = analytics.collaboration_network().await.unwrap();

    assert_eq!(rows.len(), 1);
    let pair = &rows[0];
    assert_eq!((pair.actor1_id, pair.actor2_id), (1, 2));
    assert_eq!(pair.actor1, "Oscar Isaac");
    assert_eq!(pair.actor2, "Margot Robbie");
    assert_eq!(pair.collaborations, 2);
    assert!(close(pair.avg_collab_rating, 7.75));

    let mut titles: Vec<&str> = pair.movies_together.split(", ").collect();
    titles.sort();
    assert_eq!(titles, vec!["Broken Compass", "Crimson Horizon"]);
}

#[tokio::test]
async fn test_seasonal_patterns_bucket_by_month() {
    let (_dir, analytics) = seeded(&mixed_dataset()).await;
    let rows = analytics.seasonal_patterns().await.unwrap();

    let keys: Vec<(Season, &str)> = rows.iter().map(|r| (r.season, r.genre.as_str())).collect();
    assert_eq!(
        keys,
        vec![
            (Season::Fall, "Comedy"),
            (Season::Spring, "Drama"),
            (Season::Winter, "Sci-Fi"),
        ]
    );
    assert!(close(rows[1].avg_profit, -10_000_000.0));
}

#[tokio::test]
async fn test_budget_correlation_largest_budget_first() {
    let (_dir, analytics) = seeded(&mixed_dataset()).await;
    let rows = analytics.budget_correlation().await.unwrap();

    let categories: Vec<BudgetCategory> = rows.iter().map(|r| r.budget_category).collect();
    assert_eq!(
        categories,
        vec![BudgetCategory::High, BudgetCategory::Medium, BudgetCategory::Low]
    );
    assert!(rows.windows(2).all(|w| w[0].budget >= w[1].budget));
    assert!(close(rows[0].avg_rating, 8.5));
    assert_eq!(rows[2].rating_count, 1);
}

#[tokio::test]
async fn test_generated_store_invariants() {
    let dataset = generate_dataset(&GenerateOptions::with_seed(2024)).unwrap();
    let (_dir, url) = temp_store();
    insert_dataset(&dataset, &url, None).await.unwrap();

    let pool = sqlite::connect(&url, false).await.unwrap();
    let out_of_range: i64 =
        sqlx::query("SELECT COUNT(*) AS n FROM movie_ratings WHERE rating < 1 OR rating > 10")
            .fetch_one(&pool)
            .await
            .unwrap()
            .get("n");
    assert_eq!(out_of_range, 0);

    let movies: i64 = sqlx::query("SELECT COUNT(*) AS n FROM movies")
        .fetch_one(&pool)
        .await
        .unwrap()
        .get("n");
    assert_eq!(movies as usize, dataset.movies.len());
    pool.close().await;

    let bundle = MovieAnalytics::new(url).run_all().await.unwrap();
    assert_eq!(bundle.rating_distribution.len(), dataset.movies.len());
    assert!(bundle.director_metrics.iter().all(|d| d.total_movies >= 2));
    assert!(bundle
        .collaborations
        .iter()
        .all(|c| c.actor1_id < c.actor2_id && c.collaborations >= 2));
}

#[tokio::test]
async fn test_regenerating_replaces_previous_store() {
    let (_dir, url) = temp_store();
    insert_dataset(&mixed_dataset(), &url, None).await.unwrap();
    insert_dataset(&single_movie_dataset(), &url, None)
        .await
        .unwrap();

    let rows = MovieAnalytics::new(url).rating_distribution().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "The Silent Harbor");
}

#[tokio::test]
async fn test_missing_store_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("absent.db").display());
    assert!(MovieAnalytics::new(url).genre_trends().await.is_err());
}

#[test]
fn test_same_seed_same_fingerprint() {
    let a = generate_dataset(&GenerateOptions::with_seed(99)).unwrap();
    let b = generate_dataset(&GenerateOptions::with_seed(99)).unwrap();
    let c = generate_dataset(&GenerateOptions::with_seed(100)).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[tokio::test]
async fn test_manifest_beside_store() {
    let dataset = single_movie_dataset();
    let (dir, url) = temp_store();
    insert_dataset(&dataset, &url, None).await.unwrap();

    let path = manifest_path(&url).unwrap();
    assert_eq!(path, dir.path().join("movies.db.manifest.json"));

    let manifest = Manifest::new(7, &dataset, fixed_time());
    write_manifest(&manifest, &path).unwrap();
    let loaded = read_manifest(&path).unwrap();
    assert_eq!(loaded.seed, 7);
    assert_eq!(loaded.fingerprint, dataset.fingerprint());
    assert_eq!(loaded.row_counts.get("movie_ratings"), Some(&3));
}

#[tokio::test]
async fn test_report_from_store() {
    let (dir, analytics) = seeded(&mixed_dataset()).await;
    let bundle = analytics.run_all().await.unwrap();

    let html = render_html(&bundle, fixed_time());
    assert!(html.contains("Rian Johnson"));
    assert!(html.contains("Crimson Horizon"));
    assert!(!html.contains("The Unseen Cut"));
    assert!(html.contains("Report generated on 2025-01-01 12:30:00"));

    let path = dir.path().join("out").join("report.html");
    write_report(&path, &html).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), html);
}
