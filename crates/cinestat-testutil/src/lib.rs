use chrono::NaiveDate;
use tempfile::TempDir;

use cinestat_core::schema::types::*;

/// A scratch directory plus a `sqlite://` URL for a store file inside it.
///
/// Keep the `TempDir` alive for as long as the store is in use; dropping it
/// removes the file.
pub fn temp_store() -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}", dir.path().join("movies.db").display());
    (dir, url)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

pub fn director(director_id: i64, name: &str, birth_year: i32) -> Director {
    Director {
        director_id,
        name: name.to_string(),
        birth_year,
    }
}

pub fn actor(actor_id: i64, name: &str, birth_year: i32) -> Actor {
    Actor {
        actor_id,
        name: name.to_string(),
        birth_year,
    }
}

pub fn movie(
    movie_id: i64,
    title: &str,
    genre: Genre,
    release_date: NaiveDate,
    director_id: i64,
    budget: i64,
    box_office: i64,
) -> Movie {
    Movie {
        movie_id,
        title: title.to_string(),
        genre,
        release_date,
        director_id,
        budget,
        box_office,
    }
}

pub fn cast(movie_id: i64, actor_id: i64, role_type: RoleType) -> CastMember {
    CastMember {
        movie_id,
        actor_id,
        role_type,
    }
}

/// Append one rating per value in `values` for `movie_id`, numbering
/// rating ids after the ones already present.
pub fn add_ratings(dataset: &mut Dataset, movie_id: i64, values: &[f64]) {
    for (i, value) in values.iter().enumerate() {
        let rating_id = dataset.ratings.len() as i64 + 1;
        dataset.ratings.push(Rating {
            rating_id,
            movie_id,
            user_id: 100 + i as i64,
            rating: *value,
            review_date: date(2021, 1, 10),
        });
    }
}

/// One director, one actor and one summer movie (budget $10M, box office
/// $50M) rated 9.0, 8.5 and 9.5.
pub fn single_movie_dataset() -> Dataset {
    let mut dataset = Dataset {
        directors: vec![director(1, "Denis Villeneuve", 1967)],
        actors: vec![actor(1, "Viola Davis", 1965)],
        movies: vec![movie(
            1,
            "The Silent Harbor",
            Genre::Drama,
            date(2020, 7, 15),
            1,
            10_000_000,
            50_000_000,
        )],
        cast: vec![cast(1, 1, RoleType::Lead)],
        ratings: Vec::new(),
    };
    add_ratings(&mut dataset, 1, &[9.0, 8.5, 9.5]);
    dataset
}

/// Four movies by three directors with one unrated movie.
///
/// | id | title | genre | released | director | budget | box office | ratings |
/// |----|-------|-------|----------|----------|--------|------------|---------|
/// | 1 | Crimson Horizon | Sci-Fi | 2016-12-20 | 1 | 150M | 400M | 8.0, 9.0 |
/// | 2 | Broken Compass | Drama | 2017-03-10 | 1 | 50M | 40M | 6.0, 7.0, 8.0 |
/// | 3 | Paper Moon Rising | Comedy | 2018-10-05 | 2 | 15M | 60M | 5.0 |
/// | 4 | The Unseen Cut | Horror | 2019-08-01 | 3 | 20M | 90M | none |
///
/// Actors 1 and 2 appear together in movies 1, 2 and 4, so they share two
/// rated movies. Actor 3 shares only movie 2 with each of them.
pub fn mixed_dataset() -> Dataset {
    let mut dataset = Dataset {
        directors: vec![
            director(1, "Rian Johnson", 1973),
            director(2, "Greta Gerwig", 1983),
            director(3, "Jordan Peele", 1979),
        ],
        actors: vec![
            actor(1, "Oscar Isaac", 1979),
            actor(2, "Margot Robbie", 1990),
            actor(3, "Tom Hanks", 1956),
        ],
        movies: vec![
            movie(
                1,
                "Crimson Horizon",
                Genre::SciFi,
                date(2016, 12, 20),
                1,
                150_000_000,
                400_000_000,
            ),
            movie(
                2,
                "Broken Compass",
                Genre::Drama,
                date(2017, 3, 10),
                1,
                50_000_000,
                40_000_000,
            ),
            movie(
                3,
                "Paper Moon Rising",
                Genre::Comedy,
                date(2018, 10, 5),
                2,
                15_000_000,
                60_000_000,
            ),
            movie(
                4,
                "The Unseen Cut",
                Genre::Horror,
                date(2019, 8, 1),
                3,
                20_000_000,
                90_000_000,
            ),
        ],
        cast: vec![
            cast(1, 1, RoleType::Lead),
            cast(1, 2, RoleType::Supporting),
            cast(2, 1, RoleType::Lead),
            cast(2, 2, RoleType::Cameo),
            cast(2, 3, RoleType::Supporting),
            cast(3, 3, RoleType::Lead),
            cast(4, 1, RoleType::Lead),
            cast(4, 2, RoleType::Supporting),
        ],
        ratings: Vec::new(),
    };
    add_ratings(&mut dataset, 1, &[8.0, 9.0]);
    add_ratings(&mut dataset, 2, &[6.0, 7.0, 8.0]);
    add_ratings(&mut dataset, 3, &[5.0]);
    dataset
}
