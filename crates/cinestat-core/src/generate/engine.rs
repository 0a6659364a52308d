use std::ops::RangeInclusive;

use chrono::{Duration as ChronoDuration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::error::{CinestatError, Result};
use crate::generate::catalog;
use crate::schema::types::*;

/// Release and review dates fall within `WINDOW_START + [0, WINDOW_DAYS]`.
pub const WINDOW_DAYS: i64 = 3000;

/// Lowest and highest budget a generated movie can have.
pub const BUDGET_RANGE: RangeInclusive<i64> = 5_000_000..=200_000_000;

/// Rater ids are drawn from this range.
pub const USER_ID_RANGE: RangeInclusive<i64> = 1..=1000;

pub const RATING_MEAN: f64 = 7.2;
pub const RATING_STDDEV: f64 = 1.5;
pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 10.0;

pub fn window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default()
}

/// Knobs for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Seed for the RNG. The same seed always yields the same dataset.
    pub seed: u64,
    /// How many ratings each movie receives.
    pub ratings_per_movie: RangeInclusive<usize>,
    /// How many actors are cast in each movie.
    pub cast_size: RangeInclusive<usize>,
}

impl GenerateOptions {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ratings_per_movie: 50..=200,
            cast_size: 2..=4,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.ratings_per_movie.is_empty() {
            return Err(CinestatError::Config {
                message: format!(
                    "ratings per movie range {:?} is empty",
                    self.ratings_per_movie
                ),
            });
        }
        if self.cast_size.is_empty() || *self.cast_size.start() == 0 {
            return Err(CinestatError::Config {
                message: format!("cast size range {:?} must be non-empty and start at 1 or more", self.cast_size),
            });
        }
        if *self.cast_size.end() > catalog::ACTORS.len() {
            return Err(CinestatError::Config {
                message: format!(
                    "cast size up to {} exceeds the actor pool of {}",
                    self.cast_size.end(),
                    catalog::ACTORS.len()
                ),
            });
        }
        Ok(())
    }
}

/// Derive a seed from the wall clock for runs that did not pin one.
pub fn seed_from_clock() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Build the full synthetic dataset in memory.
///
/// Directors and actors come from the built-in catalog. Each catalog title
/// becomes one movie with a random genre, director, release date and
/// budget; box office lands anywhere between half and four times the
/// budget. Every movie then gets a random cast drawn without replacement
/// and a batch of normally distributed ratings.
pub fn generate_dataset(options: &GenerateOptions) -> Result<Dataset> {
    options.validate()?;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let rating_dist = Normal::new(RATING_MEAN, RATING_STDDEV)
        .map_err(|e| CinestatError::Other(format!("invalid rating distribution: {}", e)))?;
    let start = window_start();

    let directors: Vec<Director> = catalog::DIRECTORS
        .iter()
        .enumerate()
        .map(|(i, (name, birth_year))| Director {
            director_id: i as i64 + 1,
            name: name.to_string(),
            birth_year: *birth_year,
        })
        .collect();

    let actors: Vec<Actor> = catalog::ACTORS
        .iter()
        .enumerate()
        .map(|(i, (name, birth_year))| Actor {
            actor_id: i as i64 + 1,
            name: name.to_string(),
            birth_year: *birth_year,
        })
        .collect();

    let movies: Vec<Movie> = catalog::TITLES
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let release_date = start + ChronoDuration::days(rng.random_range(0..=WINDOW_DAYS));
            let director_id = rng.random_range(1..=directors.len() as i64);
            let genre = Genre::ALL[rng.random_range(0..Genre::ALL.len())];
            let budget = rng.random_range(BUDGET_RANGE);
            let box_office = budget + rng.random_range(-(budget / 2)..=budget * 3);
            Movie {
                movie_id: i as i64 + 1,
                title: title.to_string(),
                genre,
                release_date,
                director_id,
                budget,
                box_office,
            }
        })
        .collect();

    let mut cast = Vec::new();
    for movie in &movies {
        let size = rng.random_range(options.cast_size.clone());
        for idx in rand::seq::index::sample(&mut rng, actors.len(), size) {
            let role_type = RoleType::ALL[rng.random_range(0..RoleType::ALL.len())];
            cast.push(CastMember {
                movie_id: movie.movie_id,
                actor_id: actors[idx].actor_id,
                role_type,
            });
        }
    }

    let mut ratings = Vec::new();
    for movie in &movies {
        let count = rng.random_range(options.ratings_per_movie.clone());
        for _ in 0..count {
            let user_id = rng.random_range(USER_ID_RANGE);
            let rating = round_rating(rating_dist.sample(&mut rng));
            let review_date = start + ChronoDuration::days(rng.random_range(0..=WINDOW_DAYS));
            ratings.push(Rating {
                rating_id: ratings.len() as i64 + 1,
                movie_id: movie.movie_id,
                user_id,
                rating,
                review_date,
            });
        }
    }

    let dataset = Dataset {
        directors,
        actors,
        movies,
        cast,
        ratings,
    };
    debug!(
        seed = options.seed,
        rows = dataset.total_rows(),
        "Generated synthetic dataset"
    );
    Ok(dataset)
}

/// Clamp a raw sample into `[1, 10]`, then round to one decimal.
///
/// Clamping first keeps the rounded value inside the bounds even for
/// extreme draws.
pub fn round_rating(raw: f64) -> f64 {
    let clamped = raw.clamp(RATING_MIN, RATING_MAX);
    (clamped * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn dataset(seed: u64) -> Dataset {
        generate_dataset(&GenerateOptions::with_seed(seed)).unwrap()
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let a = dataset(42);
        let b = dataset(42);
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_different_seed_different_dataset() {
        assert_ne!(dataset(1).fingerprint(), dataset(2).fingerprint());
    }

    #[test]
    fn test_catalog_sizes() {
        let data = dataset(7);
        assert_eq!(data.directors.len(), 10);
        assert_eq!(data.actors.len(), 15);
        assert_eq!(data.movies.len(), 44);
    }

    #[test]
    fn test_ratings_within_bounds() {
        for seed in 0..5 {
            for r in &dataset(seed).ratings {
                assert!(
                    (RATING_MIN..=RATING_MAX).contains(&r.rating),
                    "rating {} out of bounds",
                    r.rating
                );
                // one decimal place
                assert!(((r.rating * 10.0).round() - r.rating * 10.0).abs() < 1e-9);
                assert!(USER_ID_RANGE.contains(&r.user_id));
            }
        }
    }

    #[test]
    fn test_round_rating_clamps_before_rounding() {
        assert_eq!(round_rating(-3.0), 1.0);
        assert_eq!(round_rating(0.96), 1.0);
        assert_eq!(round_rating(10.04), 10.0);
        assert_eq!(round_rating(14.2), 10.0);
        assert_eq!(round_rating(7.26), 7.3);
    }

    #[test]
    fn test_ratings_per_movie_in_range() {
        let data = dataset(11);
        let mut per_movie: HashMap<i64, usize> = HashMap::new();
        for r in &data.ratings {
            *per_movie.entry(r.movie_id).or_default() += 1;
        }
        assert_eq!(per_movie.len(), data.movies.len());
        for count in per_movie.values() {
            assert!((50..=200).contains(count), "{} ratings", count);
        }
    }

    #[test]
    fn test_cast_is_unique_and_sized() {
        let data = dataset(3);
        let mut pairs = HashSet::new();
        let mut per_movie: HashMap<i64, usize> = HashMap::new();
        for member in &data.cast {
            assert!(pairs.insert((member.movie_id, member.actor_id)));
            *per_movie.entry(member.movie_id).or_default() += 1;
        }
        for count in per_movie.values() {
            assert!((2..=4).contains(count));
        }
        assert_eq!(per_movie.len(), data.movies.len());
    }

    #[test]
    fn test_movie_fields_within_generation_bounds() {
        let data = dataset(99);
        let end = window_start() + ChronoDuration::days(WINDOW_DAYS);
        for movie in &data.movies {
            assert!(BUDGET_RANGE.contains(&movie.budget));
            assert!(movie.box_office >= movie.budget - movie.budget / 2);
            assert!(movie.box_office <= movie.budget * 4);
            assert!(movie.box_office >= 0);
            assert!(movie.release_date >= window_start() && movie.release_date <= end);
            assert!((1..=10).contains(&movie.director_id));
        }
    }

    #[test]
    fn test_custom_ranges_respected() {
        let options = GenerateOptions {
            seed: 5,
            ratings_per_movie: 3..=3,
            cast_size: 1..=1,
        };
        let data = generate_dataset(&options).unwrap();
        assert_eq!(data.ratings.len(), 3 * data.movies.len());
        assert_eq!(data.cast.len(), data.movies.len());
    }

    #[test]
    fn test_cast_larger_than_pool_rejected() {
        let options = GenerateOptions {
            seed: 5,
            ratings_per_movie: 50..=200,
            cast_size: 2..=16,
        };
        assert!(generate_dataset(&options).is_err());
    }

    #[test]
    fn test_inverted_rating_range_rejected() {
        #[allow(clippy::reversed_empty_ranges)]
        let options = GenerateOptions {
            seed: 5,
            ratings_per_movie: 200..=50,
            cast_size: 2..=4,
        };
        assert!(generate_dataset(&options).is_err());
    }
}
