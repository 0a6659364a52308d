use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CinestatError;

/// The fixed set of genres a movie can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Genre {
    Drama,
    Action,
    Comedy,
    Thriller,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Horror,
    Romance,
    Adventure,
}

impl Genre {
    pub const ALL: [Genre; 8] = [
        Genre::Drama,
        Genre::Action,
        Genre::Comedy,
        Genre::Thriller,
        Genre::SciFi,
        Genre::Horror,
        Genre::Romance,
        Genre::Adventure,
    ];

    /// Label stored in the `movies.genre` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Drama => "Drama",
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Thriller => "Thriller",
            Genre::SciFi => "Sci-Fi",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::Adventure => "Adventure",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = CinestatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CinestatError::Other(format!("Unknown genre '{}'", s)))
    }
}

/// Billing classification of an actor within a movie's cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleType {
    Lead,
    Supporting,
    Cameo,
}

impl RoleType {
    pub const ALL: [RoleType; 3] = [RoleType::Lead, RoleType::Supporting, RoleType::Cameo];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::Lead => "Lead",
            RoleType::Supporting => "Supporting",
            RoleType::Cameo => "Cameo",
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Director {
    pub director_id: i64,
    pub name: String,
    pub birth_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub actor_id: i64,
    pub name: String,
    pub birth_year: i32,
}

/// A movie row. Budget and box office are whole dollars and never negative;
/// box office may fall below the budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
    pub genre: Genre,
    pub release_date: NaiveDate,
    pub director_id: i64,
    pub budget: i64,
    pub box_office: i64,
}

impl Movie {
    pub fn profit(&self) -> i64 {
        self.box_office - self.budget
    }
}

/// Join record between a movie and one of its cast members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub movie_id: i64,
    pub actor_id: i64,
    pub role_type: RoleType,
}

/// A single anonymous review. `rating` is always within `[1.0, 10.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rating_id: i64,
    pub movie_id: i64,
    pub user_id: i64,
    pub rating: f64,
    pub review_date: NaiveDate,
}

/// The complete in-memory dataset, ready to be written to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub directors: Vec<Director>,
    pub actors: Vec<Actor>,
    pub movies: Vec<Movie>,
    pub cast: Vec<CastMember>,
    pub ratings: Vec<Rating>,
}

impl Dataset {
    pub fn total_rows(&self) -> usize {
        self.directors.len()
            + self.actors.len()
            + self.movies.len()
            + self.cast.len()
            + self.ratings.len()
    }

    /// Row counts keyed by store table name, in insertion order.
    pub fn table_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (super::DIRECTORS, self.directors.len()),
            (super::ACTORS, self.actors.len()),
            (super::MOVIES, self.movies.len()),
            (super::MOVIE_ACTORS, self.cast.len()),
            (super::MOVIE_RATINGS, self.ratings.len()),
        ]
    }

    /// SHA-256 over the canonical JSON form of the dataset.
    ///
    /// Two runs with the same seed produce the same fingerprint, which is
    /// what the generation manifest records.
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let serialized = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(serialized.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
