pub mod analytics;
pub mod charts;
pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod report;
pub mod schema;

// Re-export key types for convenience
pub use analytics::{AnalysisBundle, MovieAnalytics};
pub use error::{CinestatError, Result};
pub use generate::{generate_dataset, GenerateOptions};
pub use schema::types::Dataset;
