pub mod config;
pub mod model;
pub mod validation;

pub use config::*;
pub use model::{score, KrScore, OkrScoreResult, RawCounts, Status};
pub use validation::validate_scoring;
