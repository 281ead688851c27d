//! Device-fleet OKR tracking: weighted key-result scoring, dimensional
//! aggregation, historical snapshots, and trend/velocity analysis.

pub mod aggregate;
pub mod config;
pub mod history;
pub mod inventory;
pub mod output;
pub mod scoring;
pub mod trend;
