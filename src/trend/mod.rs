pub mod burndown;
pub mod compare;

pub use burndown::{burndown, BurndownTrend, TrendDirection};
pub use compare::{
    compare, compare_dimension, direction_for, DimensionTrend, Direction, ScoreTrend, TrendResult,
    DEFAULT_FLAT_THRESHOLD,
};
