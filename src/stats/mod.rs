//! Stats module - the aggregation engine

mod aggregator;

pub use aggregator::{Aggregator, CorrelationMatrix, StatsError, TrendPoint, YearlyTrend};
