pub mod aggregation;
pub mod chart;
