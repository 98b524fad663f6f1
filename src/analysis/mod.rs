/// Batch tallies and coverage reports
pub mod statistics;
