pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::{MockMessageSink, MockPlayerResolver, MockStatsProvider, StatsCall};
#[allow(unused_imports)]
pub use setup::{sample_stats, TestSetup, TestSetupBuilder};
