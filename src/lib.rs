// Library crate for the Mahjong Soul stats query
// This file exposes the public API for integration tests

pub mod config;
pub mod query;
pub mod ranks;
pub mod report;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use config::QueryConfig;
pub use query::{
    MessageSink, QueryCommandHandler, QueryError, QueryRequest, QueryService, VariantOutcome,
};
pub use ranks::{PlayerNum, RoomRank, RoomRankFilter, RoomRankSet};
pub use report::{ReportAssembler, StatsFormatter};
pub use stats::{
    InMemoryStatsProvider, PlayerId, PlayerIdentity, PlayerResolver, PlayerStats, ProviderError,
    StatsProvider, StatsResult,
};
