mod errors;
pub mod models;
pub mod provider;

pub use errors::ProviderError;
pub use models::*;
pub use provider::{FixtureSet, InMemoryStatsProvider};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::ranks::RoomRankSet;

/// Looks players up by nickname. An empty list means no match.
#[async_trait]
pub trait PlayerResolver: Send + Sync {
    async fn search_player(&self, nickname: &str) -> Result<Vec<PlayerIdentity>, ProviderError>;
}

/// Aggregated statistics for one player-count variant.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Returns [`ProviderError::NotFound`] when no game matches the window and rooms.
    async fn player_stats(
        &self,
        player_id: PlayerId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        room_ranks: &RoomRankSet,
    ) -> Result<PlayerStats, ProviderError>;
}
