use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use majsoul_info::{
    MessageSink, PlayerId, PlayerIdentity, PlayerResolver, PlayerStats, ProviderError,
    RoomRankSet, StatsProvider,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Answers every search with the configured players, or with `error` when set.
#[derive(Clone, Default)]
pub struct MockPlayerResolver {
    players: Arc<RwLock<Vec<PlayerIdentity>>>,
    error: Option<ProviderError>,
    searches: Arc<RwLock<Vec<String>>>,
}

impl MockPlayerResolver {
    pub fn new(players: Vec<PlayerIdentity>) -> Self {
        Self {
            players: Arc::new(RwLock::new(players)),
            error: None,
            searches: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_error(mut self, error: ProviderError) -> Self {
        self.error = Some(error);
        self
    }

    pub async fn searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }
}

#[async_trait]
impl PlayerResolver for MockPlayerResolver {
    async fn search_player(&self, nickname: &str) -> Result<Vec<PlayerIdentity>, ProviderError> {
        self.searches.write().await.push(nickname.to_string());
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.players.read().await.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsCall {
    pub player_id: PlayerId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub room_ranks: RoomRankSet,
}

/// Answers every call with the same result after an optional delay.
#[derive(Clone)]
pub struct MockStatsProvider {
    answer: Result<PlayerStats, ProviderError>,
    delay: Duration,
    calls: Arc<RwLock<Vec<StatsCall>>>,
}

impl MockStatsProvider {
    pub fn new(answer: Result<PlayerStats, ProviderError>) -> Self {
        Self {
            answer,
            delay: Duration::ZERO,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn calls(&self) -> Vec<StatsCall> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl StatsProvider for MockStatsProvider {
    async fn player_stats(
        &self,
        player_id: PlayerId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        room_ranks: &RoomRankSet,
    ) -> Result<PlayerStats, ProviderError> {
        self.calls.write().await.push(StatsCall {
            player_id,
            start_time,
            end_time,
            room_ranks: room_ranks.clone(),
        });
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.answer.clone()
    }
}

#[derive(Clone, Default)]
pub struct MockMessageSink {
    sent: Arc<RwLock<Vec<String>>>,
}

impl MockMessageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<String> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl MessageSink for MockMessageSink {
    async fn send(&self, text: &str) {
        self.sent.write().await.push(text.to_string());
    }
}
