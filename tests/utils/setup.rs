use std::sync::Arc;
use std::time::Duration;

use majsoul_info::{
    stats::Level, PlayerIdentity, PlayerStats, ProviderError, QueryCommandHandler, QueryService,
};

use super::mocks::{MockMessageSink, MockPlayerResolver, MockStatsProvider};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub fn sample_stats() -> PlayerStats {
    PlayerStats {
        count: 10,
        level: Level {
            id: 10301,
            score: 500,
            delta: 0,
        },
        max_level: Level {
            id: 10302,
            score: 0,
            delta: 0,
        },
        rank_rates: vec![0.25, 0.25, 0.25, 0.25],
        rank_avg_score: vec![],
        avg_rank: 2.5,
        negative_rate: 0.1,
        started_at: None,
        latest_at: None,
    }
}

pub struct TestSetup {
    pub service: Arc<QueryService>,
    pub handler: QueryCommandHandler,
    pub resolver: MockPlayerResolver,
    pub four_player: MockStatsProvider,
    pub three_player: MockStatsProvider,
    pub sink: MockMessageSink,
}

pub struct TestSetupBuilder {
    players: Vec<PlayerIdentity>,
    resolver_error: Option<ProviderError>,
    four_player: MockStatsProvider,
    three_player: MockStatsProvider,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![PlayerIdentity::new(1, "Foo")],
            resolver_error: None,
            four_player: MockStatsProvider::new(Ok(sample_stats())),
            three_player: MockStatsProvider::new(Err(ProviderError::NotFound)),
        }
    }

    pub fn with_players(mut self, players: Vec<PlayerIdentity>) -> Self {
        self.players = players;
        self
    }

    pub fn with_resolver_error(mut self, error: ProviderError) -> Self {
        self.resolver_error = Some(error);
        self
    }

    pub fn with_four_player(mut self, answer: Result<PlayerStats, ProviderError>) -> Self {
        self.four_player = MockStatsProvider::new(answer);
        self
    }

    pub fn with_three_player(mut self, answer: Result<PlayerStats, ProviderError>) -> Self {
        self.three_player = MockStatsProvider::new(answer);
        self
    }

    /// Delays each provider's answer, in milliseconds.
    pub fn with_latencies(mut self, four_player_ms: u64, three_player_ms: u64) -> Self {
        self.four_player = self
            .four_player
            .with_delay(Duration::from_millis(four_player_ms));
        self.three_player = self
            .three_player
            .with_delay(Duration::from_millis(three_player_ms));
        self
    }

    pub fn build(self) -> TestSetup {
        let mut resolver = MockPlayerResolver::new(self.players);
        if let Some(error) = self.resolver_error {
            resolver = resolver.with_error(error);
        }
        let sink = MockMessageSink::new();

        let service = Arc::new(
            QueryService::builder(
                Arc::new(resolver.clone()),
                Arc::new(self.four_player.clone()),
                Arc::new(self.three_player.clone()),
            )
            .build(),
        );
        let handler = QueryCommandHandler::new(service.clone(), Arc::new(sink.clone()));

        TestSetup {
            service,
            handler,
            resolver,
            four_player: self.four_player,
            three_player: self.three_player,
            sink,
        }
    }
}
