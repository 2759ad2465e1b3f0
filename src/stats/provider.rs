use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{
    Level, PlayerId, PlayerIdentity, PlayerResolver, PlayerStats, ProviderError, StatsProvider,
};
use crate::ranks::{PlayerNum, RoomRank, RoomRankSet};

/// One finished ranked game from a single player's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub player_id: PlayerId,
    pub room_rank: RoomRank,
    pub finished_at: DateTime<Utc>,
    /// 1-based final placement.
    pub placement: u8,
    pub final_points: i32,
    /// Level after the game was scored.
    pub level: Level,
}

impl GameRecord {
    /// Checks the record against the seats and level ids of `player_num`.
    pub fn validate(&self, player_num: PlayerNum) -> Result<(), ProviderError> {
        if self.room_rank.player_num() != player_num {
            return Err(ProviderError::InvalidRecord(format!(
                "room {} is not a {} room",
                self.room_rank.mode_id(),
                player_num
            )));
        }
        if self.placement == 0 || usize::from(self.placement) > player_num.seats() {
            return Err(ProviderError::InvalidRecord(format!(
                "placement {} outside 1..={}",
                self.placement,
                player_num.seats()
            )));
        }
        if self.level.player_num() != Some(player_num) {
            return Err(ProviderError::InvalidRecord(format!(
                "level {} is not a {} level",
                self.level.id, player_num
            )));
        }
        Ok(())
    }
}

/// Players and games backing [`InMemoryStatsProvider`], usually loaded from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureSet {
    #[serde(default)]
    pub players: Vec<PlayerIdentity>,
    #[serde(default)]
    pub games: Vec<GameRecord>,
}

impl FixtureSet {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Stats provider computing aggregates from in-memory game records.
///
/// Instances for different variants can share one [`FixtureSet`]; each only
/// sees games played in rooms of its own variant.
#[derive(Debug, Clone)]
pub struct InMemoryStatsProvider {
    player_num: PlayerNum,
    fixtures: Arc<RwLock<FixtureSet>>,
}

impl InMemoryStatsProvider {
    pub fn new(player_num: PlayerNum, fixtures: Arc<RwLock<FixtureSet>>) -> Self {
        Self {
            player_num,
            fixtures,
        }
    }

    pub fn shared(fixtures: FixtureSet) -> Arc<RwLock<FixtureSet>> {
        Arc::new(RwLock::new(fixtures))
    }

    pub async fn record_game(&self, game: GameRecord) -> Result<(), ProviderError> {
        game.validate(self.player_num)?;
        self.fixtures.write().await.games.push(game);
        Ok(())
    }
}

#[async_trait]
impl PlayerResolver for InMemoryStatsProvider {
    /// Case-insensitive prefix search, exact matches first, then by id.
    async fn search_player(&self, nickname: &str) -> Result<Vec<PlayerIdentity>, ProviderError> {
        let needle = nickname.to_lowercase();
        let fixtures = self.fixtures.read().await;

        let mut matches: Vec<PlayerIdentity> = fixtures
            .players
            .iter()
            .filter(|player| player.nickname.to_lowercase().starts_with(&needle))
            .cloned()
            .collect();
        matches.sort_by_key(|player| (player.nickname.to_lowercase() != needle, player.id));

        debug!(nickname, matches = matches.len(), "Searched players");
        Ok(matches)
    }
}

#[async_trait]
impl StatsProvider for InMemoryStatsProvider {
    async fn player_stats(
        &self,
        player_id: PlayerId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        room_ranks: &RoomRankSet,
    ) -> Result<PlayerStats, ProviderError> {
        let fixtures = self.fixtures.read().await;
        let mut games: Vec<&GameRecord> = fixtures
            .games
            .iter()
            .filter(|game| {
                game.player_id == player_id
                    && game.room_rank.player_num() == self.player_num
                    && room_ranks.contains(&game.room_rank)
                    && game.finished_at >= start_time
                    && game.finished_at <= end_time
            })
            .collect();
        games.retain(|game| match game.validate(self.player_num) {
            Ok(()) => true,
            Err(err) => {
                warn!(player_id = %game.player_id, %err, "Skipping game record");
                false
            }
        });
        games.sort_by_key(|game| game.finished_at);

        aggregate(self.player_num, &games).ok_or(ProviderError::NotFound)
    }
}

/// Folds validated, chronologically sorted games into a stats record. `None`
/// when empty.
fn aggregate(player_num: PlayerNum, games: &[&GameRecord]) -> Option<PlayerStats> {
    let first = games.first()?;
    let last = games.last()?;
    let seats = player_num.seats();
    let count = games.len();

    let mut placements = vec![0u32; seats];
    let mut points_by_placement = vec![0i64; seats];
    let mut negative = 0u32;
    let mut max_level = first.level;

    for game in games {
        let slot = usize::from(game.placement) - 1;
        placements[slot] += 1;
        points_by_placement[slot] += i64::from(game.final_points);
        if game.final_points < 0 {
            negative += 1;
        }
        if game.level.id > max_level.id {
            max_level = game.level;
        }
    }

    let rank_rates = placements
        .iter()
        .map(|n| f64::from(*n) / count as f64)
        .collect();
    let rank_avg_score = placements
        .iter()
        .zip(&points_by_placement)
        .map(|(n, points)| {
            if *n == 0 {
                0.0
            } else {
                *points as f64 / f64::from(*n)
            }
        })
        .collect();
    let placement_sum: u32 = placements
        .iter()
        .enumerate()
        .map(|(index, n)| (index as u32 + 1) * n)
        .sum();

    Some(PlayerStats {
        count: count as u32,
        level: last.level,
        max_level,
        rank_rates,
        rank_avg_score,
        avg_rank: f64::from(placement_sum) / count as f64,
        negative_rate: f64::from(negative) / count as f64,
        started_at: Some(first.finished_at),
        latest_at: Some(last.finished_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn level(id: u32, score: i32) -> Level {
        Level {
            id,
            score,
            delta: 0,
        }
    }

    fn game(
        player_id: u64,
        room_rank: RoomRank,
        day: u32,
        placement: u8,
        final_points: i32,
        level: Level,
    ) -> GameRecord {
        GameRecord {
            player_id: PlayerId(player_id),
            room_rank,
            finished_at: Utc.with_ymd_and_hms(2023, 5, day, 12, 0, 0).unwrap(),
            placement,
            final_points,
            level,
        }
    }

    fn fixtures() -> FixtureSet {
        FixtureSet {
            players: vec![
                PlayerIdentity::new(2, "FooBar"),
                PlayerIdentity::new(1, "Foo"),
                PlayerIdentity::new(3, "Baz"),
            ],
            games: vec![
                game(1, RoomRank::FourGoldEast, 1, 1, 45000, level(10301, 300)),
                game(1, RoomRank::FourGoldSouth, 2, 4, -2000, level(10301, 180)),
                game(1, RoomRank::FourJadeSouth, 3, 2, 31000, level(10302, 20)),
                game(1, RoomRank::ThreeGoldEast, 4, 3, 12000, level(20201, 100)),
                game(3, RoomRank::FourGoldEast, 1, 2, 30000, level(10201, 0)),
            ],
        }
    }

    fn full_window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn all_four() -> RoomRankSet {
        crate::ranks::ALL_FOUR_PLAYER_ROOM_RANKS.into_iter().collect()
    }

    #[tokio::test]
    async fn search_orders_exact_match_first() {
        let provider =
            InMemoryStatsProvider::new(PlayerNum::Four, InMemoryStatsProvider::shared(fixtures()));

        let players = provider.search_player("foo").await.unwrap();
        let ids: Vec<u64> = players.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2]);

        assert!(provider.search_player("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn aggregates_games_in_window_and_rooms() {
        let provider =
            InMemoryStatsProvider::new(PlayerNum::Four, InMemoryStatsProvider::shared(fixtures()));
        let (start, end) = full_window();

        let stats = provider
            .player_stats(PlayerId(1), start, end, &all_four())
            .await
            .unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.rank_rates.len(), 4);
        assert!((stats.rank_rates[0] - 1.0 / 3.0).abs() < 1e-9);
        assert!((stats.avg_rank - 7.0 / 3.0).abs() < 1e-9);
        assert!((stats.negative_rate - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.level.id, 10302);
        assert_eq!(stats.max_level.id, 10302);
        assert_eq!(stats.rank_avg_score[3], -2000.0);
        assert_eq!(stats.rank_avg_score[2], 0.0);
    }

    #[tokio::test]
    async fn filters_by_room_rank_and_time() {
        let provider =
            InMemoryStatsProvider::new(PlayerNum::Four, InMemoryStatsProvider::shared(fixtures()));
        let (start, _) = full_window();
        let gold: RoomRankSet = [RoomRank::FourGoldEast, RoomRank::FourGoldSouth]
            .into_iter()
            .collect();

        let stats = provider
            .player_stats(
                PlayerId(1),
                start,
                Utc.with_ymd_and_hms(2023, 5, 1, 23, 0, 0).unwrap(),
                &gold,
            )
            .await
            .unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.rank_rates[0], 1.0);
    }

    #[tokio::test]
    async fn empty_selection_is_not_found() {
        let shared = InMemoryStatsProvider::shared(fixtures());
        let three = InMemoryStatsProvider::new(PlayerNum::Three, shared);
        let (start, end) = full_window();

        let err = three
            .player_stats(PlayerId(3), start, end, &all_four())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn record_game_rejects_other_variant() {
        let provider = InMemoryStatsProvider::new(
            PlayerNum::Three,
            InMemoryStatsProvider::shared(FixtureSet::default()),
        );

        let result = provider
            .record_game(game(1, RoomRank::FourGoldEast, 1, 1, 0, level(10101, 0)))
            .await;
        assert!(matches!(result, Err(ProviderError::InvalidRecord(_))));

        provider
            .record_game(game(1, RoomRank::ThreeJadeEast, 1, 1, 50000, level(20301, 0)))
            .await
            .unwrap();
        let (start, end) = full_window();
        let ranks: RoomRankSet = [RoomRank::ThreeJadeEast].into_iter().collect();
        let stats = provider
            .player_stats(PlayerId(1), start, end, &ranks)
            .await
            .unwrap();
        assert_eq!(stats.rank_rates, vec![1.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn record_game_rejects_out_of_range_placement() {
        let provider = InMemoryStatsProvider::new(
            PlayerNum::Three,
            InMemoryStatsProvider::shared(FixtureSet::default()),
        );

        for placement in [0, 4] {
            let result = provider
                .record_game(game(1, RoomRank::ThreeGoldEast, 1, placement, 0, level(20301, 0)))
                .await;
            assert!(matches!(result, Err(ProviderError::InvalidRecord(_))));
        }

        let result = provider
            .record_game(game(1, RoomRank::ThreeGoldEast, 1, 1, 0, level(10301, 0)))
            .await;
        assert!(matches!(result, Err(ProviderError::InvalidRecord(_))));
    }

    #[tokio::test]
    async fn invalid_fixture_games_are_skipped() {
        let fixtures = FixtureSet {
            players: vec![PlayerIdentity::new(1, "Foo")],
            games: vec![
                game(1, RoomRank::FourGoldEast, 1, 0, 40000, level(10301, 0)),
                game(1, RoomRank::FourGoldEast, 2, 9, -1000, level(10301, 0)),
                game(1, RoomRank::FourGoldEast, 3, 2, 30000, level(10301, 0)),
            ],
        };
        let provider =
            InMemoryStatsProvider::new(PlayerNum::Four, InMemoryStatsProvider::shared(fixtures));
        let (start, end) = full_window();

        let stats = provider
            .player_stats(PlayerId(1), start, end, &all_four())
            .await
            .unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.rank_rates, vec![0.0, 1.0, 0.0, 0.0]);
        assert_eq!(stats.avg_rank, 2.0);
        assert_eq!(stats.negative_rate, 0.0);
    }

    #[tokio::test]
    async fn only_invalid_games_is_not_found() {
        let fixtures = FixtureSet {
            players: vec![],
            games: vec![game(1, RoomRank::FourGoldEast, 1, 0, 40000, level(10301, 0))],
        };
        let provider =
            InMemoryStatsProvider::new(PlayerNum::Four, InMemoryStatsProvider::shared(fixtures));
        let (start, end) = full_window();

        let err = provider
            .player_stats(PlayerId(1), start, end, &all_four())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn parses_fixture_json() {
        let fixtures = FixtureSet::from_json(
            r#"{
                "players": [{"id": 7, "nickname": "Foo"}],
                "games": [{
                    "player_id": 7,
                    "room_rank": 9,
                    "finished_at": "2023-05-01T12:00:00Z",
                    "placement": 2,
                    "final_points": 28000,
                    "level": {"id": 10301, "score": 500}
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(fixtures.players[0], PlayerIdentity::new(7, "Foo"));
        assert_eq!(fixtures.games[0].room_rank, RoomRank::FourGoldSouth);
    }
}
