use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ranks::PlayerNum;

/// Stable account id assigned by the ranking data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: PlayerId,
    pub nickname: String,
}

impl PlayerIdentity {
    pub fn new(id: u64, nickname: impl Into<String>) -> Self {
        Self {
            id: PlayerId(id),
            nickname: nickname.into(),
        }
    }
}

/// Ranked level as reported by the data source.
///
/// The id packs variant, tier and stars: `10301` is a four-player Expert 1,
/// `20402` a three-player Master 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    pub score: i32,
    #[serde(default)]
    pub delta: i32,
}

impl Level {
    pub fn tier_name(&self) -> Option<&'static str> {
        match (self.id / 100) % 100 {
            1 => Some("Novice"),
            2 => Some("Adept"),
            3 => Some("Expert"),
            4 => Some("Master"),
            5 => Some("Saint"),
            6 | 7 => Some("Celestial"),
            _ => None,
        }
    }

    pub fn stars(&self) -> u32 {
        self.id % 100
    }

    pub fn player_num(&self) -> Option<PlayerNum> {
        match self.id / 10000 {
            1 => Some(PlayerNum::Four),
            2 => Some(PlayerNum::Three),
            _ => None,
        }
    }

    /// Points including the pending delta of the current period.
    pub fn current_score(&self) -> i32 {
        self.score + self.delta
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tier_name() {
            Some(name) => write!(f, "{} {}", name, self.stars()),
            None => write!(f, "unknown level {}", self.id),
        }
    }
}

/// Aggregated statistics of one player in one variant over the requested
/// window and rooms.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub count: u32,
    pub level: Level,
    pub max_level: Level,
    /// Share of games finished in each placement, first place first.
    pub rank_rates: Vec<f64>,
    /// Average placement points per placement, first place first.
    #[serde(default)]
    pub rank_avg_score: Vec<f64>,
    pub avg_rank: f64,
    /// Share of games finished below zero points.
    pub negative_rate: f64,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub latest_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatsResult {
    Data(PlayerStats),
    NoData,
}

impl StatsResult {
    pub fn is_no_data(&self) -> bool {
        matches!(self, StatsResult::NoData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_level_ids() {
        let level = Level {
            id: 10301,
            score: 600,
            delta: 35,
        };
        assert_eq!(level.player_num(), Some(PlayerNum::Four));
        assert_eq!(level.to_string(), "Expert 1");
        assert_eq!(level.current_score(), 635);

        let level = Level {
            id: 20402,
            score: 0,
            delta: 0,
        };
        assert_eq!(level.player_num(), Some(PlayerNum::Three));
        assert_eq!(level.to_string(), "Master 2");
    }

    #[test]
    fn unknown_level_is_displayed_raw() {
        let level = Level {
            id: 10901,
            score: 0,
            delta: 0,
        };
        assert_eq!(level.to_string(), "unknown level 10901");
    }

    #[test]
    fn deserializes_stats_with_missing_optional_fields() {
        let stats: PlayerStats = serde_json::from_str(
            r#"{
                "count": 12,
                "level": {"id": 10203, "score": 450},
                "max_level": {"id": 10301, "score": 0},
                "rank_rates": [0.25, 0.25, 0.25, 0.25],
                "avg_rank": 2.5,
                "negative_rate": 0.1
            }"#,
        )
        .unwrap();

        assert_eq!(stats.count, 12);
        assert_eq!(stats.level.delta, 0);
        assert!(stats.rank_avg_score.is_empty());
        assert!(stats.started_at.is_none());
    }
}
