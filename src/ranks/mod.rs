pub mod parser;

pub use parser::{resolve, FilterSyntaxError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Player-count variant of the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum PlayerNum {
    Four = 0,
    Three = 1,
}

impl PlayerNum {
    /// Report order. Four-player sections always come first.
    pub const ALL: [PlayerNum; 2] = [PlayerNum::Four, PlayerNum::Three];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn seats(self) -> usize {
        match self {
            PlayerNum::Four => 4,
            PlayerNum::Three => 3,
        }
    }
}

impl fmt::Display for PlayerNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PlayerNum::Four => "Four-player",
                PlayerNum::Three => "Three-player",
            }
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
pub enum Tier {
    Gold = 0,
    Jade = 1,
    Throne = 2,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Tier::Gold => "Gold",
                Tier::Jade => "Jade",
                Tier::Throne => "Throne",
            }
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
pub enum RoundLength {
    East = 0,
    South = 1,
}

impl fmt::Display for RoundLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RoundLength::East => "East",
                RoundLength::South => "South",
            }
        )
    }
}

/// A ranked room. Discriminants are the mode ids used by the ranking data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum RoomRank {
    FourGoldEast = 8,
    FourGoldSouth = 9,
    FourJadeEast = 11,
    FourJadeSouth = 12,
    FourThroneEast = 15,
    FourThroneSouth = 16,
    ThreeGoldEast = 21,
    ThreeGoldSouth = 22,
    ThreeJadeEast = 23,
    ThreeJadeSouth = 24,
    ThreeThroneEast = 25,
    ThreeThroneSouth = 26,
}

pub const ALL_FOUR_PLAYER_ROOM_RANKS: [RoomRank; 6] = [
    RoomRank::FourGoldEast,
    RoomRank::FourGoldSouth,
    RoomRank::FourJadeEast,
    RoomRank::FourJadeSouth,
    RoomRank::FourThroneEast,
    RoomRank::FourThroneSouth,
];

pub const ALL_THREE_PLAYER_ROOM_RANKS: [RoomRank; 6] = [
    RoomRank::ThreeGoldEast,
    RoomRank::ThreeGoldSouth,
    RoomRank::ThreeJadeEast,
    RoomRank::ThreeJadeSouth,
    RoomRank::ThreeThroneEast,
    RoomRank::ThreeThroneSouth,
];

impl RoomRank {
    pub fn new(player_num: PlayerNum, tier: Tier, length: RoundLength) -> Self {
        use RoundLength::{East, South};
        match (player_num, tier, length) {
            (PlayerNum::Four, Tier::Gold, East) => RoomRank::FourGoldEast,
            (PlayerNum::Four, Tier::Gold, South) => RoomRank::FourGoldSouth,
            (PlayerNum::Four, Tier::Jade, East) => RoomRank::FourJadeEast,
            (PlayerNum::Four, Tier::Jade, South) => RoomRank::FourJadeSouth,
            (PlayerNum::Four, Tier::Throne, East) => RoomRank::FourThroneEast,
            (PlayerNum::Four, Tier::Throne, South) => RoomRank::FourThroneSouth,
            (PlayerNum::Three, Tier::Gold, East) => RoomRank::ThreeGoldEast,
            (PlayerNum::Three, Tier::Gold, South) => RoomRank::ThreeGoldSouth,
            (PlayerNum::Three, Tier::Jade, East) => RoomRank::ThreeJadeEast,
            (PlayerNum::Three, Tier::Jade, South) => RoomRank::ThreeJadeSouth,
            (PlayerNum::Three, Tier::Throne, East) => RoomRank::ThreeThroneEast,
            (PlayerNum::Three, Tier::Throne, South) => RoomRank::ThreeThroneSouth,
        }
    }

    pub fn all(player_num: PlayerNum) -> &'static [RoomRank; 6] {
        match player_num {
            PlayerNum::Four => &ALL_FOUR_PLAYER_ROOM_RANKS,
            PlayerNum::Three => &ALL_THREE_PLAYER_ROOM_RANKS,
        }
    }

    pub fn mode_id(self) -> u16 {
        self as u16
    }

    pub fn player_num(self) -> PlayerNum {
        if self.mode_id() < 20 {
            PlayerNum::Four
        } else {
            PlayerNum::Three
        }
    }

    pub fn tier(self) -> Tier {
        use RoomRank::*;
        match self {
            FourGoldEast | FourGoldSouth | ThreeGoldEast | ThreeGoldSouth => Tier::Gold,
            FourJadeEast | FourJadeSouth | ThreeJadeEast | ThreeJadeSouth => Tier::Jade,
            FourThroneEast | FourThroneSouth | ThreeThroneEast | ThreeThroneSouth => Tier::Throne,
        }
    }

    pub fn length(self) -> RoundLength {
        use RoomRank::*;
        match self {
            FourGoldEast | FourJadeEast | FourThroneEast | ThreeGoldEast | ThreeJadeEast
            | ThreeThroneEast => RoundLength::East,
            _ => RoundLength::South,
        }
    }
}

impl fmt::Display for RoomRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tier(), self.length())
    }
}

impl From<RoomRank> for u16 {
    fn from(rank: RoomRank) -> Self {
        rank.mode_id()
    }
}

impl TryFrom<u16> for RoomRank {
    type Error = String;

    fn try_from(mode_id: u16) -> Result<Self, Self::Error> {
        PlayerNum::iter()
            .flat_map(|player_num| RoomRank::all(player_num).iter().copied())
            .find(|rank| rank.mode_id() == mode_id)
            .ok_or_else(|| format!("unknown room rank mode id {mode_id}"))
    }
}

pub type RoomRankSet = BTreeSet<RoomRank>;

/// Room ranks to include, one independent set per variant.
/// An empty set means the variant is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoomRankFilter {
    pub four: RoomRankSet,
    pub three: RoomRankSet,
}

impl RoomRankFilter {
    pub fn new(four: RoomRankSet, three: RoomRankSet) -> Self {
        Self { four, three }
    }

    pub fn all() -> Self {
        Self {
            four: ALL_FOUR_PLAYER_ROOM_RANKS.into_iter().collect(),
            three: ALL_THREE_PLAYER_ROOM_RANKS.into_iter().collect(),
        }
    }

    pub fn get(&self, player_num: PlayerNum) -> &RoomRankSet {
        match player_num {
            PlayerNum::Four => &self.four,
            PlayerNum::Three => &self.three,
        }
    }
}

/// Human-readable list of the ranks in a set, "all rooms" when it covers the
/// whole universe of its variant.
pub fn describe_ranks(player_num: PlayerNum, ranks: &RoomRankSet) -> String {
    if ranks.len() == RoomRank::all(player_num).len() {
        return "all rooms".to_string();
    }

    ranks
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
