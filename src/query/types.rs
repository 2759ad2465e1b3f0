use chrono::{DateTime, Utc};

use crate::config::default_start_time_floor;
use crate::ranks::{PlayerNum, RoomRankFilter, RoomRankSet};
use crate::stats::StatsResult;

/// Fully specified query. Built once through [`QueryRequest::builder`], before
/// any resolution or fan-out happens.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub nickname: String,
    pub room_ranks: RoomRankFilter,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl QueryRequest {
    pub fn builder(nickname: impl Into<String>) -> QueryRequestBuilder {
        QueryRequestBuilder::new(nickname.into())
    }

    /// Variants with a non-empty rank set, in report order.
    pub fn active_variants(&self) -> impl Iterator<Item = PlayerNum> + '_ {
        PlayerNum::ALL
            .into_iter()
            .filter(|player_num| !self.room_ranks.get(*player_num).is_empty())
    }
}

pub struct QueryRequestBuilder {
    nickname: String,
    room_ranks: Option<RoomRankFilter>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    start_time_floor: DateTime<Utc>,
}

impl QueryRequestBuilder {
    fn new(nickname: String) -> Self {
        Self {
            nickname,
            room_ranks: None,
            start_time: None,
            end_time: None,
            start_time_floor: default_start_time_floor(),
        }
    }

    pub fn room_ranks(mut self, room_ranks: RoomRankFilter) -> Self {
        self.room_ranks = Some(room_ranks);
        self
    }

    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Start of the window used when no explicit start time is given.
    pub fn start_time_floor(mut self, floor: DateTime<Utc>) -> Self {
        self.start_time_floor = floor;
        self
    }

    /// Fills unset fields: every room rank, `[floor, now]`.
    pub fn build(self) -> QueryRequest {
        QueryRequest {
            nickname: self.nickname,
            room_ranks: self.room_ranks.unwrap_or_else(RoomRankFilter::all),
            start_time: self.start_time.unwrap_or(self.start_time_floor),
            end_time: self.end_time.unwrap_or_else(Utc::now),
        }
    }
}

/// Result of one active variant, handed to the report assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantOutcome {
    pub variant: PlayerNum,
    pub room_ranks: RoomRankSet,
    pub result: StatsResult,
}
