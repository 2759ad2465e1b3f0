use crate::ranks::{self, RoomRankFilter};

use super::QueryError;

pub const COMMAND_NAME: &str = "雀魂信息";
pub const COMMAND_ALIASES: &[&str] = &["雀魂查询"];

pub const NICKNAME_TOO_LONG: &str = "Nickname exceeds the Mahjong Soul length limit";
pub const NICKNAME_EMPTY: &str = "Nickname must not be empty";
pub const INVALID_ARGUMENTS: &str = "Invalid query arguments";

/// Arguments of the query command: `<nickname> [filter]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCommand {
    pub nickname: String,
    /// `None` when no filter argument was given, which means every room rank.
    pub room_ranks: Option<RoomRankFilter>,
}

impl QueryCommand {
    pub fn from_args(args: &[&str], max_nickname_chars: usize) -> Result<Self, QueryError> {
        match args {
            [nickname] => {
                validate_nickname(nickname, max_nickname_chars)?;
                Ok(Self {
                    nickname: nickname.to_string(),
                    room_ranks: None,
                })
            }
            [nickname, filter] => {
                validate_nickname(nickname, max_nickname_chars)?;
                let room_ranks = ranks::resolve(filter)?;
                Ok(Self {
                    nickname: nickname.to_string(),
                    room_ranks: Some(room_ranks),
                })
            }
            _ => Err(QueryError::bad_request(INVALID_ARGUMENTS)),
        }
    }
}

/// Length is counted in characters, not bytes.
pub fn validate_nickname(nickname: &str, max_chars: usize) -> Result<(), QueryError> {
    if nickname.trim().is_empty() {
        return Err(QueryError::bad_request(NICKNAME_EMPTY));
    }
    if nickname.chars().count() > max_chars {
        return Err(QueryError::bad_request(NICKNAME_TOO_LONG));
    }
    Ok(())
}

/// Splits a chat message into arguments when it starts with the query command.
/// Returns `None` for messages addressed to other commands.
pub fn parse_message(message: &str) -> Option<Vec<&str>> {
    let mut words = message.split_whitespace();
    let command = words.next()?;
    let command = command.strip_prefix('/').unwrap_or(command);

    if command == COMMAND_NAME || COMMAND_ALIASES.contains(&command) {
        Some(words.collect())
    } else {
        None
    }
}
