use std::collections::BTreeSet;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::{PlayerNum, RoomRank, RoomRankFilter, RoundLength, Tier};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized room rank filter: {token}")]
pub struct FilterSyntaxError {
    pub token: String,
}

const ALL_SELECTORS: &[&str] = &["全部", "all"];

// Longer spellings first, prefixes are tried in order.
const FOUR_PLAYER_PREFIXES: &[&str] = &["四麻", "四人", "4p", "四", "4"];
const THREE_PLAYER_PREFIXES: &[&str] = &["三麻", "三人", "3p", "三", "3"];

const TIER_SELECTORS: &[(&str, Tier)] = &[
    ("金之间", Tier::Gold),
    ("金", Tier::Gold),
    ("gold", Tier::Gold),
    ("g", Tier::Gold),
    ("玉之间", Tier::Jade),
    ("玉", Tier::Jade),
    ("jade", Tier::Jade),
    ("j", Tier::Jade),
    ("王座之间", Tier::Throne),
    ("王座", Tier::Throne),
    ("王", Tier::Throne),
    ("throne", Tier::Throne),
    ("t", Tier::Throne),
];

const ABOVE_SUFFIXES: &[&str] = &["以上", "+"];

const LENGTH_SELECTORS: &[(&str, RoundLength)] = &[
    ("东风", RoundLength::East),
    ("東風", RoundLength::East),
    ("东", RoundLength::East),
    ("東", RoundLength::East),
    ("east", RoundLength::East),
    ("e", RoundLength::East),
    ("南风", RoundLength::South),
    ("南風", RoundLength::South),
    ("南", RoundLength::South),
    ("south", RoundLength::South),
    ("s", RoundLength::South),
];

fn strip_any<'a>(input: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes
        .iter()
        .find_map(|prefix| input.strip_prefix(prefix))
}

fn strip_selector<'a, T: Copy>(input: &'a str, selectors: &[(&str, T)]) -> Option<(&'a str, T)> {
    selectors
        .iter()
        .find_map(|(prefix, value)| input.strip_prefix(prefix).map(|rest| (rest, *value)))
}

/// Resolves a filter token such as `金`, `玉以上`, `四麻王座南` or `3pjs` into
/// the room ranks to query for each variant.
///
/// Grammar: `[variant] tier* [以上|+] [length]`, ASCII matched case-insensitively.
/// Missing tiers select every tier, a missing length selects both lengths, and a
/// variant prefix leaves the other variant with an empty set.
pub fn resolve(token: &str) -> Result<RoomRankFilter, FilterSyntaxError> {
    let syntax_error = || FilterSyntaxError {
        token: token.to_string(),
    };

    let normalized = token.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(syntax_error());
    }
    if ALL_SELECTORS.contains(&normalized.as_str()) {
        return Ok(RoomRankFilter::all());
    }

    let mut rest = normalized.as_str();
    let mut matched = false;

    let variants: Vec<PlayerNum> = if let Some(r) = strip_any(rest, FOUR_PLAYER_PREFIXES) {
        rest = r;
        matched = true;
        vec![PlayerNum::Four]
    } else if let Some(r) = strip_any(rest, THREE_PLAYER_PREFIXES) {
        rest = r;
        matched = true;
        vec![PlayerNum::Three]
    } else {
        PlayerNum::ALL.to_vec()
    };

    let mut tiers = BTreeSet::new();
    while let Some((r, tier)) = strip_selector(rest, TIER_SELECTORS) {
        rest = r;
        matched = true;
        tiers.insert(tier);
    }

    if let Some(r) = strip_any(rest, ABOVE_SUFFIXES) {
        let lowest = tiers.first().copied().ok_or_else(syntax_error)?;
        tiers.extend(Tier::iter().filter(|tier| *tier >= lowest));
        rest = r;
    }
    if tiers.is_empty() {
        tiers.extend(Tier::iter());
    }

    let lengths: Vec<RoundLength> = match strip_selector(rest, LENGTH_SELECTORS) {
        Some((r, length)) => {
            rest = r;
            matched = true;
            vec![length]
        }
        None => RoundLength::iter().collect(),
    };

    if !matched || !rest.is_empty() {
        return Err(syntax_error());
    }

    let mut filter = RoomRankFilter::default();
    for player_num in variants {
        let ranks = tiers
            .iter()
            .flat_map(|tier| {
                lengths
                    .iter()
                    .map(move |length| RoomRank::new(player_num, *tier, *length))
            })
            .collect();
        match player_num {
            PlayerNum::Four => filter.four = ranks,
            PlayerNum::Three => filter.three = ranks,
        }
    }

    Ok(filter)
}
