use std::fmt::{self, Write};

use crate::ranks::{describe_ranks, PlayerNum, RoomRankSet};
use crate::stats::{PlayerStats, StatsResult};

pub const NO_RECORD_LINE: &str = "No record for this period and filter.";

const PLACEMENT_LABELS: [&str; 4] = ["1st", "2nd", "3rd", "4th"];

/// Renders the block of one variant into the report.
pub trait StatsFormatter: Send + Sync {
    fn format(
        &self,
        out: &mut dyn Write,
        result: &StatsResult,
        ranks: &RoomRankSet,
        variant: PlayerNum,
    ) -> fmt::Result;
}

/// Plain text layout, one field per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainStatsFormatter;

impl PlainStatsFormatter {
    pub fn new() -> Self {
        Self
    }

    fn write_stats(&self, out: &mut dyn Write, stats: &PlayerStats) -> fmt::Result {
        writeln!(out, "Games: {}", stats.count)?;
        writeln!(
            out,
            "Level: {} ({} pts)",
            stats.level,
            stats.level.current_score()
        )?;
        writeln!(out, "Peak level: {}", stats.max_level)?;
        writeln!(out, "Average placement: {:.2}", stats.avg_rank)?;

        let rates = stats
            .rank_rates
            .iter()
            .zip(PLACEMENT_LABELS)
            .map(|(rate, label)| format!("{} {:.1}%", label, rate * 100.0))
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(out, "Placement rates: {}", rates)?;

        if !stats.rank_avg_score.is_empty() {
            let scores = stats
                .rank_avg_score
                .iter()
                .zip(PLACEMENT_LABELS)
                .map(|(score, label)| format!("{} {:.0}", label, score))
                .collect::<Vec<_>>()
                .join(" | ");
            writeln!(out, "Average points: {}", scores)?;
        }

        writeln!(out, "Bust rate: {:.1}%", stats.negative_rate * 100.0)?;

        if let (Some(started), Some(latest)) = (stats.started_at, stats.latest_at) {
            writeln!(
                out,
                "Period: {} to {}",
                started.format("%Y-%m-%d"),
                latest.format("%Y-%m-%d")
            )?;
        }

        Ok(())
    }
}

impl StatsFormatter for PlainStatsFormatter {
    fn format(
        &self,
        out: &mut dyn Write,
        result: &StatsResult,
        ranks: &RoomRankSet,
        variant: PlayerNum,
    ) -> fmt::Result {
        writeln!(out, "[{}] {}", variant, describe_ranks(variant, ranks))?;

        match result {
            StatsResult::Data(stats) => self.write_stats(out, stats),
            StatsResult::NoData => writeln!(out, "{}", NO_RECORD_LINE),
        }
    }
}
