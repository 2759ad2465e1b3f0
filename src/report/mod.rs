pub mod formatter;

pub use formatter::{PlainStatsFormatter, StatsFormatter, NO_RECORD_LINE};

use std::fmt::{self, Write};
use std::sync::Arc;

use crate::query::VariantOutcome;
use crate::stats::PlayerIdentity;

pub const NO_DATA_MESSAGE: &str =
    "No matches at or above the Gold Room were found for this player.";
pub const AMBIGUOUS_NOTICE: &str = "Several players match this nickname. If this is not the player you meant, please enter the full nickname.";
pub const DISCLAIMER: &str =
    "PS: data excludes matches below the Gold Room and matches before 2019-11-29.";

/// Assembles the final reply text from the resolved identity and the
/// per-variant outcomes.
#[derive(Clone)]
pub struct ReportAssembler {
    formatter: Arc<dyn StatsFormatter>,
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new(Arc::new(PlainStatsFormatter::new()))
    }
}

impl ReportAssembler {
    pub fn new(formatter: Arc<dyn StatsFormatter>) -> Self {
        Self { formatter }
    }

    /// Writes the report into `out`. Outcomes must already be in report order;
    /// they are ignored when no player was found.
    pub fn render(
        &self,
        out: &mut dyn Write,
        identity: Option<&PlayerIdentity>,
        ambiguous: bool,
        outcomes: &[VariantOutcome],
    ) -> fmt::Result {
        let Some(identity) = identity else {
            return out.write_str(NO_DATA_MESSAGE);
        };

        if ambiguous {
            writeln!(out, "{}", AMBIGUOUS_NOTICE)?;
        }
        writeln!(out, "Nickname: {}", identity.nickname)?;

        for outcome in outcomes {
            out.write_char('\n')?;
            self.formatter
                .format(out, &outcome.result, &outcome.room_ranks, outcome.variant)?;
        }

        out.write_char('\n')?;
        out.write_str(DISCLAIMER)
    }

    pub fn render_to_string(
        &self,
        identity: Option<&PlayerIdentity>,
        ambiguous: bool,
        outcomes: &[VariantOutcome],
    ) -> Result<String, fmt::Error> {
        let mut report = String::new();
        self.render(&mut report, identity, ambiguous, outcomes)?;
        Ok(report)
    }
}
