use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use super::{
    command::{validate_nickname, QueryCommand},
    QueryError, QueryRequest, VariantOutcome,
};
use crate::{
    config::QueryConfig,
    ranks::{PlayerNum, RoomRankSet},
    report::{ReportAssembler, StatsFormatter},
    stats::{
        PlayerId, PlayerIdentity, PlayerResolver, PlayerStats, ProviderError, StatsProvider,
        StatsResult,
    },
};

pub const INVERTED_WINDOW: &str = "Start time must not be after end time";

/// A stats call in flight for one variant. Dropping it cancels the call.
struct PendingStats {
    variant: PlayerNum,
    room_ranks: RoomRankSet,
    handle: JoinHandle<Result<PlayerStats, ProviderError>>,
}

impl Drop for PendingStats {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Orchestrates one statistics query: resolves the player, fans out one stats
/// call per active variant and assembles the report.
pub struct QueryService {
    resolver: Arc<dyn PlayerResolver>,
    providers: [Arc<dyn StatsProvider>; 2],
    assembler: ReportAssembler,
    config: QueryConfig,
}

impl QueryService {
    pub fn builder(
        resolver: Arc<dyn PlayerResolver>,
        four_player: Arc<dyn StatsProvider>,
        three_player: Arc<dyn StatsProvider>,
    ) -> QueryServiceBuilder {
        QueryServiceBuilder::new(resolver, four_player, three_player)
    }

    /// Runs the query command with its raw arguments, `[nickname]` or
    /// `[nickname, filter]`.
    #[instrument(skip(self))]
    pub async fn execute_command(&self, args: &[&str]) -> Result<String, QueryError> {
        let command = QueryCommand::from_args(args, self.config.max_nickname_chars)?;

        let mut builder = QueryRequest::builder(command.nickname)
            .start_time_floor(self.config.start_time_floor);
        if let Some(room_ranks) = command.room_ranks {
            builder = builder.room_ranks(room_ranks);
        }

        self.execute(builder.build()).await
    }

    #[instrument(skip(self, request), fields(nickname = %request.nickname))]
    pub async fn execute(&self, request: QueryRequest) -> Result<String, QueryError> {
        validate_nickname(&request.nickname, self.config.max_nickname_chars)?;
        if request.start_time > request.end_time {
            return Err(QueryError::bad_request(INVERTED_WINDOW));
        }

        let players = self.resolve_player(&request.nickname).await?;
        let Some(identity) = players.first() else {
            info!("No player matched nickname");
            return Ok(self.assembler.render_to_string(None, false, &[])?);
        };

        let ambiguous = players.len() > 1;
        if ambiguous {
            debug!(
                matches = players.len(),
                player_id = %identity.id,
                "Nickname is ambiguous, using first match"
            );
        }

        debug!(
            variants = ?request.active_variants().collect::<Vec<_>>(),
            "Fanning out stats requests"
        );
        let pending = self.spawn_stats_requests(identity.id, &request);
        let outcomes = self.collect_outcomes(pending).await?;

        let report = self
            .assembler
            .render_to_string(Some(identity), ambiguous, &outcomes)?;

        info!(
            player_id = %identity.id,
            sections = outcomes.len(),
            no_data = outcomes.iter().filter(|o| o.result.is_no_data()).count(),
            "Query completed"
        );

        Ok(report)
    }

    async fn resolve_player(&self, nickname: &str) -> Result<Vec<PlayerIdentity>, QueryError> {
        match self.resolver.search_player(nickname).await {
            Ok(players) => Ok(players),
            Err(err) if err.is_not_found() => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Starts one task per variant with a non-empty rank set. Slots follow
    /// [`PlayerNum::ALL`]; inactive variants hold `None`.
    fn spawn_stats_requests(
        &self,
        player_id: PlayerId,
        request: &QueryRequest,
    ) -> [Option<PendingStats>; 2] {
        PlayerNum::ALL.map(|variant| {
            let room_ranks = request.room_ranks.get(variant);
            if room_ranks.is_empty() {
                debug!(%variant, "Variant skipped, no room ranks selected");
                return None;
            }

            let provider = Arc::clone(&self.providers[variant.index()]);
            let ranks = room_ranks.clone();
            let (start_time, end_time) = (request.start_time, request.end_time);
            let timeout = self.config.stats_timeout;

            debug!(%variant, rooms = ranks.len(), "Requesting stats");
            let handle = tokio::spawn(async move {
                let call = provider.player_stats(player_id, start_time, end_time, &ranks);
                match timeout {
                    Some(limit) => tokio::time::timeout(limit, call)
                        .await
                        .unwrap_or(Err(ProviderError::Timeout(limit))),
                    None => call.await,
                }
            });

            Some(PendingStats {
                variant,
                room_ranks: room_ranks.clone(),
                handle,
            })
        })
    }

    /// Awaits the slots in report order. A not-found answer becomes
    /// [`StatsResult::NoData`]; any other failure aborts the query, and the
    /// remaining slots are dropped, which cancels their calls.
    async fn collect_outcomes(
        &self,
        pending: [Option<PendingStats>; 2],
    ) -> Result<Vec<VariantOutcome>, QueryError> {
        let mut outcomes = Vec::with_capacity(pending.len());

        for mut slot in pending.into_iter().flatten() {
            let result = match (&mut slot.handle).await {
                Ok(Ok(stats)) => StatsResult::Data(stats),
                Ok(Err(err)) if err.is_not_found() => {
                    debug!(variant = %slot.variant, "No stats for variant");
                    StatsResult::NoData
                }
                Ok(Err(err)) => {
                    debug!(variant = %slot.variant, %err, "Stats request failed");
                    return Err(err.into());
                }
                Err(join_err) => {
                    return Err(ProviderError::Task(join_err.to_string()).into());
                }
            };

            outcomes.push(VariantOutcome {
                variant: slot.variant,
                room_ranks: std::mem::take(&mut slot.room_ranks),
                result,
            });
        }

        Ok(outcomes)
    }
}

pub struct QueryServiceBuilder {
    resolver: Arc<dyn PlayerResolver>,
    providers: [Arc<dyn StatsProvider>; 2],
    assembler: ReportAssembler,
    config: QueryConfig,
}

impl QueryServiceBuilder {
    fn new(
        resolver: Arc<dyn PlayerResolver>,
        four_player: Arc<dyn StatsProvider>,
        three_player: Arc<dyn StatsProvider>,
    ) -> Self {
        Self {
            resolver,
            providers: [four_player, three_player],
            assembler: ReportAssembler::default(),
            config: QueryConfig::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn StatsFormatter>) -> Self {
        self.assembler = ReportAssembler::new(formatter);
        self
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> QueryService {
        QueryService {
            resolver: self.resolver,
            providers: self.providers,
            assembler: self.assembler,
            config: self.config,
        }
    }
}
