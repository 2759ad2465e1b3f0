use anyhow::{Context, Result};
use async_trait::async_trait;
use majsoul_info::{
    config::AppConfig,
    stats::FixtureSet,
    InMemoryStatsProvider, MessageSink, PlayerNum, QueryCommandHandler, QueryService,
};
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Writes replies to stdout, separated by blank lines.
struct StdoutSink {
    stdout: Mutex<io::Stdout>,
}

#[async_trait]
impl MessageSink for StdoutSink {
    async fn send(&self, text: &str) {
        let mut stdout = self.stdout.lock().await;
        let reply = format!("{}\n\n", text);
        if let Err(err) = stdout.write_all(reply.as_bytes()).await {
            warn!(?err, "Failed to write reply");
        }
        if let Err(err) = stdout.flush().await {
            warn!(?err, "Failed to flush reply");
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "majsoul_info=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let fixtures = match &config.fixtures_path {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read fixtures from {}", path.display()))?;
            FixtureSet::from_json(&json).context("Fixture file is not valid JSON")?
        }
        None => FixtureSet::default(),
    };
    info!(
        players = fixtures.players.len(),
        games = fixtures.games.len(),
        "Loaded fixtures"
    );

    let shared = InMemoryStatsProvider::shared(fixtures);
    let four_player = Arc::new(InMemoryStatsProvider::new(PlayerNum::Four, shared.clone()));
    let three_player = Arc::new(InMemoryStatsProvider::new(PlayerNum::Three, shared));

    let service = QueryService::builder(four_player.clone(), four_player, three_player)
        .with_config(config.query)
        .build();
    let sink = Arc::new(StdoutSink {
        stdout: Mutex::new(io::stdout()),
    });
    let handler = QueryCommandHandler::new(Arc::new(service), sink);

    info!("Reading commands from stdin");

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match handler.handle_message(&line).await {
            Ok(true) => {}
            Ok(false) => warn!(line = %line, "Ignoring unknown command"),
            // Already logged by the handler; keep serving the next command.
            Err(_) => {}
        }
    }

    Ok(())
}
