use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::{command::parse_message, QueryError, QueryService};

/// Delivers reply text to wherever the command came from.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, text: &str);
}

/// Entry point used by the chat front end. Sends the report on success and a
/// short correction on bad input. Service failures send nothing and are
/// returned to the caller.
pub struct QueryCommandHandler {
    service: Arc<QueryService>,
    sink: Arc<dyn MessageSink>,
}

impl QueryCommandHandler {
    pub fn new(service: Arc<QueryService>, sink: Arc<dyn MessageSink>) -> Self {
        Self { service, sink }
    }

    /// Returns `Ok(false)` when the message is not a query command.
    #[instrument(skip(self))]
    pub async fn handle_message(&self, message: &str) -> Result<bool, QueryError> {
        let Some(args) = parse_message(message) else {
            return Ok(false);
        };

        self.handle_args(&args).await?;
        Ok(true)
    }

    pub async fn handle_args(&self, args: &[&str]) -> Result<(), QueryError> {
        match self.service.execute_command(args).await {
            Ok(report) => {
                self.sink.send(&report).await;
                Ok(())
            }
            Err(QueryError::BadRequest(message)) => {
                debug!(%message, "Rejected query arguments");
                self.sink.send(&message).await;
                Ok(())
            }
            Err(err) => {
                error!(?err, "Query failed");
                Err(err)
            }
        }
    }
}
