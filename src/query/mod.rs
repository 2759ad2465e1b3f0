pub mod command;
pub mod handler;
pub mod service;

mod errors;
pub mod types;

pub use command::QueryCommand;
pub use errors::QueryError;
pub use handler::{MessageSink, QueryCommandHandler};
pub use service::{QueryService, QueryServiceBuilder};
pub use types::{QueryRequest, QueryRequestBuilder, VariantOutcome};
