mod executor;
mod orchestrator;
mod queue;
mod retry;
mod types;

pub use orchestrator::{ExecuteOptions, Orchestrator};
pub use retry::retry_transient;
pub use types::{
    regulation_schema, ExecutionReport, ExecutionStatus, FailedTask, Regulation,
};
