use bench_planner::PlannerError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("unknown strategy code: {0}")]
    UnknownStrategy(u32),
    #[error(transparent)]
    Planner(#[from] PlannerError),
    #[error("run cancelled")]
    Cancelled,
    #[error("failed to write results to {}: {source}", path.display())]
    ResultsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode result row: {0}")]
    Csv(#[from] csv::Error),
}

impl HarnessError {
    /// Errors that end one (domain, problem, strategy) run but let the
    /// rest of a batch continue.
    pub fn is_run_local(&self) -> bool {
        matches!(self, HarnessError::Planner(_))
    }
}
