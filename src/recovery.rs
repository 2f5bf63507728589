//! Self-Correction
//!
//! Single-retry execution loop that asks the LLM to repair a failed query.

use tracing::{info, warn};

use crate::cleaner::GeneratedSql;
use crate::db::{QueryExecutor, ResultSet};
use crate::error::{AskdbError, Result};
use crate::guards::QueryGuard;
use crate::llm::TextCompletion;
use crate::prompt;

/// Lifecycle states of one query attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Generated,
    Executing,
    Succeeded,
    Failed,
    Correcting,
    ReExecuting,
    FatallyFailed,
}

/// Outcome of the execute / correct / re-execute sequence.
#[derive(Debug)]
pub struct RecoveryOutcome {
    pub rows: ResultSet,
    pub corrected_sql: Option<String>,
    pub attempts: u8,
    pub trace: Vec<QueryState>,
}

/// Terminal failure of the sequence, with the states visited up to it.
#[derive(Debug)]
pub struct RecoveryFailure {
    pub fault: AskdbError,
    pub trace: Vec<QueryState>,
}

/// Runs a generated query with at most one LLM-backed correction.
///
/// Guard refusals and driver errors take the same correction path. The fault
/// text is passed to the correction prompt verbatim, never interpreted.
pub struct SelfCorrection<'a> {
    llm: &'a dyn TextCompletion,
    executor: &'a dyn QueryExecutor,
    guard: &'a QueryGuard,
}

impl<'a> SelfCorrection<'a> {
    pub fn new(
        llm: &'a dyn TextCompletion,
        executor: &'a dyn QueryExecutor,
        guard: &'a QueryGuard,
    ) -> Self {
        Self {
            llm,
            executor,
            guard,
        }
    }

    /// Executes the query, correcting it once on failure.
    ///
    /// The correction prompt quotes the raw generated text, the fault message
    /// and the user's question. A second failure is final; failures carry the
    /// fault together with the visited states.
    pub async fn run(
        &self,
        generated: &GeneratedSql,
        question: &str,
    ) -> std::result::Result<RecoveryOutcome, RecoveryFailure> {
        let mut trace = vec![QueryState::Generated, QueryState::Executing];

        let fault = match self.execute(&generated.cleaned).await {
            Ok(rows) => {
                trace.push(QueryState::Succeeded);
                return Ok(RecoveryOutcome {
                    rows,
                    corrected_sql: None,
                    attempts: 1,
                    trace,
                });
            }
            Err(fault) => fault,
        };

        trace.push(QueryState::Failed);
        warn!("Query failed, attempting correction: {}", fault);
        trace.push(QueryState::Correcting);

        let correction =
            prompt::correction_prompt(&generated.raw, &fault.to_string(), question);
        let corrected = match self.llm.complete(&correction).await {
            Ok(text) => text.trim().to_string(),
            Err(fault) => return Err(RecoveryFailure { fault, trace }),
        };
        info!("Corrected SQL: {}", corrected);

        trace.push(QueryState::ReExecuting);
        match self.execute(&corrected).await {
            Ok(rows) => {
                trace.push(QueryState::Succeeded);
                Ok(RecoveryOutcome {
                    rows,
                    corrected_sql: Some(corrected),
                    attempts: 2,
                    trace,
                })
            }
            Err(second) => {
                trace.push(QueryState::FatallyFailed);
                warn!("Corrected query also failed, giving up: {}", second);
                Err(RecoveryFailure {
                    fault: second,
                    trace,
                })
            }
        }
    }

    async fn execute(&self, sql: &str) -> Result<ResultSet> {
        self.guard.check(sql)?;
        self.executor.run(sql).await
    }
}
