//! End-to-end question pipeline: generate, clean, execute, correct, summarize.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::cleaner::GeneratedSql;
use crate::db::{QueryExecutor, ResultSet};
use crate::error::Result;
use crate::guards::QueryGuard;
use crate::llm::TextCompletion;
use crate::prompt;
use crate::recovery::{QueryState, SelfCorrection};
use crate::session::SessionContext;
use crate::summarizer::Summarizer;

/// Everything produced by one successful turn.
#[derive(Debug)]
pub struct TurnOutcome {
    /// Cleaned SQL from the generation step.
    pub sql: String,
    /// Replacement SQL, present when the first execution failed.
    pub corrected_sql: Option<String>,
    pub rows: ResultSet,
    pub summary: String,
    pub attempts: u8,
    pub elapsed_ms: u64,
    pub trace: Vec<QueryState>,
}

impl TurnOutcome {
    /// SQL that actually produced the rows.
    pub fn final_sql(&self) -> &str {
        self.corrected_sql.as_deref().unwrap_or(&self.sql)
    }

    /// Transcript entry recorded in the session history.
    pub fn response_text(&self) -> String {
        format!(
            "Generated SQL:\n{}\n\nSummary:\n{}",
            self.final_sql(),
            self.summary
        )
    }
}

/// Wires the generation LLM, the executor and the statement guard together.
pub struct Pipeline {
    llm: Arc<dyn TextCompletion>,
    executor: Arc<dyn QueryExecutor>,
    guard: QueryGuard,
}

impl Pipeline {
    pub fn new(
        llm: Arc<dyn TextCompletion>,
        executor: Arc<dyn QueryExecutor>,
        guard: QueryGuard,
    ) -> Self {
        Self {
            llm,
            executor,
            guard,
        }
    }

    /// Runs one question through generation, execution and summarization.
    pub async fn run_turn(&self, question: &str) -> Result<TurnOutcome> {
        let started = Instant::now();

        info!("Generating SQL for question: {}", question);
        let raw = self
            .llm
            .complete(&prompt::generation_prompt(question))
            .await?;
        let generated = GeneratedSql::new(raw);
        info!("Generated SQL: {}", generated.cleaned);

        let recovery = SelfCorrection::new(self.llm.as_ref(), self.executor.as_ref(), &self.guard);
        let outcome = match recovery.run(&generated, question).await {
            Ok(outcome) => outcome,
            Err(failure) => {
                warn!("Turn failed, states visited: {:?}", failure.trace);
                return Err(failure.fault);
            }
        };

        let final_sql = outcome
            .corrected_sql
            .as_deref()
            .unwrap_or(&generated.cleaned)
            .to_string();
        let summarizer = Summarizer::new(self.llm.as_ref());
        let summary = summarizer.summarize(&final_sql, &outcome.rows).await?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            "Turn finished: {} row(s) in {} ms ({} attempt(s))",
            outcome.rows.row_count(),
            elapsed_ms,
            outcome.attempts
        );

        Ok(TurnOutcome {
            sql: generated.cleaned,
            corrected_sql: outcome.corrected_sql,
            rows: outcome.rows,
            summary,
            attempts: outcome.attempts,
            elapsed_ms,
            trace: outcome.trace,
        })
    }
}

/// A pipeline plus the session history it feeds.
pub struct ChatSession {
    pipeline: Pipeline,
    context: SessionContext,
}

impl ChatSession {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            context: SessionContext::new(),
        }
    }

    /// Runs one turn and, on success, records it in the session history.
    pub async fn ask(&mut self, question: &str) -> Result<TurnOutcome> {
        let outcome = self.pipeline.run_turn(question).await?;
        self.context
            .record_turn(question.to_string(), outcome.response_text());
        Ok(outcome)
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }
}
