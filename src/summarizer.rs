//! Plain-English summaries of query results.

use crate::db::ResultSet;
use crate::error::Result;
use crate::llm::TextCompletion;
use crate::prompt;

/// Reply used for empty result sets; no LLM call is made for these.
pub const NO_RESULTS_NOTICE: &str = "No matching records found.";

/// Turns a result set into a short natural-language answer.
pub struct Summarizer<'a> {
    llm: &'a dyn TextCompletion,
}

impl<'a> Summarizer<'a> {
    pub fn new(llm: &'a dyn TextCompletion) -> Self {
        Self { llm }
    }

    pub async fn summarize(&self, sql: &str, results: &ResultSet) -> Result<String> {
        if results.is_empty() {
            return Ok(NO_RESULTS_NOTICE.to_string());
        }

        let summary = self
            .llm
            .complete(&prompt::summary_prompt(sql, results))
            .await?;
        Ok(summary.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Value;
    use crate::error::AskdbError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct SingleReply {
        reply: String,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl TextCompletion for SingleReply {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.reply.clone())
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl TextCompletion for AlwaysFails {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(AskdbError::Llm("should not be called".to_string()))
        }
    }

    #[tokio::test]
    async fn test_empty_results_use_fixed_notice() {
        let llm = AlwaysFails;
        let summarizer = Summarizer::new(&llm);
        let summary = summarizer
            .summarize("SELECT * FROM students WHERE 1 = 0", &ResultSet::default())
            .await
            .unwrap();
        assert_eq!(summary, NO_RESULTS_NOTICE);
    }

    #[tokio::test]
    async fn test_non_empty_results_are_summarized() {
        let llm = SingleReply {
            reply: "  There are 3 boys in second year.  ".to_string(),
            calls: Mutex::new(0),
        };
        let summarizer = Summarizer::new(&llm);
        let results = ResultSet::new(
            vec!["COUNT(*)".to_string()],
            vec![vec![Value::Int(3)]],
        );
        let summary = summarizer
            .summarize("SELECT COUNT(*) FROM students", &results)
            .await
            .unwrap();
        assert_eq!(summary, "There are 3 boys in second year.");
        assert_eq!(*llm.calls.lock().unwrap(), 1);
    }
}
