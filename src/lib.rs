pub mod error;
pub mod config;
pub mod schema;
pub mod prompt;
pub mod cleaner;
pub mod guards;
pub mod llm;
pub mod db;
pub mod recovery;
pub mod summarizer;
pub mod session;
pub mod pipeline;
