//! Normalization of raw LLM output into executable SQL text.

/// Strips markdown code fences and one trailing semicolon from raw LLM output.
///
/// Only a single trailing semicolon is removed; interior semicolons are left
/// for the statement guard to judge.
pub fn clean_sql(raw: &str) -> String {
    let stripped = raw
        .trim()
        .trim_start_matches("```sql")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let without_terminator = stripped.strip_suffix(';').unwrap_or(stripped);
    without_terminator.trim_end().to_string()
}

/// Raw LLM output paired with its cleaned, executable form.
///
/// Correction prompts quote the raw text; execution uses the cleaned text.
#[derive(Debug, Clone)]
pub struct GeneratedSql {
    pub raw: String,
    pub cleaned: String,
}

impl GeneratedSql {
    pub fn new(raw: String) -> Self {
        let cleaned = clean_sql(&raw);
        Self { raw, cleaned }
    }
}
