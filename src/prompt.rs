//! Prompt templates for SQL generation, correction and result summaries.

use crate::db::ResultSet;
use crate::schema::{column_block, TABLE_NAME};

/// Rows of a result set included verbatim in the summary prompt before
/// switching to a truncated preview.
pub const SUMMARY_SAMPLE_ROWS: usize = 100;

/// Prompt that turns a natural-language question into a MySQL query.
pub fn generation_prompt(question: &str) -> String {
    format!(
        r#"You are a MySQL text-to-SQL generator for a student records database.
Convert the user's natural-language question into the most precise SQL SELECT
query possible.

Table: {}
Columns:
{}

Rules:
1. Output ONLY valid, executable MySQL SQL.
2. NEVER return markdown formatting (no ``` blocks).
3. NEVER explain your reasoning.
4. NEVER invent new table names or columns.
5. ALWAYS use existing column names exactly as written.
6. Prefer selecting columns explicitly when possible.
7. Use COUNT(), GROUP BY, ORDER BY, LIKE, AND/OR when the question asks for
   counts, groups, filters or sorting.
8. For vague questions ("students in hostel"), infer the best column and value,
   e.g. hostel = 'Hostel'.
9. When the input is incomplete, still produce the MOST reasonable single query.
10. NEVER modify the user's intent.

Examples:
Question: how many boys are in second year?
SQL: SELECT COUNT(*) FROM students WHERE gender = 'Male' AND year_of_study = '2nd Year';

Question: show hostel girls in BCA
SQL: SELECT full_name, department, hostel FROM students WHERE gender = 'Female' AND department = 'BCA' AND hostel = 'Hostel';

Question: students who have unpaid semesters
SQL: SELECT * FROM students WHERE unpaid_semesters IS NOT NULL;

Return ONLY the SQL query and nothing else.

Question: {}"#,
        TABLE_NAME,
        column_block(),
        question
    )
}

/// Prompt that asks the LLM to repair a query that failed to execute.
pub fn correction_prompt(bad_sql: &str, error_message: &str, question: &str) -> String {
    format!(
        r#"Fix this SQL query.

BAD SQL:
{}

ERROR:
{}

USER QUESTION:
{}

Return only corrected SQL without markdown."#,
        bad_sql, error_message, question
    )
}

/// Prompt that asks the LLM for a plain-English summary of query results.
///
/// Large result sets are truncated to the first [`SUMMARY_SAMPLE_ROWS`] rows
/// so the prompt stays within reasonable token limits.
pub fn summary_prompt(sql: &str, results: &ResultSet) -> String {
    let sampled = results.rows.len().min(SUMMARY_SAMPLE_ROWS);
    let preview = serde_json::json!({
        "columns": results.columns,
        "rows": &results.rows[..sampled],
    });
    let truncation_note = if results.rows.len() > sampled {
        format!(
            "\n(showing first {} of {} rows)",
            sampled,
            results.rows.len()
        )
    } else {
        String::new()
    };

    format!(
        r#"Summarize this SQL output in simple English:

SQL:
{}

RESULTS:
{}{}

Rules:
- Be clear, simple.
- No invented data; mention only what is in the results.
- Include the concrete numbers that answer the question."#,
        sql,
        serde_json::to_string_pretty(&preview).unwrap_or_default(),
        truncation_note
    )
}
