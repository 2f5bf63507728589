//! Statement Guards
//!
//! Read-only gate applied to every statement before it reaches the database.

use crate::error::{AskdbError, Result};

/// Gate that restricts execution to single read-only statements.
pub struct QueryGuard {
    read_only: bool,
}

impl Default for QueryGuard {
    fn default() -> Self {
        Self { read_only: true }
    }
}

impl QueryGuard {
    pub fn new(read_only: bool) -> Self {
        Self { read_only }
    }

    /// Validates a cleaned SQL statement.
    ///
    /// Empty statements are always rejected. In read-only mode the statement
    /// must begin with SELECT or WITH and must not chain further statements.
    pub fn check(&self, sql: &str) -> Result<()> {
        let trimmed = sql.trim();
        if trimmed.is_empty() {
            return Err(AskdbError::Rejected("statement is empty".to_string()));
        }

        if !self.read_only {
            return Ok(());
        }

        let keyword = leading_keyword(trimmed);
        if !keyword.eq_ignore_ascii_case("SELECT") && !keyword.eq_ignore_ascii_case("WITH") {
            return Err(AskdbError::Rejected(format!(
                "only SELECT statements are allowed, got '{}'",
                keyword
            )));
        }

        if statement_count(trimmed) > 1 {
            return Err(AskdbError::Rejected(
                "multiple statements are not allowed".to_string(),
            ));
        }

        Ok(())
    }
}

/// First keyword of a statement, with any leading parentheses removed.
fn leading_keyword(sql: &str) -> &str {
    let start = sql.trim_start_matches(|c: char| c == '(' || c.is_whitespace());
    start.split_whitespace().next().unwrap_or("")
}

/// Number of `;`-separated segments with content. Separators inside quoted
/// strings or backtick identifiers do not split.
fn statement_count(sql: &str) -> usize {
    let mut count = 0;
    let mut has_content = false;
    let mut quote: Option<char> = None;
    let mut chars = sql.chars();
    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == '\\' && q != '`' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
            }
            None if c == ';' => {
                if has_content {
                    count += 1;
                }
                has_content = false;
                continue;
            }
            None => {
                if matches!(c, '\'' | '"' | '`') {
                    quote = Some(c);
                }
            }
        }
        if !c.is_whitespace() {
            has_content = true;
        }
    }
    if has_content {
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_passes() {
        let guard = QueryGuard::new(true);
        assert!(guard.check("SELECT COUNT(*) FROM students").is_ok());
        assert!(guard.check("select 1").is_ok());
    }

    #[test]
    fn test_with_cte_passes() {
        let guard = QueryGuard::new(true);
        assert!(guard
            .check("WITH s AS (SELECT * FROM students) SELECT COUNT(*) FROM s")
            .is_ok());
    }

    #[test]
    fn test_parenthesized_select_passes() {
        let guard = QueryGuard::new(true);
        assert!(guard.check("(SELECT 1)").is_ok());
    }

    #[test]
    fn test_write_statements_rejected() {
        let guard = QueryGuard::new(true);
        for sql in [
            "DELETE FROM students",
            "UPDATE students SET gender = 'Male'",
            "INSERT INTO students VALUES (1)",
            "DROP TABLE students",
        ] {
            let err = guard.check(sql).unwrap_err();
            assert!(matches!(err, AskdbError::Rejected(_)), "{} was not rejected", sql);
        }
    }

    #[test]
    fn test_chained_statements_rejected() {
        let guard = QueryGuard::new(true);
        let err = guard
            .check("SELECT 1; DROP TABLE students")
            .unwrap_err();
        assert!(matches!(err, AskdbError::Rejected(_)));
    }

    #[test]
    fn test_trailing_semicolon_tolerated() {
        let guard = QueryGuard::new(true);
        assert!(guard.check("SELECT 1;").is_ok());
    }

    #[test]
    fn test_semicolon_inside_string_is_not_chaining() {
        let guard = QueryGuard::new(true);
        assert!(guard
            .check("SELECT * FROM students WHERE address LIKE '%;%'")
            .is_ok());
        assert!(guard
            .check("SELECT * FROM students WHERE arrear_paper_names = 'Maths; Physics'")
            .is_ok());
        assert!(guard
            .check("SELECT full_name FROM students WHERE full_name = 'O\\'Neil; Jr'")
            .is_ok());
    }

    #[test]
    fn test_quoted_semicolon_then_chained_statement_rejected() {
        let guard = QueryGuard::new(true);
        let err = guard
            .check("SELECT 'a;b' FROM students; DELETE FROM students")
            .unwrap_err();
        assert!(matches!(err, AskdbError::Rejected(_)));
    }

    #[test]
    fn test_empty_rejected_even_when_writable() {
        let guard = QueryGuard::new(false);
        assert!(guard.check("   ").is_err());
    }

    #[test]
    fn test_writable_mode_passes_writes() {
        let guard = QueryGuard::new(false);
        assert!(guard.check("UPDATE students SET hostel = 'Hostel'").is_ok());
    }
}
