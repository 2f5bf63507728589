//! Interactive natural-language SQL chat for the students MySQL database.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use askdb::config::Config;
use askdb::db::{MySqlExecutor, ResultSet};
use askdb::guards::QueryGuard;
use askdb::llm::LlmClient;
use askdb::pipeline::{ChatSession, Pipeline, TurnOutcome};
use askdb::schema;
use askdb::summarizer::NO_RESULTS_NOTICE;

/// Ask questions about the students database in plain English
#[derive(Parser)]
#[command(name = "askdb")]
#[command(about = "Natural-language SQL chat for the students MySQL database")]
struct Args {
    /// Question to answer; omit for an interactive session
    question: Option<String>,

    /// Permit statements other than SELECT
    #[arg(long)]
    allow_writes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if args.allow_writes {
        config.read_only = false;
    }

    let llm = Arc::new(LlmClient::new(&config.llm)?);
    let executor = Arc::new(MySqlExecutor::connect(&config.database_url).await?);
    info!("Connected to MySQL");

    let pipeline = Pipeline::new(llm, executor, QueryGuard::new(config.read_only));
    let mut session = ChatSession::new(pipeline);

    match args.question {
        Some(question) => {
            let outcome = session.ask(&question).await?;
            render_turn(&outcome);
        }
        None => run_repl(&mut session).await?,
    }

    Ok(())
}

async fn run_repl(session: &mut ChatSession) -> askdb::error::Result<()> {
    println!("Ask questions about the students database.");
    println!("Type :schema for the table layout, :quit to exit.");

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let question = input.trim();
        if question.is_empty() {
            continue;
        }
        match question {
            ":quit" | ":exit" | "quit" | "exit" => break,
            ":schema" => {
                print_schema();
                continue;
            }
            _ => {}
        }

        match session.ask(question).await {
            Ok(outcome) => render_turn(&outcome),
            Err(e) => eprintln!("error: {}", e),
        }
    }

    Ok(())
}

fn print_schema() {
    println!("Table: {}", schema::TABLE_NAME);
    for column in schema::COLUMNS {
        println!("  {}", column);
    }
}

fn render_turn(outcome: &TurnOutcome) {
    println!("assistant> Generated SQL:");
    println!("{}", indent(&outcome.sql));
    if let Some(corrected) = &outcome.corrected_sql {
        println!("assistant> Corrected SQL:");
        println!("{}", indent(corrected));
    }

    if outcome.rows.is_empty() {
        println!("assistant> {}", NO_RESULTS_NOTICE);
    } else {
        println!("assistant> Query results:");
        println!("{}", render_table(&outcome.rows));
        println!("assistant> Summary:");
        println!("{}", indent(&outcome.summary));
    }
    println!(
        "({} row(s) in {} ms, {} attempt(s))",
        outcome.rows.row_count(),
        outcome.elapsed_ms,
        outcome.attempts
    );
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a result set as a width-aligned text table.
fn render_table(results: &ResultSet) -> String {
    let rendered: Vec<Vec<String>> = results
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = results.columns.iter().map(|c| c.len()).collect();
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() && cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut lines = Vec::new();
    let header: Vec<String> = results
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
        .collect();
    lines.push(format!("    {}", header.join(" | ")));

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(format!("    {}", rule.join("-+-")));

    for row in &rendered {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(cell.len());
                format!("{:<width$}", cell, width = width)
            })
            .collect();
        lines.push(format!("    {}", cells.join(" | ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdb::db::Value;

    #[test]
    fn test_render_table_aligns_columns() {
        let results = ResultSet::new(
            vec!["full_name".to_string(), "department".to_string()],
            vec![
                vec![
                    Value::Text("Asha".to_string()),
                    Value::Text("BCA".to_string()),
                ],
                vec![
                    Value::Text("Balakrishnan".to_string()),
                    Value::Text("BSC".to_string()),
                ],
            ],
        );
        let table = render_table(&results);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("full_name"));
        assert!(lines[0].contains("department"));
        assert!(lines[3].contains("Balakrishnan | BSC"));
    }

    #[test]
    fn test_render_table_handles_nulls() {
        let results = ResultSet::new(
            vec!["arrear_paper_names".to_string()],
            vec![vec![Value::Null]],
        );
        let table = render_table(&results);
        assert!(table.contains("NULL"));
    }

    #[test]
    fn test_indent_prefixes_each_line() {
        assert_eq!(indent("a\nb"), "    a\n    b");
    }
}
