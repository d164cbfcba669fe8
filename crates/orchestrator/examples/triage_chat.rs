//! Interactive triage chat on the terminal.
//!
//! Run with: cargo run -p orchestrator --example triage_chat
//!
//! Lines are sent to the chat pipeline. Commands:
//!   /mood <1-10> [text]  - submit a mood-journal entry
//!   /recs                - show recommendations
//!   /stats               - show 7- and 30-day sentiment averages
//!   /history             - show the conversation so far
//!   /quit                - exit
//!
//! Configuration via .env file or environment variables:
//!   TRIAGE_USER_ID       - User the session runs as (default: demo)
//!   TRIAGE_DATABASE_URL  - SQLite URL (default: sqlite:triage.db?mode=rwc)
//!   TRIAGE_CATALOG_PATH  - Catalog JSON file (default: built-in catalog)
//!   SENTIMENT_BACKEND    - lexicon (default) or model

use orchestrator::{OrchestratorError, TriageOrchestrator};
use std::env;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("orchestrator=info".parse()?),
        )
        .init();

    let user_id = env::var("TRIAGE_USER_ID").unwrap_or_else(|_| "demo".to_string());
    let orchestrator = TriageOrchestrator::from_env().await?;

    info!(
        "Chatting as {} with pipeline {}",
        user_id,
        orchestrator.pipeline_version()
    );
    println!("Type a message, or /quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }

        if let Err(e) = handle_line(&orchestrator, &user_id, line).await {
            error!("Request failed: {}", e);
            if !e.is_retryable() {
                println!("! {}", e);
            }
        }
    }

    orchestrator.store().close().await;
    Ok(())
}

async fn handle_line(
    orchestrator: &TriageOrchestrator<database::Database>,
    user_id: &str,
    line: &str,
) -> Result<(), OrchestratorError> {
    if let Some(rest) = line.strip_prefix("/mood") {
        let rest = rest.trim();
        let (value, text) = rest.split_once(' ').unwrap_or((rest, ""));
        let Ok(value) = value.parse::<i64>() else {
            println!("usage: /mood <1-10> [text]");
            return Ok(());
        };
        let text = Some(text).filter(|t| !t.trim().is_empty());

        let submission = orchestrator.submit_mood(user_id, text, value, None).await?;
        println!(
            "Logged mood {} (sentiment {:.3}, risk {})",
            submission.entry.mood_value, submission.entry.sentiment, submission.entry.risk_tier
        );
        if submission.suggest_booking {
            println!("It might help to talk to someone. Would you like to book a session?");
        }
        return Ok(());
    }

    match line {
        "/recs" => {
            let recs = orchestrator.get_recommendations(Some(user_id)).await?;
            for item in recs.items {
                println!("- {}: {}", item.title, item.body);
            }
        }
        "/stats" => {
            let stats = orchestrator.mood_analytics(user_id).await?;
            println!(
                "7-day average: {}, 30-day average: {}",
                format_average(stats.avg_sentiment_7d),
                format_average(stats.avg_sentiment_30d)
            );
        }
        "/history" => {
            for turn in orchestrator.chat_history(user_id, None).await? {
                println!(
                    "[{}] {}: {}",
                    turn.created_at.format("%H:%M:%S"),
                    turn.sender.as_str(),
                    turn.text
                );
            }
        }
        _ => {
            let reply = orchestrator.post_chat_turn(Some(user_id), line).await?;
            println!("bot: {}", reply.reply);
            if reply.suggest_booking {
                println!("     (booking options available)");
            }
        }
    }

    Ok(())
}

fn format_average(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v))
}
