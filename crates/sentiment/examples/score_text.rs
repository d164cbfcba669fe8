//! Score a piece of text with the configured sentiment backend.
//!
//! Run with: cargo run -p sentiment --example score_text
//! Or with custom text: cargo run -p sentiment --example score_text -- "Your text here"
//!
//! Backend selection comes from .env:
//!   SENTIMENT_BACKEND - lexicon (default) or model
//!   SENTIMENT_MODEL_URL - inference endpoint when using the model backend

use sentiment::{build_scorer, SentimentConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let text = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "Had a great day, but I'm a little tired now.".to_string()
    };

    let config = SentimentConfig::from_env()?;
    let scorer = build_scorer(&config)?;

    println!("Backend: {}", scorer.name());
    println!("Text: {}", text);

    let score = scorer.score(&text).await;
    println!("Sentiment: {:.3}", score.value);
    if score.degraded {
        println!("(degraded: backend failed, neutral score used)");
    }

    Ok(())
}
