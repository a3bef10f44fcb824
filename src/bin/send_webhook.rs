//! Sends one signed test delivery to a running inlet service.
//!
//! The secret comes from `--secret` or `WEBHOOK_SECRET` (a `.env` file is
//! loaded first). Re-run with the same `--message-id` to exercise duplicate
//! handling.

use anyhow::{Context, Result};
use clap::Parser;
use inlet_api::crypto::{generate_hmac_hex, DEFAULT_WEBHOOK_SECRET};
use inlet_api::handlers::ingest::SIGNATURE_HEADER;
use inlet_core::NewMessage;

#[derive(Parser)]
#[command(name = "send_webhook")]
#[command(about = "Send a signed test message to an inlet webhook endpoint")]
struct Args {
    /// Webhook URL
    #[arg(long, default_value = "http://127.0.0.1:8000/webhook")]
    url: String,

    /// Shared signing secret
    #[arg(long, env = "WEBHOOK_SECRET", default_value = DEFAULT_WEBHOOK_SECRET, hide_env_values = true)]
    secret: String,

    /// Message identifier; reuse it to test idempotency
    #[arg(long, default_value = "msg_9999")]
    message_id: String,

    /// Sender
    #[arg(long, default_value = "+14155552671")]
    from: String,

    /// Recipient
    #[arg(long, default_value = "+14155550000")]
    to: String,

    /// Sender timestamp
    #[arg(long, default_value = "2025-01-29T10:00:00Z")]
    ts: String,

    /// Message text
    #[arg(long, default_value = "Hello! Testing logs and metrics.")]
    text: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    if args.secret == DEFAULT_WEBHOOK_SECRET {
        eprintln!("warning: signing with the built-in default secret");
    }

    let message = NewMessage {
        message_id: args.message_id,
        sender: args.from,
        recipient: args.to,
        ts: args.ts,
        text: Some(args.text),
    };
    let body = serde_json::to_vec(&message).context("Failed to encode payload")?;
    let signature =
        generate_hmac_hex(&body, &args.secret).context("Failed to sign payload")?;

    println!("Sending to {} with signature {}...", args.url, &signature[..10]);

    let response = reqwest::Client::new()
        .post(&args.url)
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, &signature)
        .body(body)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", args.url))?;

    let status = response.status();
    let text = response.text().await.context("Failed to read response body")?;

    println!("Status: {status}");
    println!("Body: {text}");

    Ok(())
}
