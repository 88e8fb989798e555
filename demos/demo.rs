//! Generate a mailbox, wait for a message, print it, and clean up.
//!
//! ```text
//! VANISH_URL=https://api.vanish.host VANISH_API_KEY=... RUST_LOG=vanish_client=debug \
//!     cargo run --example demo
//! ```

use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vanish_client::{Client, PollOptions};

#[tokio::main]
async fn main() -> Result<(), vanish_client::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let base_url =
        std::env::var("VANISH_URL").unwrap_or_else(|_| "https://api.vanish.host".to_string());
    let mut builder = Client::builder(base_url).timeout(Duration::from_secs(15));
    if let Ok(key) = std::env::var("VANISH_API_KEY") {
        builder = builder.api_key(key);
    }
    let client = builder.build()?;

    let domains = client.get_domains().await?;
    println!("Domains: {}", domains.join(", "));

    let email = client.generate_email(domains.first().map(String::as_str), None).await?;
    println!("Created: {email}");
    println!("Send a message to it within two minutes...");

    let options = PollOptions::new()
        .timeout(Duration::from_secs(120))
        .interval(Duration::from_secs(3));
    match client.poll_for_emails(&email, &options).await? {
        Some(summary) => {
            let detail = client.get_email(&summary.id).await?;
            println!("From: {}", detail.sender);
            println!("Subject: {}", detail.subject);
            println!("Received: {}", detail.received_at);
            println!("\n{}", detail.text);
            for attachment in &detail.attachments {
                let content = client.get_attachment(&detail.id, &attachment.id).await?;
                println!(
                    "Attachment {} ({}, {} bytes)",
                    attachment.name,
                    content.content_type().unwrap_or(&attachment.mime_type),
                    content.data.len()
                );
            }
        }
        None => println!("No email arrived."),
    }

    let deleted = client.delete_mailbox(&email).await?;
    println!("Deleted {deleted} email(s)");
    Ok(())
}
