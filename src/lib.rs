//! # Vanish Client
//! Asynchronous wrapper around the Vanish disposable email HTTP API, providing simple methods to generate, list, read, and delete temporary mailboxes from Rust using [`Client`] and [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust developers who need throwaway addresses in integration tests, demos, or automation scripts without running mail infrastructure: configure with [`ClientBuilder`], generate an address, poll for messages ([`EmailSummary`]), fetch the full [`EmailDetail`], then delete the mailbox when done.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`, so ensure the chosen Tokio features (`rt-multi-thread` or `current_thread`) are available in your application.
//!
//! ## Out of scope
//! Not a mail server, SMTP sender, or durable mailbox. It only talks to a Vanish API deployment and inherits its availability and retention limits.
//!
//! ## Errors
//! Non-2xx responses surface as [`Error::Api`] carrying the status code and the server's `error` message; transport failures become [`Error::Connection`]; bodies that do not match the expected shape become [`Error::Json`]. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use vanish_client::{Client, PollOptions};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vanish_client::Error> {
//!     let client = Client::builder("https://api.vanish.host")
//!         .api_key("your-key")
//!         .build()?;
//!     let email = client.generate_email(None, None).await?;
//!     println!("Created: {}", email);
//!
//!     let options = PollOptions::new().timeout(Duration::from_secs(120));
//!     if let Some(summary) = client.poll_for_emails(&email, &options).await? {
//!         let detail = client.get_email(&summary.id).await?;
//!         println!("From: {}, Subject: {}", detail.sender, detail.subject);
//!     }
//!
//!     client.delete_mailbox(&email).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;
mod poll;

pub use client::{Client, ClientBuilder, DEFAULT_LIST_LIMIT, DEFAULT_TIMEOUT, create_client};
pub use error::Error;
pub use models::{AttachmentContent, AttachmentMeta, EmailDetail, EmailSummary, PaginatedEmailList};
pub use poll::PollOptions;

/// Result type alias for Vanish operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
