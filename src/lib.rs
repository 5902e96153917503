//! Gmail Sender Tally
//!
//! Lists every message in a Gmail mailbox, fetches each message's headers and
//! counts messages per sender.
//!
//! # Overview
//!
//! The pipeline is strictly sequential:
//! - **Authentication**: OAuth2 installed-app flow with a cached token file
//! - **Listing**: page through the message list until the continuation token runs out,
//!   then apply an offset/limit window
//! - **Fetching**: one `messages.get` per selected message; headerless messages are skipped
//! - **Aggregation**: first `From` header per message, chat-service senders excluded
//! - **Reporting**: senders sorted by descending count, printed as `address: count`
//!
//! # Example Usage
//!
//! ```no_run
//! use gmail_sender_tally::{auth, cli::{run_pipeline, PipelineOptions, ProgressReporter}};
//! use gmail_sender_tally::client::{MessageFormat, ProductionGmailClient};
//! use gmail_sender_tally::config::Config;
//! use gmail_sender_tally::lister::ListWindow;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let hub = auth::initialize_gmail_hub(
//!         "credentials.json".as_ref(),
//!         "token.json".as_ref(),
//!         false,
//!     ).await?;
//!     let client = ProductionGmailClient::new(hub, MessageFormat::Full);
//!
//!     let options = PipelineOptions {
//!         listing: config.listing,
//!         window: ListWindow::default(),
//!         chat_marker: config.filter.chat_marker,
//!         raw: false,
//!         top: 10,
//!     };
//!     let report = run_pipeline(&client, &options, &ProgressReporter::new()).await?;
//!     report.body.write_to(&mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`auth`] - OAuth2 authentication and Gmail API initialization
//! - [`client`] - Mailbox client trait and Gmail implementation
//! - [`lister`] - Paged message listing and offset/limit windows
//! - [`fetcher`] - Sequential per-message header retrieval
//! - [`aggregator`] - Sender tally
//! - [`report`] - Sorted report output
//! - [`cli`] - Command-line interface and pipeline orchestration
//! - [`config`] - Configuration management
//! - [`error`] - Error types and result aliases
//! - [`models`] - Core data structures

pub mod aggregator;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod lister;
pub mod models;
pub mod report;

// Re-export commonly used types for convenience
pub use error::{GmailError, Result};

pub use models::{Header, ListPage, MessageDetail, MessageRef, SenderCount};

pub use aggregator::{Aggregator, SenderTally};
pub use client::{MailboxClient, MessageFormat, ProductionGmailClient};
pub use config::Config;
pub use lister::{ListWindow, MessageLister};
pub use report::{Report, ReportBody};

pub use cli::{Cli, PipelineOptions, ProgressReporter};
