//! Command-line interface and pipeline orchestration

use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::aggregator::Aggregator;
use crate::auth;
use crate::client::{MailboxClient, MessageFormat, ProductionGmailClient};
use crate::config::{Config, ListingConfig};
use crate::error::{GmailError, Result};
use crate::fetcher::fetch_details;
use crate::lister::{ListWindow, MessageLister};
use crate::report::{Report, ReportBody};

#[derive(Parser, Debug)]
#[command(name = "sender-tally")]
#[command(version)]
#[command(about = "Count Gmail messages per sender", long_about = None)]
pub struct Cli {
    /// Number of messages to skip after listing
    #[arg(short = 'o', long, default_value_t = 0)]
    pub offset: usize,

    /// Number of messages to keep after the offset (0 = to the end)
    #[arg(short = 'l', long, default_value_t = 0)]
    pub limit: usize,

    /// Path to OAuth2 client secret file
    #[arg(short = 'c', long, default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Path to token cache file
    #[arg(long, default_value = "token.json")]
    pub token_cache: PathBuf,

    /// Path to configuration file
    #[arg(long, default_value = "sender-tally.toml")]
    pub config: PathBuf,

    /// Print the From header of every message instead of the tally
    #[arg(long)]
    pub raw: bool,

    /// Only print the N most frequent senders (0 = all)
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    /// Also write the report lines to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn window(&self) -> ListWindow {
        ListWindow::new(self.offset, self.limit)
    }
}

/// Progress reporter using indicatif
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner_style: ProgressStyle,
    bar_style: ProgressStyle,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_multi_progress(MultiProgress::new())
    }

    /// Share an existing MultiProgress, e.g. the one log output is routed through
    pub fn with_multi_progress(multi: MultiProgress) -> Self {
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed:>6}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");

        let bar_style = ProgressStyle::default_bar()
            .template("[{elapsed:>6}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");

        Self {
            multi,
            spinner_style,
            bar_style,
        }
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self::with_multi_progress(MultiProgress::with_draw_target(ProgressDrawTarget::hidden()))
    }

    pub fn add_spinner(&self, msg: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(self.spinner_style.clone());
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn add_progress_bar(&self, len: u64, msg: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new(len));
        pb.set_style(self.bar_style.clone());
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Finish a spinner and clear it from the multi-progress display
    pub fn finish_spinner(&self, pb: &ProgressBar, msg: &str) {
        pb.finish_and_clear();
        let _ = self.multi.println(format!("  ✓ {}", msg));
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for one list -> fetch -> report run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub listing: ListingConfig,
    pub window: ListWindow,
    pub chat_marker: String,
    pub raw: bool,
    pub top: usize,
}

impl PipelineOptions {
    pub fn new(cli: &Cli, config: &Config) -> Self {
        Self {
            listing: config.listing.clone(),
            window: cli.window(),
            chat_marker: config.filter.chat_marker.clone(),
            raw: cli.raw,
            top: cli.top,
        }
    }
}

/// List, fetch and tally messages through `client`
///
/// 1. Page through the full message list, then apply the offset/limit window
/// 2. Fetch every selected message's headers, one request at a time
/// 3. Tally senders (or collect raw From values)
pub async fn run_pipeline<C>(
    client: &C,
    options: &PipelineOptions,
    reporter: &ProgressReporter,
) -> Result<Report>
where
    C: MailboxClient + ?Sized,
{
    let lister = MessageLister::from_config(&options.listing);

    let list_spinner = reporter.add_spinner("Retrieving list of messages...");
    let all_refs = lister.list_all(client, &list_spinner).await?;
    let messages_listed = all_refs.len();
    let refs = options.window.apply(all_refs);
    reporter.finish_spinner(
        &list_spinner,
        &format!("Listed {} messages, {} selected", messages_listed, refs.len()),
    );

    let fetch_bar = reporter.add_progress_bar(refs.len() as u64, "Retrieving all message data...");
    let outcome = fetch_details(client, &refs, &fetch_bar).await?;
    fetch_bar.finish_with_message(format!("Fetched {} messages", outcome.details.len()));

    let body = if options.raw {
        ReportBody::raw(&outcome.details)
    } else {
        let tally = Aggregator::new(options.chat_marker.clone()).tally(&outcome.details);
        info!(
            "Tallied {} messages from {} senders",
            tally.total(),
            tally.len()
        );
        ReportBody::from_tally(&tally, options.top)
    };

    Ok(Report {
        messages_listed,
        messages_fetched: outcome.details.len(),
        messages_skipped: outcome.skipped,
        body,
    })
}

/// Load configuration, authenticate and run the pipeline against Gmail
pub async fn execute(cli: &Cli, reporter: &ProgressReporter) -> Result<Report> {
    let config = Config::load(&cli.config).await?;

    let format = MessageFormat::from_config(&config.fetch.format).ok_or_else(|| {
        GmailError::ConfigError(format!("Invalid fetch.format: '{}'", config.fetch.format))
    })?;

    let hub = auth::initialize_gmail_hub(
        &cli.credentials,
        &cli.token_cache,
        config.auth.redirect_flow,
    )
    .await?;
    info!("Authenticated with Gmail API");

    let client = ProductionGmailClient::new(hub, format);
    let options = PipelineOptions::new(cli, &config);
    let report = run_pipeline(&client, &options, reporter).await?;

    if let Some(path) = &cli.output {
        report.body.save(path).await?;
        info!("Report saved to {:?}", path);
    }

    Ok(report)
}
