//! Sequential per-message header retrieval

use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::client::MailboxClient;
use crate::error::Result;
use crate::models::{MessageDetail, MessageRef};

/// Outcome of fetching a batch of references
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Details in listing order, headerless messages excluded
    pub details: Vec<MessageDetail>,
    /// Messages the API returned without headers
    pub skipped: usize,
}

/// Fetch each message's headers one request at a time.
///
/// The first failed request aborts the whole fetch.
pub async fn fetch_details<C>(
    client: &C,
    refs: &[MessageRef],
    progress: &ProgressBar,
) -> Result<FetchOutcome>
where
    C: MailboxClient + ?Sized,
{
    let mut outcome = FetchOutcome {
        details: Vec::with_capacity(refs.len()),
        skipped: 0,
    };

    for msg_ref in refs {
        let detail = client.get_message(&msg_ref.id).await?;
        progress.inc(1);

        match detail {
            Some(detail) => outcome.details.push(detail),
            None => {
                debug!("Message {} has no headers, skipping", msg_ref.id);
                outcome.skipped += 1;
            }
        }
    }

    info!(
        "Fetched {} messages ({} without headers skipped)",
        outcome.details.len(),
        outcome.skipped
    );
    Ok(outcome)
}
