//! Paged listing of every message reference in the mailbox

use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::client::MailboxClient;
use crate::config::ListingConfig;
use crate::error::Result;
use crate::models::MessageRef;

/// Offset/limit slice applied to the complete listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListWindow {
    pub offset: usize,
    /// 0 keeps everything after the offset
    pub limit: usize,
}

impl ListWindow {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Apply the window, clamping both ends to the listing length
    pub fn apply<T>(&self, mut items: Vec<T>) -> Vec<T> {
        let len = items.len();

        if self.offset > len {
            warn!(
                "Offset {} is past the {} listed messages, nothing selected",
                self.offset, len
            );
            return Vec::new();
        }

        let end = if self.limit == 0 {
            len
        } else {
            let requested = self.offset.saturating_add(self.limit);
            if requested > len {
                warn!(
                    "Offset {} + limit {} exceeds the {} listed messages, clamping to the end",
                    self.offset, self.limit, len
                );
            }
            requested.min(len)
        };

        items.truncate(end);
        items.drain(..self.offset);
        items
    }
}

/// Walks the message list one page at a time until the continuation token runs out
pub struct MessageLister {
    page_size: u32,
    include_spam_trash: bool,
}

impl MessageLister {
    pub fn new(page_size: u32, include_spam_trash: bool) -> Self {
        Self {
            page_size,
            include_spam_trash,
        }
    }

    pub fn from_config(config: &ListingConfig) -> Self {
        Self::new(config.page_size, config.include_spam_trash)
    }

    /// List every message, ticking `progress` once per page
    pub async fn list_all<C>(&self, client: &C, progress: &ProgressBar) -> Result<Vec<MessageRef>>
    where
        C: MailboxClient + ?Sized,
    {
        info!("Paging size for message retrieval: {}", self.page_size);

        let mut all_refs = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = client
                .list_page(self.page_size, page_token.take(), self.include_spam_trash)
                .await?;
            pages += 1;

            let next = page.next_token().map(str::to_string);
            all_refs.extend(page.messages);

            progress.inc(1);
            progress.set_message(format!("Listed {} messages", all_refs.len()));
            debug!("Page {}: {} messages so far", pages, all_refs.len());

            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!("Listed {} messages across {} pages", all_refs.len(), pages);
        Ok(all_refs)
    }
}
