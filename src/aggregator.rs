//! Per-sender message counts

use std::collections::HashMap;
use tracing::debug;

use crate::models::{MessageDetail, SenderCount};

/// Default marker for automated chat-service senders
pub const DEFAULT_CHAT_MARKER: &str = "profiles.google.com";

/// Mapping from sender address to message count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderTally {
    counts: HashMap<String, usize>,
}

impl SenderTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more message from `address`
    pub fn record(&mut self, address: &str) {
        *self.counts.entry(address.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, address: &str) -> Option<usize> {
        self.counts.get(address).copied()
    }

    /// Number of distinct senders
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total messages counted across all senders
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Entries sorted by count descending, then address ascending
    pub fn sorted(&self) -> Vec<SenderCount> {
        let mut entries: Vec<SenderCount> = self
            .counts
            .iter()
            .map(|(address, count)| SenderCount {
                address: address.clone(),
                count: *count,
            })
            .collect();

        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.address.cmp(&b.address)));
        entries
    }
}

/// Builds a [`SenderTally`] from fetched messages
#[derive(Debug, Clone)]
pub struct Aggregator {
    chat_marker: String,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_MARKER)
    }
}

impl Aggregator {
    /// An empty marker disables chat-service filtering
    pub fn new(chat_marker: impl Into<String>) -> Self {
        Self {
            chat_marker: chat_marker.into(),
        }
    }

    fn is_chat_sender(&self, from: &str) -> bool {
        !self.chat_marker.is_empty() && from.contains(&self.chat_marker)
    }

    /// Sender to count for a message, if it has a countable `From` header
    pub fn sender_of<'a>(&self, detail: &'a MessageDetail) -> Option<&'a str> {
        detail.from_header().filter(|from| !self.is_chat_sender(from))
    }

    pub fn tally(&self, details: &[MessageDetail]) -> SenderTally {
        let mut tally = SenderTally::new();

        for detail in details {
            match self.sender_of(detail) {
                Some(sender) => tally.record(sender),
                None => debug!("Message {} not counted", detail.id),
            }
        }

        tally
    }
}
