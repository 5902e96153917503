//! Gmail API client for listing and reading messages

use async_trait::async_trait;
use google_gmail1::api::Message;
use tracing::debug;

use crate::auth::{GmailHub, READONLY_SCOPES};
use crate::error::Result;
use crate::models::{Header, ListPage, MessageDetail, MessageRef};

/// Message format options for Gmail API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Only the headers named in the request
    Metadata,
    /// Full message data including headers and body
    Full,
}

impl MessageFormat {
    /// Get format string for API call
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageFormat::Metadata => "metadata",
            MessageFormat::Full => "full",
        }
    }

    /// Parse the `fetch.format` config value
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "metadata" => Some(MessageFormat::Metadata),
            "full" => Some(MessageFormat::Full),
            _ => None,
        }
    }
}

/// The two remote mailbox operations the pipeline needs
#[async_trait]
pub trait MailboxClient: Send + Sync {
    /// Fetch one page of message references
    async fn list_page(
        &self,
        page_size: u32,
        page_token: Option<String>,
        include_spam_trash: bool,
    ) -> Result<ListPage>;

    /// Fetch a message's headers; `None` when the message carries no headers
    async fn get_message(&self, id: &str) -> Result<Option<MessageDetail>>;
}

/// Gmail client backed by the `google-gmail1` hub
pub struct ProductionGmailClient {
    hub: GmailHub,
    format: MessageFormat,
}

impl ProductionGmailClient {
    pub fn new(hub: GmailHub, format: MessageFormat) -> Self {
        Self { hub, format }
    }
}

/// Convert a Gmail API message into a detail record.
///
/// Returns `None` when the payload or its header list is absent or empty.
pub fn message_to_detail(id: &str, msg: Message) -> Option<MessageDetail> {
    let headers = msg.payload?.headers?;
    if headers.is_empty() {
        return None;
    }

    let headers = headers
        .into_iter()
        .filter_map(|h| match (h.name, h.value) {
            (Some(name), Some(value)) => Some(Header { name, value }),
            _ => None,
        })
        .collect();

    Some(MessageDetail {
        id: msg.id.unwrap_or_else(|| id.to_string()),
        headers,
    })
}

#[async_trait]
impl MailboxClient for ProductionGmailClient {
    async fn list_page(
        &self,
        page_size: u32,
        page_token: Option<String>,
        include_spam_trash: bool,
    ) -> Result<ListPage> {
        let mut call = self
            .hub
            .users()
            .messages_list("me")
            .max_results(page_size)
            .include_spam_trash(include_spam_trash);

        if let Some(token) = page_token.as_deref() {
            call = call.page_token(token);
        }

        let (_, response) = call.add_scope(READONLY_SCOPES[0]).doit().await?;

        let messages: Vec<MessageRef> = response
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| m.id.map(MessageRef::new))
            .collect();

        debug!(
            "Listed page with {} messages (next token: {})",
            messages.len(),
            response.next_page_token.is_some()
        );

        Ok(ListPage {
            messages,
            next_page_token: response.next_page_token,
        })
    }

    async fn get_message(&self, id: &str) -> Result<Option<MessageDetail>> {
        let mut call = self
            .hub
            .users()
            .messages_get("me", id)
            .format(self.format.as_str());

        if self.format == MessageFormat::Metadata {
            call = call.add_metadata_headers("From");
        }

        let (_, msg) = call.add_scope(READONLY_SCOPES[0]).doit().await?;
        Ok(message_to_detail(id, msg))
    }
}
