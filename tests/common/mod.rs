//! Common test utilities and fixtures

#![allow(dead_code)]

use gmail_sender_tally::client::MailboxClient;
use gmail_sender_tally::error::Result;
use gmail_sender_tally::models::{Header, ListPage, MessageDetail, MessageRef};
use mockall::mock;

/// Message refs with the given ids
pub fn refs(ids: &[&str]) -> Vec<MessageRef> {
    ids.iter().map(|id| MessageRef::new(*id)).collect()
}

/// One list page; `next` of `Some("")` mimics the API's empty final token
pub fn page(ids: &[&str], next: Option<&str>) -> ListPage {
    ListPage {
        messages: refs(ids),
        next_page_token: next.map(str::to_string),
    }
}

/// A message with a typical header set and the given sender
pub fn message_from(id: &str, from: &str) -> MessageDetail {
    MessageDetail {
        id: id.to_string(),
        headers: vec![
            Header::new("Delivered-To", "me@example.com"),
            Header::new("From", from),
            Header::new("Subject", format!("Message {}", id)),
            Header::new("Date", "Mon, 1 Jan 2024 10:00:00 -0800"),
        ],
    }
}

/// A message without any From header
pub fn message_without_from(id: &str) -> MessageDetail {
    MessageDetail {
        id: id.to_string(),
        headers: vec![Header::new("Subject", "no sender")],
    }
}

// Mock implementation of MailboxClient for testing
mock! {
    pub MailboxClient {}

    #[async_trait::async_trait]
    impl MailboxClient for MailboxClient {
        async fn list_page(
            &self,
            page_size: u32,
            page_token: Option<String>,
            include_spam_trash: bool,
        ) -> Result<ListPage>;
        async fn get_message(&self, id: &str) -> Result<Option<MessageDetail>>;
    }
}
