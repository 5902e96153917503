use serde::{Deserialize, Serialize};

/// Opaque message identifier as returned by the list call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: String,
}

impl MessageRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// One page of the message list
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub messages: Vec<MessageRef>,
    /// Continuation token; `None` or empty on the last page
    pub next_page_token: Option<String>,
}

impl ListPage {
    /// Returns the continuation token if another page follows
    pub fn next_token(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Message identifier plus its headers in wire order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDetail {
    pub id: String,
    pub headers: Vec<Header>,
}

impl MessageDetail {
    /// Value of the first header named exactly `From`
    pub fn from_header(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == "From")
            .map(|h| h.value.as_str())
    }
}

/// A sender and how many messages it sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderCount {
    pub address: String,
    pub count: usize,
}
