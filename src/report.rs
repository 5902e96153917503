//! Rendering of the final sender report

use std::io::{self, Write};
use std::path::Path;

use crate::aggregator::SenderTally;
use crate::models::{MessageDetail, SenderCount};

/// What the run prints once all messages are fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportBody {
    /// Senders sorted by descending count
    Tally(Vec<SenderCount>),
    /// First `From` value of every fetched message, in listing order
    Raw(Vec<String>),
}

impl ReportBody {
    /// Sorted tally, optionally cut to the `top` most frequent senders (0 = all)
    pub fn from_tally(tally: &SenderTally, top: usize) -> Self {
        let mut entries = tally.sorted();
        if top > 0 {
            entries.truncate(top);
        }
        ReportBody::Tally(entries)
    }

    /// Raw `From` values with no filtering or aggregation
    pub fn raw(details: &[MessageDetail]) -> Self {
        ReportBody::Raw(
            details
                .iter()
                .filter_map(|d| d.from_header().map(str::to_string))
                .collect(),
        )
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            ReportBody::Tally(entries) => entries
                .iter()
                .map(|e| format!("{}: {}", e.address, e.count))
                .collect(),
            ReportBody::Raw(values) => values.clone(),
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.lines() {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }

    /// Save report to file
    pub async fn save(&self, path: &Path) -> io::Result<()> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        tokio::fs::write(path, buffer).await
    }
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct Report {
    pub messages_listed: usize,
    pub messages_fetched: usize,
    pub messages_skipped: usize,
    pub body: ReportBody,
}
