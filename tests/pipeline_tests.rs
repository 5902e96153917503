//! Tests for listing, fetching and tallying against a mocked mailbox

mod common;

use common::{message_from, message_without_from, page, MockMailboxClient};
use gmail_sender_tally::cli::{run_pipeline, PipelineOptions, ProgressReporter};
use gmail_sender_tally::config::ListingConfig;
use gmail_sender_tally::error::GmailError;
use gmail_sender_tally::fetcher::fetch_details;
use gmail_sender_tally::lister::{ListWindow, MessageLister};
use gmail_sender_tally::models::MessageRef;
use gmail_sender_tally::report::ReportBody;
use indicatif::ProgressBar;
use mockall::predicate::*;
use mockall::Sequence;

fn options(window: ListWindow) -> PipelineOptions {
    PipelineOptions {
        listing: ListingConfig::default(),
        window,
        chat_marker: "profiles.google.com".to_string(),
        raw: false,
        top: 0,
    }
}

fn ids(refs: &[MessageRef]) -> Vec<&str> {
    refs.iter().map(|r| r.id.as_str()).collect()
}

/// Single page holding `m0..m{n-1}`
fn expect_single_page(client: &mut MockMailboxClient, n: usize) {
    client
        .expect_list_page()
        .times(1)
        .returning(move |_, _, _| {
            let names: Vec<String> = (0..n).map(|i| format!("m{}", i)).collect();
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            Ok(page(&names, None))
        });
}

// ============================================================================
// Lister
// ============================================================================

#[tokio::test]
async fn test_lister_concatenates_pages_in_order() {
    let mut client = MockMailboxClient::new();
    let mut seq = Sequence::new();

    client
        .expect_list_page()
        .with(eq(500), eq(None), eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(page(&["m1", "m2"], Some("t1"))));
    client
        .expect_list_page()
        .with(eq(500), eq(Some("t1".to_string())), eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(page(&["m3"], Some("t2"))));
    client
        .expect_list_page()
        .with(eq(500), eq(Some("t2".to_string())), eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(page(&["m4", "m5"], Some(""))));

    let lister = MessageLister::from_config(&ListingConfig::default());
    let progress = ProgressBar::hidden();
    let listed = lister.list_all(&client, &progress).await.unwrap();

    assert_eq!(ids(&listed), vec!["m1", "m2", "m3", "m4", "m5"]);
    assert_eq!(progress.position(), 3);
}

#[tokio::test]
async fn test_lister_stops_when_token_absent() {
    let mut client = MockMailboxClient::new();
    client
        .expect_list_page()
        .times(1)
        .returning(|_, _, _| Ok(page(&["only"], None)));

    let lister = MessageLister::new(100, false);
    let listed = lister
        .list_all(&client, &ProgressBar::hidden())
        .await
        .unwrap();

    assert_eq!(ids(&listed), vec!["only"]);
}

#[tokio::test]
async fn test_lister_passes_page_size_and_spam_trash_flag() {
    let mut client = MockMailboxClient::new();
    client
        .expect_list_page()
        .with(eq(300), eq(None), eq(true))
        .times(1)
        .returning(|_, _, _| Ok(page(&[], None)));

    let lister = MessageLister::from_config(&ListingConfig {
        page_size: 300,
        include_spam_trash: true,
    });
    let listed = lister
        .list_all(&client, &ProgressBar::hidden())
        .await
        .unwrap();

    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_lister_error_returns_no_partial_result() {
    let mut client = MockMailboxClient::new();
    let mut seq = Sequence::new();

    client
        .expect_list_page()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(page(&["m1"], Some("t1"))));
    client
        .expect_list_page()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| {
            Err(GmailError::ServerError {
                status: 503,
                message: "HTTP 503: Service Unavailable".to_string(),
            })
        });

    let lister = MessageLister::new(500, false);
    let result = lister.list_all(&client, &ProgressBar::hidden()).await;

    assert!(matches!(result, Err(GmailError::ServerError { status: 503, .. })));
}

// ============================================================================
// Fetcher
// ============================================================================

#[tokio::test]
async fn test_fetcher_keeps_order_and_skips_headerless() {
    let mut client = MockMailboxClient::new();
    client
        .expect_get_message()
        .with(eq("m2"))
        .times(1)
        .returning(|_| Ok(None));
    client
        .expect_get_message()
        .times(2)
        .returning(|id| Ok(Some(message_from(id, &format!("{}@example.com", id)))));

    let refs = common::refs(&["m1", "m2", "m3"]);
    let progress = ProgressBar::hidden();
    let outcome = fetch_details(&client, &refs, &progress).await.unwrap();

    let fetched: Vec<&str> = outcome.details.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(fetched, vec!["m1", "m3"]);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(progress.position(), 3);
}

#[tokio::test]
async fn test_fetcher_error_is_fatal() {
    let mut client = MockMailboxClient::new();
    let mut seq = Sequence::new();

    client
        .expect_get_message()
        .with(eq("m1"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|id| Ok(Some(message_from(id, "a@x.com"))));
    client
        .expect_get_message()
        .with(eq("m2"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(GmailError::MessageNotFound("Resource not found".to_string())));

    let refs = common::refs(&["m1", "m2", "m3"]);
    let result = fetch_details(&client, &refs, &ProgressBar::hidden()).await;

    assert!(matches!(result, Err(GmailError::MessageNotFound(_))));
}

// ============================================================================
// Full pipeline
// ============================================================================

#[tokio::test]
async fn test_pipeline_end_to_end_tally() {
    let mut client = MockMailboxClient::new();
    expect_single_page(&mut client, 3);

    client
        .expect_get_message()
        .with(eq("m0"))
        .returning(|id| Ok(Some(message_from(id, "a@x.com"))));
    client
        .expect_get_message()
        .with(eq("m1"))
        .returning(|id| Ok(Some(message_from(id, "b@y.com"))));
    client
        .expect_get_message()
        .with(eq("m2"))
        .returning(|id| Ok(Some(message_from(id, "a@x.com"))));

    let report = run_pipeline(&client, &options(ListWindow::default()), &ProgressReporter::hidden())
        .await
        .unwrap();

    assert_eq!(report.messages_listed, 3);
    assert_eq!(report.messages_fetched, 3);
    assert_eq!(report.messages_skipped, 0);
    assert_eq!(report.body.lines(), vec!["a@x.com: 2", "b@y.com: 1"]);
}

#[tokio::test]
async fn test_pipeline_fetches_only_the_window() {
    let mut client = MockMailboxClient::new();
    expect_single_page(&mut client, 10);

    for id in ["m4", "m5"] {
        client
            .expect_get_message()
            .with(eq(id))
            .times(1)
            .returning(|id| Ok(Some(message_from(id, "a@x.com"))));
    }

    let report = run_pipeline(&client, &options(ListWindow::new(4, 2)), &ProgressReporter::hidden())
        .await
        .unwrap();

    assert_eq!(report.messages_listed, 10);
    assert_eq!(report.messages_fetched, 2);
    assert_eq!(report.body.lines(), vec!["a@x.com: 2"]);
}

#[tokio::test]
async fn test_pipeline_window_spans_page_boundary() {
    let mut client = MockMailboxClient::new();
    let mut seq = Sequence::new();

    client
        .expect_list_page()
        .with(eq(3), eq(None), eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(page(&["m0", "m1", "m2"], Some("t1"))));
    client
        .expect_list_page()
        .with(eq(3), eq(Some("t1".to_string())), eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(page(&["m3", "m4", "m5"], None)));

    for (id, from) in [("m2", "a@x.com"), ("m3", "b@y.com"), ("m4", "a@x.com")] {
        client
            .expect_get_message()
            .with(eq(id))
            .times(1)
            .returning(move |id| Ok(Some(message_from(id, from))));
    }

    let mut opts = options(ListWindow::new(2, 3));
    opts.listing.page_size = 3;

    let report = run_pipeline(&client, &opts, &ProgressReporter::hidden())
        .await
        .unwrap();

    assert_eq!(report.messages_listed, 6);
    assert_eq!(report.messages_fetched, 3);
    assert_eq!(report.body.lines(), vec!["a@x.com: 2", "b@y.com: 1"]);
}

#[tokio::test]
async fn test_pipeline_offset_past_end_fetches_nothing() {
    let mut client = MockMailboxClient::new();
    expect_single_page(&mut client, 3);
    client.expect_get_message().times(0);

    let report = run_pipeline(&client, &options(ListWindow::new(8, 0)), &ProgressReporter::hidden())
        .await
        .unwrap();

    assert_eq!(report.messages_listed, 3);
    assert_eq!(report.body, ReportBody::Tally(vec![]));
}

#[tokio::test]
async fn test_pipeline_filters_chat_senders_and_missing_from() {
    let mut client = MockMailboxClient::new();
    expect_single_page(&mut client, 4);

    client
        .expect_get_message()
        .with(eq("m0"))
        .returning(|id| Ok(Some(message_from(id, "12345@profiles.google.com"))));
    client
        .expect_get_message()
        .with(eq("m1"))
        .returning(|id| Ok(Some(message_without_from(id))));
    client
        .expect_get_message()
        .with(eq("m2"))
        .returning(|_| Ok(None));
    client
        .expect_get_message()
        .with(eq("m3"))
        .returning(|id| Ok(Some(message_from(id, "Friend <friend@example.com>"))));

    let report = run_pipeline(&client, &options(ListWindow::default()), &ProgressReporter::hidden())
        .await
        .unwrap();

    assert_eq!(report.messages_fetched, 3);
    assert_eq!(report.messages_skipped, 1);
    assert_eq!(report.body.lines(), vec!["Friend <friend@example.com>: 1"]);
}

#[tokio::test]
async fn test_pipeline_raw_mode_prints_every_from() {
    let mut client = MockMailboxClient::new();
    expect_single_page(&mut client, 3);

    client
        .expect_get_message()
        .with(eq("m0"))
        .returning(|id| Ok(Some(message_from(id, "b@y.com"))));
    client
        .expect_get_message()
        .with(eq("m1"))
        .returning(|id| Ok(Some(message_from(id, "12345@profiles.google.com"))));
    client
        .expect_get_message()
        .with(eq("m2"))
        .returning(|id| Ok(Some(message_from(id, "b@y.com"))));

    let mut opts = options(ListWindow::default());
    opts.raw = true;

    let report = run_pipeline(&client, &opts, &ProgressReporter::hidden())
        .await
        .unwrap();

    assert_eq!(
        report.body.lines(),
        vec!["b@y.com", "12345@profiles.google.com", "b@y.com"]
    );
}

#[tokio::test]
async fn test_pipeline_fetch_error_aborts_run() {
    let mut client = MockMailboxClient::new();
    expect_single_page(&mut client, 2);

    client
        .expect_get_message()
        .returning(|_| Err(GmailError::Forbidden("HTTP 403: Forbidden".to_string())));

    let result =
        run_pipeline(&client, &options(ListWindow::default()), &ProgressReporter::hidden()).await;

    assert!(matches!(result, Err(GmailError::Forbidden(_))));
}
