mod common;

use common::{FakeProvider, ListCall};
use gmail_probe::mailbox::{Mailbox, MessageLister, Outcome, SearchQuery};

fn page(token: Option<&str>) -> ListCall {
    ListCall {
        query: None,
        page_token: token.map(str::to_string),
    }
}

fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|index| format!("{prefix} {index}")).collect()
}

#[tokio::test]
async fn counts_across_every_page() {
    let subjects = numbered("report", 7);
    let subjects: Vec<&str> = subjects.iter().map(String::as_str).collect();
    let provider = FakeProvider::with_subjects(&subjects).page_size(3);

    let count = MessageLister::new(&provider)
        .count_matching(&SearchQuery::all())
        .await
        .expect("count");

    assert_eq!(count, 7);
    assert_eq!(
        provider.list_calls(),
        vec![
            page(None),
            page(Some("3")),
            page(Some("6")),
        ]
    );
}

#[tokio::test]
async fn stops_after_a_single_short_page() {
    let provider = FakeProvider::with_subjects(&["a", "b"]).page_size(10);

    let messages = MessageLister::new(&provider)
        .list(&SearchQuery::all())
        .await
        .expect("list");

    assert_eq!(messages.len(), 2);
    assert_eq!(provider.list_count(), 1);
}

#[tokio::test]
async fn empty_mailbox_counts_zero() {
    let provider = FakeProvider::with_subjects(&[]);
    let mailbox = Mailbox::new(provider);

    assert_eq!(mailbox.received_count().await.success(), Some(0));
}

#[tokio::test]
async fn subject_count_is_case_insensitive() {
    let provider = FakeProvider::with_subjects(&["Invoice #1", "Reminder", "invoice copy"]);
    let mailbox = Mailbox::new(provider);

    assert_eq!(mailbox.count_with_subject("invoice").await.success(), Some(2));
    assert_eq!(
        mailbox.provider().list_calls()[0].query.as_deref(),
        Some("subject:invoice")
    );
}

#[tokio::test]
async fn first_matching_never_follows_pagination() {
    let subjects = numbered("order", 5);
    let subjects: Vec<&str> = subjects.iter().map(String::as_str).collect();
    let provider = FakeProvider::with_subjects(&subjects).page_size(2);
    let mailbox = Mailbox::new(provider);

    let first = mailbox
        .first_matching(&SearchQuery::with_subject("order"))
        .await
        .success()
        .flatten()
        .expect("first message");

    assert_eq!(first.id, "m0");
    assert_eq!(mailbox.provider().list_count(), 1);
}

#[tokio::test]
async fn message_exists_reports_absence() {
    let mailbox = Mailbox::new(FakeProvider::with_subjects(&["welcome"]));

    assert_eq!(mailbox.message_exists("welcome").await.success(), Some(true));
    assert_eq!(mailbox.message_exists("goodbye").await.success(), Some(false));
}

#[tokio::test]
async fn provider_failure_becomes_failure_outcome() {
    let provider = FakeProvider::with_subjects(&["a"]).failing_calls(1);
    let mailbox = Mailbox::new(provider);

    let outcome = mailbox.received_count().await;

    assert!(matches!(outcome, Outcome::Failure(_)));
    assert!(
        outcome
            .failure()
            .expect("failure")
            .to_string()
            .contains("simulated failure")
    );
}

#[tokio::test]
async fn lister_propagates_provider_errors() {
    let provider = FakeProvider::with_subjects(&["a", "b", "c"]).failing_calls(1);

    let result = MessageLister::new(&provider)
        .list(&SearchQuery::all())
        .await;

    assert!(result.is_err());
    assert_eq!(provider.list_count(), 1);
}

#[tokio::test]
async fn delete_all_removes_every_listed_message() {
    let provider = FakeProvider::with_subjects(&["a", "b", "c", "d"]).page_size(3);
    let mailbox = Mailbox::new(provider);

    assert_eq!(mailbox.delete_all().await.success(), Some(4));
    assert_eq!(mailbox.provider().deleted(), vec!["m0", "m1", "m2", "m3"]);
    assert_eq!(mailbox.received_count().await.success(), Some(0));
}
