//! Search, wait and retrieval logic for a single mailbox.
//!
//! [`Mailbox`] is the entry point. The lister, waiter and retriever are
//! exposed for callers that want the propagating `AppResult` variants.

pub mod lister;
pub mod outcome;
pub mod query;
pub mod retriever;
pub mod service;
pub mod waiter;

pub use lister::MessageLister;
pub use outcome::Outcome;
pub use query::SearchQuery;
pub use retriever::{MessageRetriever, extract_body_text, find_attachment};
pub use service::Mailbox;
pub use waiter::{POLL_STEP, PollResult, PollingWaiter};
