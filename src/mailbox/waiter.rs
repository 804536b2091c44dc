use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::provider::MailProvider;

use super::lister::MessageLister;
use super::query::SearchQuery;

/// Longest sleep between two existence checks.
pub const POLL_STEP: Duration = Duration::from_secs(5);

/// Deadline reported when the budget does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollResult {
    pub found: bool,
    /// Existence checks performed before the poll ended.
    pub checks: u32,
    pub cancelled: bool,
    pub deadline: Instant,
}

/// Polls for a matching message until it shows up or the budget runs out.
#[derive(Debug)]
pub struct PollingWaiter<'a, P: ?Sized> {
    lister: MessageLister<'a, P>,
}

impl<'a, P: MailProvider + ?Sized> PollingWaiter<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            lister: MessageLister::new(provider),
        }
    }

    /// Checks for `query` immediately, then after every sleep step of at most
    /// [`POLL_STEP`], for up to `max_wait_seconds` in total. A budget of zero
    /// or less performs no check at all.
    ///
    /// `cancel` only interrupts the sleep between checks; a cancelled poll
    /// reports not found.
    pub async fn wait_for_message(
        &self,
        query: &SearchQuery,
        max_wait_seconds: i64,
        cancel: &CancellationToken,
    ) -> PollResult {
        let budget = Duration::from_secs(u64::try_from(max_wait_seconds).unwrap_or(0));
        let now = Instant::now();
        let deadline = now
            .checked_add(budget)
            .unwrap_or_else(|| now + FAR_FUTURE);
        let mut remaining = budget;
        let mut checks = 0_u32;

        while !remaining.is_zero() {
            checks += 1;
            match self.lister.first_matching(query).await {
                Ok(Some(message)) => {
                    debug!(%query, checks, id = %message.id, "message arrived");
                    return PollResult {
                        found: true,
                        checks,
                        cancelled: false,
                        deadline,
                    };
                }
                Ok(None) => {
                    debug!(%query, checks, remaining = remaining.as_secs(), "message not there yet");
                }
                Err(error) => {
                    warn!(%query, checks, %error, "existence check failed, will retry");
                }
            }

            let step = remaining.min(POLL_STEP);
            tokio::select! {
                _ = time::sleep(step) => {}
                _ = cancel.cancelled() => {
                    warn!(%query, checks, "wait for message was interrupted");
                    return PollResult {
                        found: false,
                        checks,
                        cancelled: true,
                        deadline,
                    };
                }
            }
            remaining -= step;
        }

        PollResult {
            found: false,
            checks,
            cancelled: false,
            deadline,
        }
    }
}
