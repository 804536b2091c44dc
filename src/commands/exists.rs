use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::ExistsArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::mailbox::{PollResult, SearchQuery};

#[derive(Debug, Serialize)]
struct ExistsView {
    subject: String,
    found: bool,
    /// Only reported when the command polled.
    #[serde(skip_serializing_if = "Option::is_none")]
    checks: Option<u32>,
    cancelled: bool,
}

impl ExistsView {
    fn checked(subject: String, found: bool) -> Self {
        Self {
            subject,
            found,
            checks: None,
            cancelled: false,
        }
    }

    fn polled(subject: String, poll: &PollResult) -> Self {
        Self {
            subject,
            found: poll.found,
            checks: Some(poll.checks),
            cancelled: poll.cancelled,
        }
    }
}

pub async fn run(ctx: &AppContext, args: ExistsArgs) -> AppResult<()> {
    let mailbox = ctx.mailbox().await?;

    let view = if args.wait > 0 {
        let cancel = CancellationToken::new();
        let interrupt = cancel.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received; stopping poll");
                interrupt.cancel();
            }
        });

        let query = SearchQuery::with_subject(args.subject.as_str());
        let poll = mailbox.wait_for_message(&query, args.wait, &cancel).await;
        watcher.abort();

        ExistsView::polled(args.subject, &poll)
    } else {
        let found = mailbox.message_exists(&args.subject).await.into_result()?;
        ExistsView::checked(args.subject, found)
    };

    ctx.output.emit(&view.found.to_string(), &view)
}
