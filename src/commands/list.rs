use serde::Serialize;

use crate::api::models::MessageRef;
use crate::cli::SearchArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::mailbox::SearchQuery;

#[derive(Debug, Serialize)]
struct ListView {
    query: String,
    count: usize,
    messages: Vec<MessageRef>,
}

pub async fn run(ctx: &AppContext, args: SearchArgs) -> AppResult<()> {
    let query = search_query(args.subject);
    let mailbox = ctx.mailbox().await?;
    let messages = mailbox.list(&query).await.into_result()?;

    let mut lines = vec![format!("{} messages matching {query}", messages.len())];
    lines.extend(messages.iter().map(|message| match &message.thread_id {
        Some(thread_id) => format!("{} (thread {thread_id})", message.id),
        None => message.id.clone(),
    }));

    let view = ListView {
        query: query.to_string(),
        count: messages.len(),
        messages,
    };
    ctx.output.emit_lines(&lines, &view)
}

pub(crate) fn search_query(subject: Option<String>) -> SearchQuery {
    match subject {
        Some(subject) => SearchQuery::with_subject(subject),
        None => SearchQuery::all(),
    }
}
