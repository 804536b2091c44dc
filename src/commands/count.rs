use serde::Serialize;

use crate::cli::SearchArgs;
use crate::context::AppContext;
use crate::error::AppResult;

use super::list::search_query;

#[derive(Debug, Serialize)]
struct CountView {
    query: String,
    count: usize,
}

pub async fn run(ctx: &AppContext, args: SearchArgs) -> AppResult<()> {
    let query = search_query(args.subject);
    let mailbox = ctx.mailbox().await?;
    let count = mailbox.count_matching(&query).await.into_result()?;

    let view = CountView {
        query: query.to_string(),
        count,
    };
    ctx.output.emit(&count.to_string(), &view)
}
