use std::fs;

use crate::cli::SendArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

pub async fn run(ctx: &AppContext, args: SendArgs) -> AppResult<()> {
    let body = read_body(&args)?;
    let mailbox = ctx.mailbox().await?;
    let request = mailbox
        .compose(&args.to, &args.subject, &body, &args.attach)
        .into_result()?;
    let result = mailbox.send(&request).await.into_result()?;

    let text = format!("sent message {}", result.id);
    ctx.output.emit(&text, &result)
}

fn read_body(args: &SendArgs) -> AppResult<String> {
    match (&args.body, &args.body_file) {
        (Some(body), None) => Ok(body.clone()),
        (None, Some(path)) => Ok(fs::read_to_string(path)?),
        (Some(_), Some(_)) => Err(AppError::InvalidInput(
            "pass only one body source: --body or --body-file".to_string(),
        )),
        (None, None) => Err(AppError::InvalidInput(
            "missing body; pass --body or --body-file".to_string(),
        )),
    }
}
