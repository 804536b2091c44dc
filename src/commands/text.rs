use serde::Serialize;

use crate::cli::SubjectArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
struct TextView {
    subject: String,
    text: String,
}

pub async fn run(ctx: &AppContext, args: SubjectArgs) -> AppResult<()> {
    let mailbox = ctx.mailbox().await?;
    let text = mailbox
        .message_text(&args.subject)
        .await
        .into_result()?
        .ok_or_else(|| {
            AppError::InvalidInput(format!("no message with subject `{}`", args.subject))
        })?;

    let lines: Vec<&str> = text.lines().collect();
    let view = TextView {
        subject: args.subject,
        text: text.clone(),
    };
    ctx.output.emit_lines(&lines, &view)
}
