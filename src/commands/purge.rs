use serde::Serialize;

use crate::cli::PurgeArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
struct PurgeView {
    profile: String,
    deleted: usize,
}

pub async fn run(ctx: &AppContext, args: PurgeArgs) -> AppResult<()> {
    if !args.yes {
        return Err(AppError::InvalidInput(
            "purge deletes every message in the mailbox; pass --yes to confirm".to_string(),
        ));
    }

    let mailbox = ctx.mailbox().await?;
    let deleted = mailbox.delete_all().await.into_result()?;

    let view = PurgeView {
        profile: ctx.profile.clone(),
        deleted,
    };
    ctx.output.emit(&format!("deleted {deleted} messages"), &view)
}
