use std::path::PathBuf;

use serde::Serialize;

use crate::cli::AttachmentArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
struct AttachmentView {
    subject: String,
    path: PathBuf,
}

pub async fn run(ctx: &AppContext, args: AttachmentArgs) -> AppResult<()> {
    let dir = match args.out {
        Some(dir) => dir,
        None => ctx.attachment_dir()?,
    };
    let predicate = name_filter(args.name_contains, args.extension);

    let mailbox = ctx.mailbox().await?;
    let path = mailbox
        .save_attachment(&args.subject, predicate, &dir)
        .await
        .into_result()?
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "no matching attachment on a message with subject `{}`",
                args.subject
            ))
        })?;

    let text = format!("saved {}", path.display());
    let view = AttachmentView {
        subject: args.subject,
        path,
    };
    ctx.output.emit(&text, &view)
}

/// Accepts file names containing `needle` and ending in `.extension`;
/// either filter may be absent.
fn name_filter(needle: Option<String>, extension: Option<String>) -> impl Fn(&str) -> bool {
    let suffix = extension.map(|ext| format!(".{}", ext.trim_start_matches('.').to_lowercase()));
    move |filename: &str| {
        let contains = needle.as_deref().is_none_or(|n| filename.contains(n));
        let ends = suffix
            .as_deref()
            .is_none_or(|s| filename.to_lowercase().ends_with(s));
        contains && ends
    }
}
