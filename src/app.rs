use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        json,
        verbose: _,
        command,
    } = cli;

    let ctx = AppContext::bootstrap(profile, json)?;

    match command {
        Command::Auth(args) => commands::auth::run(&ctx, args.command).await,
        Command::List(args) => commands::list::run(&ctx, args).await,
        Command::Count(args) => commands::count::run(&ctx, args).await,
        Command::Exists(args) => commands::exists::run(&ctx, args).await,
        Command::Text(args) => commands::text::run(&ctx, args).await,
        Command::Attachment(args) => commands::attachment::run(&ctx, args).await,
        Command::Send(args) => commands::send::run(&ctx, args).await,
        Command::Purge(args) => commands::purge::run(&ctx, args).await,
    }
}
