use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "gmail-probe",
    version,
    about = "Search, wait for, read and send mail in a Gmail test mailbox"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Profile name to use"
    )]
    pub profile: String,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Auth(AuthArgs),
    /// List ids of matching messages
    List(SearchArgs),
    /// Count matching messages across all pages
    Count(SearchArgs),
    /// Check whether a message exists, optionally waiting for it
    Exists(ExistsArgs),
    /// Print the body text of the first matching message
    Text(SubjectArgs),
    /// Download an attachment of the first matching message
    Attachment(AttachmentArgs),
    Send(SendArgs),
    /// Delete every message in the mailbox
    Purge(PurgeArgs),
}

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    Login,
    Status,
    Logout,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long, visible_alias = "subj", help = "Subject substring to match")]
    pub subject: Option<String>,
}

#[derive(Debug, Args)]
pub struct SubjectArgs {
    #[arg(long, visible_alias = "subj", help = "Subject substring to match")]
    pub subject: String,
}

#[derive(Debug, Args)]
pub struct ExistsArgs {
    #[arg(long, visible_alias = "subj", help = "Subject substring to match")]
    pub subject: String,
    #[arg(
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Seconds to keep polling before giving up"
    )]
    pub wait: i64,
}

#[derive(Debug, Args)]
pub struct AttachmentArgs {
    #[arg(long, visible_alias = "subj", help = "Subject substring to match")]
    pub subject: String,
    #[arg(long, help = "Attachment file name must contain this text")]
    pub name_contains: Option<String>,
    #[arg(long, help = "Attachment file name extension, e.g. pdf")]
    pub extension: Option<String>,
    #[arg(long, help = "Directory to write the attachment into")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    #[arg(long, help = "Recipient address")]
    pub to: String,
    #[arg(long, visible_alias = "subj", help = "Email subject")]
    pub subject: String,
    #[arg(long, help = "Inline body text")]
    pub body: Option<String>,
    #[arg(long, help = "Read body from file")]
    pub body_file: Option<PathBuf>,
    #[arg(long, action = ArgAction::Append, help = "Attach file (repeatable)")]
    pub attach: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PurgeArgs {
    #[arg(long, help = "Confirm deleting every message")]
    pub yes: bool,
}
