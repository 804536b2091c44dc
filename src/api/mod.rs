pub mod client;
pub mod messages;
pub mod models;
pub mod provider;

pub use client::GmailClient;
pub use provider::{AuthorizedGmail, MailProvider};
