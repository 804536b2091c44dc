use async_trait::async_trait;

use crate::error::AppResult;

use super::client::GmailClient;
use super::models::{AttachmentBody, FullMessage, MessagePage, SendResult};

/// Authenticated mailbox capability the mailbox core is written against.
///
/// Implementations are reused sequentially by one caller; nothing here is
/// expected to be called concurrently on the same handle.
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Runs one list request. `query` uses the provider search grammar.
    async fn list_messages(
        &self,
        query: Option<&str>,
        page_token: Option<&str>,
    ) -> AppResult<MessagePage>;

    async fn get_message(&self, id: &str) -> AppResult<FullMessage>;

    async fn get_attachment(&self, message_id: &str, attachment_id: &str)
    -> AppResult<AttachmentBody>;

    /// Sends a base64url-encoded RFC 822 message.
    async fn send_message(&self, raw: &str) -> AppResult<SendResult>;

    async fn delete_message(&self, id: &str) -> AppResult<()>;
}

/// A [`GmailClient`] bound to one access token.
#[derive(Debug, Clone)]
pub struct AuthorizedGmail {
    client: GmailClient,
    access_token: String,
}

impl AuthorizedGmail {
    pub fn new(client: GmailClient, access_token: impl Into<String>) -> Self {
        Self {
            client,
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl MailProvider for AuthorizedGmail {
    async fn list_messages(
        &self,
        query: Option<&str>,
        page_token: Option<&str>,
    ) -> AppResult<MessagePage> {
        self.client
            .list_page(&self.access_token, query, page_token)
            .await
    }

    async fn get_message(&self, id: &str) -> AppResult<FullMessage> {
        self.client.get_msg(id, &self.access_token).await
    }

    async fn get_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> AppResult<AttachmentBody> {
        self.client
            .get_attachment(message_id, attachment_id, &self.access_token)
            .await
    }

    async fn send_message(&self, raw: &str) -> AppResult<SendResult> {
        self.client.send(raw, &self.access_token).await
    }

    async fn delete_message(&self, id: &str) -> AppResult<()> {
        self.client.delete(id, &self.access_token).await
    }
}
