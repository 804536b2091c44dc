use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::models::{MessageRef, SendRequest, SendResult};
use crate::api::provider::MailProvider;
use crate::error::AppResult;
use crate::mail::{attachments, mime};

use super::lister::MessageLister;
use super::outcome::Outcome;
use super::query::SearchQuery;
use super::retriever::{MessageRetriever, extract_body_text, find_attachment};
use super::waiter::{PollResult, PollingWaiter};

/// The public face of one mailbox account.
///
/// No method returns an error: provider and I/O failures are logged at
/// `warn` and handed back as [`Outcome::Failure`].
#[derive(Debug)]
pub struct Mailbox<P> {
    provider: P,
    sender: Option<String>,
}

impl<P: MailProvider> Mailbox<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            sender: None,
        }
    }

    /// Address written into the `From` header of composed messages.
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn list(&self, query: &SearchQuery) -> Outcome<Vec<MessageRef>> {
        let result = self.lister().list(query).await;
        settle(result, "list messages")
    }

    pub async fn count_matching(&self, query: &SearchQuery) -> Outcome<usize> {
        let result = self.lister().count_matching(query).await;
        settle(result, "count received messages")
    }

    pub async fn received_count(&self) -> Outcome<usize> {
        self.count_matching(&SearchQuery::all()).await
    }

    pub async fn count_with_subject(&self, subject: &str) -> Outcome<usize> {
        self.count_matching(&SearchQuery::with_subject(subject)).await
    }

    pub async fn first_matching(&self, query: &SearchQuery) -> Outcome<Option<MessageRef>> {
        let result = self.lister().first_matching(query).await;
        settle(result, "look up first matching message")
    }

    pub async fn message_exists(&self, subject: &str) -> Outcome<bool> {
        self.first_matching(&SearchQuery::with_subject(subject))
            .await
            .map(|message| message.is_some())
    }

    pub async fn wait_for_message(
        &self,
        query: &SearchQuery,
        max_wait_seconds: i64,
        cancel: &CancellationToken,
    ) -> PollResult {
        PollingWaiter::new(&self.provider)
            .wait_for_message(query, max_wait_seconds, cancel)
            .await
    }

    /// Body text of the first message whose subject matches.
    pub async fn message_text(&self, subject: &str) -> Outcome<Option<String>> {
        let result = self.try_message_text(subject).await;
        settle(result, "read message text")
    }

    /// Bytes of the first attachment accepted by `predicate` in the first
    /// message whose subject matches.
    pub async fn attachment<F>(&self, subject: &str, predicate: F) -> Outcome<Option<Vec<u8>>>
    where
        F: Fn(&str) -> bool,
    {
        let result = self
            .try_attachment(subject, predicate)
            .await
            .map(|found| found.map(|(_, data)| data));
        settle(result, "fetch attachment")
    }

    /// Like [`Mailbox::attachment`], then writes the bytes into `dir` under
    /// the attachment's file name.
    pub async fn save_attachment<F>(
        &self,
        subject: &str,
        predicate: F,
        dir: &Path,
    ) -> Outcome<Option<PathBuf>>
    where
        F: Fn(&str) -> bool,
    {
        let result = self
            .try_attachment(subject, predicate)
            .await
            .and_then(|found| match found {
                Some((filename, data)) => {
                    attachments::save_attachment(dir, &filename, &data).map(Some)
                }
                None => Ok(None),
            });
        settle(result, "save attachment")
    }

    pub fn compose(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment_paths: &[PathBuf],
    ) -> Outcome<SendRequest> {
        let result = attachments::read_attachments(attachment_paths).map(|attachments| {
            SendRequest {
                from: self.sender.clone(),
                to: vec![to.to_string()],
                subject: subject.to_string(),
                body: body.to_string(),
                attachments,
            }
        });
        settle(result, "compose message")
    }

    pub async fn send(&self, request: &SendRequest) -> Outcome<SendResult> {
        let raw = mime::build_raw_message(request);
        let result = self.provider.send_message(&raw).await;
        if let Ok(sent) = &result {
            info!(id = %sent.id, to = %request.to.join(", "), "message sent");
        }
        settle(result, "send message")
    }

    /// Deletes every message in the mailbox, returning how many were removed.
    pub async fn delete_all(&self) -> Outcome<usize> {
        let result = self.try_delete_all().await;
        settle(result, "delete all messages")
    }

    fn lister(&self) -> MessageLister<'_, P> {
        MessageLister::new(&self.provider)
    }

    fn retriever(&self) -> MessageRetriever<'_, P> {
        MessageRetriever::new(&self.provider)
    }

    async fn try_message_text(&self, subject: &str) -> AppResult<Option<String>> {
        let query = SearchQuery::with_subject(subject);
        let Some(found) = self.lister().first_matching(&query).await? else {
            warn!(%query, "no message to read text from");
            return Ok(None);
        };

        let message = self.retriever().fetch_full(&found).await?;
        extract_body_text(&message).map(Some)
    }

    async fn try_attachment<F>(
        &self,
        subject: &str,
        predicate: F,
    ) -> AppResult<Option<(String, Vec<u8>)>>
    where
        F: Fn(&str) -> bool,
    {
        let query = SearchQuery::with_subject(subject);
        let Some(found) = self.lister().first_matching(&query).await? else {
            warn!(%query, "no message to take an attachment from");
            return Ok(None);
        };

        let retriever = self.retriever();
        let message = retriever.fetch_full(&found).await?;
        let Some(part) = find_attachment(&message, predicate) else {
            return Ok(None);
        };

        let data = retriever.download_attachment(&found.id, part).await?;
        Ok(Some((part.filename.clone(), data)))
    }

    async fn try_delete_all(&self) -> AppResult<usize> {
        let messages = self.lister().list(&SearchQuery::all()).await?;
        for message in &messages {
            self.provider.delete_message(&message.id).await?;
        }

        info!(deleted = messages.len(), "deleted all messages");
        Ok(messages.len())
    }
}

fn settle<T>(result: AppResult<T>, operation: &str) -> Outcome<T> {
    if let Err(error) = &result {
        warn!(operation, %error, "mailbox operation failed");
    }
    result.into()
}
