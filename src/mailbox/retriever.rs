use tracing::info;

use crate::api::models::{FullMessage, MessagePart, MessageRef};
use crate::api::provider::MailProvider;
use crate::error::{AppError, AppResult};
use crate::mail::encoding;

/// Loads full message content and attachment bytes.
#[derive(Debug)]
pub struct MessageRetriever<'a, P: ?Sized> {
    provider: &'a P,
}

impl<'a, P: MailProvider + ?Sized> MessageRetriever<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    pub async fn fetch_full(&self, message: &MessageRef) -> AppResult<FullMessage> {
        self.provider.get_message(&message.id).await
    }

    /// Bytes of the first attachment, in part order, whose filename satisfies
    /// `predicate`. `Ok(None)` when nothing matches.
    pub async fn select_attachment<F>(
        &self,
        message: &FullMessage,
        message_id: &str,
        predicate: F,
    ) -> AppResult<Option<Vec<u8>>>
    where
        F: Fn(&str) -> bool,
    {
        let Some(part) = find_attachment(message, predicate) else {
            return Ok(None);
        };

        Ok(Some(self.download_attachment(message_id, part).await?))
    }

    pub async fn download_attachment(
        &self,
        message_id: &str,
        part: &MessagePart,
    ) -> AppResult<Vec<u8>> {
        if let Some(attachment_id) = part.body.attachment_id.as_deref() {
            let body = self
                .provider
                .get_attachment(message_id, attachment_id)
                .await?;
            return encoding::decode_transport(&body.data);
        }

        // small attachments can arrive inline
        match part.body.data.as_deref() {
            Some(data) => encoding::decode_transport(data),
            None => Err(AppError::MalformedMessage(format!(
                "attachment `{}` of message {message_id} has neither an attachment id nor inline data",
                part.filename
            ))),
        }
    }
}

/// First part with a non-empty filename accepted by `predicate`.
pub fn find_attachment<F>(message: &FullMessage, predicate: F) -> Option<&MessagePart>
where
    F: Fn(&str) -> bool,
{
    let found = message
        .parts
        .iter()
        .find(|part| part.is_attachment() && predicate(part.filename.as_str()));

    if found.is_none() {
        info!(
            id = %message.id,
            subject = message.subject.as_deref().unwrap_or_default(),
            "no attachment matches the requested condition"
        );
    }

    found
}

/// Decoded text of the message's first part.
pub fn extract_body_text(message: &FullMessage) -> AppResult<String> {
    let first = message.parts.first().ok_or_else(|| {
        AppError::MalformedMessage(format!("message {} has no parts", message.id))
    })?;

    let data = first.body.data.as_deref().ok_or_else(|| {
        AppError::MalformedMessage(format!(
            "first part of message {} carries no body data",
            message.id
        ))
    })?;

    encoding::decode_transport_text(data)
}
