use serde::Serialize;

/// Minimal message identity returned by a search. Carries no content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRef {
    pub id: String,
    pub thread_id: Option<String>,
}

/// One page of a message listing.
#[derive(Debug, Clone, Default)]
pub struct MessagePage {
    pub messages: Vec<MessageRef>,
    pub next_page_token: Option<String>,
}

impl MessagePage {
    /// Token for the next request, if the listing is not exhausted yet.
    pub fn next_token(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// A message with its part tree flattened to the top-level parts.
///
/// Body text conventionally lives in the first part; any part with a
/// non-empty filename is an attachment.
#[derive(Debug, Clone, Serialize)]
pub struct FullMessage {
    pub id: String,
    pub thread_id: Option<String>,
    pub subject: Option<String>,
    pub from: Option<String>,
    pub snippet: Option<String>,
    pub parts: Vec<MessagePart>,
}

impl FullMessage {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef {
            id: self.id.clone(),
            thread_id: self.thread_id.clone(),
        }
    }

    pub fn attachment_names(&self) -> impl Iterator<Item = &str> {
        self.parts
            .iter()
            .filter(|part| part.is_attachment())
            .map(|part| part.filename.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MessagePart {
    pub part_id: Option<String>,
    pub mime_type: Option<String>,
    pub filename: String,
    pub body: PartBody,
}

impl MessagePart {
    pub fn is_attachment(&self) -> bool {
        !self.filename.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PartBody {
    pub data: Option<String>,
    pub attachment_id: Option<String>,
    pub size: u64,
}

/// Attachment payload as returned by the attachments endpoint, still encoded.
#[derive(Debug, Clone)]
pub struct AttachmentBody {
    pub data: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct SendRequest {
    pub from: Option<String>,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendResult {
    pub id: String,
    pub thread_id: Option<String>,
    pub note: String,
}
