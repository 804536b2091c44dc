#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;

use gmail_probe::api::MailProvider;
use gmail_probe::api::models::{
    AttachmentBody, FullMessage, MessagePage, MessagePart, MessageRef, PartBody, SendResult,
};
use gmail_probe::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub query: Option<String>,
    pub page_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FakeMessage {
    pub id: String,
    pub subject: String,
    pub parts: Vec<MessagePart>,
}

impl FakeMessage {
    pub fn new(id: &str, subject: &str) -> Self {
        Self {
            id: id.to_string(),
            subject: subject.to_string(),
            parts: vec![text_part("")],
        }
    }

    pub fn with_parts(mut self, parts: Vec<MessagePart>) -> Self {
        self.parts = parts;
        self
    }
}

pub fn encode(data: &[u8]) -> String {
    URL_SAFE.encode(data)
}

pub fn text_part(body: &str) -> MessagePart {
    MessagePart {
        part_id: Some("0".to_string()),
        mime_type: Some("text/plain".to_string()),
        filename: String::new(),
        body: PartBody {
            data: Some(encode(body.as_bytes())),
            attachment_id: None,
            size: body.len() as u64,
        },
    }
}

pub fn attachment_part(filename: &str, attachment_id: &str) -> MessagePart {
    MessagePart {
        part_id: Some(attachment_id.to_string()),
        mime_type: Some("application/octet-stream".to_string()),
        filename: filename.to_string(),
        body: PartBody {
            data: None,
            attachment_id: Some(attachment_id.to_string()),
            size: 0,
        },
    }
}

/// In-memory mailbox that records every call made against it.
///
/// Subject searches match case-insensitively on a substring, listings are
/// paged by `page_size`, and page tokens are plain offsets.
#[derive(Debug)]
pub struct FakeProvider {
    messages: Vec<FakeMessage>,
    page_size: usize,
    attachments: HashMap<String, Vec<u8>>,
    /// Searches return nothing before this list call (1-based).
    visible_from_call: u32,
    /// The first `failing_calls` list calls return an error.
    failing_calls: u32,
    list_count: AtomicU32,
    list_calls: Mutex<Vec<ListCall>>,
    fetched: Mutex<Vec<String>>,
    attachment_fetches: Mutex<Vec<(String, String)>>,
    sent: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(messages: Vec<FakeMessage>) -> Self {
        Self {
            messages,
            page_size: 100,
            attachments: HashMap::new(),
            visible_from_call: 1,
            failing_calls: 0,
            list_count: AtomicU32::new(0),
            list_calls: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
            attachment_fetches: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_subjects(subjects: &[&str]) -> Self {
        let messages = subjects
            .iter()
            .enumerate()
            .map(|(index, subject)| FakeMessage::new(&format!("m{index}"), subject))
            .collect();
        Self::new(messages)
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn visible_from_call(mut self, call: u32) -> Self {
        self.visible_from_call = call;
        self
    }

    pub fn failing_calls(mut self, calls: u32) -> Self {
        self.failing_calls = calls;
        self
    }

    pub fn attachment(mut self, attachment_id: &str, data: &[u8]) -> Self {
        self.attachments
            .insert(attachment_id.to_string(), data.to_vec());
        self
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().expect("lock").clone()
    }

    pub fn list_count(&self) -> u32 {
        self.list_count.load(Ordering::SeqCst)
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().expect("lock").clone()
    }

    pub fn attachment_fetches(&self) -> Vec<(String, String)> {
        self.attachment_fetches.lock().expect("lock").clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("lock").clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().expect("lock").clone()
    }

    fn matching(&self, query: Option<&str>) -> Vec<&FakeMessage> {
        let needle = query.map(|query| query.trim_start_matches("subject:").to_lowercase());

        self.messages
            .iter()
            .filter(|message| {
                needle
                    .as_deref()
                    .is_none_or(|needle| message.subject.to_lowercase().contains(needle))
            })
            .filter(|message| !self.deleted.lock().expect("lock").contains(&message.id))
            .collect()
    }
}

#[async_trait]
impl MailProvider for FakeProvider {
    async fn list_messages(
        &self,
        query: Option<&str>,
        page_token: Option<&str>,
    ) -> AppResult<MessagePage> {
        let call = self.list_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.list_calls.lock().expect("lock").push(ListCall {
            query: query.map(str::to_string),
            page_token: page_token.map(str::to_string),
        });

        if call <= self.failing_calls {
            return Err(AppError::Api(format!("simulated failure on call {call}")));
        }
        if call < self.visible_from_call {
            return Ok(MessagePage::default());
        }

        let matching = self.matching(query);
        let offset = page_token
            .map(|token| token.parse::<usize>().expect("offset token"))
            .unwrap_or(0);
        let end = (offset + self.page_size).min(matching.len());

        Ok(MessagePage {
            messages: matching[offset..end]
                .iter()
                .map(|message| MessageRef {
                    id: message.id.clone(),
                    thread_id: Some(format!("t-{}", message.id)),
                })
                .collect(),
            next_page_token: (end < matching.len()).then(|| end.to_string()),
        })
    }

    async fn get_message(&self, id: &str) -> AppResult<FullMessage> {
        self.fetched.lock().expect("lock").push(id.to_string());
        let message = self
            .messages
            .iter()
            .find(|message| message.id == id)
            .ok_or_else(|| AppError::Api(format!("message {id} not found")))?;

        Ok(FullMessage {
            id: message.id.clone(),
            thread_id: Some(format!("t-{}", message.id)),
            subject: Some(message.subject.clone()),
            from: Some("sender@example.com".to_string()),
            snippet: None,
            parts: message.parts.clone(),
        })
    }

    async fn get_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> AppResult<AttachmentBody> {
        self.attachment_fetches
            .lock()
            .expect("lock")
            .push((message_id.to_string(), attachment_id.to_string()));
        let data = self
            .attachments
            .get(attachment_id)
            .ok_or_else(|| AppError::Api(format!("attachment {attachment_id} not found")))?;

        Ok(AttachmentBody {
            data: encode(data),
            size: data.len() as u64,
        })
    }

    async fn send_message(&self, raw: &str) -> AppResult<SendResult> {
        let mut sent = self.sent.lock().expect("lock");
        sent.push(raw.to_string());
        Ok(SendResult {
            id: format!("sent-{}", sent.len()),
            thread_id: None,
            note: "sent".to_string(),
        })
    }

    async fn delete_message(&self, id: &str) -> AppResult<()> {
        self.deleted.lock().expect("lock").push(id.to_string());
        Ok(())
    }
}
