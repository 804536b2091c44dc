use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, AppResult};

use super::messages;
use super::models::{
    AttachmentBody, FullMessage, MessagePage, MessagePart, MessageRef, PartBody, SendResult,
};

const GMAIL_API_BASE_URL: &str = "https://gmail.googleapis.com";

#[derive(Debug, Clone)]
pub struct GmailClient {
    http: Client,
    base_url: String,
}

impl GmailClient {
    pub fn new() -> Self {
        Self::with_base_url(GMAIL_API_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn get_msg(&self, id: &str, access_token: &str) -> AppResult<FullMessage> {
        let endpoint = messages::message_endpoint(id);
        let query = messages::get_query();
        let resource: GmailMessageResource =
            self.get_json(&endpoint, access_token, Some(&query)).await?;
        Ok(resource.into_full())
    }

    pub async fn list_page(
        &self,
        access_token: &str,
        query: Option<&str>,
        page_token: Option<&str>,
    ) -> AppResult<MessagePage> {
        let endpoint = messages::list_endpoint();
        let query_params = messages::list_query(query, page_token);
        let list_resource: GmailMessageListResource = self
            .get_json(endpoint, access_token, Some(&query_params))
            .await?;

        Ok(list_resource.into_page())
    }

    pub async fn get_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
        access_token: &str,
    ) -> AppResult<AttachmentBody> {
        let endpoint = messages::attachment_endpoint(message_id, attachment_id);
        let resource: GmailAttachmentResource =
            self.get_json(&endpoint, access_token, None).await?;

        Ok(AttachmentBody {
            data: resource.data.unwrap_or_default(),
            size: resource.size.unwrap_or_default(),
        })
    }

    pub async fn send(&self, raw_message: &str, access_token: &str) -> AppResult<SendResult> {
        let endpoint = messages::send_endpoint();
        let request = GmailSendRequest {
            raw: raw_message.to_string(),
        };
        let response: GmailSendResponse = self.post_json(endpoint, access_token, &request).await?;

        Ok(SendResult {
            id: response.id,
            thread_id: response.thread_id,
            note: "message accepted by gmail api".to_string(),
        })
    }

    pub async fn delete(&self, id: &str, access_token: &str) -> AppResult<()> {
        let url = self.endpoint_url(&messages::message_endpoint(id))?;
        let response = self
            .http
            .delete(url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_api_error(status, &body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        access_token: &str,
        query: Option<&[(String, String)]>,
    ) -> AppResult<T> {
        let url = self.endpoint_url(endpoint)?;
        let mut request = self.http.get(url).bearer_auth(access_token);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;
        self.parse_json_response(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        access_token: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = self.endpoint_url(endpoint)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await?;

        self.parse_json_response(response).await
    }

    fn endpoint_url(&self, endpoint: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.set_path(endpoint.trim_start_matches('/'));
        Ok(url)
    }

    async fn parse_json_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_api_error(status, &body))
    }
}

impl Default for GmailClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct GmailMessageResource {
    id: String,
    #[serde(rename = "threadId")]
    thread_id: Option<String>,
    snippet: Option<String>,
    payload: Option<GmailMessagePayload>,
}

impl GmailMessageResource {
    fn into_full(self) -> FullMessage {
        let Some(mut payload) = self.payload else {
            return FullMessage {
                id: self.id,
                thread_id: self.thread_id,
                subject: None,
                from: None,
                snippet: self.snippet,
                parts: Vec::new(),
            };
        };

        let headers = payload.headers.take().unwrap_or_default();

        // single-part messages carry their body on the payload itself
        let parts = match payload.parts.take() {
            Some(parts) if !parts.is_empty() => {
                parts.into_iter().map(GmailMessagePayload::into_part).collect()
            }
            _ => vec![payload.into_part()],
        };

        FullMessage {
            id: self.id,
            thread_id: self.thread_id,
            subject: header_value(&headers, "Subject"),
            from: header_value(&headers, "From"),
            snippet: self.snippet,
            parts,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GmailMessagePayload {
    #[serde(rename = "partId")]
    part_id: Option<String>,
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
    filename: Option<String>,
    headers: Option<Vec<GmailMessageHeader>>,
    body: Option<GmailPartBody>,
    parts: Option<Vec<GmailMessagePayload>>,
}

impl GmailMessagePayload {
    fn into_part(self) -> MessagePart {
        let body = match self.body {
            Some(body) if body.data.is_some() || body.attachment_id.is_some() => body,
            // multipart containers: surface the body of their first leaf
            _ => self
                .parts
                .and_then(|parts| parts.into_iter().next())
                .and_then(GmailMessagePayload::leaf_body)
                .unwrap_or_default(),
        };

        MessagePart {
            part_id: self.part_id,
            mime_type: self.mime_type,
            filename: self.filename.unwrap_or_default(),
            body: PartBody {
                data: body.data,
                attachment_id: body.attachment_id,
                size: body.size.unwrap_or_default(),
            },
        }
    }

    fn leaf_body(self) -> Option<GmailPartBody> {
        match self.body {
            Some(body) if body.data.is_some() => Some(body),
            _ => self.parts?.into_iter().next()?.leaf_body(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GmailPartBody {
    #[serde(rename = "attachmentId")]
    attachment_id: Option<String>,
    size: Option<u64>,
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GmailMessageListResource {
    messages: Option<Vec<GmailMessageListEntry>>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

impl GmailMessageListResource {
    fn into_page(self) -> MessagePage {
        MessagePage {
            messages: self
                .messages
                .unwrap_or_default()
                .into_iter()
                .map(|entry| MessageRef {
                    id: entry.id,
                    thread_id: entry.thread_id,
                })
                .collect(),
            next_page_token: self.next_page_token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GmailMessageListEntry {
    id: String,
    #[serde(rename = "threadId")]
    thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GmailAttachmentResource {
    size: Option<u64>,
    data: Option<String>,
}

#[derive(Debug, Serialize)]
struct GmailSendRequest {
    raw: String,
}

#[derive(Debug, Deserialize)]
struct GmailSendResponse {
    id: String,
    #[serde(rename = "threadId")]
    thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GmailMessageHeader {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct GmailApiErrorEnvelope {
    error: GmailApiError,
}

#[derive(Debug, Deserialize)]
struct GmailApiError {
    code: Option<u16>,
    status: Option<String>,
    message: Option<String>,
    errors: Option<Vec<GmailApiErrorDetail>>,
}

#[derive(Debug, Deserialize)]
struct GmailApiErrorDetail {
    reason: Option<String>,
}

fn header_value(headers: &[GmailMessageHeader], target: &str) -> Option<String> {
    headers
        .iter()
        .find(|header| header.name.eq_ignore_ascii_case(target))
        .map(|header| header.value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn map_api_error(status: StatusCode, body: &str) -> AppError {
    let message = parse_api_error_message(body).unwrap_or_else(|| {
        let body = body.trim();
        if body.is_empty() {
            "no error details in response body".to_string()
        } else {
            body.to_string()
        }
    });

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return AppError::Auth(format!(
            "gmail api authorization failed ({status}): {message}. run `gmail-probe auth login`"
        ));
    }

    AppError::Api(format!("gmail api request failed ({status}): {message}"))
}

fn parse_api_error_message(body: &str) -> Option<String> {
    let envelope = serde_json::from_str::<GmailApiErrorEnvelope>(body).ok()?;
    let mut parts = Vec::new();

    if let Some(message) = envelope.error.message {
        parts.push(message);
    }

    if let Some(status) = envelope.error.status {
        parts.push(format!("status={status}"));
    }

    if let Some(code) = envelope.error.code {
        parts.push(format!("code={code}"));
    }

    if let Some(reason) = envelope
        .error
        .errors
        .and_then(|errors| errors.into_iter().find_map(|detail| detail.reason))
    {
        parts.push(format!("reason={reason}"));
    }

    if parts.is_empty() {
        return None;
    }

    Some(parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_multipart_resource_to_full_message() {
        let resource: GmailMessageResource = serde_json::from_str(
            r#"{
                "id": "msg-123",
                "threadId": "thread-456",
                "snippet": "hello world",
                "payload": {
                    "mimeType": "multipart/mixed",
                    "filename": "",
                    "headers": [
                        {"name": "Subject", "value": "Invoice #1"},
                        {"name": "From", "value": "billing@example.com"}
                    ],
                    "body": {"size": 0},
                    "parts": [
                        {
                            "partId": "0",
                            "mimeType": "text/plain",
                            "filename": "",
                            "body": {"size": 5, "data": "aGVsbG8"}
                        },
                        {
                            "partId": "1",
                            "mimeType": "application/pdf",
                            "filename": "invoice.pdf",
                            "body": {"size": 1024, "attachmentId": "att-1"}
                        }
                    ]
                }
            }"#,
        )
        .expect("resource should parse");

        let message = resource.into_full();
        assert_eq!(message.id, "msg-123");
        assert_eq!(message.thread_id.as_deref(), Some("thread-456"));
        assert_eq!(message.subject.as_deref(), Some("Invoice #1"));
        assert_eq!(message.from.as_deref(), Some("billing@example.com"));
        assert_eq!(message.parts.len(), 2);
        assert_eq!(message.parts[0].body.data.as_deref(), Some("aGVsbG8"));
        assert_eq!(message.parts[1].filename, "invoice.pdf");
        assert_eq!(message.parts[1].body.attachment_id.as_deref(), Some("att-1"));
    }

    #[test]
    fn single_part_payload_becomes_first_part() {
        let resource: GmailMessageResource = serde_json::from_str(
            r#"{
                "id": "msg-1",
                "payload": {
                    "mimeType": "text/plain",
                    "headers": [{"name": "subject", "value": "plain"}],
                    "body": {"size": 2, "data": "aGk"}
                }
            }"#,
        )
        .expect("resource should parse");

        let message = resource.into_full();
        assert_eq!(message.subject.as_deref(), Some("plain"));
        assert_eq!(message.parts.len(), 1);
        assert_eq!(message.parts[0].body.data.as_deref(), Some("aGk"));
        assert!(message.parts[0].filename.is_empty());
    }

    #[test]
    fn nested_alternative_part_exposes_first_leaf_body() {
        let resource: GmailMessageResource = serde_json::from_str(
            r#"{
                "id": "msg-2",
                "payload": {
                    "mimeType": "multipart/mixed",
                    "parts": [
                        {
                            "partId": "0",
                            "mimeType": "multipart/alternative",
                            "filename": "",
                            "body": {"size": 0},
                            "parts": [
                                {"partId": "0.0", "mimeType": "text/plain", "body": {"size": 4, "data": "dGV4dA"}},
                                {"partId": "0.1", "mimeType": "text/html", "body": {"size": 4, "data": "aHRtbA"}}
                            ]
                        },
                        {
                            "partId": "1",
                            "mimeType": "text/csv",
                            "filename": "report.csv",
                            "body": {"size": 10, "attachmentId": "att-9"}
                        }
                    ]
                }
            }"#,
        )
        .expect("resource should parse");

        let message = resource.into_full();
        assert_eq!(message.parts.len(), 2);
        assert_eq!(message.parts[0].body.data.as_deref(), Some("dGV4dA"));
        assert_eq!(message.parts[1].body.attachment_id.as_deref(), Some("att-9"));
    }

    #[test]
    fn list_resource_keeps_next_page_token() {
        let resource: GmailMessageListResource = serde_json::from_str(
            r#"{"messages":[{"id":"a","threadId":"t"}],"nextPageToken":"p2","resultSizeEstimate":1}"#,
        )
        .expect("list should parse");

        let page = resource.into_page();
        assert_eq!(page.messages.len(), 1);
        assert_eq!(page.next_token(), Some("p2"));
    }

    #[test]
    fn empty_list_resource_has_no_messages() {
        let resource: GmailMessageListResource =
            serde_json::from_str(r#"{"resultSizeEstimate":0}"#).expect("list should parse");

        let page = resource.into_page();
        assert!(page.messages.is_empty());
        assert!(page.next_token().is_none());
    }

    #[test]
    fn maps_unauthorized_as_auth_error() {
        let error = map_api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"code":401,"message":"Request had invalid authentication credentials.","status":"UNAUTHENTICATED"}}"#,
        );

        match error {
            AppError::Auth(message) => {
                assert!(message.contains("invalid authentication credentials"));
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn maps_not_found_as_api_error() {
        let error = map_api_error(
            StatusCode::NOT_FOUND,
            r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#,
        );

        match error {
            AppError::Api(message) => {
                assert!(message.contains("Requested entity was not found"));
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }
}
