use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use base64::engine::general_purpose::URL_SAFE;
use rand::Rng;

use crate::api::models::SendRequest;

/// Builds the `raw` field of a Gmail send call: a multipart/mixed message
/// with a text/plain body followed by one part per attachment, base64url
/// encoded as a whole.
pub fn build_raw_message(request: &SendRequest) -> String {
    let mut headers = build_base_headers(request);
    let boundary = random_boundary();
    headers.push(format!(
        "Content-Type: multipart/mixed; boundary=\"{boundary}\""
    ));

    let payload = format!(
        "{}\r\n\r\n{}",
        headers.join("\r\n"),
        multipart_body(request, &boundary)
    );

    URL_SAFE.encode(payload.as_bytes())
}

fn build_base_headers(request: &SendRequest) -> Vec<String> {
    let mut headers = Vec::new();
    if let Some(from) = &request.from {
        headers.push(format!("From: {}", sanitize_header(from)));
    }
    headers.push(format!("To: {}", sanitize_header(&request.to.join(", "))));
    headers.push(format!(
        "Subject: {}",
        encode_header_words(&sanitize_header(&request.subject))
    ));
    headers.push("MIME-Version: 1.0".to_string());
    headers
}

fn multipart_body(request: &SendRequest, boundary: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("--{boundary}\r\n"));
    out.push_str("Content-Type: text/plain; charset=utf-8\r\n");
    out.push_str("Content-Transfer-Encoding: base64\r\n\r\n");
    out.push_str(&fold_base64_lines(&STANDARD.encode(request.body.as_bytes())));

    for attachment in &request.attachments {
        let filename = escape_header_value(&attachment.filename);
        out.push_str(&format!("--{boundary}\r\n"));
        out.push_str(&format!(
            "Content-Type: {}; name=\"{filename}\"\r\n",
            attachment.mime_type,
        ));
        out.push_str("Content-Transfer-Encoding: base64\r\n");
        out.push_str(&format!(
            "Content-Disposition: attachment; filename=\"{filename}\"\r\n\r\n"
        ));

        let encoded = STANDARD.encode(&attachment.data);
        out.push_str(&fold_base64_lines(&encoded));
    }

    out.push_str(&format!("--{boundary}--\r\n"));
    out
}

fn fold_base64_lines(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 76 + 8);
    let mut start = 0;
    while start < input.len() {
        let end = (start + 76).min(input.len());
        out.push_str(&input[start..end]);
        out.push_str("\r\n");
        start = end;
    }
    out
}

fn random_boundary() -> String {
    let mut bytes = [0_u8; 12];
    rand::thread_rng().fill(&mut bytes);
    let token = URL_SAFE.encode(bytes);
    format!("gmail-probe-{token}")
}

/// RFC 2047 `B` encoding for non-ASCII header text. Each encoded word holds
/// at most 45 bytes of whole characters; words are folded onto new lines.
fn encode_header_words(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }

    let mut words = Vec::new();
    let mut chunk = String::new();
    for c in value.chars() {
        if chunk.len() + c.len_utf8() > 45 {
            words.push(encoded_word(&chunk));
            chunk.clear();
        }
        chunk.push(c);
    }
    if !chunk.is_empty() {
        words.push(encoded_word(&chunk));
    }

    words.join("\r\n ")
}

fn encoded_word(text: &str) -> String {
    format!("=?UTF-8?B?{}?=", STANDARD.encode(text.as_bytes()))
}

fn sanitize_header(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

fn escape_header_value(value: &str) -> String {
    sanitize_header(value).replace('"', "")
}
