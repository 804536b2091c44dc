pub fn message_endpoint(id: &str) -> String {
    format!("/gmail/v1/users/me/messages/{id}")
}

pub fn attachment_endpoint(message_id: &str, attachment_id: &str) -> String {
    format!("/gmail/v1/users/me/messages/{message_id}/attachments/{attachment_id}")
}

pub fn list_endpoint() -> &'static str {
    "/gmail/v1/users/me/messages"
}

pub fn send_endpoint() -> &'static str {
    "/gmail/v1/users/me/messages/send"
}

pub fn get_query() -> Vec<(String, String)> {
    vec![("format".to_string(), "full".to_string())]
}

pub fn list_query(query: Option<&str>, page_token: Option<&str>) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(query) = query {
        params.push(("q".to_string(), query.to_string()));
    }
    if let Some(token) = page_token {
        params.push(("pageToken".to_string(), token.to_string()));
    }
    params
}
