use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{AppError, AppResult};

use super::callback::wait_for_auth_callback;
use super::flow::{LoginFlow, OAuthConfig, open_browser};
use super::token::TokenSet;
use super::token_store::TokenStore;

const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_REVOKE_ENDPOINT: &str = "https://oauth2.googleapis.com/revoke";
const GOOGLE_USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const OAUTH_CALLBACK_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Serialize)]
pub struct AuthLoginResult {
    pub profile: String,
    pub opened_browser: bool,
    pub authorization_url: String,
    pub email: Option<String>,
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub profile: String,
    pub logged_in: bool,
    pub email: Option<String>,
    pub expired: Option<bool>,
    pub expires_in_seconds: Option<i64>,
    pub has_refresh_token: Option<bool>,
    pub note: Option<String>,
}

impl AuthStatus {
    fn logged_out(profile: &str, note: impl Into<String>) -> Self {
        Self {
            profile: profile.to_string(),
            logged_in: false,
            email: None,
            expired: None,
            expires_in_seconds: None,
            has_refresh_token: None,
            note: Some(note.into()),
        }
    }
}

/// OAuth installed-app login for the mailbox account of one profile.
#[derive(Debug, Default)]
pub struct AuthService;

impl AuthService {
    pub async fn login<S: TokenStore>(
        profile: &str,
        settings: &Settings,
        store: &S,
    ) -> AppResult<AuthLoginResult> {
        let oauth = OAuthConfig::from_settings(settings)?;
        let flow = LoginFlow::new(&oauth)?;
        let opened_browser = open_browser(&flow.authorization_url);

        if !opened_browser {
            eprintln!(
                "open this URL in your browser to continue login:\n{}",
                flow.authorization_url
            );
        }

        let code =
            wait_for_auth_callback(&oauth.redirect_uri, &flow.state, OAUTH_CALLBACK_TIMEOUT)
                .await?;

        let mut token = request_token(
            &oauth,
            &[
                ("grant_type", "authorization_code"),
                ("code", code.as_str()),
                ("redirect_uri", oauth.redirect_uri.as_str()),
                ("code_verifier", flow.code_verifier.as_str()),
            ],
        )
        .await?;
        token.email = fetch_email(&token.access_token).await;
        store.save(profile, &token)?;
        info!(profile, email = ?token.email, "oauth login completed");

        Ok(AuthLoginResult {
            profile: profile.to_string(),
            opened_browser,
            authorization_url: flow.authorization_url,
            email: token.email,
            note: "oauth login completed and token stored".to_string(),
        })
    }

    /// Returns the stored token, refreshing it first when it has expired.
    pub async fn refresh<S: TokenStore>(
        profile: &str,
        settings: &Settings,
        store: &S,
    ) -> AppResult<TokenSet> {
        let current = store.load(profile)?.ok_or_else(|| {
            AppError::InvalidInput("not logged in. run `gmail-probe auth login`".to_string())
        })?;

        if !current.is_expired(SystemTime::now()) {
            return Ok(current);
        }

        let refresh_token = current.refresh_token.clone().ok_or_else(|| {
            AppError::Auth("access token expired and no refresh token is stored".to_string())
        })?;

        debug!(profile, "refreshing expired access token");
        let oauth = OAuthConfig::from_settings(settings)?;
        let mut refreshed = request_token(
            &oauth,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ],
        )
        .await?;

        refreshed.refresh_token.get_or_insert(refresh_token);
        if refreshed.email.is_none() {
            refreshed.email = current.email;
        }

        store.save(profile, &refreshed)?;
        Ok(refreshed)
    }

    pub async fn status<S: TokenStore>(profile: &str, store: &S) -> AppResult<AuthStatus> {
        let Some(token) = store.load(profile)? else {
            return Ok(AuthStatus::logged_out(profile, "no token found"));
        };

        let now = SystemTime::now();
        Ok(AuthStatus {
            profile: profile.to_string(),
            logged_in: true,
            email: token.email.clone(),
            expired: Some(token.is_expired(now)),
            expires_in_seconds: token.expires_in_seconds(now),
            has_refresh_token: Some(token.has_refresh_token()),
            note: Some("token loaded from local store".to_string()),
        })
    }

    pub async fn logout<S: TokenStore>(profile: &str, store: &S) -> AppResult<AuthStatus> {
        let note = match store.load(profile)? {
            Some(token) => {
                let revocable = token
                    .refresh_token
                    .as_deref()
                    .unwrap_or(token.access_token.as_str());

                match revoke_token(revocable).await {
                    Ok(()) => "remote token revoked and local credentials removed".to_string(),
                    Err(err) => {
                        warn!(profile, %err, "token revocation failed");
                        format!("local credentials removed (revoke failed: {err})")
                    }
                }
            }
            None => "local credentials removed".to_string(),
        };

        store.clear(profile)?;
        Ok(AuthStatus::logged_out(profile, note))
    }
}

#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    token_type: Option<String>,
    scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    email: Option<String>,
}

async fn request_token(config: &OAuthConfig, grant: &[(&str, &str)]) -> AppResult<TokenSet> {
    let mut form: Vec<(&str, &str)> = grant.to_vec();
    form.push(("client_id", config.client_id.as_str()));
    if let Some(client_secret) = &config.client_secret {
        form.push(("client_secret", client_secret.as_str()));
    }

    let response = reqwest::Client::new()
        .post(GOOGLE_TOKEN_ENDPOINT)
        .form(&form)
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        let payload: OAuthTokenResponse = response.json().await?;
        return Ok(TokenSet {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            expires_at_unix: expires_at_unix(payload.expires_in),
            token_type: payload.token_type,
            scope: payload.scope,
            email: None,
        });
    }

    let body = response.text().await?;
    Err(token_error(status, &body))
}

fn token_error(status: reqwest::StatusCode, body: &str) -> AppError {
    match serde_json::from_str::<OAuthErrorResponse>(body) {
        Ok(payload) => AppError::Auth(format!(
            "oauth token exchange failed ({status}): {} ({})",
            payload
                .error
                .unwrap_or_else(|| "unknown_oauth_error".to_string()),
            payload
                .error_description
                .unwrap_or_else(|| "no description".to_string()),
        )),
        Err(_) => AppError::Auth(format!("oauth token exchange failed ({status}): {body}")),
    }
}

fn expires_at_unix(expires_in: Option<u64>) -> Option<u64> {
    let expires_in = expires_in?;
    let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
    Some(now.saturating_add(expires_in))
}

/// Best effort; a missing email only affects the default `From` header.
async fn fetch_email(access_token: &str) -> Option<String> {
    let response = reqwest::Client::new()
        .get(GOOGLE_USERINFO_ENDPOINT)
        .bearer_auth(access_token)
        .send()
        .await
        .ok()?;

    if !response.status().is_success() {
        debug!(status = %response.status(), "userinfo lookup failed");
        return None;
    }

    response.json::<UserInfoResponse>().await.ok()?.email
}

async fn revoke_token(token: &str) -> AppResult<()> {
    let response = reqwest::Client::new()
        .post(GOOGLE_REVOKE_ENDPOINT)
        .form(&[("token", token)])
        .send()
        .await?;

    if response.status().is_success() {
        return Ok(());
    }

    Err(AppError::Auth(format!(
        "revoke endpoint returned {}",
        response.status()
    )))
}
