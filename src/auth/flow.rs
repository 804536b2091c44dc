use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use sha2::{Digest, Sha256};
use url::Url;

use crate::config::Settings;
use crate::error::AppResult;

pub(crate) const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Full mailbox scope; deleting messages needs more than `gmail.modify`.
pub(crate) const OAUTH_SCOPES: &str = "https://mail.google.com/ openid email";

#[derive(Debug, Clone)]
pub(crate) struct OAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
}

impl OAuthConfig {
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        Ok(Self {
            client_id: settings.client_id()?.to_string(),
            client_secret: settings.client_secret().map(ToOwned::to_owned),
            redirect_uri: settings.redirect_uri(),
        })
    }
}

/// One authorization-code request with PKCE.
#[derive(Debug)]
pub(crate) struct LoginFlow {
    pub authorization_url: String,
    pub code_verifier: String,
    pub state: String,
}

impl LoginFlow {
    pub fn new(config: &OAuthConfig) -> AppResult<Self> {
        let state = random_token(32);
        let code_verifier = random_token(64);

        let mut url = Url::parse(GOOGLE_AUTH_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &config.client_id)
            .append_pair("redirect_uri", &config.redirect_uri)
            .append_pair("scope", OAUTH_SCOPES)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("state", &state)
            .append_pair("code_challenge", &pkce_challenge(&code_verifier))
            .append_pair("code_challenge_method", "S256");

        Ok(Self {
            authorization_url: url.to_string(),
            code_verifier,
            state,
        })
    }
}

pub(crate) fn random_token(len: usize) -> String {
    let mut bytes = vec![0_u8; len];
    rand::thread_rng().fill(bytes.as_mut_slice());
    URL_SAFE_NO_PAD.encode(bytes)
}

pub(crate) fn pkce_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

pub(crate) fn open_browser(url: &str) -> bool {
    let mut command = if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = std::process::Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        std::process::Command::new("xdg-open")
    };

    command
        .arg(url)
        .status()
        .is_ok_and(|status| status.success())
}
