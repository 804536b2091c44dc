use std::path::PathBuf;

use crate::api::{AuthorizedGmail, GmailClient};
use crate::auth::token_store::TokenStore;
use crate::auth::{AuthService, FileTokenStore};
use crate::config::{AppPaths, ProfileConfig, Settings};
use crate::error::{AppError, AppResult};
use crate::mailbox::Mailbox;
use crate::output::Output;

#[derive(Debug)]
pub struct AppContext {
    pub profile: String,
    pub paths: AppPaths,
    pub settings: Settings,
    pub token_store: FileTokenStore,
    pub gmail_client: GmailClient,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(profile: String, json: bool) -> AppResult<Self> {
        let ProfileConfig {
            name,
            paths,
            settings,
        } = ProfileConfig::load(&profile, AppPaths::discover()?)?;
        let token_store = FileTokenStore::new(paths.clone());

        Ok(Self {
            profile: name,
            paths,
            settings,
            token_store,
            gmail_client: GmailClient::new(),
            output: Output::new(json),
        })
    }

    pub async fn access_token(&self) -> AppResult<String> {
        let token = self.token_store.load(&self.profile)?.ok_or_else(|| {
            AppError::InvalidInput("not logged in. run `gmail-probe auth login`".to_string())
        })?;

        if token.is_expired(std::time::SystemTime::now()) {
            let refreshed =
                AuthService::refresh(&self.profile, &self.settings, &self.token_store).await?;
            return Ok(refreshed.access_token);
        }

        Ok(token.access_token)
    }

    /// Mailbox for the profile's account, with the sender taken from the
    /// settings override or the logged-in address.
    pub async fn mailbox(&self) -> AppResult<Mailbox<AuthorizedGmail>> {
        let access_token = self.access_token().await?;
        let provider = AuthorizedGmail::new(self.gmail_client.clone(), access_token);
        let mailbox = Mailbox::new(provider);

        let sender = match self.settings.sender_email.clone() {
            Some(sender) => Some(sender),
            None => self.token_store.load(&self.profile)?.and_then(|t| t.email),
        };

        Ok(match sender {
            Some(sender) => mailbox.with_sender(sender),
            None => mailbox,
        })
    }

    pub fn attachment_dir(&self) -> AppResult<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(self.settings.attachment_dir(&cwd))
    }
}
