use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::token_store::write_private;
use crate::error::{AppError, AppResult};

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8787/callback";
const DEFAULT_ATTACHMENT_DIR: &str = "emailAttachments";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    /// Overrides the account address in the `From` header.
    #[serde(default)]
    pub sender_email: Option<String>,
    #[serde(default)]
    pub attachment_dir: Option<PathBuf>,
}

impl Settings {
    pub fn client_id(&self) -> AppResult<&str> {
        self.client_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AppError::Config(
                    "missing oauth client_id in profile settings. add it to your profile json"
                        .to_string(),
                )
            })
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn redirect_uri(&self) -> String {
        self.redirect_uri
            .clone()
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string())
    }

    /// Where saved attachments go; relative paths resolve against `cwd`.
    pub fn attachment_dir(&self, cwd: &Path) -> PathBuf {
        let dir = self
            .attachment_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ATTACHMENT_DIR));
        if dir.is_absolute() { dir } else { cwd.join(dir) }
    }
}

pub fn load(path: PathBuf) -> AppResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path)?;
    let settings = serde_json::from_str(&raw)?;
    Ok(settings)
}

pub fn save(path: PathBuf, settings: &Settings) -> AppResult<()> {
    write_private(&path, &serde_json::to_string_pretty(settings)?)
}
