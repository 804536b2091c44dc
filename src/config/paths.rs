use std::fs;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "gmail-probe";

#[derive(Debug, Clone)]
pub struct AppPaths {
    profiles_dir: PathBuf,
    tokens_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> AppResult<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| AppError::Config("unable to resolve config directory".to_string()))?;
        let data_root = dirs::data_dir()
            .ok_or_else(|| AppError::Config("unable to resolve data directory".to_string()))?;

        Self::from_roots(config_root, data_root)
    }

    /// Lays out the app directories under explicit roots and creates them.
    pub fn from_roots(config_root: PathBuf, data_root: PathBuf) -> AppResult<Self> {
        let profiles_dir = config_root.join(APP_DIR).join("profiles");
        let tokens_dir = data_root.join(APP_DIR).join("tokens");

        fs::create_dir_all(&profiles_dir)?;
        fs::create_dir_all(&tokens_dir)?;

        Ok(Self {
            profiles_dir,
            tokens_dir,
        })
    }

    pub fn settings_file(&self, profile: &str) -> PathBuf {
        self.profiles_dir.join(format!("{profile}.json"))
    }

    pub fn token_file(&self, profile: &str) -> PathBuf {
        self.tokens_dir.join(format!("{profile}.json"))
    }
}
