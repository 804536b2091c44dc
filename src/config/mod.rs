pub mod paths;
pub mod profile;
pub mod settings;

pub use paths::AppPaths;
pub use profile::resolve_profile;
pub use settings::Settings;

use crate::error::AppResult;

/// Everything loaded from disk for one named profile.
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    pub name: String,
    pub paths: AppPaths,
    pub settings: Settings,
}

impl ProfileConfig {
    /// Resolves `profile` and reads its settings; a missing settings file
    /// yields defaults.
    pub fn load(profile: &str, paths: AppPaths) -> AppResult<Self> {
        let name = resolve_profile(profile);
        let settings = settings::load(paths.settings_file(&name))?;
        Ok(Self {
            name,
            paths,
            settings,
        })
    }
}

pub fn save_settings(paths: &AppPaths, profile: &str, settings: &Settings) -> AppResult<()> {
    settings::save(paths.settings_file(profile), settings)
}
