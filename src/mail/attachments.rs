use std::fs;
use std::path::{Path, PathBuf};

use crate::api::models::Attachment;
use crate::error::{AppError, AppResult};

pub fn read_attachments(paths: &[PathBuf]) -> AppResult<Vec<Attachment>> {
    let mut attachments = Vec::new();

    for path in paths {
        let data = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|value| value.to_string_lossy().to_string())
            .ok_or_else(|| {
                AppError::InvalidInput(format!("invalid attachment path: {}", path.display()))
            })?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        attachments.push(Attachment {
            filename,
            mime_type,
            data,
        });
    }

    Ok(attachments)
}

/// Writes attachment bytes into `dir` under the attachment's own file name,
/// replacing any previous file with that name.
pub fn save_attachment(dir: &Path, filename: &str, data: &[u8]) -> AppResult<PathBuf> {
    let name = safe_file_name(filename)?;
    fs::create_dir_all(dir)?;

    let path = dir.join(name);
    fs::write(&path, data)?;
    Ok(path)
}

fn safe_file_name(filename: &str) -> AppResult<String> {
    let name = Path::new(filename.trim())
        .file_name()
        .map(|value| value.to_string_lossy().to_string())
        .unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::InvalidInput(format!(
            "attachment file name `{filename}` cannot be written to disk"
        )));
    }

    Ok(name)
}
