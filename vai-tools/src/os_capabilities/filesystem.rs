//! Opening files and folders with the desktop's default handler

use super::{validate_name, OsError, OsResult};
use std::path::Path;
use tokio::process::Command;

/// Name a viewer or file manager is expected to show in its title.
pub fn display_name(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    Path::new(trimmed)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Open a file or directory with xdg-open. Returns the display name.
pub async fn open_path(path: &str) -> OsResult<String> {
    validate_name(path, "path")?;
    let target = Path::new(path.trim());
    if !target.exists() {
        return Err(OsError::NotFound(target.display().to_string()));
    }

    Command::new("xdg-open")
        .arg(target)
        .spawn()
        .map_err(OsError::Io)?;

    Ok(display_name(path))
}

/// Like [`open_path`], but insists on a directory.
pub async fn open_folder(path: &str) -> OsResult<String> {
    validate_name(path, "path")?;
    if !Path::new(path.trim()).is_dir() {
        return Err(OsError::InvalidArgument(format!("not a directory: {path}")));
    }
    open_path(path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_last_component() {
        assert_eq!(display_name("/home/me/Music/"), "Music");
        assert_eq!(display_name("/tmp/report.pdf"), "report.pdf");
        assert_eq!(display_name("notes.txt"), "notes.txt");
    }

    #[tokio::test]
    async fn missing_path_is_not_found() {
        let result = open_path("/definitely/not/here.txt").await;
        assert!(matches!(result, Err(OsError::NotFound(_))));
    }

    #[tokio::test]
    async fn open_folder_rejects_files() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = open_folder(file.path().to_str().unwrap()).await;
        assert!(matches!(result, Err(OsError::InvalidArgument(_))));
    }
}
