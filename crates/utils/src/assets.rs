use std::path::PathBuf;

use directories::ProjectDirs;

const DB_FILE_NAME: &str = "monpotager.sqlite";

/// Per-user data directory; falls back to `./data` when the platform has none.
pub fn asset_dir() -> PathBuf {
    let path = ProjectDirs::from("fr", "monpotager", "monpotager")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"));

    if !path.exists() {
        if let Err(e) = std::fs::create_dir_all(&path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to create asset directory");
        }
    }
    path
}

/// Default SQLite URL inside [`asset_dir`].
pub fn default_database_url() -> String {
    format!(
        "sqlite://{}",
        asset_dir().join(DB_FILE_NAME).to_string_lossy()
    )
}
