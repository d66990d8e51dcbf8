//! Source document loading
//!
//! Every file is read and parsed in its own blocking task; all tasks are
//! joined before the documents are handed to the core, so nothing is
//! attached to a tree while another file is still being parsed.

use hellion_core::{SessionSources, SourceCategory, SourceDocument};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task::JoinSet;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to list data directory {path:?}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Loader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Load the save file and every `*.json` file directly inside `data_dir`.
///
/// Unreadable or malformed files are not errors here: they are returned as
/// failed [`SourceDocument`]s so the session can show them as such. Static
/// documents are ordered by file name.
pub async fn load_sources(save: &Path, data_dir: Option<&Path>) -> Result<SessionSources, LoadError> {
    let static_files = match data_dir {
        Some(dir) => list_json_files(dir).await?,
        None => Vec::new(),
    };

    let save_path = save.to_path_buf();
    let save_task =
        tokio::task::spawn_blocking(move || load_document(&save_path, SourceCategory::Save));

    let mut tasks = JoinSet::new();
    for (index, path) in static_files.into_iter().enumerate() {
        tasks.spawn_blocking(move || (index, load_document(&path, SourceCategory::StaticData)));
    }

    let mut loaded = Vec::with_capacity(tasks.len());
    while let Some(result) = tasks.join_next().await {
        loaded.push(result?);
    }
    loaded.sort_by_key(|(index, _)| *index);

    let mut sources = SessionSources::new(save_task.await?);
    sources
        .static_data
        .extend(loaded.into_iter().map(|(_, document)| document));

    tracing::info!(
        "Loaded save and {} static document(s)",
        sources.static_data.len()
    );
    Ok(sources)
}

/// `*.json` files directly inside `dir`, sorted by name.
async fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let to_error = |source| LoadError::DataDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(to_error)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(to_error)? {
        let path = entry.path();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load_document(path: &Path, category: SourceCategory) -> SourceDocument {
    let name = document_name(path);
    match read_document(path) {
        Ok(value) => {
            tracing::debug!("Parsed {}", path.display());
            SourceDocument::loaded(name, category, value)
        }
        Err(message) => {
            tracing::warn!("Failed to load {}: {}", path.display(), message);
            SourceDocument::failed(name, category, message)
        }
    }
}

fn read_document(path: &Path) -> Result<Value, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
