use crate::format::{deserialize_knowledge, serialize_knowledge, KnowledgeError};
use baque_core::{KnowledgeBase, KnowledgeRecord};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DEFAULT_KNOWLEDGE_JSON: &str = include_str!("../default_knowledge.json");

const KNOWLEDGE_ENV: &str = "BAQUE_KB";

/// The dataset shipped with the tool. Several questions appear more than once.
pub fn default_knowledge() -> KnowledgeBase {
    let records = deserialize_knowledge(DEFAULT_KNOWLEDGE_JSON)
        .expect("built-in default_knowledge.json must be valid");
    KnowledgeBase::from_records(records)
}

pub fn default_knowledge_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(KNOWLEDGE_ENV) {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".baque_knowledge.json"))
}

/// Chinese tags (`zh`, `zh-CN`, `zh_Hans`) select `zh_CN`; every other tag,
/// or none at all, selects `en_US`.
pub fn normalize_locale(locale: Option<&str>) -> String {
    let chinese = locale
        .map(|tag| tag.trim().to_ascii_lowercase().replace('-', "_"))
        .is_some_and(|tag| matches!(tag.as_str(), "zh" | "zh_cn" | "zh_hans" | "zh_hans_cn"));
    if chinese { "zh_CN" } else { "en_US" }.to_string()
}

pub fn load_knowledge_file(path: &Path) -> Result<Vec<KnowledgeRecord>, KnowledgeError> {
    let raw = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    let records = deserialize_knowledge(&raw)?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded knowledge base");
    Ok(records)
}

/// Stored base if it exists and decodes; otherwise the bundled dataset. A
/// corrupt file is left on disk untouched.
pub fn load_or_default(path: &Path) -> KnowledgeBase {
    match load_knowledge_file(path) {
        Ok(records) => KnowledgeBase::from_records(records),
        Err(KnowledgeError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no stored knowledge base, using defaults");
            default_knowledge()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "stored knowledge base unreadable, using defaults");
            default_knowledge()
        }
    }
}

pub fn save_knowledge_file(path: &Path, records: &[KnowledgeRecord]) -> Result<(), KnowledgeError> {
    let body = serialize_knowledge(records)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }
    fs::write(path, body).map_err(|source| io_error(path, source))?;
    tracing::debug!(path = %path.display(), records = records.len(), "saved knowledge base");
    Ok(())
}

/// File name offered for an export made on `date` (`YYYY-MM-DD`).
pub fn export_file_name(date: &str) -> String {
    format!("baque_qa_{date}.json")
}

fn io_error(path: &Path, source: std::io::Error) -> KnowledgeError {
    KnowledgeError::Io {
        path: path.to_path_buf(),
        source,
    }
}
