use crate::format::KnowledgeError;
use crate::load::{load_knowledge_file, load_or_default, save_knowledge_file};
use baque_core::{KnowledgeBase, KnowledgeRecord};
use std::path::{Path, PathBuf};

/// Knowledge base bound to a file. Every mutation is written through.
#[derive(Debug)]
pub struct KnowledgeStore {
    path: PathBuf,
    base: KnowledgeBase,
}

impl KnowledgeStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base = load_or_default(&path);
        Self { path, base }
    }

    /// Binds `base` to `path` without reading the file.
    pub fn with_base(path: impl Into<PathBuf>, base: KnowledgeBase) -> Self {
        Self {
            path: path.into(),
            base,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base(&self) -> &KnowledgeBase {
        &self.base
    }

    pub fn records(&self) -> &[KnowledgeRecord] {
        self.base.records()
    }

    pub fn upsert(&mut self, question: &str, answer: &str) -> Result<(), KnowledgeError> {
        self.base.upsert(question, answer);
        tracing::info!(question, "saved knowledge entry");
        self.save()
    }

    pub fn delete_by_question(&mut self, question: &str) -> Result<usize, KnowledgeError> {
        let removed = self.base.delete_by_question(question);
        tracing::info!(question, removed, "deleted knowledge entries");
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    /// Replaces the whole collection with the records in `path`. On any error
    /// the current collection is kept as is.
    pub fn import(&mut self, path: &Path) -> Result<usize, KnowledgeError> {
        let records = load_knowledge_file(path)?;
        let count = records.len();
        self.base.replace_all(records);
        tracing::info!(path = %path.display(), records = count, "imported knowledge base");
        self.save()?;
        Ok(count)
    }

    pub fn export(&self, path: &Path) -> Result<(), KnowledgeError> {
        save_knowledge_file(path, self.base.records())?;
        tracing::info!(path = %path.display(), records = self.base.len(), "exported knowledge base");
        Ok(())
    }

    pub fn save(&self) -> Result<(), KnowledgeError> {
        save_knowledge_file(&self.path, self.base.records())
    }
}
