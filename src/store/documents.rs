use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::services::chunking;

/// An extracted document held for the lifetime of the process.
/// Nothing here survives a restart; delete covers the "clear" action.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub original_filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub word_count: usize,
    pub text: String,
    pub created_at: String,
}

#[derive(Clone, Default)]
pub struct DocumentStore {
    inner: Arc<RwLock<HashMap<String, Document>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &self,
        original_filename: &str,
        content_type: &str,
        size_bytes: i64,
        text: String,
    ) -> Document {
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            original_filename: original_filename.to_string(),
            content_type: content_type.to_string(),
            size_bytes,
            word_count: chunking::word_count(&text),
            text,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        self.inner.write().insert(doc.id.clone(), doc.clone());
        doc
    }

    pub fn find_by_id(&self, id: &str) -> Option<Document> {
        self.inner.read().get(id).cloned()
    }

    pub fn list(&self) -> Vec<Document> {
        let mut docs: Vec<Document> = self.inner.read().values().cloned().collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        docs
    }

    pub fn delete(&self, id: &str) -> bool {
        self.inner.write().remove(id).is_some()
    }
}
