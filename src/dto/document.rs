use serde::Serialize;

use crate::store::documents::Document;

/// Extracted-document metadata returned to clients; the text itself stays
/// server-side until it is summarized or classified.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DocumentResponse {
    pub id: String,
    pub original_filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub word_count: usize,
    pub created_at: String,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            original_filename: doc.original_filename,
            content_type: doc.content_type,
            size_bytes: doc.size_bytes,
            word_count: doc.word_count,
            created_at: doc.created_at,
        }
    }
}
