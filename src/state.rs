use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::inference::InferenceClient;
use crate::store::documents::DocumentStore;
use crate::store::jobs::DigestJobStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub inference: Arc<InferenceClient>,
    pub documents: DocumentStore,
    pub jobs: DigestJobStore,
}

impl AppState {
    pub fn new(config: AppConfig, inference: InferenceClient) -> Self {
        Self {
            config: Arc::new(config),
            inference: Arc::new(inference),
            documents: DocumentStore::new(),
            jobs: DigestJobStore::new(),
        }
    }
}
