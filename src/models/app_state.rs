use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::{
    config::app_config::AppConfig,
    db::{MemoryStore, PgStore, QuizStore},
    models::error::QuizError,
    service::session::SessionOrchestrator,
};

/// Shared handle the UI layer keeps around: the store and the orchestrator
/// running on it.
pub struct AppState<S> {
    store: Arc<S>,
    session: SessionOrchestrator<S>,
}

impl<S: QuizStore> AppState<S> {
    pub fn from_store(store: S) -> Arc<Self> {
        let store = Arc::new(store);
        let session = SessionOrchestrator::new(store.clone());

        Arc::new(Self { store, session })
    }

    pub fn get_store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn session(&self) -> &SessionOrchestrator<S> {
        &self.session
    }
}

impl AppState<PgStore> {
    pub async fn from_config(config: &AppConfig) -> Result<Arc<Self>, QuizError> {
        let store = PgStore::connect(&config.database).await?;
        Ok(Self::from_store(store))
    }

    pub fn get_pool(&self) -> &Pool<Postgres> {
        self.store.get_pool()
    }
}

impl AppState<MemoryStore> {
    pub fn in_memory() -> Arc<Self> {
        Self::from_store(MemoryStore::new())
    }
}
