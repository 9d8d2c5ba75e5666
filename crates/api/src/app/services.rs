use std::sync::Arc;

use mockrest_core::Interceptor;
use mockrest_infra::{CollectionStore, JsonFile, StoreResult, Volatile};
use mockrest_posts::{PostRules, PostService};
use mockrest_tasks::{TaskRules, TaskService};
use mockrest_users::{UserRules, UserService};

use crate::config::{ServerConfig, ServiceKind};

/// Everything the handlers need: the datastore and the service's rules.
#[derive(Clone)]
pub struct AppServices {
    kind: ServiceKind,
    store: Arc<CollectionStore>,
    interceptor: Arc<dyn Interceptor>,
}

impl AppServices {
    pub fn new(kind: ServiceKind, store: Arc<CollectionStore>) -> Self {
        Self {
            kind,
            store,
            interceptor: interceptor_for(kind),
        }
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn interceptor(&self) -> &dyn Interceptor {
        self.interceptor.as_ref()
    }
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices")
            .field("kind", &self.kind)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// The rules each service applies, with their default value sets.
pub fn interceptor_for(kind: ServiceKind) -> Arc<dyn Interceptor> {
    match kind {
        ServiceKind::Tasks => Arc::new(TaskService::new(TaskRules::default())),
        ServiceKind::Posts => Arc::new(PostService::new(PostRules::default())),
        ServiceKind::Users => Arc::new(UserService::new(UserRules::default())),
    }
}

/// Open the configured datastore file for the configured service.
pub fn build_services(config: &ServerConfig) -> StoreResult<AppServices> {
    let store = CollectionStore::open(JsonFile::new(&config.db_path), config.service.collections())?;
    Ok(AppServices::new(config.service, Arc::new(store)))
}

/// A service backed by a throwaway in-memory datastore (dev/test).
pub fn build_in_memory_services(kind: ServiceKind) -> StoreResult<AppServices> {
    let store = CollectionStore::open(Volatile, kind.collections())?;
    Ok(AppServices::new(kind, Arc::new(store)))
}
