use crate::application_impl::RestApi;
use crate::application_port::AuthEvents;
use crate::domain_port::LocalStore;
use crate::infra::{FileStore, HttpClient, MemoryStore, TokenVault};
use crate::logger::*;
use crate::poller::{TaskBoard, TaskPoller};
use crate::session::SessionContext;
use crate::settings::Settings;
use std::sync::Arc;

/// Everything a page needs, wired once per process.
pub struct App {
    pub api: RestApi,
    pub session: SessionContext,
    pub poller: TaskPoller,
    pub json: bool,
    store: Arc<dyn LocalStore>,
}

impl App {
    pub async fn try_new(settings: &Settings, json: bool) -> anyhow::Result<Self> {
        let store: Arc<dyn LocalStore> = match settings.storage.backend.as_str() {
            "file" => {
                let store = FileStore::new(&settings.storage.path);
                debug!(path = %store.path().display(), "using file storage");
                Arc::new(store)
            }
            "memory" => Arc::new(MemoryStore::new()),
            other => return Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        };
        Self::with_store(settings, store, json).await
    }

    pub async fn with_store(
        settings: &Settings,
        store: Arc<dyn LocalStore>,
        json: bool,
    ) -> anyhow::Result<Self> {
        let vault = TokenVault::new(store.clone());
        let events = AuthEvents::new();
        let http = Arc::new(HttpClient::new(
            &settings.api.base_url,
            settings.api.timeout(),
            vault.clone(),
            events.clone(),
        )?);
        let api = RestApi::new(http);
        let session = SessionContext::new(Arc::new(api.clone()), vault, &events);

        let board = match TaskBoard::load(store.as_ref(), settings.poller.capacity).await {
            Ok(board) => board,
            Err(e) => {
                warn!(error = %e, "saved task list unreadable, starting empty");
                TaskBoard::new(settings.poller.capacity)
            }
        };
        let poller = TaskPoller::new(Arc::new(api.clone()), board, settings.poller.interval());

        debug!(base_url = %settings.api.base_url, "client ready");
        Ok(Self {
            api,
            session,
            poller,
            json,
            store,
        })
    }

    /// Stops background work and persists the task list.
    pub async fn shutdown(&self) {
        self.poller.shutdown().await;
        if let Err(e) = self.poller.board_copy().save(self.store.as_ref()).await {
            warn!(error = %e, "could not save task list");
        }
        self.session.shutdown().await;
        debug!("client shut down");
    }
}
