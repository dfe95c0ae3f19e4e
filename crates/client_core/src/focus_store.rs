use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::domain::PanelId;
use storage::Storage;
use tokio::sync::Mutex;

/// Persistent slot for the focused statistic panel.
///
/// Implementations must treat a missing or unreadable value as "no saved
/// focus".
#[async_trait]
pub trait FocusStore: Send + Sync {
    async fn load_focus(&self) -> Result<Option<PanelId>>;
    async fn save_focus(&self, focus: Option<PanelId>) -> Result<()>;
}

/// In-memory focus store for tests and database-less runs. Forgets the
/// selection when dropped.
#[derive(Default)]
pub struct EphemeralFocusStore {
    slot: Mutex<Option<PanelId>>,
}

#[async_trait]
impl FocusStore for EphemeralFocusStore {
    async fn load_focus(&self) -> Result<Option<PanelId>> {
        Ok(*self.slot.lock().await)
    }

    async fn save_focus(&self, focus: Option<PanelId>) -> Result<()> {
        *self.slot.lock().await = focus;
        Ok(())
    }
}

/// Focus store backed by the SQLite prefs slot.
pub struct DurableFocusStore {
    store: Storage,
}

impl DurableFocusStore {
    pub async fn initialize(database_url: &str) -> Result<Arc<Self>> {
        let store = Storage::new(database_url)
            .await
            .with_context(|| format!("failed to initialize focus storage at '{database_url}'"))?;
        Ok(Arc::new(Self { store }))
    }
}

#[async_trait]
impl FocusStore for DurableFocusStore {
    async fn load_focus(&self) -> Result<Option<PanelId>> {
        self.store.load_focus().await
    }

    async fn save_focus(&self, focus: Option<PanelId>) -> Result<()> {
        self.store.save_focus(focus).await
    }
}
