//! The sync state machine.
//!
//! Reconciles this display's identity against the published snapshot and
//! keeps doing so every time the invalidation channel fires.
//!
//! ```text
//!   Loading ──fetch ok + device found──▶ Success ◀─┐
//!      │                                   │       │ refetch
//!      └──fetch/registration failed──▶ Error ◀─────┘
//! ```
//!
//! `Loading` is only ever the initial state. A revalidation leaves the
//! current state in place until the new fetch resolves. The observable
//! state lives in a `watch` channel and is only replaced when the new value
//! differs structurally from the current one, so downstream layout runs
//! once per real change.

use crate::error::SyncError;
use crate::model::{Device, Menu, SheetData};
use crate::vault::{self, LocalState};

use async_trait::async_trait;
use menuboard_hive::{Subscription, SHEET_UPDATED};
use std::sync::Arc;
use tokio::sync::watch;

/// Where snapshots come from, and where unknown devices announce themselves.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_sheet(&self) -> Result<SheetData, SyncError>;
    async fn register_device(&self, device_id: &str) -> Result<(), SyncError>;
}

/// What a successfully synced display shows.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuView {
    pub device: Device,
    pub menu: Menu,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncState {
    Loading,
    Success(Arc<MenuView>),
    Error(SyncError),
}

impl SyncState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SyncState::Loading)
    }

    pub fn view(&self) -> Option<&Arc<MenuView>> {
        match self {
            SyncState::Success(view) => Some(view),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SyncError> {
        match self {
            SyncState::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of one fetch-and-reconcile pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    /// A new menu/device was published to the state.
    Updated,
    /// The snapshot produced exactly what is already shown.
    Unchanged,
    /// This device was not in the snapshot; a registration was sent.
    Registered,
    /// The pass ended in `Error`.
    Failed(SyncError),
}

pub struct SyncMachine {
    source: Arc<dyn SheetSource>,
    store: Arc<dyn LocalState>,
    device_id: Option<String>,
    state: watch::Sender<SyncState>,
}

impl std::fmt::Debug for SyncMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncMachine")
            .field("device_id", &self.device_id)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl SyncMachine {
    pub fn new(source: Arc<dyn SheetSource>, store: Arc<dyn LocalState>) -> Self {
        let (state, _) = watch::channel(SyncState::Loading);
        Self {
            source,
            store,
            device_id: None,
            state,
        }
    }

    /// A receiver that wakes only on real state changes.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    /// The local identity, read or created at most once per machine.
    pub fn device_id(&mut self) -> Result<String, SyncError> {
        if let Some(id) = &self.device_id {
            return Ok(id.clone());
        }
        let id = vault::resolve_device_id(self.store.as_ref())?;
        self.device_id = Some(id.clone());
        Ok(id)
    }

    /// Fetch the snapshot and reconcile against it.
    pub async fn refresh(&mut self) -> Refresh {
        tracing::debug!("fetching sheet snapshot");

        let sheet = match self.source.fetch_sheet().await {
            Ok(sheet) => sheet,
            Err(err) => return self.fail(err),
        };

        let device_id = match self.device_id() {
            Ok(id) => id,
            Err(err) => return self.fail(err),
        };

        self.reconcile(&sheet, &device_id).await
    }

    async fn reconcile(&mut self, sheet: &SheetData, device_id: &str) -> Refresh {
        let Some(device) = sheet.find_device(device_id) else {
            tracing::info!(%device_id, "device not in snapshot; registering");
            return match self.source.register_device(device_id).await {
                Ok(()) => Refresh::Registered,
                Err(err) => self.fail(err),
            };
        };

        let view = MenuView {
            menu: sheet.menu_for(device),
            device: device.clone(),
        };

        if self.transition(SyncState::Success(Arc::new(view))) {
            tracing::info!(
                device = %device.name,
                categories = device.categories.len(),
                "menu updated"
            );
            Refresh::Updated
        } else {
            tracing::debug!("snapshot unchanged; update suppressed");
            Refresh::Unchanged
        }
    }

    fn fail(&mut self, err: SyncError) -> Refresh {
        tracing::warn!(error = %err, "sync failed");
        self.transition(SyncState::Error(err.clone()));
        Refresh::Failed(err)
    }

    /// Replace the state if it differs. Returns whether it did.
    fn transition(&self, next: SyncState) -> bool {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    /// Initial fetch, then one refetch per `sheet-updated` signal until the
    /// subscription closes. Dropping the task is the only cancellation.
    pub async fn run(mut self, mut invalidations: Subscription) {
        self.refresh().await;

        while let Some(signal) = invalidations.recv().await {
            if signal.event != SHEET_UPDATED {
                continue;
            }
            tracing::info!(topic = %signal.topic, "sheet invalidated; revalidating");
            self.refresh().await;
        }

        tracing::debug!("invalidation channel closed; sync stopped");
    }
}
