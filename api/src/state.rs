//! Router state: the shared `AppState` (database + websocket manager) plus
//! the long-lived domain services built on top of it. The store and the
//! session controller must outlive individual requests so watch channels
//! and advertisement guards survive between calls.

use services::error::AttendanceError;
use services::join::JoinService;
use services::proximity::{LoopbackRadio, ProximityRadio};
use services::session::SessionService;
use services::store::RemoteStore;
use std::path::Path;
use std::sync::Arc;
use util::state::AppState;

#[derive(Clone)]
pub struct AppContext {
    app: AppState,
    store: Arc<RemoteStore>,
    sessions: Arc<SessionService<RemoteStore>>,
    join: Arc<JoinService<RemoteStore>>,
}

impl AppContext {
    pub fn new(app: AppState, storage_root: impl AsRef<Path>) -> Result<Self, AttendanceError> {
        let radio: Arc<dyn ProximityRadio> = Arc::new(LoopbackRadio::new());
        Self::with_radio(app, storage_root, radio)
    }

    pub fn with_radio(
        app: AppState,
        storage_root: impl AsRef<Path>,
        radio: Arc<dyn ProximityRadio>,
    ) -> Result<Self, AttendanceError> {
        let store = Arc::new(RemoteStore::new(app.db_clone()));
        let sessions = Arc::new(SessionService::new(
            Arc::clone(&store),
            radio,
            storage_root.as_ref(),
        )?);
        let join = Arc::new(JoinService::new(Arc::clone(&store)));
        Ok(Self {
            app,
            store,
            sessions,
            join,
        })
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    pub fn store(&self) -> &Arc<RemoteStore> {
        &self.store
    }

    pub fn sessions(&self) -> &Arc<SessionService<RemoteStore>> {
        &self.sessions
    }

    pub fn join(&self) -> &Arc<JoinService<RemoteStore>> {
        &self.join
    }
}
