use crate::advisor::{InsightTracker, ReadinessAdvisor};
use crate::config::Config;
use crate::identity::{resolve_owner_identity, restore_session, Session};
use crate::storage::{FileStore, KvBackend, Storage};

/// Application state threaded explicitly into every command handler.
pub struct AppState<B: KvBackend = FileStore> {
    pub storage: Storage<B>,
    /// Active identity; starts on the owner or the remembered coach client.
    pub session: Session,
    pub advisor: ReadinessAdvisor,
    /// Only the newest readiness request may update the visible insight.
    pub tracker: InsightTracker,
    pub config: Config,
}

impl<B: KvBackend> AppState<B> {
    pub fn new(storage: Storage<B>, advisor: ReadinessAdvisor, config: Config) -> Self {
        let owner_id = resolve_owner_identity(&storage);
        let session = restore_session(&storage, owner_id);
        Self {
            storage,
            session,
            advisor,
            tracker: InsightTracker::default(),
            config,
        }
    }
}
