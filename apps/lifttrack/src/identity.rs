use tracing::{info, warn};
use uuid::Uuid;

use crate::storage::{KvBackend, Storage, Stored};

/// Well-known key holding this installation's owner token.
pub const OWNER_ID_KEY: &str = "lifttrack-owner-id";

/// Client token selected with `lifttrack coach`; empty when coach mode is off.
pub const ACTIVE_CLIENT_KEY: &str = "lifttrack-active-client";

/// Returns the owner token, generating and persisting a fresh v4 UUID the
/// first time an installation asks for one.
///
/// An unreadable stored token is left in place and a throwaway token is used
/// for this run.
pub fn resolve_owner_identity<B: KvBackend>(storage: &Storage<B>) -> String {
    match storage.read::<String>(OWNER_ID_KEY) {
        Stored::Present(existing) if !existing.is_empty() => return existing,
        Stored::Unreadable => {
            let owner_id = Uuid::new_v4().to_string();
            warn!(
                "Owner identity unreadable; using temporary identity {}",
                short_id(&owner_id)
            );
            return owner_id;
        }
        Stored::Present(_) | Stored::Absent => {}
    }

    let owner_id = Uuid::new_v4().to_string();
    storage.set(OWNER_ID_KEY, &owner_id);
    info!("Generated new owner identity {}", short_id(&owner_id));
    owner_id
}

/// First 8 characters of a token, for banners and log lines.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Whose data the repositories currently read and write.
///
/// Starts on the owner token; coach mode switches it to another party's
/// token until explicitly exited. `restore_session` and `remember_session`
/// carry the selection between CLI invocations.
#[derive(Debug, Clone)]
pub struct Session {
    owner_id: String,
    active_id: String,
}

impl Session {
    pub fn new(owner_id: String) -> Self {
        Self {
            active_id: owner_id.clone(),
            owner_id,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn is_coach_mode(&self) -> bool {
        self.active_id != self.owner_id
    }

    /// Switches to another identity. Blank input is ignored and returns false.
    pub fn load_client(&mut self, client_id: &str) -> bool {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return false;
        }
        self.active_id = client_id.to_string();
        if self.is_coach_mode() {
            info!("Coach mode: viewing client {}", short_id(client_id));
        }
        true
    }

    pub fn exit_coach_mode(&mut self) {
        self.active_id = self.owner_id.clone();
    }
}

/// Builds the session for `owner_id`, re-entering coach mode if a client was
/// selected in an earlier run.
pub fn restore_session<B: KvBackend>(storage: &Storage<B>, owner_id: String) -> Session {
    let mut session = Session::new(owner_id);
    if let Some(client) = storage.get::<String>(ACTIVE_CLIENT_KEY) {
        session.load_client(&client);
    }
    session
}

pub fn remember_session<B: KvBackend>(storage: &Storage<B>, session: &Session) {
    let client = if session.is_coach_mode() {
        session.active_id()
    } else {
        ""
    };
    storage.set(ACTIVE_CLIENT_KEY, client);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_unreadable_owner_identity_is_kept() {
        let storage = Storage::new(MemoryStore::default());
        storage.backend().write_raw(OWNER_ID_KEY, "{broken").unwrap();
        let first = resolve_owner_identity(&storage);
        let second = resolve_owner_identity(&storage);
        assert_ne!(first, second);
        assert_eq!(
            storage.backend().read_raw(OWNER_ID_KEY).unwrap().as_deref(),
            Some("{broken")
        );
    }

    #[test]
    fn test_owner_identity_is_stable() {
        let storage = Storage::new(MemoryStore::default());
        let first = resolve_owner_identity(&storage);
        let second = resolve_owner_identity(&storage);
        assert_eq!(first, second);
        assert_eq!(storage.get::<String>(OWNER_ID_KEY), Some(first));
    }

    #[test]
    fn test_owner_identity_is_a_uuid() {
        let storage = Storage::new(MemoryStore::default());
        let id = resolve_owner_identity(&storage);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_existing_owner_identity_is_kept() {
        let storage = Storage::new(MemoryStore::default());
        storage.set(OWNER_ID_KEY, "legacy-token");
        assert_eq!(resolve_owner_identity(&storage), "legacy-token");
    }

    #[test]
    fn test_separate_installations_differ() {
        let a = resolve_owner_identity(&Storage::new(MemoryStore::default()));
        let b = resolve_owner_identity(&Storage::new(MemoryStore::default()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_defaults_to_owner() {
        let session = Session::new("owner".to_string());
        assert_eq!(session.active_id(), "owner");
        assert!(!session.is_coach_mode());
    }

    #[test]
    fn test_load_client_trims_and_switches() {
        let mut session = Session::new("owner".to_string());
        assert!(session.load_client("  client-42 "));
        assert_eq!(session.active_id(), "client-42");
        assert!(session.is_coach_mode());
    }

    #[test]
    fn test_blank_client_is_ignored() {
        let mut session = Session::new("owner".to_string());
        assert!(!session.load_client("   "));
        assert_eq!(session.active_id(), "owner");
    }

    #[test]
    fn test_exit_coach_mode_restores_owner() {
        let mut session = Session::new("owner".to_string());
        session.load_client("client");
        session.exit_coach_mode();
        assert_eq!(session.active_id(), "owner");
        assert!(!session.is_coach_mode());
    }

    #[test]
    fn test_session_selection_survives_restore() {
        let storage = Storage::new(MemoryStore::default());
        let mut session = restore_session(&storage, "owner".to_string());
        assert!(!session.is_coach_mode());

        session.load_client("client-7");
        remember_session(&storage, &session);
        let restored = restore_session(&storage, "owner".to_string());
        assert_eq!(restored.active_id(), "client-7");

        session.exit_coach_mode();
        remember_session(&storage, &session);
        let restored = restore_session(&storage, "owner".to_string());
        assert_eq!(restored.active_id(), "owner");
        assert_eq!(storage.get::<String>(ACTIVE_CLIENT_KEY).as_deref(), Some(""));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
