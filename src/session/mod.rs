//! Session context: the bearer token and cached user profile.
//!
//! `Session` is opened once from a storage backend (values read into
//! memory), shared as `Arc<Session>` by the API client and the portal,
//! and written through to the backend on every mutation. It has no state
//! machine beyond the presence of its two values:
//!
//! - `establish` writes token and user in one storage commit
//! - `clear` removes both in one commit and is idempotent
//! - the token lives in `Zeroizing<String>` and is wiped when replaced
//!
//! Presence of a non-empty token is the only authentication signal. Token
//! validity and expiry are never checked on the client.

pub mod storage;

use std::sync::{PoisonError, RwLock};

use zeroize::Zeroizing;

use crate::models::UserProfile;
pub use storage::{Change, Entries, FileStorage, MemoryStorage, SessionStorage, StorageError};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "fmw_insurance_token";
/// Storage key of the JSON-serialized user profile.
pub const USER_KEY: &str = "fmw_insurance_user";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Cannot serialize user profile: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Which of the two session values are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Neither token nor user.
    Absent,
    /// Exactly one of the two; only reachable through the individual setters
    /// or an externally edited store.
    Partial,
    /// Both token and user.
    Active,
}

#[derive(Default)]
struct Snapshot {
    token: Option<Zeroizing<String>>,
    user_json: Option<String>,
}

impl Snapshot {
    fn from_entries(entries: &Entries) -> Self {
        Self {
            token: entries
                .get(TOKEN_KEY)
                .filter(|t| !t.is_empty())
                .map(|t| Zeroizing::new(t.clone())),
            user_json: entries.get(USER_KEY).cloned(),
        }
    }
}

pub struct Session {
    storage: Box<dyn SessionStorage>,
    snapshot: RwLock<Snapshot>,
}

impl Session {
    /// Open a session over `storage`, reading the persisted values once.
    ///
    /// An unreadable backend opens as an absent session.
    pub fn open(storage: impl SessionStorage + 'static) -> Self {
        let snapshot = match storage.load() {
            Ok(entries) => Snapshot::from_entries(&entries),
            Err(e) => {
                tracing::warn!(error = %e, "Session storage unreadable, starting signed out");
                Snapshot::default()
            }
        };
        let session = Self {
            storage: Box::new(storage),
            snapshot: RwLock::new(snapshot),
        };
        tracing::debug!(state = ?session.state(), "Session opened");
        session
    }

    /// Session that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::new())
    }

    /// Stored token, if any. Never fails.
    pub fn get_token(&self) -> Option<String> {
        self.read().token.as_ref().map(|t| t.as_str().to_string())
    }

    /// Store `token` as-is. The in-memory value is replaced even when the
    /// backend write fails.
    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let mut snapshot = self.write();
        snapshot.token = Some(Zeroizing::new(token.to_string())).filter(|t| !t.is_empty());
        self.storage.commit(&[Change::set(TOKEN_KEY, token)])?;
        Ok(())
    }

    /// Stored user profile, or `None` when absent or undecodable.
    pub fn get_user(&self) -> Option<UserProfile> {
        let snapshot = self.read();
        let raw = snapshot.user_json.as_deref()?;
        match serde_json::from_str(raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Stored user profile is not valid JSON");
                None
            }
        }
    }

    pub fn set_user(&self, user: &UserProfile) -> Result<(), SessionError> {
        let json = serde_json::to_string(user)?;
        let mut snapshot = self.write();
        snapshot.user_json = Some(json.clone());
        self.storage.commit(&[Change::set(USER_KEY, json)])?;
        Ok(())
    }

    /// Store token and user together in a single commit.
    pub fn establish(&self, token: &str, user: &UserProfile) -> Result<(), SessionError> {
        let json = serde_json::to_string(user)?;
        let mut snapshot = self.write();
        snapshot.token = Some(Zeroizing::new(token.to_string())).filter(|t| !t.is_empty());
        snapshot.user_json = Some(json.clone());
        self.storage
            .commit(&[Change::set(TOKEN_KEY, token), Change::set(USER_KEY, json)])?;
        tracing::info!(user_id = user.id, role = %user.role, "Session established");
        Ok(())
    }

    /// Remove token and user. Safe to call on an absent session.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut snapshot = self.write();
        let was = state_of(&snapshot);
        *snapshot = Snapshot::default();
        self.storage
            .commit(&[Change::remove(TOKEN_KEY), Change::remove(USER_KEY)])?;
        if was != SessionState::Absent {
            tracing::info!("Session cleared");
        }
        Ok(())
    }

    /// True iff a non-empty token is present.
    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn state(&self) -> SessionState {
        state_of(&self.read())
    }

    // ── Internal ────────────────────────────────────────────

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Snapshot> {
        self.snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn state_of(snapshot: &Snapshot) -> SessionState {
    match (snapshot.token.is_some(), snapshot.user_json.is_some()) {
        (true, true) => SessionState::Active,
        (false, false) => SessionState::Absent,
        _ => SessionState::Partial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::test_support::sample_user;

    /// Backend that records every commit, to observe write batching.
    #[derive(Clone, Default)]
    struct RecordingStorage {
        inner: Arc<MemoryStorage>,
        commits: Arc<Mutex<Vec<Vec<Change>>>>,
    }

    impl SessionStorage for RecordingStorage {
        fn load(&self) -> Result<Entries, StorageError> {
            self.inner.load()
        }

        fn commit(&self, changes: &[Change]) -> Result<(), StorageError> {
            self.commits.lock().unwrap().push(changes.to_vec());
            self.inner.commit(changes)
        }
    }

    #[test]
    fn new_session_is_absent() {
        let session = Session::in_memory();
        assert_eq!(session.state(), SessionState::Absent);
        assert!(!session.is_authenticated());
        assert!(session.get_token().is_none());
        assert!(session.get_user().is_none());
    }

    #[test]
    fn set_token_authenticates() {
        let session = Session::in_memory();
        session.set_token("abc").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.get_token().as_deref(), Some("abc"));
    }

    #[test]
    fn empty_token_does_not_authenticate() {
        let session = Session::in_memory();
        session.set_token("").unwrap();
        assert!(!session.is_authenticated());
        assert!(session.get_token().is_none());
    }

    #[test]
    fn clear_removes_both_and_is_idempotent() {
        let session = Session::in_memory();
        session.establish("abc", &sample_user()).unwrap();
        session.clear().unwrap();
        session.clear().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.get_user().is_none());
        assert_eq!(session.state(), SessionState::Absent);
    }

    #[test]
    fn establish_writes_pair_in_one_commit() {
        let storage = RecordingStorage::default();
        let commits = storage.commits.clone();
        let session = Session::open(storage);

        session.establish("tok", &sample_user()).unwrap();

        let commits = commits.lock().unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].len(), 2);
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn clear_is_one_commit() {
        let storage = RecordingStorage::default();
        let commits = storage.commits.clone();
        let session = Session::open(storage);
        session.establish("tok", &sample_user()).unwrap();
        session.clear().unwrap();

        let commits = commits.lock().unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(
            commits[1],
            vec![Change::remove(TOKEN_KEY), Change::remove(USER_KEY)]
        );
    }

    #[test]
    fn token_without_user_is_partial_but_authenticated() {
        let session = Session::in_memory();
        session.set_token("abc").unwrap();
        assert_eq!(session.state(), SessionState::Partial);
        assert!(session.is_authenticated());
        assert!(session.get_user().is_none());
    }

    #[test]
    fn user_without_token_is_partial_and_signed_out() {
        let session = Session::in_memory();
        session.set_user(&sample_user()).unwrap();
        assert_eq!(session.state(), SessionState::Partial);
        assert!(!session.is_authenticated());
        assert_eq!(session.get_user().unwrap().id, 42);
    }

    #[test]
    fn invalid_user_json_reads_as_absent() {
        let storage = MemoryStorage::with_entries([(TOKEN_KEY, "abc"), (USER_KEY, "{oops")]);
        let session = Session::open(storage);
        assert!(session.get_user().is_none());
        assert!(session.is_authenticated());
    }

    #[test]
    fn file_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let session = Session::open(FileStorage::new(dir.path()));
            session.establish("persisted", &sample_user()).unwrap();
        }
        let reopened = Session::open(FileStorage::new(dir.path()));
        assert_eq!(reopened.get_token().as_deref(), Some("persisted"));
        assert_eq!(reopened.get_user(), Some(sample_user()));
    }

    #[test]
    fn file_session_clear_persists() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(FileStorage::new(dir.path()));
        session.establish("persisted", &sample_user()).unwrap();
        session.clear().unwrap();

        let reopened = Session::open(FileStorage::new(dir.path()));
        assert_eq!(reopened.state(), SessionState::Absent);
    }

    #[test]
    fn failed_write_keeps_in_memory_value() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let session = Session::open(FileStorage::new(&blocker));

        let err = session.set_token("abc").unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));
        assert_eq!(session.get_token().as_deref(), Some("abc"));
    }
}
