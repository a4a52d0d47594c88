//! Snapshot persistence: versioned serialization of the active session and
//! the solved ledger to a durable key-value store, with staleness rules.
//! Every storage failure is absorbed; the game continues in memory.

use serde::{Deserialize, Serialize};

use crate::StorageBackend;
use crate::ledger::SolvedLedger;
use crate::session::Session;

/// Fixed storage key for the whole snapshot.
pub const SNAPSHOT_KEY: &str = "adivina.save";

/// Current snapshot schema version. Snapshots carrying any other version are
/// rejected deterministically and read as absent.
pub const SNAPSHOT_VERSION: u32 = 2;

/// Persisted shape: the optional active session plus the ledger, which
/// outlives individual sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub ledger: SolvedLedger,
}

impl Snapshot {
    #[must_use]
    pub fn new(session: Option<Session>, ledger: SolvedLedger) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            session,
            ledger,
        }
    }
}

/// Serializes snapshots to a [`StorageBackend`] under [`SNAPSHOT_KEY`].
pub struct PersistenceStore<S> {
    backend: S,
}

impl<S> PersistenceStore<S>
where
    S: StorageBackend,
{
    #[must_use]
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Best-effort save of the current session and ledger.
    pub fn save(&self, session: Option<&Session>, ledger: &SolvedLedger) {
        let snapshot = Snapshot::new(session.cloned(), ledger.clone());
        let payload = match serde_json::to_string(&snapshot) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("snapshot serialization failed: {err}");
                return;
            }
        };
        if let Err(err) = self.backend.set(SNAPSHOT_KEY, &payload) {
            log::warn!("snapshot save failed: {err}");
        }
    }

    /// Load and parse the stored snapshot, surfacing backend and decode
    /// errors for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read or the payload is
    /// not valid JSON.
    pub fn try_load(&self) -> Result<Option<Snapshot>, anyhow::Error> {
        let Some(raw) = self.backend.get(SNAPSHOT_KEY)? else {
            return Ok(None);
        };
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        Ok(Some(snapshot))
    }

    /// Load the stored snapshot. Missing, unparseable, or wrong-version data
    /// reads as absent; a session without a target word is dropped.
    #[must_use]
    pub fn load(&self) -> Option<Snapshot> {
        let mut snapshot = match self.try_load() {
            Ok(snapshot) => snapshot?,
            Err(err) => {
                log::warn!("snapshot load failed: {err}");
                return None;
            }
        };
        if snapshot.version != SNAPSHOT_VERSION {
            return None;
        }
        if snapshot
            .session
            .as_ref()
            .is_some_and(|s| s.target.word.is_empty())
        {
            snapshot.session = None;
        }
        Some(snapshot)
    }

    /// Load the stored session, additionally rejecting date-scoped snapshots
    /// whose key does not match `expected_key`.
    #[must_use]
    pub fn load_session(&self, expected_key: Option<&str>) -> Option<Session> {
        let session = self.load()?.session?;
        match expected_key {
            Some(key) if session.session_key != key => None,
            _ => Some(session),
        }
    }

    /// Ledger survives session resets and stale sessions.
    #[must_use]
    pub fn load_ledger(&self) -> SolvedLedger {
        self.load().map(|s| s.ledger).unwrap_or_default()
    }

    /// Drop the active session but keep the ledger.
    pub fn clear_session(&self, ledger: &SolvedLedger) {
        self.save(None, ledger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use crate::words::WordEntry;

    fn sample_session() -> Session {
        Session::new("2026-08-06", WordEntry::new("tigre", "Animales"))
    }

    #[test]
    fn round_trips_session_and_ledger() {
        let store = PersistenceStore::new(MemoryStore::default());
        let session = sample_session();
        let mut ledger = SolvedLedger::new();
        ledger.push(crate::ledger::SolvedRecord {
            word: "paella".into(),
            theme: "Cocina".into(),
            attempt_count: 5,
            was_revealed: false,
            timestamp: 1_754_438_400,
            date: "2026-08-05".into(),
        });

        store.save(Some(&session), &ledger);
        let loaded = store.load().expect("snapshot present");
        assert_eq!(loaded.session.as_ref(), Some(&session));
        assert_eq!(loaded.ledger, ledger);
    }

    #[test]
    fn missing_and_corrupt_data_read_as_absent() {
        let backend = MemoryStore::default();
        let store = PersistenceStore::new(backend);
        assert!(store.load().is_none());

        store.backend.set(SNAPSHOT_KEY, "{not json").unwrap();
        assert!(store.load().is_none());
        assert!(store.load_ledger().is_empty());
    }

    #[test]
    fn wrong_version_reads_as_absent() {
        let store = PersistenceStore::new(MemoryStore::default());
        let mut snapshot = Snapshot::new(Some(sample_session()), SolvedLedger::new());
        snapshot.version = 1;
        store
            .backend
            .set(SNAPSHOT_KEY, &serde_json::to_string(&snapshot).unwrap())
            .unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn empty_target_drops_the_session_only() {
        let store = PersistenceStore::new(MemoryStore::default());
        let mut session = sample_session();
        session.target.word.clear();
        let mut ledger = SolvedLedger::new();
        ledger.push(crate::ledger::SolvedRecord {
            word: "tigre".into(),
            theme: "Animales".into(),
            attempt_count: 2,
            was_revealed: true,
            timestamp: 1_754_438_400,
            date: "2026-08-05".into(),
        });
        store.save(Some(&session), &ledger);

        let loaded = store.load().expect("snapshot still parses");
        assert!(loaded.session.is_none());
        assert_eq!(loaded.ledger.len(), 1);
    }

    #[test]
    fn stale_date_rejected_for_date_scoped_loads() {
        let store = PersistenceStore::new(MemoryStore::default());
        store.save(Some(&sample_session()), &SolvedLedger::new());

        assert!(store.load_session(Some("2026-08-07")).is_none());
        assert!(store.load_session(Some("2026-08-06")).is_some());
        assert!(store.load_session(None).is_some());
    }

    #[test]
    fn clear_session_keeps_ledger() {
        let store = PersistenceStore::new(MemoryStore::default());
        let mut ledger = SolvedLedger::new();
        ledger.push(crate::ledger::SolvedRecord {
            word: "volcan".into(),
            theme: "Naturaleza".into(),
            attempt_count: 7,
            was_revealed: false,
            timestamp: 1_754_438_400,
            date: "2026-08-04".into(),
        });
        store.save(Some(&sample_session()), &ledger);
        store.clear_session(&ledger);

        assert!(store.load_session(None).is_none());
        assert_eq!(store.load_ledger().len(), 1);
    }
}
