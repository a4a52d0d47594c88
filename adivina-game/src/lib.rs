//! Adivina Game Engine
//!
//! Platform-agnostic core game logic for the Adivina la Palabra word-guessing
//! game. This crate provides word selection, similarity scoring, session
//! state, and persistence without UI or platform-specific dependencies.

use chrono::Utc;
use serde::{Deserialize, Serialize};

pub mod ledger;
pub mod normalize;
pub mod persist;
pub mod score;
pub mod select;
pub mod session;
pub mod words;

// Re-export commonly used types
pub use ledger::{LEDGER_CAP, SolvedLedger, SolvedRecord};
pub use normalize::{contains_digit, normalize};
pub use persist::{PersistenceStore, SNAPSHOT_KEY, SNAPSHOT_VERSION, Snapshot};
pub use score::{EXACT_SCORE, SimilarityScorer, fallback_score, parse_oracle_reply};
pub use select::{
    CachedDaily, DAILY_CACHE_TTL_SECS, NullCache, SelectorConfig, WordSelector, WordSource,
    daily_entry, daily_theme, date_hash,
};
pub use session::{
    Attempt, AttemptLog, AttemptOutcome, Direction, GuessRejection, GuessSession, RevealGate,
    Session, SessionPhase,
};
pub use words::{
    FALLBACK_POOL, MAX_WORD_LEN, MIN_WORD_LEN, THEMES, WORD_BANK, WordEntry, is_valid_word,
    sanitize_candidate,
};

/// Trait for abstracting the remote semantic oracle.
/// Transport-specific implementations should provide this; the core only
/// sees the free-text completion and parses it itself.
#[async_trait::async_trait]
pub trait SemanticOracle {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ask for a closeness verdict for `attempt` against `target`. The reply
    /// is expected to contain a single integer in `[0, 99]`.
    ///
    /// # Errors
    ///
    /// Returns an error when the oracle cannot be reached or answers with a
    /// non-success status.
    async fn closeness(&self, attempt: &str, target: &str) -> Result<String, Self::Error>;
}

/// Trait for abstracting the remote word generator.
#[async_trait::async_trait]
pub trait WordGenerator {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce a candidate word for the given theme. The raw completion is
    /// sanitized and validated by the selector.
    ///
    /// # Errors
    ///
    /// Returns an error when generation fails; the selector falls back to
    /// its static pool.
    async fn generate(&self, theme: &str) -> Result<String, Self::Error>;
}

/// Trait for a shared best-effort cache. Both operations absorb backend
/// trouble; a failed read is a miss and a failed write is dropped.
#[async_trait::async_trait]
pub trait SharedCache {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64);
}

/// Trait for abstracting durable client-side key-value storage.
/// Platform-specific implementations should provide this.
pub trait StorageBackend {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written (unavailable, quota).
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Delete a stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// In-memory storage backend, useful for tests and headless embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

impl StorageBackend for MemoryStore {
    type Error = std::convert::Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Session-start selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// One date-keyed word shared by all players; stale snapshots from other
    /// days are discarded on load.
    Daily,
    /// A fresh generated word per session; snapshots restore regardless of
    /// date.
    FreePlay,
}

/// Today's date key in `YYYY-MM-DD` (UTC).
#[must_use]
pub fn today_string() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

fn unix_now() -> i64 {
    Utc::now().timestamp()
}

fn record_for(session: &Session, timestamp: i64) -> SolvedRecord {
    SolvedRecord {
        word: session.target.word.clone(),
        theme: session.target.theme.clone(),
        attempt_count: u32::try_from(session.attempts.len()).unwrap_or(u32::MAX),
        was_revealed: session.revealed,
        timestamp,
        date: session.session_key.clone(),
    }
}

/// Main game engine binding word selection, scoring, and persistence around
/// the active session. This is the whole surface a UI needs: submit, the
/// two-step reveal, restart, and read-only observation.
pub struct GameEngine<G, C, O, S>
where
    G: WordGenerator,
    C: SharedCache,
    O: SemanticOracle,
    S: StorageBackend,
{
    selector: WordSelector<G, C>,
    scorer: SimilarityScorer<O>,
    store: PersistenceStore<S>,
    mode: GameMode,
    date_key: String,
    ledger: SolvedLedger,
    session: Option<GuessSession>,
    scoring: bool,
    epoch: u64,
}

impl<G, C, O, S> GameEngine<G, C, O, S>
where
    G: WordGenerator,
    C: SharedCache,
    O: SemanticOracle,
    S: StorageBackend,
{
    /// Create an engine. No session exists until [`Self::start`] runs; the
    /// phase reads `Generating` until then.
    #[must_use]
    pub fn new(
        selector: WordSelector<G, C>,
        scorer: SimilarityScorer<O>,
        store: PersistenceStore<S>,
        mode: GameMode,
        date_key: impl Into<String>,
    ) -> Self {
        Self {
            selector,
            scorer,
            store,
            mode,
            date_key: date_key.into(),
            ledger: SolvedLedger::new(),
            session: None,
            scoring: false,
            epoch: 0,
        }
    }

    /// Restore the persisted session when it is still valid for this mode
    /// and date, otherwise select a fresh target. Selection cannot fail; the
    /// engine always ends up `Active`.
    pub async fn start(&mut self) {
        self.ledger = self.store.load_ledger();
        let expected = match self.mode {
            GameMode::Daily => Some(self.date_key.clone()),
            GameMode::FreePlay => None,
        };
        match self.store.load_session(expected.as_deref()) {
            Some(saved) => self.session = Some(GuessSession::restore(saved)),
            None => self.start_new().await,
        }
    }

    /// Discard the current session (recording it if terminal) and play a new
    /// word.
    pub async fn start_new(&mut self) {
        self.epoch += 1;
        self.scoring = false;
        if let Some(prev) = self.session.take() {
            let prev = prev.into_session();
            if prev.won || prev.revealed {
                // Dedup makes this idempotent with the push at transition time.
                self.ledger.push(record_for(&prev, unix_now()));
            }
        }
        self.store.clear_session(&self.ledger);

        let target = match self.mode {
            GameMode::Daily => self.selector.daily_word(&self.date_key).await,
            GameMode::FreePlay => self.selector.next_word().await,
        };
        self.session = Some(GuessSession::new(self.date_key.clone(), target));
        self.persist();
    }

    /// Submit a raw guess. Validation failures and terminal-phase submissions
    /// come back as [`GuessRejection`] without mutating anything; an accepted
    /// guess is scored (a suspension point), appended, and persisted.
    pub async fn submit_guess(&mut self, raw: &str) -> Result<AttemptOutcome, GuessRejection> {
        if self.scoring {
            return Err(GuessRejection::ScoringInProgress);
        }
        let Some(session) = self.session.as_ref() else {
            return Err(GuessRejection::NotActive);
        };
        let word = session.validate_guess(raw)?;
        let target = session.target().word.clone();

        let epoch = self.epoch;
        self.scoring = true;
        let score = self.scorer.score(&word, &target).await;
        self.scoring = false;
        if self.epoch != epoch {
            // The session was reset while the score was in flight; the
            // result no longer applies.
            return Err(GuessRejection::Stale);
        }

        let session = self.session.as_mut().ok_or(GuessRejection::Stale)?;
        let outcome = session.apply_score(&word, score)?;
        if outcome.won {
            let record = record_for(session.session(), unix_now());
            self.ledger.push(record);
        }
        self.persist();
        Ok(outcome)
    }

    /// First reveal step: arm the confirmation gate. No state change beyond
    /// the gate itself.
    pub fn reveal(&mut self) -> bool {
        self.session
            .as_mut()
            .is_some_and(GuessSession::arm_reveal)
    }

    /// Second reveal step: commit an armed reveal, record the session in the
    /// ledger, and persist. Returns false when the gate was not armed.
    pub fn confirm_reveal(&mut self) -> bool {
        let now = unix_now();
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.commit_reveal() {
            return false;
        }
        let record = record_for(session.session(), now);
        self.ledger.push(record);
        self.persist();
        true
    }

    /// Withdraw an armed reveal.
    pub fn cancel_reveal(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.disarm_reveal();
        }
    }

    fn persist(&self) {
        self.store
            .save(self.session.as_ref().map(GuessSession::session), &self.ledger);
    }

    /// Current lifecycle phase; `Generating` while no session exists.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map_or(SessionPhase::Generating, GuessSession::phase)
    }

    /// Read-only view of the active session machine.
    #[must_use]
    pub const fn current(&self) -> Option<&GuessSession> {
        self.session.as_ref()
    }

    /// Read-only view of the solved-word ledger.
    #[must_use]
    pub const fn ledger(&self) -> &SolvedLedger {
        &self.ledger
    }

    /// Whether a scoring request is outstanding; submissions are rejected
    /// while true.
    #[must_use]
    pub const fn is_scoring(&self) -> bool {
        self.scoring
    }

    #[must_use]
    pub fn reveal_armed(&self) -> bool {
        self.session.as_ref().is_some_and(GuessSession::reveal_armed)
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn date_key(&self) -> &str {
        &self.date_key
    }
}
