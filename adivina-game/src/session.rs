//! Session state: the attempt log, trend computation, and the transition
//! rules for guess submission, reveal, and session restart.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::normalize::{contains_digit, normalize};
use crate::score::EXACT_SCORE;
use crate::words::WordEntry;

/// Attempt log in submission order. Kept chronological on purpose: trend
/// direction always reads the most recently submitted score, never any
/// display ordering.
pub type AttemptLog = SmallVec<[Attempt; 8]>;

/// Trend of a new attempt relative to the reference prior score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Closer,
    Farther,
    Same,
}

impl Direction {
    /// Derive the trend from the new score and the chronologically previous
    /// one. The first attempt has no reference and reads `Same`.
    #[must_use]
    pub fn from_scores(current: u8, previous: Option<u8>) -> Self {
        match previous {
            None => Self::Same,
            Some(prev) if current > prev => Self::Closer,
            Some(prev) if current < prev => Self::Farther,
            Some(_) => Self::Same,
        }
    }
}

/// One accepted guess. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// The word as the player typed it.
    pub word: String,
    pub score: u8,
    pub direction: Direction,
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Word selection in flight; no target yet.
    Generating,
    /// Accepting guesses.
    Active,
    /// Terminal: some attempt scored 100.
    Won,
    /// Terminal: the player gave up and the target was revealed.
    Revealed,
}

impl SessionPhase {
    /// Whether the session has reached a terminal phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Revealed)
    }
}

/// Two-step reveal gate: the first reveal request only arms the gate, the
/// second commits it. Anything else disarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealGate {
    #[default]
    Unconfirmed,
    Armed,
}

/// Reasons a submission is rejected. Rejections never mutate the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuessRejection {
    #[error("guess is empty")]
    Empty,
    #[error("guess contains digits")]
    ContainsDigit,
    #[error("word was already tried")]
    Duplicate,
    #[error("session is not accepting guesses")]
    NotActive,
    #[error("a previous guess is still being scored")]
    ScoringInProgress,
    #[error("session was reset while the guess was being scored")]
    Stale,
}

/// Result of an accepted guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutcome {
    pub attempt: Attempt,
    pub won: bool,
}

/// Serializable session data: one round of play from selection to win or
/// reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Date string or free-form session id this round is keyed by.
    pub session_key: String,
    pub target: WordEntry,
    #[serde(default)]
    pub attempts: AttemptLog,
    #[serde(default)]
    pub won: bool,
    #[serde(default)]
    pub revealed: bool,
}

impl Session {
    #[must_use]
    pub fn new(session_key: impl Into<String>, target: WordEntry) -> Self {
        Self {
            session_key: session_key.into(),
            target,
            attempts: AttemptLog::new(),
            won: false,
            revealed: false,
        }
    }
}

/// State machine over a [`Session`]. Construction requires a resolved target,
/// so an existing machine is always in `Active` or a terminal phase; the
/// engine reports `Generating` while selection is in flight.
#[derive(Debug, Clone)]
pub struct GuessSession {
    session: Session,
    reveal_gate: RevealGate,
}

impl GuessSession {
    /// Fresh `Active` session for a newly selected target.
    #[must_use]
    pub fn new(session_key: impl Into<String>, target: WordEntry) -> Self {
        Self::restore(Session::new(session_key, target))
    }

    /// Rebuild the machine from a persisted session snapshot. The reveal gate
    /// is UI intent and never survives a reload.
    #[must_use]
    pub fn restore(session: Session) -> Self {
        Self {
            session,
            reveal_gate: RevealGate::Unconfirmed,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn target(&self) -> &WordEntry {
        &self.session.target
    }

    #[must_use]
    pub fn attempts(&self) -> &[Attempt] {
        &self.session.attempts
    }

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        if self.session.won {
            SessionPhase::Won
        } else if self.session.revealed {
            SessionPhase::Revealed
        } else {
            SessionPhase::Active
        }
    }

    #[must_use]
    pub const fn reveal_armed(&self) -> bool {
        matches!(self.reveal_gate, RevealGate::Armed)
    }

    /// Highest score in the log, 0 when empty.
    #[must_use]
    pub fn best_score(&self) -> u8 {
        self.session
            .attempts
            .iter()
            .map(|a| a.score)
            .max()
            .unwrap_or(0)
    }

    /// Presentation view: attempts sorted hottest-first. Never used as the
    /// reference for trend computation.
    #[must_use]
    pub fn attempts_by_score(&self) -> Vec<&Attempt> {
        let mut sorted: Vec<&Attempt> = self.session.attempts.iter().collect();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted
    }

    /// Validate a raw guess against the submission rules without mutating
    /// anything. Returns the word as typed (trimmed) when acceptable.
    pub fn validate_guess(&self, raw: &str) -> Result<String, GuessRejection> {
        if self.phase() != SessionPhase::Active {
            return Err(GuessRejection::NotActive);
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GuessRejection::Empty);
        }
        if contains_digit(trimmed) {
            return Err(GuessRejection::ContainsDigit);
        }
        let normalized = normalize(trimmed);
        if self
            .session
            .attempts
            .iter()
            .any(|a| normalize(&a.word) == normalized)
        {
            return Err(GuessRejection::Duplicate);
        }
        Ok(trimmed.to_string())
    }

    /// Append a scored guess. Re-validates, since the session may have moved
    /// on while the score was being computed. A score of 100 transitions the
    /// session to `Won`; any accepted guess disarms the reveal gate.
    pub fn apply_score(&mut self, word: &str, score: u8) -> Result<AttemptOutcome, GuessRejection> {
        let word = self.validate_guess(word)?;
        let previous = self.session.attempts.last().map(|a| a.score);
        let attempt = Attempt {
            word,
            score,
            direction: Direction::from_scores(score, previous),
        };
        self.session.attempts.push(attempt.clone());
        self.reveal_gate = RevealGate::Unconfirmed;

        let won = score == EXACT_SCORE;
        if won {
            self.session.won = true;
        }
        Ok(AttemptOutcome { attempt, won })
    }

    /// First reveal step: arm the gate. Returns whether the gate is armed
    /// after the call (false outside `Active`).
    pub fn arm_reveal(&mut self) -> bool {
        if self.phase() != SessionPhase::Active {
            return false;
        }
        self.reveal_gate = RevealGate::Armed;
        true
    }

    /// Withdraw an armed reveal.
    pub fn disarm_reveal(&mut self) {
        self.reveal_gate = RevealGate::Unconfirmed;
    }

    /// Second reveal step: commit. Only an armed gate in `Active` commits;
    /// returns whether the session transitioned to `Revealed`.
    pub fn commit_reveal(&mut self) -> bool {
        if self.phase() != SessionPhase::Active || !self.reveal_armed() {
            return false;
        }
        self.session.revealed = true;
        self.reveal_gate = RevealGate::Unconfirmed;
        true
    }

    /// Consume the machine, returning the session data.
    #[must_use]
    pub fn into_session(self) -> Session {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> WordEntry {
        WordEntry::new("tigre", "Animales")
    }

    fn active_session() -> GuessSession {
        GuessSession::new("2026-08-06", target())
    }

    #[test]
    fn first_attempt_reads_same() {
        let mut session = active_session();
        let outcome = session.apply_score("leon", 40).unwrap();
        assert_eq!(outcome.attempt.direction, Direction::Same);
        assert!(!outcome.won);
    }

    #[test]
    fn direction_tracks_chronological_reference() {
        let mut session = active_session();
        session.apply_score("leon", 40).unwrap();
        let second = session.apply_score("gato", 55).unwrap();
        assert_eq!(second.attempt.direction, Direction::Closer);
        let third = session.apply_score("perro", 30).unwrap();
        assert_eq!(third.attempt.direction, Direction::Farther);
    }

    #[test]
    fn display_order_does_not_leak_into_direction() {
        let mut session = active_session();
        session.apply_score("leon", 40).unwrap();
        session.apply_score("gato", 55).unwrap();
        // Hottest-first view reorders, the log does not.
        let view: Vec<u8> = session.attempts_by_score().iter().map(|a| a.score).collect();
        assert_eq!(view, vec![55, 40]);
        let log: Vec<u8> = session.attempts().iter().map(|a| a.score).collect();
        assert_eq!(log, vec![40, 55]);
        // Reference is 55 (last submitted), not 40 (worst shown last).
        let next = session.apply_score("oso", 45).unwrap();
        assert_eq!(next.attempt.direction, Direction::Farther);
    }

    #[test]
    fn rejects_empty_digits_and_duplicates() {
        let mut session = active_session();
        assert_eq!(session.validate_guess("   "), Err(GuessRejection::Empty));
        assert_eq!(
            session.validate_guess("gato2"),
            Err(GuessRejection::ContainsDigit)
        );
        session.apply_score("León", 40).unwrap();
        assert_eq!(
            session.validate_guess("leon"),
            Err(GuessRejection::Duplicate)
        );
        assert_eq!(session.attempts().len(), 1);
    }

    #[test]
    fn exact_score_wins_and_terminates() {
        let mut session = active_session();
        let outcome = session.apply_score("tigre", EXACT_SCORE).unwrap();
        assert!(outcome.won);
        assert_eq!(session.phase(), SessionPhase::Won);
        assert_eq!(
            session.apply_score("gato", 10),
            Err(GuessRejection::NotActive)
        );
    }

    #[test]
    fn reveal_requires_two_steps() {
        let mut session = active_session();
        assert!(!session.commit_reveal());
        assert!(session.arm_reveal());
        assert_eq!(session.phase(), SessionPhase::Active);
        assert!(session.commit_reveal());
        assert_eq!(session.phase(), SessionPhase::Revealed);
        assert!(!session.arm_reveal());
    }

    #[test]
    fn accepted_guess_disarms_reveal() {
        let mut session = active_session();
        session.arm_reveal();
        session.apply_score("leon", 40).unwrap();
        assert!(!session.reveal_armed());
        assert!(!session.commit_reveal());
    }

    #[test]
    fn restore_never_resurrects_the_gate() {
        let mut session = active_session();
        session.arm_reveal();
        let restored = GuessSession::restore(session.into_session());
        assert!(!restored.reveal_armed());
    }

    #[test]
    fn best_score_and_empty_log() {
        let mut session = active_session();
        assert_eq!(session.best_score(), 0);
        session.apply_score("leon", 40).unwrap();
        session.apply_score("gato", 55).unwrap();
        assert_eq!(session.best_score(), 55);
    }
}
