//! Discovery session
//!
//! Holds one user's shuffled deck of candidate profiles, a cursor into it,
//! and an undo history of previous cursor positions. The deck is fixed for
//! the lifetime of a cycle; swiped users are filtered out when the next
//! session starts, not mid-cycle.

use netwith_common::{Error, Profile, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What to do when the cursor runs off the end of the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustionPolicy {
    /// Reshuffle the deck into a fresh order and clear undo history.
    #[default]
    Reshuffle,

    /// Jump back to the start of the same order, keeping undo history.
    Wrap,
}

impl ExhaustionPolicy {
    /// Parse from a settings string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reshuffle" => Some(ExhaustionPolicy::Reshuffle),
            "wrap" => Some(ExhaustionPolicy::Wrap),
            _ => None,
        }
    }

    /// Database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            ExhaustionPolicy::Reshuffle => "reshuffle",
            ExhaustionPolicy::Wrap => "wrap",
        }
    }
}

impl std::fmt::Display for ExhaustionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Result of advancing the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvanceOutcome {
    /// Moved to the next candidate in the current order
    Next,

    /// Deck was exhausted and reshuffled into a new order
    Reshuffled,

    /// Deck was exhausted and the cursor wrapped to the start
    Wrapped,
}

/// One user's discovery session
///
/// Cursor movement:
/// - advance: push current position to history, step forward
/// - undo: pop history, jump back
/// - exhaustion: reshuffle (new cycle, history cleared) or wrap
pub struct DiscoverySession {
    /// Viewer this session belongs to, resolved by the caller
    viewer: Uuid,

    /// Shuffled candidate deck, fixed for the current cycle
    deck: Vec<Profile>,

    /// Index of the candidate currently shown
    cursor: usize,

    /// Previous cursor positions, most recent last
    history: Vec<usize>,

    /// Behavior when the deck is exhausted
    policy: ExhaustionPolicy,

    rng: StdRng,
}

impl DiscoverySession {
    /// Create a session with no deck loaded yet
    pub fn new(viewer: Uuid, policy: ExhaustionPolicy) -> Self {
        Self::with_rng(viewer, policy, StdRng::from_entropy())
    }

    /// Create a session with a caller-supplied RNG (deterministic shuffles)
    pub fn with_rng(viewer: Uuid, policy: ExhaustionPolicy, rng: StdRng) -> Self {
        Self {
            viewer,
            deck: Vec::new(),
            cursor: 0,
            history: Vec::new(),
            policy,
            rng,
        }
    }

    /// Viewer this session was created for
    pub fn viewer(&self) -> Uuid {
        self.viewer
    }

    /// Load a candidate pool and begin a fresh cycle
    ///
    /// Shuffles the pool into a uniform random order, resets the cursor to
    /// the first candidate, and drops any undo history from a previous
    /// cycle. Returns `EmptyPool` if there is nothing to discover.
    pub fn start(&mut self, pool: Vec<Profile>) -> Result<()> {
        if pool.is_empty() {
            return Err(Error::EmptyPool);
        }

        self.deck = pool;
        self.deck.shuffle(&mut self.rng);
        self.cursor = 0;
        self.history.clear();
        Ok(())
    }

    /// Whether a deck has been loaded
    pub fn is_started(&self) -> bool {
        !self.deck.is_empty()
    }

    /// Candidate currently under the cursor
    ///
    /// Returns `EmptySession` if `start` has not been called.
    pub fn current(&self) -> Result<&Profile> {
        self.deck.get(self.cursor).ok_or(Error::EmptySession)
    }

    /// Move the cursor to the next candidate
    ///
    /// The departing position is pushed onto the undo history first. When
    /// the cursor runs off the end of the deck the exhaustion policy
    /// decides what happens: reshuffle begins a new cycle (history is
    /// cleared because its positions refer to the discarded order), wrap
    /// returns to position zero in the same order.
    pub fn advance(&mut self) -> Result<AdvanceOutcome> {
        if self.deck.is_empty() {
            return Err(Error::EmptySession);
        }

        self.history.push(self.cursor);

        if self.cursor + 1 < self.deck.len() {
            self.cursor += 1;
            return Ok(AdvanceOutcome::Next);
        }

        match self.policy {
            ExhaustionPolicy::Reshuffle => {
                self.deck.shuffle(&mut self.rng);
                self.cursor = 0;
                self.history.clear();
                Ok(AdvanceOutcome::Reshuffled)
            }
            ExhaustionPolicy::Wrap => {
                self.cursor = 0;
                Ok(AdvanceOutcome::Wrapped)
            }
        }
    }

    /// Step back to the previously shown candidate
    ///
    /// Returns true if there was a position to return to. Undo on an empty
    /// history is a no-op, not an error.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.cursor = previous;
                true
            }
            None => false,
        }
    }

    /// Whether undo would move the cursor
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Number of candidates in the deck
    pub fn len(&self) -> usize {
        self.deck.len()
    }

    /// Whether the deck is empty (session not started)
    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    /// Current cursor position within the deck
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Exhaustion policy for this session
    pub fn policy(&self) -> ExhaustionPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn test_profile(id: u8) -> Profile {
        Profile {
            id: Uuid::from_bytes([id; 16]),
            name: format!("User {}", id),
            email: format!("user{}@example.com", id),
            bio: "No bio provided".to_string(),
            skills: Vec::new(),
            interests: Vec::new(),
            experience: Vec::new(),
            education: "Not specified".to_string(),
            profile_image: netwith_common::profile::PLACEHOLDER_IMAGE.to_string(),
            looking_for: None,
            title: "Professional".to_string(),
            company: "Company".to_string(),
        }
    }

    fn test_pool(n: u8) -> Vec<Profile> {
        (1..=n).map(test_profile).collect()
    }

    fn test_viewer() -> Uuid {
        Uuid::from_bytes([0xEE; 16])
    }

    fn session_with_seed(policy: ExhaustionPolicy, seed: u64) -> DiscoverySession {
        DiscoverySession::with_rng(test_viewer(), policy, StdRng::seed_from_u64(seed))
    }

    /// Deck order as first-bytes of the candidate UUIDs
    fn deck_order(session: &DiscoverySession) -> Vec<u8> {
        session.deck.iter().map(|p| p.id.as_bytes()[0]).collect()
    }

    #[test]
    fn test_session_creation() {
        let session = DiscoverySession::new(test_viewer(), ExhaustionPolicy::Reshuffle);
        assert_eq!(session.viewer(), test_viewer());
        assert!(!session.is_started());
        assert!(session.is_empty());
        assert_eq!(session.len(), 0);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_current_before_start_is_empty_session() {
        let session = DiscoverySession::new(test_viewer(), ExhaustionPolicy::Reshuffle);
        assert!(matches!(session.current(), Err(Error::EmptySession)));
    }

    #[test]
    fn test_advance_before_start_is_empty_session() {
        let mut session = DiscoverySession::new(test_viewer(), ExhaustionPolicy::Reshuffle);
        assert!(matches!(session.advance(), Err(Error::EmptySession)));
    }

    #[test]
    fn test_start_rejects_empty_pool() {
        let mut session = DiscoverySession::new(test_viewer(), ExhaustionPolicy::Reshuffle);
        let result = session.start(Vec::new());
        assert!(matches!(result, Err(Error::EmptyPool)));
        assert!(!session.is_started());
    }

    #[test]
    fn test_start_loads_pool() {
        let mut session = session_with_seed(ExhaustionPolicy::Reshuffle, 1);
        session.start(test_pool(5)).unwrap();

        assert!(session.is_started());
        assert_eq!(session.len(), 5);
        assert_eq!(session.position(), 0);
        assert!(!session.can_undo());
        assert!(session.current().is_ok());
    }

    #[test]
    fn test_shuffle_is_permutation_of_pool() {
        let mut session = session_with_seed(ExhaustionPolicy::Reshuffle, 7);
        session.start(test_pool(8)).unwrap();

        let mut order = deck_order(&session);
        order.sort_unstable();
        assert_eq!(order, (1..=8).collect::<Vec<u8>>());
    }

    #[test]
    fn test_shuffle_is_deterministic_for_fixed_seed() {
        let mut a = session_with_seed(ExhaustionPolicy::Reshuffle, 42);
        let mut b = session_with_seed(ExhaustionPolicy::Reshuffle, 42);
        a.start(test_pool(10)).unwrap();
        b.start(test_pool(10)).unwrap();

        assert_eq!(deck_order(&a), deck_order(&b));
    }

    #[test]
    fn test_advance_steps_through_deck() {
        let mut session = session_with_seed(ExhaustionPolicy::Reshuffle, 3);
        session.start(test_pool(4)).unwrap();

        let first = session.current().unwrap().clone();
        let outcome = session.advance().unwrap();
        assert_eq!(outcome, AdvanceOutcome::Next);
        assert_eq!(session.position(), 1);
        assert_ne!(session.current().unwrap().id, first.id);
        assert!(session.can_undo());
    }

    #[test]
    fn test_current_is_stable_between_moves() {
        let mut session = session_with_seed(ExhaustionPolicy::Reshuffle, 4);
        session.start(test_pool(3)).unwrap();

        let before = session.current().unwrap().id;
        assert_eq!(session.current().unwrap().id, before);

        session.advance().unwrap();
        let after = session.current().unwrap().id;
        assert_eq!(session.current().unwrap().id, after);
        assert_ne!(before, after);
    }

    #[test]
    fn test_undo_returns_to_previous_candidate() {
        let mut session = session_with_seed(ExhaustionPolicy::Reshuffle, 3);
        session.start(test_pool(4)).unwrap();

        let first = session.current().unwrap().clone();
        session.advance().unwrap();
        assert!(session.undo());
        assert_eq!(session.current().unwrap().id, first.id);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_undo_is_lifo() {
        let mut session = session_with_seed(ExhaustionPolicy::Reshuffle, 9);
        session.start(test_pool(5)).unwrap();

        session.advance().unwrap(); // position 1
        session.advance().unwrap(); // position 2
        session.advance().unwrap(); // position 3

        assert!(session.undo());
        assert_eq!(session.position(), 2);
        assert!(session.undo());
        assert_eq!(session.position(), 1);
        assert!(session.undo());
        assert_eq!(session.position(), 0);
        assert!(!session.undo());
    }

    #[test]
    fn test_undo_with_empty_history_is_noop() {
        let mut session = session_with_seed(ExhaustionPolicy::Reshuffle, 5);
        session.start(test_pool(3)).unwrap();

        assert!(!session.undo());
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn test_exhaustion_reshuffles_and_clears_history() {
        let mut session = session_with_seed(ExhaustionPolicy::Reshuffle, 11);
        session.start(test_pool(3)).unwrap();
        let first_cycle = deck_order(&session);

        session.advance().unwrap();
        session.advance().unwrap();
        let outcome = session.advance().unwrap();

        assert_eq!(outcome, AdvanceOutcome::Reshuffled);
        assert_eq!(session.position(), 0);
        assert!(!session.can_undo());

        // Still the same candidate set, possibly in a new order
        let mut second_cycle = deck_order(&session);
        second_cycle.sort_unstable();
        let mut expected = first_cycle;
        expected.sort_unstable();
        assert_eq!(second_cycle, expected);
    }

    #[test]
    fn test_exhaustion_wrap_keeps_order_and_history() {
        let mut session = session_with_seed(ExhaustionPolicy::Wrap, 11);
        session.start(test_pool(3)).unwrap();
        let order = deck_order(&session);

        session.advance().unwrap();
        session.advance().unwrap();
        let outcome = session.advance().unwrap();

        assert_eq!(outcome, AdvanceOutcome::Wrapped);
        assert_eq!(session.position(), 0);
        assert_eq!(deck_order(&session), order);

        // Undo steps back across the wrap to the last candidate
        assert!(session.undo());
        assert_eq!(session.position(), 2);
    }

    #[test]
    fn test_single_candidate_deck() {
        let mut session = session_with_seed(ExhaustionPolicy::Reshuffle, 2);
        session.start(test_pool(1)).unwrap();

        let only = session.current().unwrap().clone();
        let outcome = session.advance().unwrap();
        assert_eq!(outcome, AdvanceOutcome::Reshuffled);
        assert_eq!(session.current().unwrap().id, only.id);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_restart_replaces_deck_and_clears_history() {
        let mut session = session_with_seed(ExhaustionPolicy::Reshuffle, 6);
        session.start(test_pool(4)).unwrap();
        session.advance().unwrap();
        assert!(session.can_undo());

        session.start(test_pool(2)).unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session.position(), 0);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_shuffle_order_is_uniform_over_permutations() {
        // 6000 seeded shuffles of a 3-candidate pool: each of the 6
        // permutations has mean 1000, so counts outside 800..1200 would
        // be a greater-than-6-sigma deviation.
        let mut counts: HashMap<Vec<u8>, u32> = HashMap::new();

        for seed in 0..6000u64 {
            let mut session = session_with_seed(ExhaustionPolicy::Reshuffle, seed);
            session.start(test_pool(3)).unwrap();
            *counts.entry(deck_order(&session)).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 6, "all 6 permutations should appear");
        for (order, count) in &counts {
            assert!(
                (800..1200).contains(count),
                "permutation {:?} appeared {} times",
                order,
                count
            );
        }
    }

    #[test]
    fn test_exhaustion_policy_parsing() {
        assert_eq!(
            ExhaustionPolicy::from_str("reshuffle"),
            Some(ExhaustionPolicy::Reshuffle)
        );
        assert_eq!(
            ExhaustionPolicy::from_str("  WRAP "),
            Some(ExhaustionPolicy::Wrap)
        );
        assert_eq!(ExhaustionPolicy::from_str("shuffle"), None);
        assert_eq!(ExhaustionPolicy::Wrap.to_db_string(), "wrap");
        assert_eq!(ExhaustionPolicy::default(), ExhaustionPolicy::Reshuffle);
    }
}
