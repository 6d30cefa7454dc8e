//! Event types for the NetWith event system
//!
//! Provides shared event definitions and the EventBus used by the
//! discovery service. Events are broadcast in-process and can be
//! serialized for SSE transmission.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Direction of a swipe decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Viewer declined the candidate
    Pass,
    /// Viewer wants to connect with the candidate
    Connect,
}

impl SwipeDirection {
    /// Parse the stored string form
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pass" => Some(SwipeDirection::Pass),
            "connect" => Some(SwipeDirection::Connect),
            _ => None,
        }
    }

    /// String form used in the database
    pub fn to_db_string(&self) -> &'static str {
        match self {
            SwipeDirection::Pass => "pass",
            SwipeDirection::Connect => "connect",
        }
    }
}

impl std::fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// NetWith event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
/// Consumers match on this central enum exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NetWithEvent {
    /// A discovery session was started (or restarted) for a viewer
    ///
    /// Triggers:
    /// - SSE: Initialize the card deck UI
    SessionStarted {
        /// Viewer whose session started
        user_id: Uuid,
        /// Number of candidates in the shuffled deck
        pool_size: usize,
        /// When the session started
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The viewer's deck advanced to a new candidate
    ///
    /// Triggers:
    /// - SSE: Render the next card
    CandidateShown {
        /// Viewer whose deck advanced
        user_id: Uuid,
        /// Candidate now at the cursor
        candidate_id: Uuid,
        /// When the candidate was shown
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The deck was exhausted and reshuffled into a new order
    ///
    /// Triggers:
    /// - SSE: Show the "fresh deck" notice
    DeckReshuffled {
        /// Viewer whose deck was reshuffled
        user_id: Uuid,
        /// Number of candidates in the new order
        pool_size: usize,
        /// When the reshuffle happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A swipe decision was persisted
    ///
    /// Triggers:
    /// - SSE: Update swipe counters
    SwipeRecorded {
        /// User who swiped
        swiper_id: Uuid,
        /// User who was swiped on
        swiped_id: Uuid,
        /// Decision direction
        direction: SwipeDirection,
        /// When the swipe was recorded
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Two users connected with each other
    ///
    /// Emitted once per pair, when the second side of a mutual
    /// connect swipe is recorded.
    ///
    /// Triggers:
    /// - SSE: Show the match notification to both users
    MatchCreated {
        /// Match row identifier
        match_id: Uuid,
        /// First participant (canonical pair order)
        user1_id: Uuid,
        /// Second participant (canonical pair order)
        user2_id: Uuid,
        /// When the match was created
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A profile was created or edited
    ///
    /// Triggers:
    /// - SSE: Refresh any open view of this profile
    ProfileUpdated {
        /// Profile owner
        user_id: Uuid,
        /// When the profile changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl NetWithEvent {
    /// Get event type name for SSE filtering
    pub fn event_type(&self) -> &str {
        match self {
            NetWithEvent::SessionStarted { .. } => "SessionStarted",
            NetWithEvent::CandidateShown { .. } => "CandidateShown",
            NetWithEvent::DeckReshuffled { .. } => "DeckReshuffled",
            NetWithEvent::SwipeRecorded { .. } => "SwipeRecorded",
            NetWithEvent::MatchCreated { .. } => "MatchCreated",
            NetWithEvent::ProfileUpdated { .. } => "ProfileUpdated",
        }
    }
}

/// Event bus for broadcasting events to all subscribers
///
/// Uses tokio's broadcast channel. Subscribers receive events emitted
/// after they subscribe; slow subscribers may miss events once the
/// channel buffer wraps.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<NetWithEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use netwith_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<NetWithEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(
        &self,
        event: NetWithEvent,
    ) -> Result<usize, broadcast::error::SendError<NetWithEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring whether anyone is listening
    ///
    /// Used for events where it is acceptable that no component is
    /// currently subscribed (e.g. nobody has an SSE stream open).
    pub fn emit_lossy(&self, event: NetWithEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
