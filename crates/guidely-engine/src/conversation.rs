//! Search-to-chat conversation flow.
//!
//! The hero starts as a search bar. The first non-empty submission switches
//! it into chat mode for good, and every submission gets its own delayed reply
//! from a [`Responder`].

use crate::scheduler::{Scheduler, TimerId};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, trace};

/// Presentation mode of the hero section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationMode {
    #[default]
    Search,
    /// Terminal: nothing switches back to search.
    Chat,
}

impl std::fmt::Display for ConversationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Chat => write!(f, "chat"),
        }
    }
}

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Unique, monotonically increasing turn identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(pub u64);

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: TurnId,
    pub text: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
}

/// Produces the bot's reply to a submitted prompt.
pub trait Responder: Send {
    fn respond(&mut self, prompt: &str) -> String;
}

impl<F> Responder for F
where
    F: FnMut(&str) -> String + Send,
{
    fn respond(&mut self, prompt: &str) -> String {
        self(prompt)
    }
}

/// Canned replies from the landing page's stub bot.
pub const DEFAULT_RESPONSES: [&str; 5] = [
    "Great! Let me help you find the perfect guide. Which city are you interested in?",
    "Perfect! What date are you planning your tour?",
    "I'm checking our available guides for your requirements...",
    "Unfortunately, we don't have guides available for these specific requirements at the moment. Would you like to try different dates or locations?",
    "Let me search for the best guides in that area for you!",
];

/// Replies with a uniformly chosen canned string, ignoring the prompt.
#[derive(Debug, Clone)]
pub struct CannedResponder {
    responses: Vec<String>,
    rng: StdRng,
}

impl CannedResponder {
    /// Responder over `responses` with an entropy-seeded generator.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            rng: StdRng::from_entropy(),
        }
    }

    /// Responder with a fixed seed, for reproducible transcripts.
    pub fn seeded(responses: Vec<String>, seed: u64) -> Self {
        Self {
            responses,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSES.iter().map(|s| (*s).to_string()).collect())
    }
}

impl Responder for CannedResponder {
    fn respond(&mut self, _prompt: &str) -> String {
        if self.responses.is_empty() {
            return String::new();
        }
        let index = self.rng.gen_range(0..self.responses.len());
        self.responses[index].clone()
    }
}

/// Timer event for a delayed bot reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseTimer;

/// Owns the mode, the transcript and the in-flight replies.
pub struct ConversationController {
    mode: ConversationMode,
    turns: Vec<ConversationTurn>,
    input: String,
    latency: Duration,
    responder: Box<dyn Responder>,
    /// Prompts awaiting a reply, keyed by their timer.
    in_flight: BTreeMap<TimerId, String>,
    next_turn: u64,
    disposed: bool,
}

impl ConversationController {
    /// Create a controller in search mode.
    pub fn new(latency: Duration, responder: Box<dyn Responder>) -> Self {
        Self {
            mode: ConversationMode::Search,
            turns: Vec::new(),
            input: String::new(),
            latency,
            responder,
            in_flight: BTreeMap::new(),
            next_turn: 0,
            disposed: false,
        }
    }

    pub fn mode(&self) -> ConversationMode {
        self.mode
    }

    /// Transcript in display order.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Current contents of the input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    /// Whether any reply is still on its way.
    pub fn is_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Number of replies still on their way.
    pub fn pending_responses(&self) -> usize {
        self.in_flight.len()
    }

    /// Submit a message.
    ///
    /// Blank text is ignored. Otherwise the controller enters chat mode,
    /// appends the user turn, clears the input buffer and schedules a reply.
    /// Returns the new turn's id.
    pub fn submit<E>(&mut self, text: &str, timers: &mut Scheduler<E>) -> Option<TurnId>
    where
        E: From<ResponseTimer> + Clone,
    {
        if self.disposed || text.trim().is_empty() {
            return None;
        }

        if self.mode == ConversationMode::Search {
            self.mode = ConversationMode::Chat;
            debug!("conversation switched to chat mode");
        }

        let id = self.push_turn(text.to_string(), Sender::User);
        self.input.clear();

        let timer = timers.schedule_once(self.latency, E::from(ResponseTimer));
        self.in_flight.insert(timer, text.to_string());
        trace!(turn = id.0, pending = self.in_flight.len(), "reply scheduled");
        Some(id)
    }

    /// Submit whatever is in the input buffer.
    pub fn submit_input<E>(&mut self, timers: &mut Scheduler<E>) -> Option<TurnId>
    where
        E: From<ResponseTimer> + Clone,
    {
        let text = self.input.clone();
        self.submit(&text, timers)
    }

    /// Handle a fired reply timer. Returns the bot turn it appended, or
    /// `None` for a timer this controller does not own.
    pub fn on_timer(&mut self, id: TimerId) -> Option<TurnId> {
        let Some(prompt) = self.in_flight.remove(&id) else {
            trace!(?id, "stale reply timer");
            return None;
        };
        let reply = self.responder.respond(&prompt);
        let turn = self.push_turn(reply, Sender::Bot);
        trace!(turn = turn.0, pending = self.in_flight.len(), "reply appended");
        Some(turn)
    }

    /// Cancel every in-flight reply. Safe to call more than once.
    pub fn dispose<E: Clone>(&mut self, timers: &mut Scheduler<E>) {
        let cancelled = self.in_flight.len();
        for id in std::mem::take(&mut self.in_flight).into_keys() {
            timers.cancel(id);
        }
        if !self.disposed {
            debug!(cancelled, "conversation disposed");
        }
        self.disposed = true;
    }

    fn push_turn(&mut self, text: String, sender: Sender) -> TurnId {
        let id = TurnId(self.next_turn);
        self.next_turn += 1;
        self.turns.push(ConversationTurn {
            id,
            text,
            sender,
            created_at: Utc::now(),
        });
        id
    }
}

impl std::fmt::Debug for ConversationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationController")
            .field("mode", &self.mode)
            .field("turns", &self.turns.len())
            .field("in_flight", &self.in_flight.len())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
