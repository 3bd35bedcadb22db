//! Stateful chat sessions keyed by a client-chosen id.
//!
//! Each session keeps its own history behind an async mutex, so turns of one
//! session run one at a time while different sessions proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::llm::{ChatError, ChatModel, ChatTurn, Speaker};

struct SessionSlot {
    turns: tokio::sync::Mutex<Vec<ChatTurn>>,
    last_used: Mutex<Instant>,
}

impl SessionSlot {
    fn new(now: Instant) -> Self {
        Self { turns: tokio::sync::Mutex::new(Vec::new()), last_used: Mutex::new(now) }
    }
}

pub struct ChatRelay {
    model: Arc<dyn ChatModel>,
    system_prompt: String,
    max_history: usize,
    sessions: RwLock<HashMap<String, Arc<SessionSlot>>>,
}

/// Drop the oldest turns beyond `max`, never leaving a model turn first.
fn cap_history(turns: &mut Vec<ChatTurn>, max: usize) {
    if turns.len() > max {
        let excess = turns.len() - max;
        turns.drain(..excess);
    }
    while turns.first().map(|t| t.speaker == Speaker::Model).unwrap_or(false) {
        turns.remove(0);
    }
}

impl ChatRelay {
    pub fn new(model: Arc<dyn ChatModel>, system_prompt: impl Into<String>, max_history: usize) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            max_history: max_history.max(2),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn model_name(&self) -> &str { self.model.name() }

    /// Find or create a session slot, marking it used. The mark happens
    /// under the map lock so a concurrent sweep cannot drop the slot first.
    fn slot(&self, session_id: &str) -> Arc<SessionSlot> {
        let now = Instant::now();
        if let Some(slot) = self.sessions.read().get(session_id) {
            *slot.last_used.lock() = now;
            return slot.clone();
        }
        let mut map = self.sessions.write();
        let slot = map.entry(session_id.to_string()).or_insert_with(|| {
            debug!(target: "dormhub::chat", "new chat session {}", session_id);
            Arc::new(SessionSlot::new(now))
        });
        *slot.last_used.lock() = now;
        slot.clone()
    }

    /// Send one user message and return the model's answer. A failed turn
    /// leaves the session history as it was.
    pub async fn send(&self, session_id: &str, message: &str) -> Result<String, ChatError> {
        let slot = self.slot(session_id);
        let mut turns = slot.turns.lock().await;
        *slot.last_used.lock() = Instant::now();

        let mut request = turns.clone();
        request.push(ChatTurn::user(message));
        let answer = self.model.reply(&self.system_prompt, &request).await?;

        turns.push(ChatTurn::user(message));
        turns.push(ChatTurn::model(answer.clone()));
        cap_history(&mut turns, self.max_history);
        *slot.last_used.lock() = Instant::now();
        Ok(answer)
    }

    /// Forget a session. Returns whether it existed.
    pub fn reset(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }

    pub fn session_count(&self) -> usize { self.sessions.read().len() }

    /// Number of turns kept for a session, waiting out a turn in flight.
    pub async fn history_len(&self, session_id: &str) -> usize {
        let slot = self.sessions.read().get(session_id).cloned();
        match slot {
            Some(slot) => slot.turns.lock().await.len(),
            None => 0,
        }
    }

    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        self.sweep_idle_at(Instant::now(), max_idle)
    }

    /// Drop sessions untouched since `now - max_idle`. Sessions with a turn
    /// in flight are kept.
    pub fn sweep_idle_at(&self, now: Instant, max_idle: Duration) -> usize {
        let mut map = self.sessions.write();
        let before = map.len();
        map.retain(|_, slot| {
            let idle = now.saturating_duration_since(*slot.last_used.lock());
            idle < max_idle || slot.turns.try_lock().is_err()
        });
        before - map.len()
    }
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod relay_tests;
