use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::models::session::{AnswerOutcome, QuizSession};

#[derive(Debug)]
struct Entry {
    session: QuizSession,
    last_seen: Instant,
}

/// Server-side quiz sessions keyed by the id carried in the session cookie.
#[derive(Clone, Debug)]
pub struct SessionStore {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Starts an attempt over `question_ids` in random order.
    pub fn start(&self, mut question_ids: Vec<i64>) -> Uuid {
        question_ids.shuffle(&mut rand::thread_rng());
        self.insert(QuizSession::new(question_ids))
    }

    pub fn insert(&self, session: QuizSession) -> Uuid {
        let id = Uuid::new_v4();
        let mut guard = self.entries.lock().expect("session store mutex poisoned");
        prune(&mut guard, self.ttl);
        guard.insert(
            id,
            Entry {
                session,
                last_seen: Instant::now(),
            },
        );
        tracing::debug!(session_id = %id, active = guard.len(), "quiz session started");
        id
    }

    pub fn get(&self, id: Uuid) -> Option<QuizSession> {
        let mut guard = self.entries.lock().expect("session store mutex poisoned");
        prune(&mut guard, self.ttl);
        guard.get_mut(&id).map(|entry| {
            entry.last_seen = Instant::now();
            entry.session.clone()
        })
    }

    pub fn answer(
        &self,
        id: Uuid,
        question_id: i64,
        option_id: i64,
        is_correct: bool,
    ) -> Option<(AnswerOutcome, QuizSession)> {
        let mut guard = self.entries.lock().expect("session store mutex poisoned");
        let entry = guard.get_mut(&id)?;
        entry.last_seen = Instant::now();
        let outcome = entry.session.answer(question_id, option_id, is_correct);
        Some((outcome, entry.session.clone()))
    }

    pub fn remove(&self, id: Uuid) {
        let mut guard = self.entries.lock().expect("session store mutex poisoned");
        guard.remove(&id);
    }

    pub fn len(&self) -> usize {
        let guard = self.entries.lock().expect("session store mutex poisoned");
        guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn prune(entries: &mut HashMap<Uuid, Entry>, ttl: Duration) {
    let now = Instant::now();
    entries.retain(|_, entry| now.duration_since(entry.last_seen) < ttl);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_keeps_every_question_once() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.start(vec![1, 2, 3, 4, 5]);
        let mut ids = store.get(id).unwrap().question_ids;
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn answer_updates_stored_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.insert(QuizSession::new(vec![10, 20]));

        let (outcome, session) = store.answer(id, 10, 100, true).unwrap();
        assert_eq!(outcome, AnswerOutcome::Correct);
        assert_eq!(session.score, 1);
        assert_eq!(store.get(id).unwrap().current_index, 1);
    }

    #[test]
    fn unknown_session_is_none() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert!(store.get(Uuid::new_v4()).is_none());
        assert!(store.answer(Uuid::new_v4(), 1, 1, true).is_none());
    }

    #[test]
    fn expired_sessions_are_pruned() {
        let store = SessionStore::new(Duration::from_millis(0));
        let id = store.insert(QuizSession::new(vec![1]));
        assert!(store.get(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_discards_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.insert(QuizSession::new(vec![1]));
        store.remove(id);
        assert!(store.get(id).is_none());
    }
}
