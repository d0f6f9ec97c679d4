//! Narrative session registry
//!
//! Maps session ids handed to clients onto their session logs. Bounded: the
//! oldest session is dropped once `capacity` is reached.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use attrition_core::logic::narrative::NarrativeSession;

#[derive(Default)]
struct Inner {
    sessions: HashMap<Uuid, Arc<NarrativeSession>>,
    order: VecDeque<Uuid>,
}

pub struct SessionRegistry {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn insert(&self, session: Arc<NarrativeSession>) -> Uuid {
        let id = Uuid::new_v4();
        let mut inner = self.inner.lock();
        while inner.order.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.sessions.remove(&oldest);
                tracing::debug!("Evicted narrative session {}", oldest);
            }
        }
        inner.sessions.insert(id, session);
        inner.order.push_back(id);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<NarrativeSession>> {
        self.inner.lock().sessions.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().sessions.len()
    }
}
