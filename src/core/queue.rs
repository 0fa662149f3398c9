use hashbrown::HashMap;
use thiserror::Error;

use crate::{request::LogRequest, types::RequestId};

/// Rejected queue mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The id is already pending.
    #[error("request {0} is already queued")]
    AlreadyQueued(RequestId),
}

/// Insertion-ordered pending requests with removal by identity.
#[derive(Debug, Default)]
pub struct RequestQueue {
    requests: HashMap<RequestId, LogRequest>,
    order: Vec<RequestId>,
}

impl RequestQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a request at the tail.
    pub fn push(&mut self, request: LogRequest) -> Result<(), QueueError> {
        if self.requests.contains_key(&request.id) {
            return Err(QueueError::AlreadyQueued(request.id));
        }
        self.order.push(request.id);
        self.requests.insert(request.id, request);
        Ok(())
    }

    /// Removes exactly the request with `id`, wherever it now sits.
    pub fn remove(&mut self, id: RequestId) -> Option<LogRequest> {
        let request = self.requests.remove(&id)?;
        if let Some(pos) = self.order.iter().position(|x| *x == id) {
            self.order.remove(pos);
        }
        Some(request)
    }

    /// Oldest-first copy of the current contents.
    pub fn snapshot(&self) -> Vec<LogRequest> {
        self.order
            .iter()
            .filter_map(|id| self.requests.get(id).cloned())
            .collect()
    }

    /// Looks up a pending request.
    pub fn get(&self, id: RequestId) -> Option<&LogRequest> {
        self.requests.get(&id)
    }

    /// True while `id` is pending.
    pub fn contains(&self, id: RequestId) -> bool {
        self.requests.contains_key(&id)
    }

    /// Pending ids, oldest first.
    pub fn ordered_ids(&self) -> &[RequestId] {
        &self.order
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drops every pending request and returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.order.len();
        self.order.clear();
        self.requests.clear();
        dropped
    }
}
