// 2022-2024 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use derive_getters::Getters;
use parking_lot::RwLock;
use serde::Deserialize;
use serde::Serialize;
use typed_builder::TypedBuilder;

use crate::message::OutboundMessage;
use crate::metrics::QueueMetrics;
use crate::utilities::guarded::AllowGuardedMut;
use crate::utilities::guarded::Guarded;
use crate::utilities::guarded::GuardedMut;

mod errors;
pub use errors::QueueError;


/// A message and the stamp it was enqueued with.
#[derive(Serialize, Deserialize, Getters, TypedBuilder, Clone, Debug)]
pub struct QueuedMessage<M> {
    message: M,
    stamp: u64,
}

// Runs of transmitted messages keyed by sending account, each in nonce order
type SenderQueues<M> = HashMap<<M as OutboundMessage>::Address, VecDeque<QueuedMessage<M>>>;

impl<M: OutboundMessage> AllowGuardedMut for SenderQueues<M> {}

/// Ordered runs of messages an account has transmitted but not yet seen in a
/// block. Nonces within a run are contiguous; the stamp at the front of a
/// run (block height in the node) is the expiration key for the whole run.
/// The relative order of stamps inside a run is not enforced.
///
/// Safe for concurrent access. Clones share the same state.
pub struct MessageQueue<M: OutboundMessage> {
    queues: Arc<RwLock<SenderQueues<M>>>,
    metrics: Option<Arc<dyn QueueMetrics>>,
}

impl<M: OutboundMessage> Clone for MessageQueue<M> {
    fn clone(&self) -> Self {
        Self { queues: self.queues.clone(), metrics: self.metrics.clone() }
    }
}

impl<M: OutboundMessage> Default for MessageQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: OutboundMessage> MessageQueue<M> {
    /// Constructs a new, empty queue.
    pub fn new() -> Self {
        Self { queues: Arc::new(RwLock::new(HashMap::new())), metrics: None }
    }

    /// Constructs an empty queue publishing size/oldest gauges after every
    /// update and an expiration counter from [`Self::expire_before`].
    pub fn with_metrics(metrics: Arc<dyn QueueMetrics>) -> Self {
        Self { queues: Arc::new(RwLock::new(HashMap::new())), metrics: Some(metrics) }
    }

    /// Appends a new message for an account. If the queue already holds
    /// messages from the same account, the nonce must be exactly one greater
    /// than the largest nonce present.
    pub fn enqueue(&self, message: M, stamp: u64) -> Result<(), QueueError> {
        let sender = message.sender();
        let (result, (size, oldest)) = self.queues.guarded_mut(|queues| {
            let result = {
                let q = queues.entry(sender).or_default();
                match q.back().map(|back| back.message.nonce().wrapping_add(1)) {
                    Some(next_nonce) if message.nonce() != next_nonce => {
                        Err(QueueError::NonceGap { got: message.nonce(), expected: next_nonce })
                    }
                    _ => {
                        q.push_back(QueuedMessage { message, stamp });
                        Ok(())
                    }
                }
            };
            (result, Self::observe(queues))
        });
        self.publish_gauges(size, oldest);
        result
    }

    /// Prepends a message for an account, returning a previously removed
    /// message to the queue (a chain reorganization undoing a block). The
    /// nonce must be exactly one less than the smallest nonce present. The
    /// new front stamp may exceed interior stamps; expiration only ever
    /// consults the front.
    pub fn requeue(&self, message: M, stamp: u64) -> Result<(), QueueError> {
        let sender = message.sender();
        let (result, (size, oldest)) = self.queues.guarded_mut(|queues| {
            let result = {
                let q = queues.entry(sender).or_default();
                match q.front().map(|front| front.message.nonce().wrapping_sub(1)) {
                    Some(prev_nonce) if message.nonce() != prev_nonce => {
                        Err(QueueError::NonceGap { got: message.nonce(), expected: prev_nonce })
                    }
                    _ => {
                        q.push_front(QueuedMessage { message, stamp });
                        Ok(())
                    }
                }
            };
            (result, Self::observe(queues))
        });
        self.publish_gauges(size, oldest);
        result
    }

    /// Removes and returns the front message of the account's run if it
    /// bears the expected nonce. Returns `Ok(None)` if the run is empty or
    /// the expected nonce is below the front (the message was already
    /// removed). Returns an error if the expected nonce is above the front:
    /// a published block references a message this queue has never handed
    /// out. Matching is by nonce only; callers distinguishing re-signed
    /// messages must compare the returned message themselves.
    pub fn remove_next(
        &self,
        sender: &M::Address,
        expected_nonce: u64,
    ) -> Result<Option<M>, QueueError> {
        let (result, (size, oldest)) = self.queues.guarded_mut(|queues| {
            let result = match queues.get_mut(sender) {
                Some(q) => match q.front().map(|front| front.message.nonce()) {
                    Some(head_nonce) if expected_nonce == head_nonce => {
                        let removed = q.pop_front().map(|entry| entry.message);
                        if q.is_empty() {
                            queues.remove(sender);
                        }
                        Ok(removed)
                    }
                    Some(head_nonce) if expected_nonce > head_nonce => {
                        tracing::warn!(
                            "Queue for {:?} is behind: head nonce {}, expected {}",
                            sender,
                            head_nonce,
                            expected_nonce
                        );
                        Err(QueueError::Inconsistency {
                            sender: format!("{sender:?}"),
                            head_nonce,
                            expected_nonce,
                        })
                    }
                    // expected nonce was before the front of the run, already removed
                    _ => Ok(None),
                },
                None => Ok(None),
            };
            (result, Self::observe(queues))
        });
        self.publish_gauges(size, oldest);
        result
    }

    /// Drops all messages for a single account. Returns whether any were
    /// present.
    pub fn clear(&self, sender: &M::Address) -> bool {
        let (cleared, (size, oldest)) = self.queues.guarded_mut(|queues| {
            let cleared = queues.remove(sender).is_some_and(|q| !q.is_empty());
            (cleared, Self::observe(queues))
        });
        self.publish_gauges(size, oldest);
        cleared
    }

    /// Expires every account whose front stamp is below `stamp`, moving the
    /// whole run into the returned map. An account whose front stamp is at
    /// or above the threshold is untouched even if interior stamps fall
    /// below it: the front stamp is the per-account progress marker.
    pub fn expire_before(&self, stamp: u64) -> HashMap<M::Address, Vec<M>> {
        let (expired, (size, oldest)) = self.queues.guarded_mut(|queues| {
            let mut expired = HashMap::new();
            for (sender, q) in queues.iter_mut() {
                if q.front().is_some_and(|front| front.stamp < stamp) {
                    if let Some(metrics) = self.metrics.as_ref() {
                        metrics.report_expired_messages(q.len() as u64);
                    }
                    let run: Vec<M> = q.drain(..).map(|entry| entry.message).collect();
                    expired.insert(sender.clone(), run);
                }
            }
            (expired, Self::observe(queues))
        });
        if !expired.is_empty() {
            tracing::trace!("Expired {} account runs below stamp {}", expired.len(), stamp);
        }
        self.publish_gauges(size, oldest);
        expired
    }

    /// The largest nonce queued for an account, `None` when the account has
    /// no messages. The next nonce to sign is one above this.
    pub fn largest_nonce(&self, sender: &M::Address) -> Option<u64> {
        self.queues.guarded(|queues| {
            queues.get(sender).and_then(|q| q.back()).map(|back| back.message.nonce())
        })
    }

    /// The accounts with at least one queued message. The order of returned
    /// addresses is neither defined nor stable.
    pub fn queues(&self) -> Vec<M::Address> {
        self.queues.guarded(|queues| {
            queues.iter().filter(|(_, q)| !q.is_empty()).map(|(sender, _)| sender.clone()).collect()
        })
    }

    /// The total number of queued messages across all accounts.
    pub fn size(&self) -> i64 {
        self.queues.guarded(|queues| Self::total_size(queues))
    }

    /// The smallest stamp of any queued message, zero when the queue is
    /// empty. Scans every run, not just the fronts.
    pub fn oldest(&self) -> u64 {
        self.queues.guarded(|queues| Self::oldest_stamp(queues))
    }

    /// A copy of the run queued for an account. Mutating the returned
    /// entries does not affect the queue.
    pub fn list(&self, sender: &M::Address) -> Vec<QueuedMessage<M>> {
        self.queues.guarded(|queues| {
            queues.get(sender).map(|q| q.iter().cloned().collect()).unwrap_or_default()
        })
    }

    fn total_size(queues: &SenderQueues<M>) -> i64 {
        queues.values().map(|q| q.len() as i64).sum()
    }

    fn oldest_stamp(queues: &SenderQueues<M>) -> u64 {
        queues.values().flat_map(|q| q.iter().map(|entry| entry.stamp)).min().unwrap_or(0)
    }

    // Gauge values are captured under the same write guard as the update
    // they describe.
    fn observe(queues: &SenderQueues<M>) -> (i64, u64) {
        (Self::total_size(queues), Self::oldest_stamp(queues))
    }

    fn publish_gauges(&self, size: i64, oldest: u64) {
        if let Some(metrics) = self.metrics.as_ref() {
            metrics.report_queue_size(size);
            metrics.report_oldest_stamp(oldest);
        }
    }
}
