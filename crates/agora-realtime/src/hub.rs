//! Fan-out hub: many producers, an open set of observers.

use crate::error::RealtimeError;
use crate::subscriber::{Subscriber, SubscriberId, SubscriberReceiver};
use agora_types::{ChainId, VoteEvent};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Capacity of the in-process broadcast tap.
const BROADCAST_CAPACITY: usize = 1024;

/// Per-subscriber queue depth.
const SUBSCRIBER_CAPACITY: usize = 256;

/// Maximum number of concurrent subscribers.
const MAX_SUBSCRIBERS: usize = 10000;

/// Broker between deliberation-event producers and live observers.
///
/// `publish` walks the subscriber set under a read lock and uses non-blocking
/// delivery throughout; a full queue costs that subscriber the event, and a
/// closed one is evicted on the next publish. Publishing can therefore be
/// called from the consensus callback path without risk of stalling it.
#[derive(Debug)]
pub struct FanoutHub {
    /// Connected subscribers indexed by ID.
    subscribers: RwLock<HashMap<SubscriberId, Arc<Subscriber>>>,
    /// Broadcast tap for in-process listeners.
    event_tx: broadcast::Sender<VoteEvent>,
    /// Statistics.
    stats: RwLock<HubStats>,
}

impl FanoutHub {
    /// Creates a new hub.
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            subscribers: RwLock::new(HashMap::new()),
            event_tx,
            stats: RwLock::new(HubStats::default()),
        }
    }

    /// Connects a new observer, optionally scoped to one chain, and returns
    /// its event receiver.
    pub fn subscribe(
        &self,
        chain: Option<ChainId>,
    ) -> Result<(Arc<Subscriber>, SubscriberReceiver), RealtimeError> {
        if self.subscribers.read().len() >= MAX_SUBSCRIBERS {
            return Err(RealtimeError::SubscriberLimit(MAX_SUBSCRIBERS));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let (subscriber, receiver) = Subscriber::new(id.clone(), chain, SUBSCRIBER_CAPACITY);
        let subscriber = Arc::new(subscriber);

        self.subscribers.write().insert(id.clone(), subscriber.clone());
        self.stats.write().total_subscribers += 1;

        info!(subscriber_id = %id, "observer connected");
        Ok((subscriber, receiver))
    }

    /// Disconnects an observer.
    pub fn unsubscribe(&self, id: &str) {
        if self.subscribers.write().remove(id).is_some() {
            info!(subscriber_id = %id, "observer disconnected");
        }
    }

    /// Publishes one event to every interested observer, never blocking.
    pub fn publish(&self, chain: &ChainId, event: VoteEvent) {
        let mut delivered = 0usize;
        let mut dropped = 0usize;
        let mut dead: Vec<SubscriberId> = Vec::new();

        {
            let subscribers = self.subscribers.read();
            for subscriber in subscribers.values() {
                if !subscriber.wants(chain) {
                    continue;
                }
                match subscriber.offer(event.clone()) {
                    Ok(true) => delivered += 1,
                    Ok(false) => dropped += 1,
                    Err(()) => dead.push(subscriber.id.clone()),
                }
            }
        }

        for id in &dead {
            self.unsubscribe(id);
        }

        // In-process listeners tap the broadcast channel.
        let _ = self.event_tx.send(event);

        let mut stats = self.stats.write();
        stats.total_events += 1;
        stats.total_dropped += dropped as u64;
        drop(stats);

        if dropped > 0 {
            warn!(chain = %chain, dropped, "slow observers lost an event");
        }
        debug!(chain = %chain, delivered, dropped, "event published");
    }

    /// Subscribes to the in-process broadcast tap.
    pub fn tap(&self) -> broadcast::Receiver<VoteEvent> {
        self.event_tx.subscribe()
    }

    /// Returns the current number of observers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Returns hub statistics.
    pub fn stats(&self) -> HubStats {
        let mut stats = self.stats.read().clone();
        stats.current_subscribers = self.subscriber_count();
        stats
    }
}

impl Default for FanoutHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Hub statistics.
#[derive(Debug, Clone, Default)]
pub struct HubStats {
    /// Current number of observers.
    pub current_subscribers: usize,
    /// Total observers since start.
    pub total_subscribers: u64,
    /// Total events published since start.
    pub total_events: u64,
    /// Total per-subscriber drops since start.
    pub total_dropped: u64,
}
