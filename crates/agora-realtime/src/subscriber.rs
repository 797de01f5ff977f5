//! Subscriber connection handles.

use agora_types::{ChainId, VoteEvent};
use tokio::sync::mpsc;

/// Unique identifier for a subscriber.
pub type SubscriberId = String;

/// Receiving end handed to the observer connection.
pub type SubscriberReceiver = mpsc::Receiver<VoteEvent>;

/// One connected observer.
///
/// The queue is bounded: if the observer cannot keep up, events addressed to
/// it are dropped rather than ever blocking the publisher.
#[derive(Debug)]
pub struct Subscriber {
    /// Unique subscriber identifier.
    pub id: SubscriberId,
    /// Chain filter; `None` receives events for every chain.
    pub chain: Option<ChainId>,
    sender: mpsc::Sender<VoteEvent>,
}

impl Subscriber {
    /// Creates a subscriber with a bounded queue of `capacity` events.
    pub fn new(id: SubscriberId, chain: Option<ChainId>, capacity: usize) -> (Self, SubscriberReceiver) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { id, chain, sender }, receiver)
    }

    /// Whether this subscriber wants events for `chain`.
    pub fn wants(&self, chain: &ChainId) -> bool {
        self.chain.as_ref().map(|c| c == chain).unwrap_or(true)
    }

    /// Attempts delivery without blocking.
    ///
    /// Returns `Ok(true)` if queued, `Ok(false)` if the event was dropped
    /// because the queue is full, and `Err(())` if the observer is gone.
    pub fn offer(&self, event: VoteEvent) -> Result<bool, ()> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(true),
            Err(mpsc::error::TrySendError::Full(_)) => Ok(false),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(round: u32) -> VoteEvent {
        VoteEvent {
            validator_id: "Ada".into(),
            validator_name: "Ada".into(),
            message: "msg".into(),
            timestamp_unix: 0,
            round,
            approval: true,
        }
    }

    #[test]
    fn test_chain_filter() {
        let (any, _rx) = Subscriber::new("s1".into(), None, 4);
        let (scoped, _rx2) = Subscriber::new("s2".into(), Some(ChainId::new("mainnet")), 4);

        assert!(any.wants(&ChainId::new("mainnet")));
        assert!(any.wants(&ChainId::new("testnet")));
        assert!(scoped.wants(&ChainId::new("mainnet")));
        assert!(!scoped.wants(&ChainId::new("testnet")));
    }

    #[test]
    fn test_offer_drops_when_full() {
        let (sub, mut rx) = Subscriber::new("s1".into(), None, 1);

        assert_eq!(sub.offer(event(0)), Ok(true));
        assert_eq!(sub.offer(event(1)), Ok(false));

        assert_eq!(rx.try_recv().unwrap().round, 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_offer_reports_closed() {
        let (sub, rx) = Subscriber::new("s1".into(), None, 1);
        drop(rx);
        assert!(sub.offer(event(0)).is_err());
    }
}
