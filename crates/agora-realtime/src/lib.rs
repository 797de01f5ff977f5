//! Live deliberation feed for Agora.
//!
//! The fan-out hub decouples event producers (transcript tailers, the
//! callback state machine) from an open set of observers. Delivery never
//! blocks a producer: each subscriber has a bounded queue and a slow or
//! disconnected observer loses events rather than stalling publishing.
//! Publishing can sit on the same path that drives consensus callbacks, so
//! head-of-line blocking there would be a correctness hazard, not just a
//! performance one.

mod error;
mod hub;
mod subscriber;

pub use error::RealtimeError;
pub use hub::{FanoutHub, HubStats};
pub use subscriber::{Subscriber, SubscriberId, SubscriberReceiver};
