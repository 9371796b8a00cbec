//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{BattleTick, LifecycleEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Combat events (attacks, damage, statuses, deaths)
    Battle,
    /// Start, finish and stop notifications
    Lifecycle,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Battle, Topic::Lifecycle];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Battle(BattleTick),
    Lifecycle(LifecycleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Battle(_) => Topic::Battle,
            Event::Lifecycle(_) => Topic::Lifecycle,
        }
    }
}

struct Channels {
    battle: broadcast::Sender<Event>,
    lifecycle: broadcast::Sender<Event>,
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Slow subscribers lag rather than block the worker.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                battle: broadcast::channel(capacity).0,
                lifecycle: broadcast::channel(capacity).0,
            }),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Battle => &self.channels.battle,
            Topic::Lifecycle => &self.channels.lifecycle,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{BattleEvent, Team};

    use super::*;

    #[tokio::test]
    async fn events_are_routed_by_topic() {
        let bus = EventBus::with_capacity(8);
        let mut battle = bus.subscribe(Topic::Battle);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);

        bus.publish(Event::Battle(BattleTick {
            elapsed_ms: 40,
            event: BattleEvent::BattleEnded {
                winner: Some(Team::Red),
                elapsed_ms: 40,
            },
        }));
        bus.publish(Event::Lifecycle(LifecycleEvent::Stopped { result: None }));

        assert_eq!(battle.recv().await.unwrap().topic(), Topic::Battle);
        assert_eq!(lifecycle.recv().await.unwrap().topic(), Topic::Lifecycle);
        assert!(battle.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(Event::Lifecycle(LifecycleEvent::Stopped { result: None }));
        assert_eq!(bus.subscriber_count(Topic::Lifecycle), 0);
    }
}
