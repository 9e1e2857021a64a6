use std::collections::HashMap;

use tokio::sync::{RwLock, broadcast};
use tracing::debug;
use uuid::Uuid;

use crate::RoomEvent;

const DEFAULT_CAPACITY: usize = 64;

/// Concurrent registry of rooms and their subscribers.
///
/// Created once per process and shared behind an `Arc`.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<Uuid, broadcast::Sender<RoomEvent>>>,
    capacity: usize,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` bounds how far a slow subscriber may lag before it starts
    /// missing events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Join a room, creating it on first use.
    pub async fn subscribe(&self, room_id: Uuid) -> broadcast::Receiver<RoomEvent> {
        let mut rooms = self.rooms.write().await;
        let sender = rooms
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        debug!("Subscriber joined room {room_id}");
        sender.subscribe()
    }

    /// Deliver an event to every current subscriber of a room.
    ///
    /// Returns the number of subscribers reached. A room whose subscribers
    /// have all gone is removed.
    pub async fn publish(&self, room_id: Uuid, event: RoomEvent) -> usize {
        let outcome = {
            let rooms = self.rooms.read().await;
            let Some(sender) = rooms.get(&room_id) else {
                return 0;
            };
            sender.send(event)
        };

        match outcome {
            Ok(delivered) => delivered,
            Err(_) => {
                self.prune(room_id).await;
                0
            }
        }
    }

    async fn prune(&self, room_id: Uuid) {
        let mut rooms = self.rooms.write().await;
        if rooms
            .get(&room_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            rooms.remove(&room_id);
            debug!("Removed empty room {room_id}");
        }
    }

    /// Drop a room; its subscribers observe the channel closing.
    pub async fn close_room(&self, room_id: Uuid) -> bool {
        self.rooms.write().await.remove(&room_id).is_some()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn subscriber_count(&self, room_id: Uuid) -> usize {
        self.rooms
            .read()
            .await
            .get(&room_id)
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::broadcast::error::RecvError;

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_publish_reaches_all_subscribers_in_order() {
        let registry = RoomRegistry::new();
        let room = Uuid::now_v7();
        let mut first = registry.subscribe(room).await;
        let mut second = registry.subscribe(room).await;

        assert_eq!(registry.publish(room, RoomEvent::error("one")).await, 2);
        assert_eq!(registry.publish(room, RoomEvent::error("two")).await, 2);

        for receiver in [&mut first, &mut second] {
            assert_eq!(receiver.recv().await.expect("event"), RoomEvent::error("one"));
            assert_eq!(receiver.recv().await.expect("event"), RoomEvent::error("two"));
        }
    }

    #[tokio::test]
    async fn test_publish_to_unknown_room_is_noop() {
        let registry = RoomRegistry::new();
        assert_eq!(registry.publish(Uuid::now_v7(), RoomEvent::error("x")).await, 0);
        assert_eq!(registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        let registry = RoomRegistry::new();
        let (room_a, room_b) = (Uuid::now_v7(), Uuid::now_v7());
        let mut receiver_a = registry.subscribe(room_a).await;
        let _receiver_b = registry.subscribe(room_b).await;

        registry.publish(room_b, RoomEvent::error("for b")).await;

        assert!(receiver_a.try_recv().is_err());
        assert_eq!(registry.room_count().await, 2);
    }

    #[tokio::test]
    async fn test_empty_room_is_pruned_on_publish() {
        let registry = RoomRegistry::new();
        let room = Uuid::now_v7();
        let receiver = registry.subscribe(room).await;
        assert_eq!(registry.subscriber_count(room).await, 1);

        drop(receiver);
        assert_eq!(registry.publish(room, RoomEvent::error("gone")).await, 0);
        assert_eq!(registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_close_room_ends_subscriptions() {
        let registry = RoomRegistry::new();
        let room = Uuid::now_v7();
        let mut receiver = registry.subscribe(room).await;

        assert!(registry.close_room(room).await);
        assert!(matches!(receiver.recv().await, Err(RecvError::Closed)));
        assert!(!registry.close_room(room).await);
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_concurrent_publishers_on_separate_rooms() {
        let registry = Arc::new(RoomRegistry::new());
        let rooms: Vec<Uuid> = (0..4).map(|_| Uuid::now_v7()).collect();

        let mut receivers = Vec::new();
        for room in &rooms {
            receivers.push(registry.subscribe(*room).await);
        }

        let handles: Vec<_> = rooms
            .iter()
            .map(|room| {
                let registry = registry.clone();
                let room = *room;
                tokio::spawn(async move {
                    for i in 0..10 {
                        registry
                            .publish(room, RoomEvent::error(format!("{room}:{i}")))
                            .await;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.expect("publisher task");
        }

        for (room, receiver) in rooms.iter().zip(receivers.iter_mut()) {
            for i in 0..10 {
                assert_eq!(
                    receiver.recv().await.expect("event"),
                    RoomEvent::error(format!("{room}:{i}"))
                );
            }
        }
    }
}
