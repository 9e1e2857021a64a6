use std::sync::Arc;

use agora_core::{DialogueTurn, TurnObserver};
use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::{RoomEvent, RoomRegistry};

/// Publishes every dialogue turn to one room as it is produced.
#[derive(Debug, Clone)]
pub struct RoomObserver {
    registry: Arc<RoomRegistry>,
    room_id: Uuid,
}

impl RoomObserver {
    #[must_use]
    pub const fn new(registry: Arc<RoomRegistry>, room_id: Uuid) -> Self {
        Self { registry, room_id }
    }

    #[must_use]
    pub const fn room_id(&self) -> Uuid {
        self.room_id
    }
}

#[async_trait]
impl TurnObserver for RoomObserver {
    async fn on_turn(&self, turn: &DialogueTurn) {
        let delivered = self
            .registry
            .publish(self.room_id, RoomEvent::from(turn))
            .await;
        debug!(
            "Turn {} from {} delivered to {delivered} subscriber(s) in room {}",
            turn.sequence_index, turn.speaker, self.room_id
        );
    }
}
