//! Sync broadcaster - fan-out of change notifications to WebSocket clients
//!
//! One broadcast channel carries every notification; each socket task
//! filters to the encounters its client watches. Send is fire-and-forget:
//! with no watchers connected the send simply finds no receivers, and a
//! lagged receiver drops old signals and re-fetches on the next one.

use tokio::sync::broadcast;

use crate::application::ports::outbound::{ChangeNotification, ChangeNotifierPort, ChangeTopic};
use crate::domain::value_objects::EncounterId;

const CHANNEL_CAPACITY: usize = 256;

pub struct SyncBroadcaster {
    tx: broadcast::Sender<ChangeNotification>,
}

impl SyncBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// A fresh receiver for one socket task.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeNotification> {
        self.tx.subscribe()
    }
}

impl Default for SyncBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifierPort for SyncBroadcaster {
    fn notify(&self, encounter_id: EncounterId, topic: ChangeTopic) {
        let notification = ChangeNotification {
            encounter_id,
            topic,
        };
        // Err means no live receivers, which is fine.
        let delivered = self.tx.send(notification).unwrap_or(0);
        tracing::trace!(
            encounter_id = %encounter_id,
            ?topic,
            delivered,
            "Change notification"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_notifications() {
        let broadcaster = SyncBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        let encounter_id = EncounterId::new();
        broadcaster.notify(encounter_id, ChangeTopic::Combatants);

        let received = rx.recv().await.expect("notification arrives");
        assert_eq!(received.encounter_id, encounter_id);
        assert_eq!(received.topic, ChangeTopic::Combatants);
    }

    #[tokio::test]
    async fn notify_without_subscribers_is_silent() {
        let broadcaster = SyncBroadcaster::new();
        // Must not panic or error.
        broadcaster.notify(EncounterId::new(), ChangeTopic::Encounter);
    }
}
