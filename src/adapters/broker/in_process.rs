//! In-process broker for single-node deployments.
//!
//! Local consumers (typically WebSocket sessions) attach to an exact
//! destination address and get a `broadcast::Receiver`. Dropping the receiver
//! is the only way to detach; the registry notices on its own.
//!
//! Everything lives behind one `RwLock<HashMap<destination, Sender>>`, so
//! there is no lock ordering to get wrong. A destination whose senders have
//! no receivers left is pruned:
//! - on `send`, for that destination (re-checked under the write lock)
//! - on `subscribe`, for every idle destination

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use crate::domain::notification::NotificationEnvelope;
use crate::ports::{BrokerError, MessageBroker};

type Registry = HashMap<String, broadcast::Sender<NotificationEnvelope>>;

/// Broadcast fan-out keyed by destination address.
pub struct InProcessBroker {
    destinations: RwLock<Registry>,
    channel_capacity: usize,
}

impl InProcessBroker {
    /// Create a broker whose per-destination channels hold `channel_capacity`
    /// envelopes. Slow receivers lag and miss the oldest ones.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            destinations: RwLock::new(HashMap::new()),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Attach a receiver to `destination`.
    pub async fn subscribe(&self, destination: &str) -> broadcast::Receiver<NotificationEnvelope> {
        let mut destinations = self.destinations.write().await;
        prune_idle(&mut destinations);

        destinations
            .entry(destination.to_string())
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0)
            .subscribe()
    }

    /// Live receivers on `destination`.
    pub async fn receiver_count(&self, destination: &str) -> usize {
        self.destinations
            .read()
            .await
            .get(destination)
            .map_or(0, |sender| sender.receiver_count())
    }

    /// Destinations currently held in the registry, idle ones included until
    /// the next prune.
    pub async fn destination_count(&self) -> usize {
        self.destinations.read().await.len()
    }

    async fn forget_if_idle(&self, destination: &str) {
        let mut destinations = self.destinations.write().await;
        let idle = destinations
            .get(destination)
            .is_some_and(|sender| sender.receiver_count() == 0);
        if idle {
            destinations.remove(destination);
            tracing::trace!(destination, "Pruned idle in-process destination");
        }
    }
}

impl Default for InProcessBroker {
    fn default() -> Self {
        Self::new(crate::config::NotificationConfig::default().channel_capacity)
    }
}

fn prune_idle(destinations: &mut Registry) {
    destinations.retain(|_, sender| sender.receiver_count() > 0);
}

#[async_trait]
impl MessageBroker for InProcessBroker {
    /// Sends to a destination nobody listens on are dropped silently.
    async fn send(&self, destination: &str, envelope: &NotificationEnvelope) -> Result<(), BrokerError> {
        let delivered = {
            let destinations = self.destinations.read().await;
            match destinations.get(destination) {
                Some(sender) => sender.send(envelope.clone()).ok(),
                None => {
                    tracing::trace!(destination, "No local receivers for destination");
                    return Ok(());
                }
            }
        };

        match delivered {
            Some(receivers) => {
                tracing::trace!(destination, receivers, "Delivered notification in process");
            }
            None => self.forget_if_idle(destination).await,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn envelope(event: &str) -> NotificationEnvelope {
        NotificationEnvelope::new(event, "{\"caseNumber\":\"C-1\"}")
    }

    #[tokio::test]
    async fn receiver_gets_envelope_sent_to_its_destination() {
        let broker = InProcessBroker::default();
        let mut rx = broker.subscribe("/topic/cases").await;

        broker.send("/topic/cases", &envelope("case.created")).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().event, "case.created");
    }

    #[tokio::test]
    async fn every_receiver_on_a_destination_gets_the_envelope() {
        let broker = InProcessBroker::default();
        let mut first = broker.subscribe("/topic/cases").await;
        let mut second = broker.subscribe("/topic/cases").await;

        broker.send("/topic/cases", &envelope("case.updated")).await.unwrap();

        assert!(first.recv().await.is_ok());
        assert!(second.recv().await.is_ok());
        assert_eq!(broker.receiver_count("/topic/cases").await, 2);
    }

    #[tokio::test]
    async fn other_destinations_do_not_receive() {
        let broker = InProcessBroker::default();
        let mut cases = broker.subscribe("/topic/cases").await;
        let mut user = broker.subscribe("/user/7/queue/notifications").await;

        broker.send("/topic/cases", &envelope("case.created")).await.unwrap();

        assert!(cases.recv().await.is_ok());
        assert!(matches!(
            user.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn send_without_receivers_is_ok_and_registers_nothing() {
        let broker = InProcessBroker::default();

        let result = broker.send("/topic/notifications", &envelope("noop")).await;

        assert!(result.is_ok());
        assert_eq!(broker.destination_count().await, 0);
    }

    #[tokio::test]
    async fn send_prunes_destination_whose_receivers_are_gone() {
        let broker = InProcessBroker::default();
        drop(broker.subscribe("/topic/cases").await);
        assert_eq!(broker.destination_count().await, 1);

        assert!(broker.send("/topic/cases", &envelope("late")).await.is_ok());

        assert_eq!(broker.destination_count().await, 0);
    }

    #[tokio::test]
    async fn subscribe_prunes_other_idle_destinations() {
        let broker = InProcessBroker::default();
        drop(broker.subscribe("/user/1/queue/notifications").await);
        drop(broker.subscribe("/user/2/queue/notifications").await);

        let _rx = broker.subscribe("/topic/cases").await;

        assert_eq!(broker.destination_count().await, 1);
        assert_eq!(broker.receiver_count("/topic/cases").await, 1);
    }

    #[tokio::test]
    async fn resubscribing_after_idle_keeps_the_new_receiver_open() {
        let broker = InProcessBroker::default();
        drop(broker.subscribe("/topic/cases").await);
        let mut rx = broker.subscribe("/topic/cases").await;

        broker.send("/topic/cases", &envelope("case.created")).await.unwrap();
        broker.send("/topic/cases", &envelope("case.updated")).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().event, "case.created");
        assert_eq!(rx.recv().await.unwrap().event, "case.updated");
        assert_eq!(broker.destination_count().await, 1);
    }

    #[tokio::test]
    async fn idle_check_does_not_remove_a_destination_that_regained_a_receiver() {
        let broker = InProcessBroker::default();
        let _rx = broker.subscribe("/topic/cases").await;

        broker.forget_if_idle("/topic/cases").await;

        assert_eq!(broker.receiver_count("/topic/cases").await, 1);
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped() {
        let broker = InProcessBroker::new(0);
        let mut rx = broker.subscribe("/topic/cases").await;

        broker.send("/topic/cases", &envelope("case.created")).await.unwrap();

        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_subscribe_drop_and_send_make_progress() {
        let broker = Arc::new(InProcessBroker::default());

        let workers: Vec<_> = (0..8)
            .map(|i| {
                let broker = broker.clone();
                tokio::spawn(async move {
                    let destination = format!("/user/{}/queue/notifications", i % 3);
                    for _ in 0..2_000 {
                        let rx = broker.subscribe(&destination).await;
                        broker.send(&destination, &envelope("case.assigned")).await.unwrap();
                        drop(rx);
                        broker.send(&destination, &envelope("case.updated")).await.unwrap();
                    }
                })
            })
            .collect();

        let all = async {
            for worker in workers {
                worker.await.unwrap();
            }
        };
        tokio::time::timeout(Duration::from_secs(20), all)
            .await
            .expect("in-process broker stalled under concurrent use");

        drop(broker.subscribe("/topic/cases").await);
        assert_eq!(broker.destination_count().await, 1);
    }
}
