//! Check-in relay.
//!
//! A check-in is published to the `Absensi` queue and drained back before it
//! is stored. The broker is an in-process, non-durable queue set created once
//! at startup and handed to the relay; nothing here survives a restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::attendance::Attendance;
use crate::utils::date;

pub const DEFAULT_QUEUE: &str = "Absensi";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("failed to publish to queue '{0}'")]
    Publish(String),

    #[error("queue '{0}' closed before a message arrived")]
    NoMessage(String),

    #[error("no message on queue '{queue}' within {millis} ms")]
    Timeout { queue: String, millis: u128 },

    #[error("failed to encode check-in: {0}")]
    Encode(String),

    #[error("failed to decode check-in: {0}")]
    Decode(String),
}

/// One message on a queue.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub correlation_id: Uuid,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

pub struct Queue {
    name: String,
    tx: UnboundedSender<Delivery>,
    rx: AsyncMutex<UnboundedReceiver<Delivery>>,
}

impl Queue {
    fn new(name: &str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            name: name.to_string(),
            tx,
            rx: AsyncMutex::new(rx),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn publish(&self, delivery: Delivery) -> Result<(), RelayError> {
        self.tx
            .send(delivery)
            .map_err(|_| RelayError::Publish(self.name.clone()))
    }
}

fn timed_out(queue: &str, budget: Duration) -> RelayError {
    RelayError::Timeout {
        queue: queue.to_string(),
        millis: budget.as_millis(),
    }
}

async fn receive(
    queue: &str,
    rx: &mut UnboundedReceiver<Delivery>,
    deadline: Instant,
    budget: Duration,
) -> Result<Delivery, RelayError> {
    match timeout_at(deadline, rx.recv()).await {
        Ok(Some(d)) => Ok(d),
        Ok(None) => Err(RelayError::NoMessage(queue.to_string())),
        Err(_) => Err(timed_out(queue, budget)),
    }
}

/// Process-wide set of named queues.
#[derive(Clone, Default)]
pub struct LocalBroker {
    queues: Arc<Mutex<HashMap<String, Arc<Queue>>>>,
}

impl LocalBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the queue called `name`, creating it on first use.
    pub fn declare(&self, name: &str) -> Arc<Queue> {
        let mut queues = match self.queues.lock() {
            Ok(q) => q,
            Err(poisoned) => poisoned.into_inner(),
        };
        queues
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Queue::new(name)))
            .clone()
    }
}

const JSON: &str = "application/json";

fn open_delivery(delivery: &Delivery) -> Result<Attendance, RelayError> {
    if delivery.content_type != JSON {
        return Err(RelayError::Decode(format!(
            "unexpected content type '{}'",
            delivery.content_type
        )));
    }
    serde_json::from_slice(&delivery.body).map_err(|e| RelayError::Decode(e.to_string()))
}

/// Publish-then-consume round trip for pending check-ins.
#[derive(Clone)]
pub struct AttendanceRelay {
    broker: LocalBroker,
    queue: String,
    timeout: Duration,
}

impl AttendanceRelay {
    pub fn new(broker: LocalBroker, queue: &str, timeout: Duration) -> Self {
        Self {
            broker,
            queue: queue.to_string(),
            timeout,
        }
    }

    /// Build a pending check-in for `employee_id` stamped with the current
    /// time, push it through the queue and return what came back.
    ///
    /// The consumer lock is held for the whole round trip, so concurrent
    /// check-ins cannot pick up each other's message.
    pub async fn submit_checkin(&self, employee_id: i64, name: &str) -> Result<Attendance, RelayError> {
        let pending = Attendance::pending(employee_id, name, date::now());
        let body = serde_json::to_vec(&pending).map_err(|e| RelayError::Encode(e.to_string()))?;

        let queue = self.broker.declare(&self.queue);
        let deadline = Instant::now() + self.timeout;

        // waiting for another round trip to finish counts against the budget
        let mut consumer = timeout_at(deadline, queue.rx.lock())
            .await
            .map_err(|_| timed_out(queue.name(), self.timeout))?;

        let correlation_id = Uuid::new_v4();
        queue.publish(Delivery {
            correlation_id,
            content_type: JSON,
            body,
        })?;
        debug!(queue = queue.name(), %correlation_id, employee_id, "check-in published");

        loop {
            let delivery = receive(queue.name(), &mut consumer, deadline, self.timeout).await?;

            if delivery.correlation_id != correlation_id {
                warn!(
                    queue = queue.name(),
                    stale = %delivery.correlation_id,
                    "discarding delivery from an earlier round trip"
                );
                continue;
            }

            return open_delivery(&delivery);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay(broker: &LocalBroker, millis: u64) -> AttendanceRelay {
        AttendanceRelay::new(broker.clone(), DEFAULT_QUEUE, Duration::from_millis(millis))
    }

    #[tokio::test]
    async fn round_trip_returns_the_published_record() {
        let broker = LocalBroker::new();
        let rec = relay(&broker, 500).submit_checkin(3, "Rina").await.unwrap();

        assert_eq!(rec.id, 0);
        assert_eq!(rec.employee_id, 3);
        assert_eq!(rec.name, "Rina");
        assert!(rec.is_open());
    }

    #[tokio::test]
    async fn stale_deliveries_are_skipped() {
        let broker = LocalBroker::new();
        let q = broker.declare(DEFAULT_QUEUE);
        q.publish(Delivery {
            correlation_id: Uuid::new_v4(),
            content_type: JSON,
            body: b"{}".to_vec(),
        })
        .unwrap();

        let rec = relay(&broker, 500).submit_checkin(5, "Agus").await.unwrap();
        assert_eq!(rec.employee_id, 5);
    }

    #[tokio::test]
    async fn busy_consumer_makes_checkin_time_out() {
        let broker = LocalBroker::new();
        let q = broker.declare(DEFAULT_QUEUE);
        let _held = q.rx.lock().await;

        let err = relay(&broker, 50).submit_checkin(1, "Tono").await.unwrap_err();
        assert_eq!(
            err,
            RelayError::Timeout {
                queue: DEFAULT_QUEUE.to_string(),
                millis: 50,
            }
        );
    }

    #[tokio::test]
    async fn closed_queue_is_an_error_not_a_default_record() {
        let broker = LocalBroker::new();
        broker.declare(DEFAULT_QUEUE).rx.lock().await.close();

        let err = relay(&broker, 200).submit_checkin(1, "Tono").await.unwrap_err();
        assert_eq!(err, RelayError::Publish(DEFAULT_QUEUE.to_string()));
    }

    #[test]
    fn undecodable_delivery_is_rejected() {
        let garbage = Delivery {
            correlation_id: Uuid::new_v4(),
            content_type: JSON,
            body: b"not json".to_vec(),
        };
        assert!(matches!(open_delivery(&garbage), Err(RelayError::Decode(_))));

        let wrong_type = Delivery {
            content_type: "text/plain",
            ..garbage
        };
        assert!(matches!(open_delivery(&wrong_type), Err(RelayError::Decode(_))));
    }
}
