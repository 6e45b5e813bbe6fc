//! In-process event bus feeding the `Link` subscription.
//!
//! Publishing is fire-and-forget: events sent while nobody listens are
//! dropped, and a slow subscriber that falls more than `capacity` events
//! behind skips the ones it missed.

use {
    async_graphql::Enum,
    hackernews_store::Link,
    tokio::sync::broadcast::{self, error::RecvError},
    tokio_util::sync::CancellationToken,
    tracing::{debug, warn},
};

/// Kind of write an event reports.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[graphql(name = "_ModelMutationType")]
pub enum MutationType {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone)]
pub struct LinkEvent {
    pub mutation: MutationType,
    pub node: Link,
}

impl LinkEvent {
    pub fn created(node: Link) -> Self {
        Self {
            mutation: MutationType::Created,
            node,
        }
    }
}

/// Broadcast channel for link mutations with an explicit shutdown.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LinkEvent>,
    closed: CancellationToken,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            closed: CancellationToken::new(),
        }
    }

    /// Deliver `event` to every current subscriber, returning how many.
    pub fn publish(&self, event: LinkEvent) -> usize {
        if self.closed.is_cancelled() {
            return 0;
        }
        match self.tx.send(event) {
            Ok(reached) => {
                debug!(subscribers = reached, "published link event");
                reached
            },
            Err(_) => {
                debug!("published link event with no subscribers");
                0
            },
        }
    }

    pub fn subscribe(&self) -> LinkEvents {
        LinkEvents {
            rx: self.tx.subscribe(),
            closed: self.closed.clone(),
        }
    }

    /// Number of live subscriptions.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// End every open subscription. Later publishes reach nobody.
    pub fn close(&self) {
        self.closed.cancel();
    }
}

/// One subscriber's queue. Dropping it deregisters from the bus.
pub struct LinkEvents {
    rx: broadcast::Receiver<LinkEvent>,
    closed: CancellationToken,
}

impl LinkEvents {
    /// Next event, or `None` once the bus is closed.
    pub async fn recv(&mut self) -> Option<LinkEvent> {
        loop {
            tokio::select! {
                biased;
                () = self.closed.cancelled() => return None,
                received = self.rx.recv() => match received {
                    Ok(event) => return Some(event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "link subscriber lagged, events dropped");
                    },
                    Err(RecvError::Closed) => return None,
                },
            }
        }
    }
}
