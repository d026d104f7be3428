//! Tree-change notifications.
//!
//! The host fires a notification after every edit. Subscribers receive them over a channel and
//! drain it from the event loop, so a burst of edits collapses into a single refresh.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// A tree edit happened somewhere in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeChanged {
    /// Monotonic sequence number assigned by the dispatcher.
    pub seq: u64,
}

/// A live subscription to tree-change notifications.
///
/// Dropping the subscription disconnects it; the dispatcher prunes it on the next notify.
#[derive(Debug)]
pub struct Subscription {
    /// Dispatcher-assigned id, used to unsubscribe.
    id: u64,
    /// Receiving end of the notification channel.
    receiver: Receiver<TreeChanged>,
}

impl Subscription {
    /// The dispatcher-assigned id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Takes every pending notification, returning the most recent one.
    pub fn drain(&self) -> Option<TreeChanged> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => latest = Some(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return latest,
            }
        }
    }
}

/// Subscribe/unsubscribe side of the change feed.
pub trait ChangeFeed {
    /// Registers a new subscriber.
    fn subscribe(&mut self) -> Subscription;

    /// Stops delivering notifications to `subscription`.
    fn unsubscribe(&mut self, subscription: &Subscription);
}

/// Fan-out of notifications to all current subscribers.
#[derive(Debug, Default)]
pub struct ChangeDispatcher {
    /// Id for the next subscriber.
    next_id: u64,
    /// Sequence number for the next notification.
    next_seq: u64,
    /// Live subscribers.
    senders: Vec<(u64, Sender<TreeChanged>)>,
}

impl ChangeDispatcher {
    /// Creates a dispatcher with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber and returns its receiving end.
    pub fn subscribe(&mut self) -> Subscription {
        let (sender, receiver) = mpsc::channel();
        let id = self.next_id;
        self.next_id += 1;
        self.senders.push((id, sender));
        Subscription { id, receiver }
    }

    /// Removes the subscriber with the given id.
    pub fn unsubscribe(&mut self, id: u64) {
        self.senders.retain(|(sid, _)| *sid != id);
    }

    /// Sends a notification to every subscriber, dropping the ones that hung up.
    pub fn notify(&mut self) -> TreeChanged {
        let event = TreeChanged { seq: self.next_seq };
        self.next_seq += 1;
        self.senders.retain(|(_, sender)| sender.send(event).is_ok());
        event
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}
