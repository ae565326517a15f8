use tokio::sync::broadcast;
use tracing::debug;
use votes_shared::types::VoteEvent;

use crate::events::VoteEventSink;

const DEFAULT_CAPACITY: usize = 1024;

/// Publishes vote events on a `tokio::sync::broadcast` channel.
///
/// Every subscriber receives every event sent after it subscribed. A
/// subscriber that falls more than `capacity` events behind skips the
/// oldest ones and observes `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct BroadcastEventSink {
    sender: broadcast::Sender<VoteEvent>,
}

impl BroadcastEventSink {
    /// Creates a sink buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VoteEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl VoteEventSink for BroadcastEventSink {
    fn dispatch(&self, event: VoteEvent) {
        match self.sender.send(event) {
            Ok(receivers) => debug!(receivers, "Vote event dispatched"),
            Err(broadcast::error::SendError(event)) => {
                debug!(vote_id = event.vote().id, "Vote event dropped, no subscribers")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use votes_shared::types::{VotableRef, Vote, VoteItem};

    fn make_event() -> VoteEvent {
        VoteEvent::Voted(Vote {
            id: 1,
            voter_id: 1,
            votable: VotableRef::new("posts", 1),
            vote_type: VoteItem::Up,
            created_at: OffsetDateTime::UNIX_EPOCH,
        })
    }

    #[test]
    fn test_dispatch_without_subscribers_is_silent() {
        let sink = BroadcastEventSink::default();
        sink.dispatch(make_event());
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let sink = BroadcastEventSink::new(8);
        let mut first = sink.subscribe();
        let mut second = sink.subscribe();

        sink.dispatch(make_event());

        assert_eq!(first.recv().await.unwrap(), make_event());
        assert_eq!(second.recv().await.unwrap(), make_event());
    }

    #[tokio::test]
    async fn test_lagging_subscriber_does_not_block_dispatch() {
        let sink = BroadcastEventSink::new(1);
        let mut receiver = sink.subscribe();

        sink.dispatch(make_event());
        sink.dispatch(make_event());

        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(receiver.recv().await.unwrap(), make_event());
    }
}
