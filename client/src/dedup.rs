use crate::events::Stream;
use janken_types::{Identity, SettlementEvent};
use tracing::{debug, info, warn};

/// How a broadcast settlement was classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    /// Originated by this session; already applied when the controller
    /// resolved the round, so the broadcast copy is discarded.
    OwnRound,
    /// Another party's round; forwarded to the observer only, never to
    /// score or history.
    PeerRound,
}

/// Screens the broadcast settlement feed against the session identity.
///
/// The feed carries every settled round, addressed to no one in particular;
/// without this filter the session's own rounds would be counted twice. The
/// comparison is case-insensitive (see [`Identity`]). Build a fresh
/// deduplicator and a fresh subscription whenever the identity changes, so
/// stale comparisons cannot occur.
pub struct Deduplicator {
    identity: Identity,
    observer: Box<dyn Fn(&SettlementEvent) + Send + Sync>,
}

impl Deduplicator {
    /// Screen against `identity`, logging peer rounds.
    pub fn new(identity: Identity) -> Self {
        Self::with_observer(identity, |event: &SettlementEvent| {
            info!(origin = %event.origin, result = %event.result, "another player's round settled");
        })
    }

    /// Screen against `identity`, forwarding peer rounds to `observer`.
    pub fn with_observer(
        identity: Identity,
        observer: impl Fn(&SettlementEvent) + Send + Sync + 'static,
    ) -> Self {
        Self {
            identity,
            observer: Box::new(observer),
        }
    }

    /// Classify one broadcast settlement.
    pub fn observe(&self, event: &SettlementEvent) -> Observation {
        if event.origin == self.identity {
            debug!(settlement = %event.settlement, "discarding own settlement broadcast");
            return Observation::OwnRound;
        }
        (self.observer)(event);
        Observation::PeerRound
    }

    /// Drain a settlement feed until it closes, screening every event.
    /// Decode failures are logged and skipped; they carry no identity to
    /// compare against.
    pub async fn run(&self, feed: &mut Stream<SettlementEvent>) {
        while let Some(event) = feed.next().await {
            match event {
                Ok(event) => {
                    self.observe(&event);
                }
                Err(err) => {
                    warn!(error = %err, "settlement feed error");
                }
            }
        }
    }
}
