use crate::{client::Settlement, Client};
use janken_engine::{draw_opponent, Session};
use janken_types::{
    Move, OutcomeClassifier, Round, SettlementEvent, WireMove, DEFAULT_STAKE,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default wait for a remote settlement before the round is abandoned.
const DEFAULT_SETTLE_WAIT: Duration = Duration::from_secs(60);

/// Why a round produced no result. Every variant leaves the controller idle
/// with score and history untouched.
#[derive(Error, Debug)]
pub enum RoundError {
    #[error("submission rejected: {reason}")]
    SubmissionRejected { reason: String },
    #[error("no settlement observed within {waited:?}")]
    SettlementTimeout { waited: Duration },
    #[error("malformed settlement: {reason}")]
    MalformedSettlement { reason: String },
    #[error("a round is already in flight")]
    RoundInFlight,
    #[error("settlement service unavailable: {0}")]
    RemoteUnavailable(#[source] crate::Error),
}

impl RoundError {
    /// Fold a transport-level error into the round taxonomy: an explicit
    /// client-error refusal is a rejection, everything else means the
    /// service could not be reached or answered garbage.
    fn from_transport(err: crate::Error) -> Self {
        match err {
            crate::Error::FailedWithBody { status, body } if status.is_client_error() => {
                Self::SubmissionRejected { reason: body }
            }
            crate::Error::InvalidData(parse) => Self::MalformedSettlement {
                reason: parse.reason,
            },
            other => Self::RemoteUnavailable(other),
        }
    }
}

/// Orchestrates one round end-to-end: `Idle -> AwaitingResult -> Resolved |
/// Failed -> Idle`.
///
/// The controller picks the local or remote path off the session's
/// [`ConnectionState`], resolves the round, and applies the result to the
/// session exactly once. Only one round may be in flight at a time;
/// [`RoundController::play`] fails synchronously with
/// [`RoundError::RoundInFlight`] otherwise.
pub struct RoundController<R: Rng = StdRng> {
    session: Session,
    client: Option<Client>,
    classifier: OutcomeClassifier,
    settle_wait: Duration,
    stake: u64,
    rng: R,
    in_flight: Arc<AtomicBool>,
}

/// Clears the in-flight flag when a round ends, including when the caller
/// abandons the `play` future mid-wait.
struct FlightGuard(Arc<AtomicBool>);

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl RoundController<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for RoundController<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RoundController<R> {
    /// Build a controller over an explicit RNG (seeded in tests).
    pub fn with_rng(rng: R) -> Self {
        Self {
            session: Session::new(),
            client: None,
            classifier: OutcomeClassifier::default(),
            settle_wait: DEFAULT_SETTLE_WAIT,
            stake: DEFAULT_STAKE,
            rng,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_classifier(mut self, classifier: OutcomeClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_settle_wait(mut self, settle_wait: Duration) -> Self {
        self.settle_wait = settle_wait;
        self
    }

    pub fn with_stake(mut self, stake: u64) -> Self {
        self.stake = stake;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Switch to remote play under the client's identity. The handshake
    /// itself (wallet, keys) is the caller's concern; by the time a client
    /// exists it carries an authorized identity.
    pub fn connect(&mut self, client: Client) {
        self.session.connect(client.identity().clone());
        self.client = Some(client);
    }

    /// React to a network or chain change: back to local play until the
    /// caller reconnects with a fresh client.
    pub fn on_network_changed(&mut self) {
        self.session.on_network_changed();
        self.client = None;
    }

    /// Play one round with the given move. On success the resolved round has
    /// already been applied to score and history, exactly once; on failure
    /// nothing was mutated and the controller is idle again.
    pub async fn play(&mut self, mv: Move) -> Result<Round, RoundError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            warn!(mv = %mv, "rejecting play: round already in flight");
            return Err(RoundError::RoundInFlight);
        }
        let _guard = FlightGuard(self.in_flight.clone());

        let round = self.resolve(mv).await?;
        info!(transcript = %round.transcript(), origin = ?round.origin, "round resolved");
        self.session.apply_round(round.clone());
        Ok(round)
    }

    async fn resolve(&mut self, mv: Move) -> Result<Round, RoundError> {
        if !self.session.connection().is_remote() {
            let opponent = draw_opponent(&mut self.rng);
            debug!(player = %mv, opponent = %opponent, "resolving locally");
            return Ok(Round::local(mv, opponent));
        }

        let Some(client) = self.client.as_ref() else {
            return Err(RoundError::RemoteUnavailable(crate::Error::NotConnected));
        };
        let settlement = client
            .play_remote(mv, self.stake, self.settle_wait)
            .await
            .map_err(RoundError::from_transport)?;
        match settlement {
            Settlement::Settled(event) => self.round_from_event(event),
            Settlement::Rejected { reason } => Err(RoundError::SubmissionRejected { reason }),
            Settlement::TimedOut { waited } => Err(RoundError::SettlementTimeout { waited }),
        }
    }

    /// Build the round from a settlement. The service's result text is the
    /// authoritative outcome for remote rounds; the moves are decoded
    /// totally, so an out-of-range move byte degrades to `Unknown` instead
    /// of failing the round.
    fn round_from_event(&self, event: SettlementEvent) -> Result<Round, RoundError> {
        let outcome = self
            .classifier
            .classify(&event.result)
            .map_err(|err| RoundError::MalformedSettlement {
                reason: err.to_string(),
            })?;
        Ok(Round::remote(
            WireMove::decode(event.player_move),
            WireMove::decode(event.opponent_move),
            outcome,
            event.settlement,
        ))
    }

    #[cfg(test)]
    pub(crate) fn force_in_flight(&self) {
        self.in_flight.store(true, Ordering::SeqCst);
    }
}
