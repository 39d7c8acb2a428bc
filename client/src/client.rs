use crate::{events::Stream, Error, Result};
use janken_types::{
    settle::{SettlementParseError, SettlementPoll, SubmitRequest, SubmitResponse},
    Identity, Move, SettlementEvent, SettlementId,
};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// How often [`Client::wait_for_settlement`] polls by default.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Terminal lifecycle state of a submitted move.
///
/// A submission is pending from the moment the POST is accepted until the
/// service settles or rejects it, or the configured wait elapses. Exactly one
/// of these is returned per submission; none of them imply any local state
/// change on their own.
#[derive(Clone, Debug)]
pub enum Settlement {
    /// The service produced the authoritative outcome and both moves.
    Settled(SettlementEvent),
    /// Declined by the service or the user before settlement.
    Rejected { reason: String },
    /// No terminal state observed within the allotted wait. Never retried
    /// silently: the submission may still settle later, and resubmitting
    /// would double-play the stake.
    TimedOut { waited: Duration },
}

/// HTTP/WebSocket client for the external settlement service.
pub struct Client {
    client: reqwest::Client,
    pub base_url: Url,
    identity: Identity,
    poll_interval: Duration,
}

impl Client {
    pub fn new(base_url: &str, identity: Identity) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => return Err(Error::InvalidScheme(scheme.to_string())),
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            identity,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// The identity this client submits under.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Submit one move with its stake. Exactly one outbound POST per call;
    /// there is deliberately no retry here, since replaying an ambiguous
    /// failure could double-play the stake on the service.
    pub async fn submit_move(&self, mv: Move, stake: u64) -> Result<SubmitResponse> {
        let url = self.base_url.join("rounds")?;
        let request = SubmitRequest {
            player: self.identity.clone(),
            mv: mv.wire(),
            stake,
        };
        debug!(%url, mv = %mv, stake, "submitting move");
        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body, "submission refused");
            return Err(Error::FailedWithBody { status, body });
        }
        let receipt: SubmitResponse = response.json().await?;
        info!(settlement = %receipt.settlement, "move submitted");
        Ok(receipt)
    }

    /// One poll of a settlement id. `None` means still pending.
    pub async fn poll_settlement(&self, id: &SettlementId) -> Result<Option<SettlementPoll>> {
        let url = self.base_url.join(&format!("settlements/{id}"))?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Failed(status));
        }
        // A settlement missing required fields is a parse failure, not a
        // transport error.
        let body = response.bytes().await?;
        let poll = serde_json::from_slice::<SettlementPoll>(&body).map_err(|err| {
            Error::InvalidData(SettlementParseError {
                reason: err.to_string(),
            })
        })?;
        Ok(Some(poll))
    }

    /// Poll until the submission reaches a terminal state or `wait` elapses.
    /// Cancel-safe: abandoning this future leaves no local state behind, and
    /// the settlement (if any) still reaches the broadcast feed.
    pub async fn wait_for_settlement(
        &self,
        id: &SettlementId,
        wait: Duration,
    ) -> Result<Settlement> {
        let deadline = Instant::now() + wait;
        loop {
            match self.poll_settlement(id).await? {
                Some(SettlementPoll::Settled(event)) => {
                    info!(settlement = %id, result = %event.result, "settled");
                    return Ok(Settlement::Settled(event));
                }
                Some(SettlementPoll::Rejected(rejection)) => {
                    let reason = rejection
                        .reason
                        .unwrap_or_else(|| rejection.status.clone());
                    warn!(settlement = %id, reason, "rejected by service");
                    return Ok(Settlement::Rejected { reason });
                }
                None => {}
            }
            if Instant::now() + self.poll_interval > deadline {
                warn!(settlement = %id, ?wait, "no settlement within wait");
                return Ok(Settlement::TimedOut { waited: wait });
            }
            sleep(self.poll_interval).await;
        }
    }

    /// Submit a move and wait for its terminal lifecycle state. A refusal at
    /// the POST itself (4xx) folds into [`Settlement::Rejected`]; transport
    /// failures surface as errors.
    pub async fn play_remote(&self, mv: Move, stake: u64, wait: Duration) -> Result<Settlement> {
        let receipt = match self.submit_move(mv, stake).await {
            Ok(receipt) => receipt,
            Err(Error::FailedWithBody { status, body }) if status.is_client_error() => {
                return Ok(Settlement::Rejected { reason: body });
            }
            Err(err) => return Err(err),
        };
        self.wait_for_settlement(&receipt.settlement, wait).await
    }

    /// Subscribe to the service's broadcast settlement feed. The feed carries
    /// every settled round, this session's own included; screen it with
    /// [`Deduplicator`](crate::Deduplicator). Re-establish the subscription
    /// whenever the connection or identity changes.
    pub async fn connect_settlements(&self) -> Result<Stream<SettlementEvent>> {
        let http_url = self.base_url.join("ws/settlements")?;
        let scheme = if http_url.scheme() == "https" { "wss" } else { "ws" };
        // Url::set_scheme refuses http -> ws; rebuild the URL as text.
        let ws_url = Url::parse(&http_url.as_str().replacen(http_url.scheme(), scheme, 1))?;
        debug!(%ws_url, "connecting settlement feed");
        let (ws, _) = tokio_tungstenite::connect_async(ws_url.as_str()).await?;
        Ok(Stream::new(ws))
    }
}
