use crate::game::{Identity, Outcome, SettlementId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phrases the settlement service uses to describe a player victory.
const PLAYER_WIN_PHRASES: [&str; 2] = ["player wins", "you win"];

/// Phrases the settlement service uses to describe an opponent victory.
const OPPONENT_WIN_PHRASES: [&str; 2] = ["computer wins", "lose"];

/// Body of a round submission to the settlement service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub player: Identity,
    #[serde(rename = "move")]
    pub mv: u8,
    pub stake: u64,
}

/// Acknowledgement of an accepted submission, before settlement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub settlement: SettlementId,
}

/// A settled round as broadcast by the settlement service.
///
/// Moves are raw wire codes here; decode them with
/// [`WireMove::decode`](crate::game::WireMove::decode), which is total. The
/// free-text `result` is what carries the authoritative outcome; classify it
/// with [`OutcomeClassifier`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementEvent {
    pub origin: Identity,
    pub player_move: u8,
    pub opponent_move: u8,
    pub result: String,
    pub settlement: SettlementId,
}

impl SettlementEvent {
    /// Parse a settlement payload. A payload missing a required field is
    /// reported with the field name, never a panic.
    pub fn from_json(data: &[u8]) -> Result<Self, SettlementParseError> {
        serde_json::from_slice(data).map_err(|err| SettlementParseError {
            reason: err.to_string(),
        })
    }
}

/// Response to polling a settlement id: either the settlement itself or an
/// explicit post-acceptance rejection.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum SettlementPoll {
    Rejected(RejectedSettlement),
    Settled(SettlementEvent),
}

#[derive(Clone, Debug, Deserialize)]
pub struct RejectedSettlement {
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed settlement: {reason}")]
pub struct SettlementParseError {
    pub reason: String,
}

/// Policy for result text that matches no known phrase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnrecognizedOutcome {
    /// Score the round as a draw (neither counter moves).
    #[default]
    Draw,
    /// Surface the unrecognized text as an error.
    Reject,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized settlement result: {text:?}")]
pub struct UnrecognizedResult {
    pub text: String,
}

/// Deterministic classifier over the service's free-text result description.
///
/// Recognition is case-insensitive substring matching against a small fixed
/// vocabulary; player-victory phrases are checked first. Everything else
/// falls back per [`UnrecognizedOutcome`].
#[derive(Clone, Copy, Debug, Default)]
pub struct OutcomeClassifier {
    pub on_unrecognized: UnrecognizedOutcome,
}

impl OutcomeClassifier {
    pub fn new(on_unrecognized: UnrecognizedOutcome) -> Self {
        Self { on_unrecognized }
    }

    pub fn classify(&self, text: &str) -> Result<Outcome, UnrecognizedResult> {
        let lowered = text.to_lowercase();
        if PLAYER_WIN_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
            return Ok(Outcome::PlayerWins);
        }
        if OPPONENT_WIN_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
            return Ok(Outcome::ComputerWins);
        }
        match self.on_unrecognized {
            UnrecognizedOutcome::Draw => Ok(Outcome::Draw),
            UnrecognizedOutcome::Reject => Err(UnrecognizedResult {
                text: text.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_player_win_variants() {
        let classifier = OutcomeClassifier::default();
        for text in ["Player wins!", "PLAYER WINS", "player wins.", "You win!", "you WIN"] {
            assert_eq!(classifier.classify(text), Ok(Outcome::PlayerWins), "{text:?}");
        }
    }

    #[test]
    fn test_classify_opponent_win_variants() {
        let classifier = OutcomeClassifier::default();
        for text in ["Computer wins!", "You lose.", "YOU LOSE", "computer WINS..."] {
            assert_eq!(classifier.classify(text), Ok(Outcome::ComputerWins), "{text:?}");
        }
    }

    #[test]
    fn test_classify_draw_and_fallback() {
        let classifier = OutcomeClassifier::default();
        assert_eq!(classifier.classify("It's a draw."), Ok(Outcome::Draw));
        // Unrecognized text defaults to the draw-equivalent no-op.
        assert_eq!(classifier.classify("garbage"), Ok(Outcome::Draw));
        assert_eq!(classifier.classify(""), Ok(Outcome::Draw));
    }

    #[test]
    fn test_classify_reject_policy() {
        let classifier = OutcomeClassifier::new(UnrecognizedOutcome::Reject);
        assert_eq!(classifier.classify("Player wins!"), Ok(Outcome::PlayerWins));
        let err = classifier.classify("garbage").unwrap_err();
        assert_eq!(err.text, "garbage");
    }

    #[test]
    fn test_settlement_event_parse() {
        let data = br#"{
            "origin": "0xAbC",
            "player_move": 0,
            "opponent_move": 2,
            "result": "Player wins!",
            "settlement": "0xdeadbeef"
        }"#;
        let event = SettlementEvent::from_json(data).unwrap();
        assert_eq!(event.origin, Identity::new("0xabc"));
        assert_eq!(event.player_move, 0);
        assert_eq!(event.opponent_move, 2);
        assert_eq!(event.settlement, SettlementId("0xdeadbeef".to_string()));
    }

    #[test]
    fn test_settlement_event_parse_reports_missing_field() {
        let data = br#"{"origin": "0xabc", "player_move": 0, "opponent_move": 2}"#;
        let err = SettlementEvent::from_json(data).unwrap_err();
        assert!(err.reason.contains("result"), "unexpected reason: {}", err.reason);
    }

    #[test]
    fn test_settlement_poll_shapes() {
        let settled = br#"{
            "origin": "0xabc",
            "player_move": 1,
            "opponent_move": 1,
            "result": "It's a draw.",
            "settlement": "s-1"
        }"#;
        assert!(matches!(
            serde_json::from_slice::<SettlementPoll>(settled).unwrap(),
            SettlementPoll::Settled(_)
        ));

        let rejected = br#"{"status": "rejected", "reason": "insufficient funds"}"#;
        let SettlementPoll::Rejected(rejection) =
            serde_json::from_slice::<SettlementPoll>(rejected).unwrap()
        else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.reason.as_deref(), Some("insufficient funds"));
    }
}
