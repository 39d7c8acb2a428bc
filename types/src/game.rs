use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Wire codes for the three moves, as the settlement service encodes them.
pub const WIRE_ROCK: u8 = 0;
pub const WIRE_PAPER: u8 = 1;
pub const WIRE_SCISSORS: u8 = 2;

/// A move in a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Move {
    Rock = WIRE_ROCK,
    Paper = WIRE_PAPER,
    Scissors = WIRE_SCISSORS,
}

/// All moves, in wire-code order.
pub const MOVES: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

impl Move {
    /// The numeric encoding the settlement service uses for this move.
    pub fn wire(&self) -> u8 {
        *self as u8
    }

    /// Strict decoding of a wire code. For the total decoding used on
    /// settlement payloads, see [`WireMove::decode`].
    pub fn from_wire(code: u8) -> Option<Self> {
        match code {
            WIRE_ROCK => Some(Self::Rock),
            WIRE_PAPER => Some(Self::Paper),
            WIRE_SCISSORS => Some(Self::Scissors),
            _ => None,
        }
    }

    /// The one move this move beats.
    pub fn beats(&self) -> Move {
        match self {
            Self::Rock => Self::Scissors,
            Self::Scissors => Self::Paper,
            Self::Paper => Self::Rock,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Self::Rock => "Rock",
            Self::Paper => "Paper",
            Self::Scissors => "Scissors",
        };
        write!(f, "{word}")
    }
}

/// Total decoding of a move as it appears on the wire. Codes outside the
/// known set are carried as `Unknown` rather than rejected, so a malformed
/// move byte never aborts processing of an otherwise valid settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireMove {
    Move(Move),
    Unknown(u8),
}

impl WireMove {
    /// Decode a wire code. Total: never fails.
    pub fn decode(code: u8) -> Self {
        match Move::from_wire(code) {
            Some(mv) => Self::Move(mv),
            None => Self::Unknown(code),
        }
    }

    pub fn as_move(&self) -> Option<Move> {
        match self {
            Self::Move(mv) => Some(*mv),
            Self::Unknown(_) => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Move(mv) => mv.wire(),
            Self::Unknown(code) => *code,
        }
    }
}

impl From<Move> for WireMove {
    fn from(mv: Move) -> Self {
        Self::Move(mv)
    }
}

impl fmt::Display for WireMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(mv) => mv.fmt(f),
            Self::Unknown(_) => write!(f, "Unknown"),
        }
    }
}

/// The result of a round, from the player's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    PlayerWins,
    ComputerWins,
    Draw,
}

impl Outcome {
    /// Resolve two moves into an outcome. Pure and total: Rock beats
    /// Scissors, Scissors beats Paper, Paper beats Rock; equal moves draw.
    pub fn resolve(player: Move, opponent: Move) -> Self {
        if player == opponent {
            Self::Draw
        } else if player.beats() == opponent {
            Self::PlayerWins
        } else {
            Self::ComputerWins
        }
    }

    /// The same outcome seen from the other side of the table.
    pub fn inverted(&self) -> Self {
        match self {
            Self::PlayerWins => Self::ComputerWins,
            Self::ComputerWins => Self::PlayerWins,
            Self::Draw => Self::Draw,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::PlayerWins => "You win!",
            Self::ComputerWins => "You lose.",
            Self::Draw => "It's a draw.",
        };
        write!(f, "{text}")
    }
}

/// Where a round was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOrigin {
    Local,
    Remote,
}

/// Opaque identifier the settlement service assigns to a submission.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementId(pub String);

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Address-like identity of the account that submitted a move.
///
/// Comparison is case-insensitive: the service may broadcast a checksummed
/// form of an address the session holds lowercased.
#[derive(Clone, Debug, Eq, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One resolved round. Immutable once constructed; owned by the history log
/// after it is appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub player_move: WireMove,
    pub opponent_move: WireMove,
    pub outcome: Outcome,
    pub origin: RoundOrigin,
    /// Present on remote rounds only.
    pub settlement: Option<SettlementId>,
}

impl Round {
    /// Build a locally resolved round; the outcome is derived here.
    pub fn local(player: Move, opponent: Move) -> Self {
        Self {
            player_move: player.into(),
            opponent_move: opponent.into(),
            outcome: Outcome::resolve(player, opponent),
            origin: RoundOrigin::Local,
            settlement: None,
        }
    }

    /// Build a remotely settled round. The outcome comes from the service's
    /// settlement, not from re-resolving the moves: the service is the
    /// authority for rounds it settles.
    pub fn remote(
        player: WireMove,
        opponent: WireMove,
        outcome: Outcome,
        settlement: SettlementId,
    ) -> Self {
        Self {
            player_move: player,
            opponent_move: opponent,
            outcome,
            origin: RoundOrigin::Remote,
            settlement: Some(settlement),
        }
    }

    /// One-line transcript of the round.
    pub fn transcript(&self) -> String {
        format!(
            "{} (you) vs {} (computer). {}",
            self.player_move, self.opponent_move, self.outcome
        )
    }
}
