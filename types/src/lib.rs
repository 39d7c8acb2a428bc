pub mod game;
pub mod settle;

pub use game::{Identity, Move, Outcome, Round, RoundOrigin, SettlementId, WireMove};
pub use settle::{OutcomeClassifier, SettlementEvent, UnrecognizedOutcome};

/// Default stake attached to a remote submission, in the service's smallest
/// denomination.
pub const DEFAULT_STAKE: u64 = 100;
