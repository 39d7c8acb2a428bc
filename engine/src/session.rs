use crate::{HistoryLog, ScoreState};
use janken_types::{Identity, Round};
use tracing::{debug, info};

/// Which path rounds take: resolved in-process, or submitted to the
/// settlement service under a remote identity.
///
/// The mode is explicit rather than inferred from the presence of a live
/// handle; the reset trigger (a detected network change) is
/// [`Session::on_network_changed`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionState {
    Local,
    Remote { identity: Identity },
}

impl ConnectionState {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Local => None,
            Self::Remote { identity } => Some(identity),
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::Local
    }
}

/// One session's mutable state: score, history, connection mode.
///
/// The session is the single writer. Everything else reads through the
/// accessors; a resolved round enters through [`Session::apply_round`] and
/// nowhere else.
#[derive(Debug, Default)]
pub struct Session {
    score: ScoreState,
    history: HistoryLog,
    connection: ConnectionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    /// Record a successful remote handshake.
    pub fn connect(&mut self, identity: Identity) {
        info!(%identity, "remote connection established");
        self.connection = ConnectionState::Remote { identity };
    }

    /// A network or chain change invalidates the remote identity: drop back
    /// to local play until a new handshake completes.
    pub fn on_network_changed(&mut self) {
        if self.connection.is_remote() {
            info!("network changed, resetting connection to local");
        }
        self.connection = ConnectionState::Local;
    }

    /// Apply one resolved round: score first, then history, in a single
    /// synchronous step. Callers invoke this exactly once per round.
    pub fn apply_round(&mut self, round: Round) {
        debug!(
            outcome = ?round.outcome,
            origin = ?round.origin,
            "applying resolved round"
        );
        self.score.apply(round.outcome);
        self.history.append(round);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use janken_types::{Move, Outcome, SettlementId, WireMove};
    use proptest::prelude::*;

    #[test]
    fn test_apply_round_updates_score_and_history_together() {
        let mut session = Session::new();
        session.apply_round(Round::local(Move::Rock, Move::Scissors));

        assert_eq!(session.score().player_wins(), 1);
        assert_eq!(session.score().opponent_wins(), 0);
        assert_eq!(session.history().len(), 1);
        assert_eq!(
            session.history().latest().unwrap().outcome,
            Outcome::PlayerWins
        );
    }

    #[test]
    fn test_network_change_resets_to_local() {
        let mut session = Session::new();
        session.connect(Identity::new("0xAbC"));
        assert!(session.connection().is_remote());
        assert_eq!(
            session.connection().identity(),
            Some(&Identity::new("0xabc"))
        );

        session.on_network_changed();
        assert_eq!(*session.connection(), ConnectionState::Local);
        assert!(session.connection().identity().is_none());
    }

    fn arb_round() -> impl Strategy<Value = Round> {
        use janken_types::game::MOVES;
        let arb_move = || prop::sample::select(MOVES.to_vec());
        let arb_outcome = prop::sample::select(vec![
            Outcome::PlayerWins,
            Outcome::ComputerWins,
            Outcome::Draw,
        ]);
        (arb_move(), arb_move(), arb_outcome, any::<bool>()).prop_map(
            |(player, opponent, outcome, remote)| {
                if remote {
                    Round::remote(
                        WireMove::from(player),
                        WireMove::from(opponent),
                        outcome,
                        SettlementId("s".to_string()),
                    )
                } else {
                    Round::local(player, opponent)
                }
            },
        )
    }

    proptest! {
        // wins + losses + draws always equals the history length.
        #[test]
        fn prop_score_history_counting_invariant(rounds in prop::collection::vec(arb_round(), 0..50)) {
            let mut session = Session::new();
            for round in rounds {
                session.apply_round(round);
            }
            let score = session.score();
            let history = session.history();
            prop_assert_eq!(
                score.player_wins() + score.opponent_wins() + history.draws(),
                history.len() as u64
            );
        }
    }
}
