use janken_types::Outcome;

/// Cumulative win counters for the session.
///
/// Counters are monotonic: there is no decrement and no reset. The only way
/// to move them is [`Session::apply_round`](crate::Session::apply_round),
/// which calls [`ScoreState::apply`] exactly once per resolved round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreState {
    player_wins: u64,
    opponent_wins: u64,
}

impl ScoreState {
    pub fn player_wins(&self) -> u64 {
        self.player_wins
    }

    pub fn opponent_wins(&self) -> u64 {
        self.opponent_wins
    }

    /// Record one outcome. Draws move neither counter.
    pub(crate) fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlayerWins => self.player_wins += 1,
            Outcome::ComputerWins => self.opponent_wins += 1,
            Outcome::Draw => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_increments_one_counter() {
        let mut score = ScoreState::default();
        score.apply(Outcome::PlayerWins);
        assert_eq!((score.player_wins(), score.opponent_wins()), (1, 0));
        score.apply(Outcome::ComputerWins);
        score.apply(Outcome::ComputerWins);
        assert_eq!((score.player_wins(), score.opponent_wins()), (1, 2));
    }

    #[test]
    fn test_draw_is_a_no_op() {
        let mut score = ScoreState::default();
        score.apply(Outcome::Draw);
        score.apply(Outcome::Draw);
        assert_eq!(score, ScoreState::default());
    }
}
