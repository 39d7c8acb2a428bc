use janken_types::{Outcome, Round};

/// Append-only record of the session's resolved rounds.
///
/// Rounds are stored in arrival order; [`HistoryLog::rounds`] yields them
/// newest-first for presentation. No deduplication happens here; screening
/// out duplicate broadcasts is the deduplicator's job, upstream of append.
#[derive(Clone, Debug, Default)]
pub struct HistoryLog {
    rounds: Vec<Round>,
}

impl HistoryLog {
    /// Rounds, most recent first. Finite and restartable.
    pub fn rounds(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter().rev()
    }

    pub fn latest(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Number of recorded draws.
    pub fn draws(&self) -> u64 {
        self.rounds
            .iter()
            .filter(|round| round.outcome == Outcome::Draw)
            .count() as u64
    }

    pub(crate) fn append(&mut self, round: Round) {
        self.rounds.push(round);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use janken_types::Move;

    #[test]
    fn test_rounds_iterate_newest_first() {
        let mut history = HistoryLog::default();
        history.append(Round::local(Move::Rock, Move::Scissors));
        history.append(Round::local(Move::Paper, Move::Paper));

        let latest = history.rounds().next().unwrap();
        assert_eq!(latest.outcome, Outcome::Draw);
        assert_eq!(history.len(), 2);
        assert_eq!(history.draws(), 1);

        // Restartable: a second pass sees the same sequence.
        assert_eq!(history.rounds().count(), 2);
    }
}
