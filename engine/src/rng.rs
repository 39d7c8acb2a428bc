use janken_types::{game::MOVES, Move};
use rand::Rng;

/// Draw the local opponent's move uniformly from the three moves.
pub fn draw_opponent<R: Rng>(rng: &mut R) -> Move {
    MOVES[rng.gen_range(0..MOVES.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashMap;

    #[test]
    fn test_draw_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<Move, u32> = HashMap::new();
        let draws = 300;
        for _ in 0..draws {
            *counts.entry(draw_opponent(&mut rng)).or_default() += 1;
        }
        // Statistical bound, not exact: each move should land well away from
        // zero and well below half the draws.
        for mv in MOVES {
            let count = counts.get(&mv).copied().unwrap_or(0);
            assert!((60..=140).contains(&count), "{mv}: {count}");
        }
    }
}
