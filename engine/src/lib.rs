//! Janken session state.
//!
//! This crate holds everything that lives for exactly one session: the score
//! counters, the round history, and the connection mode. All mutation flows
//! through [`Session::apply_round`], which applies a resolved round to score
//! and history in one synchronous step, so no observer can see one updated
//! without the other.

mod history;
mod rng;
mod score;
mod session;

pub use history::HistoryLog;
pub use rng::draw_opponent;
pub use score::ScoreState;
pub use session::{ConnectionState, Session};
