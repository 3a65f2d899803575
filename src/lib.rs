//! A two-player chess session with networked play: one participant is the
//! authority that validates and applies moves, the other proposes and
//! observes; committed moves are replicated so both board views converge.

pub mod board;
pub mod coord;
pub mod pieces;
pub mod rules;
pub mod session;
pub mod state;
pub mod turn;
