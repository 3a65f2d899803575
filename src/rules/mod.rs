pub mod execute;
pub mod movegen;

pub use execute::{apply_move, MoveOutcome};
pub use movegen::{candidate_moves, CandidateMove, MoveKind};
