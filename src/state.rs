use crate::board::Board;
use crate::coord::Coord;
use crate::pieces::{Color, PieceId, PieceKind};
use crate::rules::{apply_move, MoveKind, MoveOutcome};
use crate::turn::TurnState;

/// One participant's view of the game: board plus turn state.
///
/// The authority's instance is canonical; replicas hold a copy that is
/// mutated only by replaying committed moves, through the same code path,
/// so the views stay identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub turn: TurnState,
}

impl GameState {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            turn: TurnState::new(),
        }
    }

    /// Fresh game on the standard setup.
    pub fn standard() -> Self {
        Self::new(Board::standard())
    }

    /// Empty board, for constructing scenarios.
    pub fn empty() -> Self {
        Self::new(Board::empty())
    }

    pub fn with_to_move(mut self, color: Color) -> Self {
        if self.turn.current_player() != color {
            self.turn.end_turn();
        }
        self
    }

    /// Applies a committed move and advances the turn unless the move
    /// opened a promotion or ended the game.
    pub fn commit(&mut self, id: PieceId, target: Coord, kind: MoveKind) -> MoveOutcome {
        let outcome = apply_move(&mut self.board, &mut self.turn, id, target, kind);
        if !outcome.promotion_triggered {
            self.turn.end_turn();
        }
        outcome
    }

    /// Re-types the pending pawn and runs the deferred turn change.
    pub fn resolve_promotion(&mut self, id: PieceId, choice: PieceKind) {
        debug_assert_eq!(self.turn.pending_promotion(), Some(id));
        self.board.promote(id, choice);
        self.turn.finish_promotion();
    }

    /// Ends the game by decree (forfeit, disconnect).
    pub fn force_game_over(&mut self, winner: Color) {
        self.turn.declare_winner(winner);
    }
}
