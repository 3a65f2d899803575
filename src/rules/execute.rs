use crate::board::Board;
use crate::coord::Coord;
use crate::pieces::{Color, PieceId, PieceKind};
use crate::rules::movegen::MoveKind;
use crate::turn::{PawnTrack, TurnState};

/// Post-conditions of one committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub captured: Option<PieceId>,
    /// The rook relocated by a castling move.
    pub rook_moved: Option<PieceId>,
    /// Set when the capture took the opposing king.
    pub winner: Option<Color>,
    /// The mover reached its promotion rank; the replacement kind is
    /// chosen later through the promotion sub-protocol.
    pub promotion_triggered: bool,
}

/// Applies one validated move to board and turn state.
///
/// Trusts its input: the (target, kind) pair must come from the current
/// candidate set for the piece. Every participant runs this same function
/// on committed moves, so replicas converge with the authority.
///
/// Turn advancement is not done here — see `GameState::commit`, which
/// advances unless the move opened a promotion or ended the game.
pub fn apply_move(
    board: &mut Board,
    turn: &mut TurnState,
    id: PieceId,
    target: Coord,
    kind: MoveKind,
) -> MoveOutcome {
    let mover = *board.piece(id).expect("apply_move on captured piece");

    let mut outcome = MoveOutcome {
        captured: None,
        rook_moved: None,
        winner: None,
        promotion_triggered: false,
    };

    match kind {
        MoveKind::Attack => {
            let victim_id = board
                .occupant(target)
                .expect("attack move on empty square");
            let victim = board.capture(victim_id);
            outcome.captured = Some(victim_id);
            if victim.kind == PieceKind::King {
                turn.declare_winner(mover.color);
                outcome.winner = Some(mover.color);
            }
        }
        MoveKind::EnPassant => {
            // The captured pawn sits one rank behind the target square,
            // relative to the mover's direction; the target itself is empty.
            let behind = target + Coord::new(0, -mover.color.forward());
            let victim_id = board
                .occupant(behind)
                .expect("en passant with no pawn behind target");
            board.capture(victim_id);
            outcome.captured = Some(victim_id);
        }
        MoveKind::Castling => {
            let dir = (target.x - mover.pos.x).signum();
            let rook_from = Coord::new(if dir > 0 { 7 } else { 0 }, mover.pos.y);
            let rook_to = Coord::new(if dir > 0 { 5 } else { 3 }, mover.pos.y);
            let rook_id = board
                .occupant(rook_from)
                .expect("castling with no rook on the wing");
            board.relocate(rook_id, rook_to);
            outcome.rook_moved = Some(rook_id);
        }
        MoveKind::Normal => {}
    }

    let from = mover.pos;
    board.relocate(id, target);

    // En passant bookkeeping: track a fresh double step, clear anything
    // else. The window closes after exactly one reply turn.
    let double_step = mover.kind == PieceKind::Pawn && (target.y - from.y).abs() == 2;
    turn.set_pawn_track(double_step.then_some(PawnTrack {
        piece: id,
        initial_y: from.y,
    }));

    // A winning king capture ends the game on the spot; no promotion is
    // opened because there is no turn left to resolve it in.
    if outcome.winner.is_none()
        && mover.kind == PieceKind::Pawn
        && target.y == mover.color.promotion_rank()
    {
        turn.begin_promotion(id);
        outcome.promotion_triggered = true;
    }

    board.debug_validate();
    outcome
}
