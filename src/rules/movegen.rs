use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::coord::{Coord, KING_STEPS, KNIGHT_DELTAS};
use crate::pieces::{Piece, PieceKind};
use crate::turn::TurnState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Normal,
    Attack,
    Castling,
    EnPassant,
}

impl MoveKind {
    /// En passant is a capture even though the target square is empty.
    #[inline]
    pub fn is_attack(self) -> bool {
        matches!(self, MoveKind::Attack | MoveKind::EnPassant)
    }
}

/// A generated, not-yet-committed destination. Ephemeral; recomputed from
/// the current board whenever it matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateMove {
    pub target: Coord,
    pub kind: MoveKind,
}

impl CandidateMove {
    #[inline]
    pub const fn new(target: Coord, kind: MoveKind) -> Self {
        Self { target, kind }
    }
}

/// All candidate destinations for one piece on the current board.
///
/// Pure: reads the board and turn state, mutates nothing. Callers get a
/// set; no ordering is guaranteed.
///
/// Deliberately *not* a full legality check: whether a move leaves the
/// mover's own king attacked is never examined, and castling does not test
/// the king's transit squares. Win detection is by king capture instead.
pub fn candidate_moves(board: &Board, turn: &TurnState, piece: &Piece) -> Vec<CandidateMove> {
    let mut out = Vec::new();

    match piece.kind {
        PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop => {
            for &dir in piece.kind.slide_dirs() {
                walk_ray(board, piece, dir, &mut out);
            }
        }
        PieceKind::Knight => {
            for &delta in &KNIGHT_DELTAS {
                step_to(board, piece, piece.pos + delta, &mut out);
            }
        }
        PieceKind::King => {
            for &step in &KING_STEPS {
                step_to(board, piece, piece.pos + step, &mut out);
            }
            castling_moves(board, piece, &mut out);
        }
        PieceKind::Pawn => pawn_moves(board, turn, piece, &mut out),
    }

    out
}

/// Walks outward from the piece one square at a time: empty squares yield
/// normal moves, the first occupied square yields an attack iff it holds an
/// opponent, and the walk stops there either way.
fn walk_ray(board: &Board, piece: &Piece, dir: Coord, out: &mut Vec<CandidateMove>) {
    let mut cur = piece.pos + dir;
    while board.is_empty(cur) {
        out.push(CandidateMove::new(cur, MoveKind::Normal));
        cur = cur + dir;
    }
    if let Some(blocker) = board.piece_at(cur) {
        if blocker.color != piece.color {
            out.push(CandidateMove::new(cur, MoveKind::Attack));
        }
    }
}

/// Fixed-offset destination: empty is a normal move, an opponent is an
/// attack, own color yields nothing.
fn step_to(board: &Board, piece: &Piece, target: Coord, out: &mut Vec<CandidateMove>) {
    if !target.on_board() {
        return;
    }
    match board.piece_at(target) {
        None => out.push(CandidateMove::new(target, MoveKind::Normal)),
        Some(other) if other.color != piece.color => {
            out.push(CandidateMove::new(target, MoveKind::Attack));
        }
        Some(_) => {}
    }
}

/// Castling on either wing: king unmoved, every square strictly between
/// king and rook empty, and an unmoved same-color rook on the wing's file.
/// The king's current and transit squares are not checked for attacks
/// (see module note).
fn castling_moves(board: &Board, king: &Piece, out: &mut Vec<CandidateMove>) {
    if king.has_moved {
        return;
    }

    // (direction, distance to the rook): kingside 3, queenside 4.
    for (dir, dist) in [(1, 3), (-1, 4)] {
        let clear = (1..dist).all(|i| board.is_empty(king.pos + Coord::new(dir * i, 0)));
        if !clear {
            continue;
        }
        let rook_sq = king.pos + Coord::new(dir * dist, 0);
        let Some(rook) = board.piece_at(rook_sq) else {
            continue;
        };
        if rook.kind == PieceKind::Rook && rook.color == king.color && !rook.has_moved {
            let target = king.pos + Coord::new(dir * 2, 0);
            out.push(CandidateMove::new(target, MoveKind::Castling));
        }
    }
}

fn pawn_moves(board: &Board, turn: &TurnState, pawn: &Piece, out: &mut Vec<CandidateMove>) {
    let dy = pawn.color.forward();
    let one = pawn.pos + Coord::new(0, dy);

    if board.is_empty(one) {
        out.push(CandidateMove::new(one, MoveKind::Normal));

        let two = pawn.pos + Coord::new(0, 2 * dy);
        if !pawn.has_moved && board.is_empty(two) {
            out.push(CandidateMove::new(two, MoveKind::Normal));
        }
    }

    for dx in [-1, 1] {
        let diag = pawn.pos + Coord::new(dx, dy);
        if let Some(other) = board.piece_at(diag) {
            if other.color != pawn.color {
                out.push(CandidateMove::new(diag, MoveKind::Attack));
            }
        }
    }

    // En passant: the tracked pawn just advanced two squares, ended on our
    // rank, and stands on an adjacent file. The capture lands on the square
    // behind it.
    if let Some(track) = turn.last_moved_pawn() {
        if let Some(last) = board.piece(track.piece) {
            if (last.pos.y - track.initial_y).abs() == 2
                && (last.pos.x - pawn.pos.x).abs() == 1
                && last.pos.y == pawn.pos.y
            {
                let target = Coord::new(last.pos.x, pawn.pos.y + dy);
                if target.on_board() {
                    out.push(CandidateMove::new(target, MoveKind::EnPassant));
                }
            }
        }
    }
}
