use crate::coord::{Coord, BOARD_SIZE};
use crate::pieces::{Color, Piece, PieceId, PieceKind};

const N: usize = BOARD_SIZE as usize;

/// Occupancy grid plus the piece registry.
///
/// The grid maps coordinates to piece ids; the registry owns the pieces,
/// indexed by id. A captured piece leaves a `None` slot so ids stay stable.
/// Every live piece's stored coordinate matches exactly one grid cell
/// holding its id — `debug_validate` asserts this.
///
/// Mutators are crate-private: outside of tests, only the rules layer
/// writes to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<PieceId>; N]; N],
    pieces: Vec<Option<Piece>>,
}

impl Board {
    pub fn empty() -> Self {
        Self {
            grid: [[None; N]; N],
            pieces: Vec::new(),
        }
    }

    /// The standard two-team setup: back rank R N B Q K B N R, eight pawns
    /// in front, for both colors.
    pub fn standard() -> Self {
        use PieceKind::*;

        let mut board = Self::empty();
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for color in [Color::White, Color::Black] {
            let home = color.home_rank();
            let pawn_rank = home + color.forward();
            for (x, kind) in back.into_iter().enumerate() {
                board.spawn(kind, color, Coord::new(x as i32, home));
            }
            for x in 0..BOARD_SIZE {
                board.spawn(Pawn, color, Coord::new(x, pawn_rank));
            }
        }

        board
    }

    /// Adds a piece to an empty on-board square and returns its id.
    ///
    /// Panics if the square is occupied or off the board; setup code and
    /// tests construct positions, they do not probe them.
    pub fn spawn(&mut self, kind: PieceKind, color: Color, pos: Coord) -> PieceId {
        assert!(pos.on_board(), "spawn off board: {pos:?}");
        assert!(
            self.occupant(pos).is_none(),
            "spawn on occupied square: {pos:?}"
        );

        let id = PieceId(self.pieces.len() as u16);
        self.pieces.push(Some(Piece {
            id,
            kind,
            color,
            pos,
            has_moved: false,
        }));
        self.grid[pos.x as usize][pos.y as usize] = Some(id);
        id
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0 as usize)?.as_ref()
    }

    #[inline]
    pub fn occupant(&self, pos: Coord) -> Option<PieceId> {
        if !pos.on_board() {
            return None;
        }
        self.grid[pos.x as usize][pos.y as usize]
    }

    #[inline]
    pub fn piece_at(&self, pos: Coord) -> Option<&Piece> {
        self.piece(self.occupant(pos)?)
    }

    #[inline]
    pub fn is_empty(&self, pos: Coord) -> bool {
        pos.on_board() && self.occupant(pos).is_none()
    }

    /// Live pieces, both colors.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter_map(|p| p.as_ref())
    }

    /// Relocates a live piece: clears the old cell, fills the new one,
    /// updates the piece's coordinate, and marks it as having moved.
    ///
    /// The target must be an empty on-board square; captures are resolved
    /// by the caller before the move lands.
    pub(crate) fn relocate(&mut self, id: PieceId, to: Coord) {
        assert!(to.on_board(), "relocate off board: {to:?}");
        assert!(
            self.occupant(to).is_none(),
            "relocate onto occupied square: {to:?}"
        );

        let piece = self.pieces[id.0 as usize]
            .as_mut()
            .expect("relocate of captured piece");
        let from = piece.pos;
        piece.pos = to;
        piece.has_moved = true;

        self.grid[from.x as usize][from.y as usize] = None;
        self.grid[to.x as usize][to.y as usize] = Some(id);
    }

    /// Removes a live piece from the board and registry slot, returning it.
    pub(crate) fn capture(&mut self, id: PieceId) -> Piece {
        let piece = self.pieces[id.0 as usize]
            .take()
            .expect("capture of already-captured piece");
        self.grid[piece.pos.x as usize][piece.pos.y as usize] = None;
        piece
    }

    /// Re-types a piece in place. Same identity, same square, same
    /// `has_moved`; only the kind changes.
    pub(crate) fn promote(&mut self, id: PieceId, kind: PieceKind) {
        let piece = self.pieces[id.0 as usize]
            .as_mut()
            .expect("promotion of captured piece");
        piece.kind = kind;
    }

    /// Asserts the one-piece-per-cell invariant both ways. Corruption here
    /// is a programming error, not a recoverable condition.
    pub fn debug_validate(&self) {
        if cfg!(debug_assertions) {
            for x in 0..N {
                for y in 0..N {
                    if let Some(id) = self.grid[x][y] {
                        let p = self.piece(id).expect("grid points at captured piece");
                        assert_eq!(
                            p.pos,
                            Coord::new(x as i32, y as i32),
                            "piece coordinate disagrees with grid cell"
                        );
                    }
                }
            }
            for p in self.pieces() {
                assert_eq!(
                    self.occupant(p.pos),
                    Some(p.id),
                    "piece not anchored in the grid"
                );
            }
        }
    }
}
