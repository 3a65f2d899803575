use netchess::coord::Coord;
use netchess::pieces::{Color, PieceId, PieceKind};
use netchess::rules::{candidate_moves, CandidateMove, MoveKind};
use netchess::state::GameState;

fn moves_of(st: &GameState, id: PieceId) -> Vec<CandidateMove> {
    let piece = *st.board.piece(id).expect("piece is live");
    candidate_moves(&st.board, &st.turn, &piece)
}

fn castle_to(cands: &[CandidateMove], x: i32, y: i32) -> bool {
    cands.contains(&CandidateMove::new(Coord::new(x, y), MoveKind::Castling))
}

/// Kings and the white kingside rook only, nobody has moved.
fn kingside_setup() -> (GameState, PieceId) {
    let mut st = GameState::empty();
    let wk = st.board.spawn(PieceKind::King, Color::White, Coord::new(4, 0));
    st.board.spawn(PieceKind::King, Color::Black, Coord::new(4, 7));
    st.board.spawn(PieceKind::Rook, Color::White, Coord::new(7, 0));
    (st, wk)
}

#[test]
fn scenario_a_kingside_castling_offered() {
    let (st, wk) = kingside_setup();
    let cands = moves_of(&st, wk);

    assert!(castle_to(&cands, 6, 0), "g1 castling target missing");
    // No rook on a1, so no queenside offer.
    assert!(!castle_to(&cands, 2, 0));
}

#[test]
fn queenside_castling_offered_when_wing_is_clear() {
    let (mut st, wk) = kingside_setup();
    st.board.spawn(PieceKind::Rook, Color::White, Coord::new(0, 0));

    let cands = moves_of(&st, wk);
    assert!(castle_to(&cands, 6, 0));
    assert!(castle_to(&cands, 2, 0));
}

#[test]
fn castling_blocked_by_intervening_piece() {
    let (mut st, wk) = kingside_setup();
    st.board.spawn(PieceKind::Rook, Color::White, Coord::new(0, 0));
    st.board
        .spawn(PieceKind::Bishop, Color::White, Coord::new(5, 0));

    let cands = moves_of(&st, wk);
    assert!(!castle_to(&cands, 6, 0), "f1 occupied, kingside must go");
    assert!(castle_to(&cands, 2, 0), "queenside wing is still clear");
}

#[test]
fn castling_withdrawn_once_king_has_moved() {
    let (mut st, wk) = kingside_setup();

    st.commit(wk, Coord::new(4, 1), MoveKind::Normal);
    let bk = st.board.piece_at(Coord::new(4, 7)).unwrap().id;
    st.commit(bk, Coord::new(4, 6), MoveKind::Normal);
    // Back where it started, but `has_moved` is monotonic.
    st.commit(wk, Coord::new(4, 0), MoveKind::Normal);

    assert!(!castle_to(&moves_of(&st, wk), 6, 0));
}

#[test]
fn castling_withdrawn_once_rook_has_moved() {
    let (mut st, wk) = kingside_setup();
    let rook = st.board.piece_at(Coord::new(7, 0)).unwrap().id;

    st.commit(rook, Coord::new(7, 3), MoveKind::Normal);
    let bk = st.board.piece_at(Coord::new(4, 7)).unwrap().id;
    st.commit(bk, Coord::new(4, 6), MoveKind::Normal);
    st.commit(rook, Coord::new(7, 0), MoveKind::Normal);

    assert!(!castle_to(&moves_of(&st, wk), 6, 0));
}

#[test]
fn castling_requires_an_unmoved_rook_of_matching_color_and_kind() {
    // An enemy rook on h1 does not qualify.
    let mut st = GameState::empty();
    let wk = st.board.spawn(PieceKind::King, Color::White, Coord::new(4, 0));
    st.board.spawn(PieceKind::Rook, Color::Black, Coord::new(7, 0));
    assert!(!castle_to(&moves_of(&st, wk), 6, 0));

    // Neither does an own queen.
    let mut st = GameState::empty();
    let wk = st.board.spawn(PieceKind::King, Color::White, Coord::new(4, 0));
    st.board
        .spawn(PieceKind::Queen, Color::White, Coord::new(7, 0));
    assert!(!castle_to(&moves_of(&st, wk), 6, 0));
}

#[test]
fn executing_kingside_castle_relocates_the_rook() {
    let (mut st, wk) = kingside_setup();
    let rook = st.board.piece_at(Coord::new(7, 0)).unwrap().id;

    let outcome = st.commit(wk, Coord::new(6, 0), MoveKind::Castling);

    assert_eq!(outcome.rook_moved, Some(rook));
    assert_eq!(st.board.piece(wk).unwrap().pos, Coord::new(6, 0));
    assert_eq!(st.board.piece(rook).unwrap().pos, Coord::new(5, 0));
    assert!(st.board.piece(rook).unwrap().has_moved);
    assert!(st.board.is_empty(Coord::new(7, 0)));
    assert_eq!(st.turn.current_player(), Color::Black);
}

#[test]
fn executing_queenside_castle_relocates_the_rook() {
    let mut st = GameState::empty();
    let wk = st.board.spawn(PieceKind::King, Color::White, Coord::new(4, 0));
    st.board.spawn(PieceKind::King, Color::Black, Coord::new(4, 7));
    let rook = st.board.spawn(PieceKind::Rook, Color::White, Coord::new(0, 0));

    st.commit(wk, Coord::new(2, 0), MoveKind::Castling);

    assert_eq!(st.board.piece(wk).unwrap().pos, Coord::new(2, 0));
    assert_eq!(st.board.piece(rook).unwrap().pos, Coord::new(3, 0));
    assert!(st.board.is_empty(Coord::new(0, 0)));
}
