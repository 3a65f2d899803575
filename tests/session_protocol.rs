use netchess::coord::Coord;
use netchess::pieces::{Color, PieceId, PieceKind};
use netchess::rules::MoveKind;
use netchess::session::local::{pump, LocalEndpoint, LocalNet};
use netchess::session::{
    ClientMessage, ParticipantId, Reject, Session, AUTHORITY,
};

const GUEST: ParticipantId = ParticipantId(2);

fn setup() -> (LocalNet, Session<LocalEndpoint>, Session<LocalEndpoint>) {
    let net = LocalNet::new();
    let mut authority = Session::authority(net.endpoint(AUTHORITY));
    let mut replica = Session::replica(GUEST, net.endpoint(GUEST));
    authority.on_participant_joined(GUEST);
    pump(&net, &mut authority, &mut replica);
    (net, authority, replica)
}

fn id_at(session: &Session<LocalEndpoint>, x: i32, y: i32) -> PieceId {
    session
        .state()
        .board
        .piece_at(Coord::new(x, y))
        .expect("piece on square")
        .id
}

fn propose(
    authority: &mut Session<LocalEndpoint>,
    from: ParticipantId,
    piece: PieceId,
    x: i32,
    y: i32,
    kind: MoveKind,
) -> Result<(), Reject> {
    authority.handle_client(
        from,
        ClientMessage::ProposeMove {
            piece,
            target: Coord::new(x, y),
            kind,
        },
    )
}

#[test]
fn board_initializes_only_after_both_participants_joined() {
    let net = LocalNet::new();
    let mut authority: Session<LocalEndpoint> = Session::authority(net.endpoint(AUTHORITY));
    assert_eq!(authority.state().board.pieces().count(), 0);

    let mut replica = Session::replica(GUEST, net.endpoint(GUEST));
    authority.on_participant_joined(GUEST);
    pump(&net, &mut authority, &mut replica);

    assert_eq!(authority.state().board.pieces().count(), 32);
    assert_eq!(replica.state(), authority.state());
    assert_eq!(authority.current_player(), Color::White);
}

#[test]
fn scenario_c_out_of_turn_proposal_rejected_and_state_untouched() {
    let (net, mut authority, mut replica) = setup();
    let before = authority.state().clone();

    // Black proposes while it is White's turn.
    let black_pawn = id_at(&replica, 4, 6);
    replica
        .propose_move(black_pawn, Coord::new(4, 4), MoveKind::Normal)
        .unwrap();
    pump(&net, &mut authority, &mut replica);

    assert_eq!(authority.state(), &before);
    assert_eq!(replica.state(), &before);
}

#[test]
fn proposal_for_an_opponent_piece_is_rejected() {
    let (_net, mut authority, _replica) = setup();
    let white_pawn = id_at(&authority, 4, 1);

    // The guest does not own White's pawn, whoever's turn it is.
    let err = propose(&mut authority, GUEST, white_pawn, 4, 3, MoveKind::Normal);
    assert_eq!(err, Err(Reject::NotYourPiece));
}

#[test]
fn off_board_target_is_rejected() {
    let (_net, mut authority, _replica) = setup();
    let white_pawn = id_at(&authority, 4, 1);

    let err = propose(&mut authority, AUTHORITY, white_pawn, 4, 9, MoveKind::Normal);
    assert_eq!(err, Err(Reject::OffBoard));
}

#[test]
fn move_outside_the_candidate_set_is_rejected() {
    let (_net, mut authority, _replica) = setup();
    let white_pawn = id_at(&authority, 4, 1);

    // Three squares forward was never offered.
    let err = propose(&mut authority, AUTHORITY, white_pawn, 4, 4, MoveKind::Normal);
    assert_eq!(err, Err(Reject::IllegalMove));

    // Right target, wrong kind tag.
    let err = propose(&mut authority, AUTHORITY, white_pawn, 4, 3, MoveKind::Attack);
    assert_eq!(err, Err(Reject::IllegalMove));
}

#[test]
fn stale_proposal_for_a_captured_piece_is_rejected() {
    let (net, mut authority, mut replica) = setup();

    // 1. e4 d5 2. exd5 — the black pawn is gone.
    let e_pawn = id_at(&authority, 4, 1);
    propose(&mut authority, AUTHORITY, e_pawn, 4, 3, MoveKind::Normal).unwrap();
    let d_pawn = id_at(&authority, 3, 6);
    propose(&mut authority, GUEST, d_pawn, 3, 4, MoveKind::Normal).unwrap();
    propose(&mut authority, AUTHORITY, e_pawn, 3, 4, MoveKind::Attack).unwrap();
    pump(&net, &mut authority, &mut replica);

    let err = propose(&mut authority, GUEST, d_pawn, 3, 3, MoveKind::Normal);
    assert_eq!(err, Err(Reject::UnknownPiece));
    assert_eq!(replica.state(), authority.state());
}

#[test]
fn king_capture_ends_the_game_and_blocks_all_further_proposals() {
    let (net, mut authority, mut replica) = setup();

    // 1. e4 f5 2. Qh5 a6 3. Qxe8 — nothing stops the queen because check
    // is never evaluated.
    let e_pawn = id_at(&authority, 4, 1);
    propose(&mut authority, AUTHORITY, e_pawn, 4, 3, MoveKind::Normal).unwrap();
    let f_pawn = id_at(&authority, 5, 6);
    propose(&mut authority, GUEST, f_pawn, 5, 4, MoveKind::Normal).unwrap();
    let queen = id_at(&authority, 3, 0);
    propose(&mut authority, AUTHORITY, queen, 7, 4, MoveKind::Normal).unwrap();
    let a_pawn = id_at(&authority, 0, 6);
    propose(&mut authority, GUEST, a_pawn, 0, 5, MoveKind::Normal).unwrap();
    propose(&mut authority, AUTHORITY, queen, 4, 7, MoveKind::Attack).unwrap();
    pump(&net, &mut authority, &mut replica);

    assert_eq!(authority.winner(), Some(Color::White));
    assert_eq!(replica.winner(), Some(Color::White));
    assert_eq!(replica.state(), authority.state());

    let d_pawn = id_at(&authority, 3, 6);
    let err = propose(&mut authority, GUEST, d_pawn, 3, 5, MoveKind::Normal);
    assert_eq!(err, Err(Reject::GameOver));
}

#[test]
fn scenario_d_promotion_gates_the_session() {
    let (net, mut authority, mut replica) = setup();

    // March the a-pawn through Black's queenside to b8:
    // 1. a4 b5 2. axb5 h6 3. b6 h5 4. bxa7 h4 5. axb8.
    let a_pawn = id_at(&authority, 0, 1);
    let h_pawn = id_at(&authority, 7, 6);
    propose(&mut authority, AUTHORITY, a_pawn, 0, 3, MoveKind::Normal).unwrap();
    let b_pawn = id_at(&authority, 1, 6);
    propose(&mut authority, GUEST, b_pawn, 1, 4, MoveKind::Normal).unwrap();
    propose(&mut authority, AUTHORITY, a_pawn, 1, 4, MoveKind::Attack).unwrap();
    propose(&mut authority, GUEST, h_pawn, 7, 5, MoveKind::Normal).unwrap();
    propose(&mut authority, AUTHORITY, a_pawn, 1, 5, MoveKind::Normal).unwrap();
    propose(&mut authority, GUEST, h_pawn, 7, 4, MoveKind::Normal).unwrap();
    propose(&mut authority, AUTHORITY, a_pawn, 0, 6, MoveKind::Attack).unwrap();
    propose(&mut authority, GUEST, h_pawn, 7, 3, MoveKind::Normal).unwrap();
    propose(&mut authority, AUTHORITY, a_pawn, 1, 7, MoveKind::Attack).unwrap();
    pump(&net, &mut authority, &mut replica);

    assert!(authority.state().turn.promotion_pending());
    assert_eq!(replica.state(), authority.state());

    // Any proposal, for either side, is blocked until resolution.
    let err = propose(&mut authority, GUEST, h_pawn, 7, 2, MoveKind::Normal);
    assert_eq!(err, Err(Reject::PromotionPending));

    // The guest does not own the promoting pawn.
    let err = authority.handle_client(
        GUEST,
        ClientMessage::ResolvePromotion {
            piece: a_pawn,
            choice: PieceKind::Queen,
        },
    );
    assert_eq!(err, Err(Reject::NotPromotionOwner));

    // Kings are not on the menu.
    let err = authority.resolve_promotion(a_pawn, PieceKind::King);
    assert_eq!(err, Err(Reject::BadPromotionChoice));

    authority.resolve_promotion(a_pawn, PieceKind::Queen).unwrap();
    pump(&net, &mut authority, &mut replica);

    assert_eq!(authority.current_player(), Color::Black);
    assert_eq!(
        authority.state().board.piece(a_pawn).unwrap().kind,
        PieceKind::Queen
    );
    assert_eq!(replica.state(), authority.state());

    // Black's deferred reply goes through now.
    propose(&mut authority, GUEST, h_pawn, 7, 2, MoveKind::Normal).unwrap();
}

#[test]
fn resolving_when_nothing_is_pending_is_rejected() {
    let (_net, mut authority, _replica) = setup();
    let pawn = id_at(&authority, 4, 1);

    let err = authority.resolve_promotion(pawn, PieceKind::Queen);
    assert_eq!(err, Err(Reject::NoPromotionPending));
}

#[test]
fn forfeit_hands_the_win_to_the_remaining_side() {
    let (net, mut authority, mut replica) = setup();

    replica.forfeit().unwrap();
    pump(&net, &mut authority, &mut replica);

    assert_eq!(authority.winner(), Some(Color::White));
    assert_eq!(replica.winner(), Some(Color::White));
}

#[test]
fn disconnect_is_translated_into_a_forfeit() {
    let (net, mut authority, mut replica) = setup();

    authority.on_participant_left(GUEST);
    pump(&net, &mut authority, &mut replica);

    assert_eq!(authority.winner(), Some(Color::White));
}

#[test]
fn authority_disconnect_forfeits_to_the_remaining_replica() {
    let (_net, _authority, mut replica) = setup();

    // The wire is gone with the authority; the survivor settles the
    // forfeit from the departure notification alone.
    replica.on_participant_left(AUTHORITY);

    assert!(replica.is_game_over());
    assert_eq!(replica.winner(), Some(Color::Black));
}

#[test]
fn disconnect_before_the_game_starts_declares_no_winner() {
    let net = LocalNet::new();
    let mut replica: Session<LocalEndpoint> = Session::replica(GUEST, net.endpoint(GUEST));

    replica.on_participant_left(AUTHORITY);

    assert!(!replica.is_game_over());
}
