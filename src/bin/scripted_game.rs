//! Plays a short scripted game between an authority and a replica over the
//! in-process transport, ending in a king capture.

use env_logger::Env;
use log::info;

use netchess::coord::Coord;
use netchess::pieces::{Color, PieceKind};
use netchess::rules::MoveKind;
use netchess::session::local::{pump, LocalNet};
use netchess::session::{ParticipantId, Session, AUTHORITY};

fn main() {
    let env = Env::default().filter_or("NETCHESS_LOG", "info");
    env_logger::Builder::from_env(env).init();

    let net = LocalNet::new();
    let mut white = Session::authority(net.endpoint(AUTHORITY));
    let guest = ParticipantId(2);
    let mut black = Session::replica(guest, net.endpoint(guest));

    white.on_participant_joined(guest);
    pump(&net, &mut white, &mut black);

    // A quick loss for Black: the f-pawn opens the diagonal, the queen
    // walks in. No check rules here — the game ends on the king capture.
    let script = [
        (Color::White, (4, 1), (4, 3), MoveKind::Normal), // e4
        (Color::Black, (5, 6), (5, 4), MoveKind::Normal), // f5
        (Color::White, (3, 0), (7, 4), MoveKind::Normal), // Qh5
        (Color::Black, (0, 6), (0, 5), MoveKind::Normal), // a6
        (Color::White, (7, 4), (4, 7), MoveKind::Attack), // Qxe8
    ];

    for (side, from, to, kind) in script {
        let (fx, fy) = from;
        let (tx, ty) = to;
        let mover = match side {
            Color::White => &mut white,
            Color::Black => &mut black,
        };
        let piece = mover
            .state()
            .board
            .piece_at(Coord::new(fx, fy))
            .expect("scripted piece missing")
            .id;

        mover.request_moves(piece).expect("request refused");
        pump(&net, &mut white, &mut black);

        let mover = match side {
            Color::White => &mut white,
            Color::Black => &mut black,
        };
        mover
            .propose_move(piece, Coord::new(tx, ty), kind)
            .expect("scripted move refused");
        pump(&net, &mut white, &mut black);
    }

    assert_eq!(white.winner(), Some(Color::White));
    assert_eq!(black.winner(), Some(Color::White));
    assert_eq!(white.state(), black.state());

    info!("final position, both views identical:");
    print_board(&white);
}

fn print_board(session: &Session<netchess::session::local::LocalEndpoint>) {
    for y in (0..8).rev() {
        let mut line = String::new();
        for x in 0..8 {
            let c = match session.state().board.piece_at(Coord::new(x, y)) {
                None => '.',
                Some(p) => {
                    let c = match p.kind {
                        PieceKind::Pawn => 'p',
                        PieceKind::Rook => 'r',
                        PieceKind::Knight => 'n',
                        PieceKind::Bishop => 'b',
                        PieceKind::Queen => 'q',
                        PieceKind::King => 'k',
                    };
                    match p.color {
                        Color::White => c.to_ascii_uppercase(),
                        Color::Black => c,
                    }
                }
            };
            line.push(c);
            line.push(' ');
        }
        println!("{line}");
    }
}
