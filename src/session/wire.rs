use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::pieces::{Color, PieceId, PieceKind};
use crate::rules::{CandidateMove, MoveKind};
use crate::session::{ParticipantId, Reject};

/// Calls a participant sends to the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for the candidate set of one piece.
    RequestMoves { piece: PieceId },
    /// Propose committing one candidate move.
    ProposeMove {
        piece: PieceId,
        target: Coord,
        kind: MoveKind,
    },
    /// Choose the replacement kind for a pending promotion.
    ResolvePromotion { piece: PieceId, choice: PieceKind },
    /// Concede the game.
    Forfeit,
}

/// Calls the authority broadcasts (or, for `Rejected`, returns to one
/// proposer). Replicas mutate their state only in response to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Both participants are present: (re)build the standard board and
    /// start with White to move.
    Start,
    /// The candidate set for a piece, shown as plates on every view.
    Moves {
        piece: PieceId,
        candidates: Vec<CandidateMove>,
    },
    /// A validated move; every participant applies it locally.
    Committed {
        piece: PieceId,
        target: Coord,
        kind: MoveKind,
    },
    /// The pending pawn's replacement kind was chosen.
    Promoted { piece: PieceId, choice: PieceKind },
    /// Game over by decree (king capture is detected locally by each
    /// participant when applying `Committed`; this covers forfeits).
    GameOver { winner: Color },
    /// A proposal was refused; state did not change anywhere.
    Rejected { proposer: ParticipantId, reason: Reject },
}
