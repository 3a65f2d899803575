//! Authority/replica move replication.
//!
//! Exactly one participant (the authority) validates and applies moves;
//! the other proposes and observes. Every accepted move is broadcast and
//! applied by each participant through the same deterministic commit path,
//! so all board views converge — including the authority's own, which
//! applies its broadcasts to itself before sending.

pub mod local;
pub mod wire;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::Coord;
use crate::pieces::{Color, PieceId, PieceKind, PROMOTION_KINDS};
use crate::rules::{candidate_moves, CandidateMove, MoveKind};
use crate::state::GameState;

pub use wire::{ClientMessage, ServerMessage};

/// Actor number of a participant. The first joiner is the authority and
/// plays White; the second plays Black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub u8);

/// The authority's id.
pub const AUTHORITY: ParticipantId = ParticipantId(1);

impl ParticipantId {
    #[inline]
    pub fn color(self) -> Color {
        if self == AUTHORITY {
            Color::White
        } else {
            Color::Black
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Authority,
    Replica,
}

/// Why the authority refused a call. Rejections are plain values: state is
/// unchanged everywhere and the session keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reject {
    #[error("target square is off the board")]
    OffBoard,
    #[error("piece does not exist (already captured?)")]
    UnknownPiece,
    #[error("game is already over")]
    GameOver,
    #[error("a promotion must be resolved first")]
    PromotionPending,
    #[error("it is not the proposer's turn")]
    NotYourTurn,
    #[error("proposer does not own that piece")]
    NotYourPiece,
    #[error("move is not in the piece's candidate set")]
    IllegalMove,
    #[error("no promotion is pending for that piece")]
    NoPromotionPending,
    #[error("only the pawn's owner may resolve the promotion")]
    NotPromotionOwner,
    #[error("pawns cannot promote to that kind")]
    BadPromotionChoice,
    #[error("only the authority handles client calls")]
    NotAuthority,
}

/// Where a remote call is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTarget {
    /// Every *other* participant. The sender has already applied the
    /// message to itself; the transport must not loop it back.
    All,
    One(ParticipantId),
}

/// The host transport: reliable, ordered, at-most-once delivery per
/// sender. Serialization and framing live behind this boundary.
pub trait Transport {
    fn call(&mut self, target: CallTarget, msg: &ServerMessage);
    fn call_authority(&mut self, msg: &ClientMessage);
}

/// The last broadcast candidate set, rendered as plates by the UI.
/// Cleared on every commit and replaced on every new request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateSet {
    pub piece: PieceId,
    pub candidates: Vec<CandidateMove>,
}

pub struct Session<T: Transport> {
    role: Role,
    local: ParticipantId,
    transport: T,
    participants: Vec<ParticipantId>,
    state: GameState,
    plates: Option<PlateSet>,
    started: bool,
}

impl<T: Transport> Session<T> {
    pub fn authority(transport: T) -> Self {
        Self::new(Role::Authority, AUTHORITY, transport)
    }

    pub fn replica(local: ParticipantId, transport: T) -> Self {
        assert!(local != AUTHORITY, "the authority id is reserved");
        Self::new(Role::Replica, local, transport)
    }

    fn new(role: Role, local: ParticipantId, transport: T) -> Self {
        Self {
            role,
            local,
            transport,
            participants: vec![local],
            state: GameState::empty(),
            plates: None,
            started: false,
        }
    }

    // ---- read-only queries (the UI boundary) ----

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn local_color(&self) -> Color {
        self.local.color()
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn plates(&self) -> Option<&PlateSet> {
        self.plates.as_ref()
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.state.turn.current_player()
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.state.turn.is_game_over()
    }

    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.state.turn.winner()
    }

    // ---- UI-facing calls ----

    /// Ask for a piece's candidate set. The authority serves it and
    /// broadcasts it so every view shows the same plates.
    pub fn request_moves(&mut self, piece: PieceId) -> Result<(), Reject> {
        self.submit(ClientMessage::RequestMoves { piece })
    }

    /// Propose committing one candidate move.
    pub fn propose_move(
        &mut self,
        piece: PieceId,
        target: Coord,
        kind: MoveKind,
    ) -> Result<(), Reject> {
        self.submit(ClientMessage::ProposeMove {
            piece,
            target,
            kind,
        })
    }

    /// Choose the replacement kind for the pending promotion.
    pub fn resolve_promotion(&mut self, piece: PieceId, choice: PieceKind) -> Result<(), Reject> {
        self.submit(ClientMessage::ResolvePromotion { piece, choice })
    }

    /// Concede the game.
    pub fn forfeit(&mut self) -> Result<(), Reject> {
        self.submit(ClientMessage::Forfeit)
    }

    fn submit(&mut self, msg: ClientMessage) -> Result<(), Reject> {
        match self.role {
            Role::Authority => self.handle_client(self.local, msg),
            Role::Replica => {
                // A replica never applies its own input locally; it only
                // renders what comes back.
                self.transport.call_authority(&msg);
                Ok(())
            }
        }
    }

    // ---- session lifecycle ----

    pub fn on_participant_joined(&mut self, id: ParticipantId) {
        if !self.participants.contains(&id) {
            self.participants.push(id);
        }
        if self.role == Role::Authority && self.participants.len() == 2 {
            info!("both participants present, starting game");
            self.broadcast(ServerMessage::Start);
        }
    }

    /// A disconnect forfeits: the remaining side wins immediately. Every
    /// survivor settles this locally, so the outcome does not depend on
    /// which role observed the departure; the authority also broadcasts
    /// for anyone else still listening.
    pub fn on_participant_left(&mut self, id: ParticipantId) {
        self.participants.retain(|p| *p != id);
        if id == self.local || !self.started || self.is_game_over() {
            return;
        }
        let msg = ServerMessage::GameOver {
            winner: id.color().other(),
        };
        match self.role {
            Role::Authority => self.broadcast(msg),
            Role::Replica => self.apply_server(&msg),
        }
    }

    /// Reinitializes board and turn state on every participant. Only the
    /// authority may restart.
    pub fn reset_session(&mut self) -> Result<(), Reject> {
        if self.role != Role::Authority {
            return Err(Reject::NotAuthority);
        }
        self.broadcast(ServerMessage::Start);
        Ok(())
    }

    // ---- authority side ----

    /// Validates and executes one delivered client call. On rejection the
    /// proposer is notified and no state changes anywhere.
    pub fn handle_client(
        &mut self,
        from: ParticipantId,
        msg: ClientMessage,
    ) -> Result<(), Reject> {
        if self.role != Role::Authority {
            return Err(Reject::NotAuthority);
        }

        let result = self.execute_client(from, msg);
        if let Err(reason) = result {
            warn!("rejected call from participant {}: {reason}", from.0);
            self.transport.call(
                CallTarget::One(from),
                &ServerMessage::Rejected {
                    proposer: from,
                    reason,
                },
            );
        }
        result
    }

    fn execute_client(&mut self, from: ParticipantId, msg: ClientMessage) -> Result<(), Reject> {
        match msg {
            ClientMessage::RequestMoves { piece } => {
                // Read-only: served even while a promotion blocks the turn.
                let p = self.state.board.piece(piece).ok_or(Reject::UnknownPiece)?;
                let candidates = candidate_moves(&self.state.board, &self.state.turn, p);
                debug!(
                    "serving {} candidates for piece {}",
                    candidates.len(),
                    piece.0
                );
                self.broadcast(ServerMessage::Moves { piece, candidates });
                Ok(())
            }
            ClientMessage::ProposeMove {
                piece,
                target,
                kind,
            } => {
                self.validate_proposal(from, piece, target, kind)?;
                self.broadcast(ServerMessage::Committed {
                    piece,
                    target,
                    kind,
                });
                Ok(())
            }
            ClientMessage::ResolvePromotion { piece, choice } => {
                self.validate_promotion(from, piece, choice)?;
                self.broadcast(ServerMessage::Promoted { piece, choice });
                Ok(())
            }
            ClientMessage::Forfeit => {
                if !self.is_game_over() {
                    self.broadcast(ServerMessage::GameOver {
                        winner: from.color().other(),
                    });
                }
                Ok(())
            }
        }
    }

    /// The authority re-validates everything it is told: ownership, turn,
    /// and membership in a freshly recomputed candidate set. Stale
    /// proposals (captured piece, changed board) fail one of these.
    fn validate_proposal(
        &self,
        from: ParticipantId,
        piece: PieceId,
        target: Coord,
        kind: MoveKind,
    ) -> Result<(), Reject> {
        if self.is_game_over() {
            return Err(Reject::GameOver);
        }
        if self.state.turn.promotion_pending() {
            return Err(Reject::PromotionPending);
        }
        if !target.on_board() {
            return Err(Reject::OffBoard);
        }
        let p = self.state.board.piece(piece).ok_or(Reject::UnknownPiece)?;
        if p.color != from.color() {
            return Err(Reject::NotYourPiece);
        }
        if p.color != self.state.turn.current_player() {
            return Err(Reject::NotYourTurn);
        }

        let candidates = candidate_moves(&self.state.board, &self.state.turn, p);
        if !candidates.contains(&CandidateMove::new(target, kind)) {
            return Err(Reject::IllegalMove);
        }
        Ok(())
    }

    fn validate_promotion(
        &self,
        from: ParticipantId,
        piece: PieceId,
        choice: PieceKind,
    ) -> Result<(), Reject> {
        if self.is_game_over() {
            return Err(Reject::GameOver);
        }
        if self.state.turn.pending_promotion() != Some(piece) {
            return Err(Reject::NoPromotionPending);
        }
        let pawn = self.state.board.piece(piece).ok_or(Reject::UnknownPiece)?;
        if pawn.color != from.color() {
            return Err(Reject::NotPromotionOwner);
        }
        if !PROMOTION_KINDS.contains(&choice) {
            return Err(Reject::BadPromotionChoice);
        }
        Ok(())
    }

    fn broadcast(&mut self, msg: ServerMessage) {
        // Apply locally first so the authority's own view converges, then
        // fan out to the other participants.
        self.apply_server(&msg);
        self.transport.call(CallTarget::All, &msg);
    }

    // ---- replica side ----

    /// Applies one delivered broadcast to the local view.
    pub fn handle_server(&mut self, msg: &ServerMessage) {
        self.apply_server(msg);
    }

    fn apply_server(&mut self, msg: &ServerMessage) {
        match msg {
            ServerMessage::Start => {
                self.state = GameState::standard();
                self.plates = None;
                self.started = true;
                info!("game initialized, {:?} to move", self.current_player());
            }
            ServerMessage::Moves { piece, candidates } => {
                self.plates = Some(PlateSet {
                    piece: *piece,
                    candidates: candidates.clone(),
                });
            }
            ServerMessage::Committed {
                piece,
                target,
                kind,
            } => {
                self.plates = None;
                let outcome = self.state.commit(*piece, *target, *kind);
                if let Some(winner) = outcome.winner {
                    info!("king captured, {winner:?} wins");
                } else if outcome.promotion_triggered {
                    info!("pawn {} reached the back rank, awaiting promotion", piece.0);
                } else {
                    debug!(
                        "applied {kind:?} move of piece {} to {target:?}, {:?} to move",
                        piece.0,
                        self.current_player()
                    );
                }
            }
            ServerMessage::Promoted { piece, choice } => {
                self.state.resolve_promotion(*piece, *choice);
                info!(
                    "pawn {} promoted to {choice:?}, {:?} to move",
                    piece.0,
                    self.current_player()
                );
            }
            ServerMessage::GameOver { winner } => {
                self.plates = None;
                self.state.force_game_over(*winner);
                info!("game over, {winner:?} wins");
            }
            ServerMessage::Rejected { reason, .. } => {
                // Rendering the refusal is the UI's concern.
                warn!("proposal rejected: {reason}");
            }
        }
    }
}
