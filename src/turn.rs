use serde::{Deserialize, Serialize};

use crate::pieces::{Color, PieceId};

/// The pawn that moved most recently, with the rank it started from.
/// En passant eligibility is derived from this pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnTrack {
    pub piece: PieceId,
    pub initial_y: i32,
}

/// Derived view of the turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitingForMove(Color),
    PromotionPending(Color),
    GameOver(Color),
}

/// Whose turn it is, whether the game has ended, and the bookkeeping that
/// spans turns (last moved pawn, pending promotion).
///
/// The executor is the only writer during a game; `end_turn` is a no-op
/// while a promotion is pending or after the game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    current_player: Color,
    winner: Option<Color>,
    /// The pawn awaiting its replacement kind, if any.
    pending_promotion: Option<PieceId>,
    last_moved_pawn: Option<PawnTrack>,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            current_player: Color::White,
            winner: None,
            pending_promotion: None,
            last_moved_pawn: None,
        }
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    #[inline]
    pub fn promotion_pending(&self) -> bool {
        self.pending_promotion.is_some()
    }

    #[inline]
    pub fn pending_promotion(&self) -> Option<PieceId> {
        self.pending_promotion
    }

    #[inline]
    pub fn last_moved_pawn(&self) -> Option<PawnTrack> {
        self.last_moved_pawn
    }

    pub fn phase(&self) -> Phase {
        if let Some(w) = self.winner {
            Phase::GameOver(w)
        } else if self.pending_promotion.is_some() {
            Phase::PromotionPending(self.current_player)
        } else {
            Phase::WaitingForMove(self.current_player)
        }
    }

    /// Hands the move to the opponent. No-op while a promotion is pending
    /// or after the game is over.
    pub fn end_turn(&mut self) {
        if self.pending_promotion.is_some() || self.winner.is_some() {
            return;
        }
        self.current_player = self.current_player.other();
    }

    /// Records the mover's pawn double step, or clears the track for any
    /// other move. Eligibility for en passant therefore lasts exactly one
    /// reply turn.
    pub(crate) fn set_pawn_track(&mut self, track: Option<PawnTrack>) {
        self.last_moved_pawn = track;
    }

    /// Blocks turn advancement until `resolve_promotion` re-types the pawn.
    pub(crate) fn begin_promotion(&mut self, pawn: PieceId) {
        self.pending_promotion = Some(pawn);
    }

    /// Clears the pending promotion and runs the deferred turn change.
    pub(crate) fn finish_promotion(&mut self) {
        self.pending_promotion = None;
        self.end_turn();
    }

    /// Terminal until an explicit session reset.
    pub(crate) fn declare_winner(&mut self, winner: Color) {
        self.winner = Some(winner);
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
