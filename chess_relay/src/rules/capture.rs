//! Minimal built-in rules implementation.
//!
//! Capture-the-king rules: a side may move any of its own pieces to any
//! square not occupied by its own pieces; losing the king loses the game,
//! and two bare kings draw. Piece-movement legality is intentionally out of
//! scope; this implementation exists to exercise the capability boundary
//! and to make the server runnable without a full chess engine.

use async_trait::async_trait;

use super::{RulesEngine, RulesError, Terminal};
use crate::game::{Board, Color, Move, PieceKind, Square};

/// Capture-the-king rules engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct CaptureRules;

#[async_trait]
impl RulesEngine for CaptureRules {
    async fn legal_moves(
        &self,
        board: &Board,
        actor: Color,
    ) -> Result<Vec<(Square, Square)>, RulesError> {
        let mut moves = Vec::new();
        for (from, piece) in board.squares() {
            if piece.is_none_or(|p| p.color != actor) {
                continue;
            }
            for (to, target) in board.squares() {
                if to != from && target.is_none_or(|t| t.color != actor) {
                    moves.push((from, to));
                }
            }
        }
        Ok(moves)
    }

    async fn apply(&self, board: &Board, mv: &Move) -> Result<Board, RulesError> {
        let piece = board.get(mv.from).ok_or_else(|| {
            RulesError::InvalidBoard(format!("no piece on {} to move", mv.from))
        })?;
        if piece.color != mv.actor {
            return Err(RulesError::InvalidBoard(format!(
                "piece on {} does not belong to {}",
                mv.from, mv.actor
            )));
        }

        let mut next = board.clone();
        next.set(mv.from, None);
        next.set(mv.to, Some(piece));
        Ok(next)
    }

    async fn classify_terminal(&self, board: &Board) -> Result<Terminal, RulesError> {
        let white_king = board.contains(Color::White, PieceKind::King);
        let black_king = board.contains(Color::Black, PieceKind::King);

        let terminal = match (white_king, black_king) {
            (true, false) => Terminal::Winner(Color::White),
            (false, true) => Terminal::Winner(Color::Black),
            (false, false) => Terminal::Draw,
            (true, true) if board.piece_count() == 2 => Terminal::Draw,
            (true, true) => Terminal::InProgress,
        };
        Ok(terminal)
    }
}
