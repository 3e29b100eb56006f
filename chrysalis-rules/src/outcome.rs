//! 胜负判定

use serde::{Deserialize, Serialize};

use crate::moves::MoveGenerator;
use crate::piece::{Color, Occupant, PieceType};
use crate::state::GameState;

/// 胜利原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// 吃掉了对方的王
    KingCaptured,
    /// 将死（只看王自身能否逃走）
    Checkmate,
    /// 对方没有王，兵和蛹也都动不了
    Immobilized,
}

impl std::fmt::Display for WinReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinReason::KingCaptured => write!(f, "king captured"),
            WinReason::Checkmate => write!(f, "checkmate"),
            WinReason::Immobilized => write!(f, "no king + no mobile pawns/metamorphs"),
        }
    }
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Color,
    pub reason: WinReason,
}

impl GameResult {
    pub fn new(winner: Color, reason: WinReason) -> Self {
        Self { winner, reason }
    }
}

/// 胜负判定器
pub struct WinDetector;

impl WinDetector {
    /// 以刚走完的一方为视角判断胜负
    pub fn evaluate(state: &GameState, mover: Color, king_captured: bool) -> Option<GameResult> {
        if king_captured {
            return Some(GameResult::new(mover, WinReason::KingCaptured));
        }

        let opponent = mover.opponent();
        if Self::is_checkmated(state, opponent) {
            return Some(GameResult::new(mover, WinReason::Checkmate));
        }

        // 先查对方再查自己
        for color in [opponent, mover] {
            if Self::is_immobilized(state, color) {
                return Some(GameResult::new(color.opponent(), WinReason::Immobilized));
            }
        }

        None
    }

    /// 王是否被攻击（在场才算）
    pub fn is_king_in_danger(state: &GameState, color: Color) -> bool {
        state.king_on_board(color) && MoveGenerator::is_king_attacked(&state.board, color)
    }

    /// 指定阵营的王是否被将死
    ///
    /// 只检查王自己的逃跑格，不考虑垫子或吃掉攻击者
    pub fn is_checkmated(state: &GameState, color: Color) -> bool {
        if !state.king_on_board(color) {
            return false;
        }
        let Some(king) = state.board.find_king(color) else {
            return false;
        };

        let attacker = color.opponent();
        if !MoveGenerator::is_attacked(&state.board, king, attacker) {
            return false;
        }

        MoveGenerator::destinations(&state.board, king)
            .into_iter()
            .all(|escape| MoveGenerator::is_attacked(&state.board, escape, attacker))
    }

    /// 指定阵营是否已无王且兵、蛹都无法移动
    pub fn is_immobilized(state: &GameState, color: Color) -> bool {
        if state.king_on_board(color) {
            return false;
        }

        state
            .board
            .occupants(color)
            .into_iter()
            .filter(|(_, occupant)| match occupant {
                Occupant::Metamorph(_) => true,
                Occupant::Piece(piece) => piece.piece_type == PieceType::Pawn,
                Occupant::Empty => false,
            })
            .all(|(pos, _)| MoveGenerator::destinations(&state.board, pos).is_empty())
    }
}
