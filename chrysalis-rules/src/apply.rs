//! 状态转移：走子与升变
//!
//! 这里是唯一修改对局状态的地方。所有操作都基于旧状态的副本，
//! 成功时返回新状态，失败时返回 [`RuleError`]；
//! 不带 `try_` 前缀的版本把错误写进 `message` 后原样返回旧状态。

use crate::constants::stock_cap;
use crate::error::{Result, RuleError};
use crate::moves::MoveGenerator;
use crate::outcome::WinDetector;
use crate::piece::{Color, Occupant, Piece, PieceType, Position};
use crate::state::{GameState, LastMove, PendingPromotion};
use crate::transform::Transformer;

impl GameState {
    /// 走子（软失败版本）
    pub fn apply(&self, from: Position, to: Position) -> GameState {
        let result = self.try_apply(from, to);
        self.or_soft_failure(result)
    }

    /// 用格子标识走子，例如 `apply_ids("e7", "e6")`
    pub fn apply_ids(&self, from: &str, to: &str) -> GameState {
        let result = from
            .parse::<Position>()
            .and_then(|from| Ok((from, to.parse::<Position>()?)))
            .and_then(|(from, to)| self.try_apply(from, to));
        self.or_soft_failure(result)
    }

    /// 选择升变类型（软失败版本）
    pub fn resolve_promotion(&self, chosen: PieceType) -> GameState {
        let result = self.try_resolve_promotion(chosen);
        self.or_soft_failure(result)
    }

    /// 走子
    pub fn try_apply(&self, from: Position, to: Position) -> Result<GameState> {
        if self.is_over() {
            return Err(RuleError::GameOver);
        }

        let mover = self.board.get(from).color().ok_or(RuleError::NoPiece(from))?;
        if mover != self.turn {
            return Err(RuleError::NotYourTurn(mover));
        }
        if self.promotion.is_some_and(|p| p.color == mover) {
            return Err(RuleError::PromotionPending(mover));
        }
        if !MoveGenerator::destinations(&self.board, from).contains(&to) {
            return Err(RuleError::IllegalMove { from, to });
        }

        let target = self.board.get(to);
        if let Occupant::Piece(victim) = target {
            if victim.piece_type == PieceType::King {
                if !self.king_on_board(mover) {
                    return Err(RuleError::KingCaptureWithoutKing(mover));
                }
                if let Some(until) = self.king_protected_until[victim.color.index()] {
                    if self.is_king_protected(victim.color) {
                        return Err(RuleError::KingProtected(victim.color, until));
                    }
                }
            }
        }

        let mut next = self.clone();
        next.message = None;

        // 吃子进阵亡池
        let mut king_captured = false;
        if let Occupant::Piece(victim) = target {
            next.quietus_mut(victim.color).increment(victim.piece_type);
            if victim.piece_type == PieceType::King {
                next.set_king_on_board(victim.color, false);
                king_captured = true;
            }
        }

        next.board.move_occupant(from, to);

        // 借用棋子回到蛹化区即安全
        let mut was_loan = false;
        if let Some(piece) = next.board.piece_mut(to) {
            was_loan = piece.is_loan();
            if was_loan && to.in_zone() {
                piece.clear_loan();
            }
        }

        if next.board.symbol(to).is_some() {
            let protect_until = if was_loan {
                next.move_number + 1
            } else {
                next.move_number
            };
            Transformer::transform_square(&mut next, to, protect_until);
        }

        // 升变槽位只有一个，见 `GameState::promotion`
        if let Occupant::Piece(piece) = next.board.get(to) {
            if piece.piece_type == PieceType::Pawn && to.rank == mover.far_rank() {
                next.promotion = Some(PendingPromotion { square: to, color: mover });
            }
        }

        next.turn = mover.opponent();
        next.move_number += 1;
        next.last_move = Some(LastMove { from, to, mover });

        next.expire_loans(mover);
        Transformer::sweep(&mut next);

        tracing::debug!("第 {} 手: {} {} -> {}", self.move_number, mover, from, to);
        next.finish_turn(mover, king_captured);
        Ok(next)
    }

    /// 选择升变类型
    ///
    /// 阵亡池里有同类棋子时复活一个，否则凭空生成；
    /// 生成的都是借用棋子，下一手之前必须回到蛹化区
    pub fn try_resolve_promotion(&self, chosen: PieceType) -> Result<GameState> {
        if self.is_over() {
            return Err(RuleError::GameOver);
        }
        let pending = self.promotion.ok_or(RuleError::NoPromotionPending)?;
        if chosen == PieceType::Pawn {
            return Err(RuleError::InvalidPromotion(chosen));
        }
        let color = pending.color;
        if self.active_count(color, chosen) >= stock_cap(chosen) {
            return Err(RuleError::PromotionCapReached(chosen));
        }

        let mut next = self.clone();
        next.message = None;

        let revived = next.quietus_mut(color).take(chosen);
        let return_by = next.move_number + 1;
        next.board
            .put(pending.square, Piece::loan(color, chosen, next.move_number, return_by));
        if chosen == PieceType::King {
            next.set_king_on_board(color, true);
            next.protect_king(color, return_by);
        }
        next.promotion = None;

        tracing::debug!(
            "{} 方在 {} 升变为 {:?}（{}）",
            color,
            pending.square,
            chosen,
            if revived { "复活" } else { "新建" }
        );

        Transformer::sweep(&mut next);
        next.finish_turn(color, false);
        Ok(next)
    }

    /// 处理到期的借用棋子：只处理刚走完一方的棋子
    fn expire_loans(&mut self, mover: Color) {
        let move_number = self.move_number;
        for (pos, piece) in self.board.pieces(mover) {
            let Some(return_by) = piece.return_by_move else {
                continue;
            };
            if !piece.is_loan() || move_number < return_by {
                continue;
            }

            if pos.in_zone() {
                if let Some(piece) = self.board.piece_mut(pos) {
                    piece.clear_loan();
                }
            } else {
                self.board.set(pos, Occupant::Empty);
                if piece.piece_type == PieceType::King {
                    self.set_king_on_board(mover, false);
                }
                tracing::debug!("{} 方借用的 {:?} 未按时返回，已移除 ({})", mover, piece.piece_type, pos);
            }
        }
    }

    /// 判定胜负并冻结结果
    fn finish_turn(&mut self, mover: Color, king_captured: bool) {
        if let Some(result) = WinDetector::evaluate(self, mover, king_captured) {
            tracing::info!("对局结束: {} 胜 ({})", result.winner, result.reason);
            self.result = Some(result);
        }
    }

    /// 软失败：保留旧状态，附上提示信息
    fn or_soft_failure(&self, result: Result<GameState>) -> GameState {
        match result {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!("操作被拒绝: {}", err);
                let mut unchanged = self.clone();
                unchanged.message = Some(err.to_string());
                unchanged
            }
        }
    }
}
