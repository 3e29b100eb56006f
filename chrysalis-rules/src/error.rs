//! 错误类型定义

use thiserror::Error;

use crate::piece::{Color, PieceType, Position};

/// 规则错误
///
/// 全部为"软失败"：调用方拿到的是原状态加上一条可读的提示信息
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 起始格没有棋子
    #[error("No piece at {0}")]
    NoPiece(Position),

    /// 不是该方的回合
    #[error("Not {0}'s turn")]
    NotYourTurn(Color),

    /// 该方还有待选择的升变
    #[error("{0} must choose a promotion first")]
    PromotionPending(Color),

    /// 目标格不在合法走法内
    #[error("Illegal move: {from} -> {to}")]
    IllegalMove { from: Position, to: Position },

    /// 己方王不在棋盘上时不能吃王
    #[error("{0} cannot capture a king without its own king on the board")]
    KingCaptureWithoutKing(Color),

    /// 王仍在保护期内
    #[error("The {0} king is protected until move {1}")]
    KingProtected(Color, u32),

    /// 没有待处理的升变
    #[error("No promotion is pending")]
    NoPromotionPending,

    /// 该类型棋子在场数量已达上限
    #[error("Cannot promote to {0:?}: already at its cap")]
    PromotionCapReached(PieceType),

    /// 不允许升变为该类型
    #[error("Cannot promote to {0:?}")]
    InvalidPromotion(PieceType),

    /// 无效的格子标识
    #[error("Invalid square: {0:?}")]
    InvalidSquare(String),
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, RuleError>;
