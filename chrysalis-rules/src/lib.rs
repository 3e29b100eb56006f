//! 蛹棋（Chrysalis Chess）规则库
//!
//! 包含:
//! - 棋子、格子、棋盘、对局状态等核心数据结构
//! - 蛹与已分化棋子的走法生成
//! - 蓝色符号驱动的自动变形
//! - 走子、吃子、升变借用与到期处理
//! - 胜负判定（吃王、将死、无子可动）

mod apply;
mod board;
mod constants;
mod error;
mod moves;
mod outcome;
mod piece;
mod state;
mod transform;

pub use board::{Board, Square};
pub use constants::*;
pub use error::{Result, RuleError};
pub use moves::{Move, MoveGenerator};
pub use outcome::{GameResult, WinDetector, WinReason};
pub use piece::{Color, Occupant, Piece, PieceType, Position};
pub use state::{GameState, LastMove, PendingPromotion, PieceCounts};
pub use transform::Transformer;
