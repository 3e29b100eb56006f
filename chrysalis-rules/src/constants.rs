//! 规则常量定义

use crate::piece::PieceType;

/// 棋盘宽度（列数，a-h）
pub const BOARD_FILES: u8 = 8;

/// 棋盘高度（行数，1-8）
pub const BOARD_RANKS: u8 = 8;

/// 格子总数
pub const SQUARE_COUNT: usize = 64;

/// 蛹化区最低行
pub const ZONE_MIN_RANK: u8 = 3;

/// 蛹化区最高行
pub const ZONE_MAX_RANK: u8 = 6;

/// 初始手数
pub const INITIAL_MOVE_NUMBER: u32 = 1;

/// 每方每种棋子的库存上限（K1 Q1 R2 B2 N2 P8）
pub const fn stock_cap(piece_type: PieceType) -> u8 {
    match piece_type {
        PieceType::King => 1,
        PieceType::Queen => 1,
        PieceType::Rook => 2,
        PieceType::Bishop => 2,
        PieceType::Knight => 2,
        PieceType::Pawn => 8,
    }
}

/// 升变时 AI 的默认选择顺序
pub const PROMOTION_PREFERENCE: [PieceType; 5] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::King,
];
