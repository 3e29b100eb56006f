//! 棋子与格子坐标定义

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_FILES, BOARD_RANKS, ZONE_MAX_RANK, ZONE_MIN_RANK};
use crate::error::RuleError;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// 全部类型，顺序即计数数组的下标
    pub const ALL: [PieceType; 6] = [
        PieceType::King,
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Pawn,
    ];

    /// 计数数组下标
    pub const fn index(self) -> usize {
        match self {
            PieceType::King => 0,
            PieceType::Queen => 1,
            PieceType::Rook => 2,
            PieceType::Bishop => 3,
            PieceType::Knight => 4,
            PieceType::Pawn => 5,
        }
    }

    /// 单字母表示（K Q R B N P）
    pub fn letter(self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Queen => 'Q',
            PieceType::Rook => 'R',
            PieceType::Bishop => 'B',
            PieceType::Knight => 'N',
            PieceType::Pawn => 'P',
        }
    }

    /// 从单字母解析（大小写均可）
    pub fn from_letter(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'K' => Some(PieceType::King),
            'Q' => Some(PieceType::Queen),
            'R' => Some(PieceType::Rook),
            'B' => Some(PieceType::Bishop),
            'N' => Some(PieceType::Knight),
            'P' => Some(PieceType::Pawn),
            _ => None,
        }
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// 白方（先手，家在 7-8 行，向第 1 行推进）
    White,
    /// 黑方（后手，家在 1-2 行，向第 8 行推进）
    Black,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    /// 获取对方阵营
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 每方计数数组下标
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// 前进方向（行号增量）
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// 兵的底线（到达即升变）
    pub fn far_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => BOARD_RANKS,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// 已分化的棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
    /// 生成时的手数
    pub born_at_move: u32,
    /// 是否为升变借来的限时棋子
    pub must_return: bool,
    /// 借用到期手数
    pub return_by_move: Option<u32>,
}

impl Piece {
    /// 创建普通棋子
    pub fn new(color: Color, piece_type: PieceType, born_at_move: u32) -> Self {
        Self {
            color,
            piece_type,
            born_at_move,
            must_return: false,
            return_by_move: None,
        }
    }

    /// 创建升变借用棋子
    pub fn loan(color: Color, piece_type: PieceType, born_at_move: u32, return_by_move: u32) -> Self {
        Self {
            color,
            piece_type,
            born_at_move,
            must_return: true,
            return_by_move: Some(return_by_move),
        }
    }

    pub fn is_loan(&self) -> bool {
        self.must_return
    }

    /// 清除借用标记（安全返回）
    pub fn clear_loan(&mut self) {
        self.must_return = false;
        self.return_by_move = None;
    }
}

/// 格子上的占据者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Occupant {
    #[default]
    Empty,
    /// 未分化的蛹
    Metamorph(Color),
    /// 已分化的棋子
    Piece(Piece),
}

impl Occupant {
    pub fn is_empty(&self) -> bool {
        matches!(self, Occupant::Empty)
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Occupant::Empty => None,
            Occupant::Metamorph(color) => Some(*color),
            Occupant::Piece(piece) => Some(piece.color),
        }
    }

    pub fn piece(&self) -> Option<&Piece> {
        match self {
            Occupant::Piece(piece) => Some(piece),
            _ => None,
        }
    }

    pub fn piece_mut(&mut self) -> Option<&mut Piece> {
        match self {
            Occupant::Piece(piece) => Some(piece),
            _ => None,
        }
    }
}

/// 棋盘坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// 列 (0-7，对应 a-h)
    pub file: u8,
    /// 行 (1-8)
    pub rank: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < BOARD_FILES && (1..=BOARD_RANKS).contains(&rank) {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    /// 是否位于蛹化区（3-6 行）
    pub fn in_zone(&self) -> bool {
        (ZONE_MIN_RANK..=ZONE_MAX_RANK).contains(&self.rank)
    }

    /// 获取偏移后的位置
    pub fn offset(&self, df: i8, dr: i8) -> Option<Position> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if file < 0 || rank < 1 {
            return None;
        }
        Position::new(file as u8, rank as u8)
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        (self.rank as usize - 1) * BOARD_FILES as usize + self.file as usize
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank)
    }
}

impl FromStr for Position {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RuleError::InvalidSquare(s.to_string());
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        if !('a'..='h').contains(&file) {
            return Err(invalid());
        }
        let rank = rank.to_digit(10).ok_or_else(invalid)? as u8;
        Position::new(file as u8 - b'a', rank).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_valid() {
        assert!(Position::new(0, 1).is_some());
        assert!(Position::new(7, 8).is_some());
        assert!(Position::new(8, 1).is_none());
        assert!(Position::new(0, 0).is_none());
        assert!(Position::new(0, 9).is_none());
    }

    #[test]
    fn test_position_parse() {
        let pos: Position = "e4".parse().unwrap();
        assert_eq!(pos, Position::new_unchecked(4, 4));
        assert_eq!(pos.to_string(), "e4");

        assert_eq!("a1".parse::<Position>().unwrap(), Position::new_unchecked(0, 1));
        assert_eq!("h8".parse::<Position>().unwrap(), Position::new_unchecked(7, 8));

        assert!("i1".parse::<Position>().is_err());
        assert!("a9".parse::<Position>().is_err());
        assert!("a0".parse::<Position>().is_err());
        assert!("e44".parse::<Position>().is_err());
        assert!("".parse::<Position>().is_err());
    }

    #[test]
    fn test_position_index() {
        assert_eq!(Position::new_unchecked(0, 1).to_index(), 0);
        assert_eq!(Position::new_unchecked(7, 1).to_index(), 7);
        assert_eq!(Position::new_unchecked(0, 2).to_index(), 8);
        assert_eq!(Position::new_unchecked(7, 8).to_index(), 63);
    }

    #[test]
    fn test_position_zone() {
        assert!(!Position::new_unchecked(0, 2).in_zone());
        assert!(Position::new_unchecked(0, 3).in_zone());
        assert!(Position::new_unchecked(0, 6).in_zone());
        assert!(!Position::new_unchecked(0, 7).in_zone());
    }

    #[test]
    fn test_offset_edges() {
        let corner = Position::new_unchecked(0, 1);
        assert!(corner.offset(-1, 0).is_none());
        assert!(corner.offset(0, -1).is_none());
        assert_eq!(corner.offset(1, 1), Some(Position::new_unchecked(1, 2)));
    }

    #[test]
    fn test_color_direction() {
        assert_eq!(Color::White.forward(), -1);
        assert_eq!(Color::Black.forward(), 1);
        assert_eq!(Color::White.far_rank(), 1);
        assert_eq!(Color::Black.far_rank(), 8);
        assert_eq!(Color::White.opponent(), Color::Black);
    }

    #[test]
    fn test_piece_letters() {
        for piece_type in PieceType::ALL {
            assert_eq!(PieceType::from_letter(piece_type.letter()), Some(piece_type));
        }
        assert_eq!(PieceType::from_letter('x'), None);
    }

    #[test]
    fn test_loan_flags() {
        let mut piece = Piece::loan(Color::White, PieceType::Queen, 5, 6);
        assert!(piece.is_loan());
        assert_eq!(piece.return_by_move, Some(6));
        piece.clear_loan();
        assert!(!piece.is_loan());
        assert_eq!(piece.return_by_move, None);
    }
}
