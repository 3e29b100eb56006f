//! 棋盘

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_FILES, BOARD_RANKS, SQUARE_COUNT};
use crate::piece::{Color, Occupant, Piece, PieceType, Position};

/// 单个格子
///
/// 坐标与蓝色符号在开局后固定，只有占据者会变化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    pub position: Position,
    /// 蛹化区格子上的隐藏符号，决定停在此处的棋子变成什么
    pub blue_symbol: Option<PieceType>,
    pub occupant: Occupant,
}

/// 8x8 棋盘，索引为 (rank - 1) * 8 + file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: Vec<Square>,
}

impl Board {
    /// 创建空棋盘（无符号、无棋子）
    pub fn empty() -> Self {
        let mut squares = Vec::with_capacity(SQUARE_COUNT);
        for rank in 1..=BOARD_RANKS {
            for file in 0..BOARD_FILES {
                squares.push(Square {
                    position: Position::new_unchecked(file, rank),
                    blue_symbol: None,
                    occupant: Occupant::Empty,
                });
            }
        }
        Self { squares }
    }

    /// 获取格子
    pub fn square(&self, pos: Position) -> &Square {
        &self.squares[pos.to_index()]
    }

    /// 获取指定位置的占据者
    pub fn get(&self, pos: Position) -> Occupant {
        self.square(pos).occupant
    }

    /// 设置指定位置的占据者
    pub fn set(&mut self, pos: Position, occupant: Occupant) {
        self.squares[pos.to_index()].occupant = occupant;
    }

    /// 放置一个已分化棋子
    pub fn put(&mut self, pos: Position, piece: Piece) {
        self.set(pos, Occupant::Piece(piece));
    }

    /// 获取蓝色符号
    pub fn symbol(&self, pos: Position) -> Option<PieceType> {
        self.square(pos).blue_symbol
    }

    /// 设置蓝色符号（仅用于开局布置）
    pub fn set_symbol(&mut self, pos: Position, symbol: Option<PieceType>) {
        self.squares[pos.to_index()].blue_symbol = symbol;
    }

    /// 获取指定位置的可变棋子
    pub fn piece_mut(&mut self, pos: Position) -> Option<&mut Piece> {
        self.squares[pos.to_index()].occupant.piece_mut()
    }

    /// 移动占据者（不检查规则），返回目标格原有的占据者
    pub fn move_occupant(&mut self, from: Position, to: Position) -> Occupant {
        let moving = self.get(from);
        let captured = self.get(to);
        self.set(from, Occupant::Empty);
        self.set(to, moving);
        captured
    }

    /// 遍历全部格子
    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }

    /// 获取指定阵营的所有占据者（蛹和棋子）
    pub fn occupants(&self, color: Color) -> Vec<(Position, Occupant)> {
        self.squares
            .iter()
            .filter(|sq| sq.occupant.color() == Some(color))
            .map(|sq| (sq.position, sq.occupant))
            .collect()
    }

    /// 获取指定阵营的所有已分化棋子
    pub fn pieces(&self, color: Color) -> Vec<(Position, Piece)> {
        self.squares
            .iter()
            .filter_map(|sq| match sq.occupant {
                Occupant::Piece(piece) if piece.color == color => Some((sq.position, piece)),
                _ => None,
            })
            .collect()
    }

    /// 查找指定阵营的王
    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces(color)
            .into_iter()
            .find(|(_, piece)| piece.piece_type == PieceType::King)
            .map(|(pos, _)| pos)
    }

    /// 统计指定阵营、指定类型的在场棋子数（含借用棋子）
    pub fn count(&self, color: Color, piece_type: PieceType) -> u8 {
        self.pieces(color)
            .iter()
            .filter(|(_, piece)| piece.piece_type == piece_type)
            .count() as u8
    }

    /// 统计指定阵营的蛹数量
    pub fn metamorph_count(&self, color: Color) -> usize {
        self.squares
            .iter()
            .filter(|sq| sq.occupant == Occupant::Metamorph(color))
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
