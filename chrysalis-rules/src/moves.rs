//! 走法生成

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{Color, Occupant, Piece, PieceType, Position};

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始位置
    pub from: Position,
    /// 目标位置
    pub to: Position,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 指定格子上占据者的全部合法目标格
    pub fn destinations(board: &Board, pos: Position) -> Vec<Position> {
        match board.get(pos) {
            Occupant::Empty => Vec::new(),
            Occupant::Metamorph(color) => Self::metamorph_destinations(board, pos, color),
            Occupant::Piece(piece) => Self::piece_destinations(board, pos, &piece),
        }
    }

    /// 指定阵营的全部走法（蛹和棋子）
    pub fn generate_all(board: &Board, color: Color) -> Vec<Move> {
        board
            .occupants(color)
            .into_iter()
            .flat_map(|(from, _)| {
                Self::destinations(board, from)
                    .into_iter()
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    /// 指定阵营的走法总数
    pub fn mobility(board: &Board, color: Color) -> usize {
        board
            .occupants(color)
            .into_iter()
            .map(|(pos, _)| Self::destinations(board, pos).len())
            .sum()
    }

    /// 蛹的走法：向中心前进一格，只能走到空格
    pub fn metamorph_destinations(board: &Board, pos: Position, color: Color) -> Vec<Position> {
        pos.offset(0, color.forward())
            .filter(|to| board.get(*to).is_empty())
            .into_iter()
            .collect()
    }

    /// 已分化棋子的走法
    ///
    /// 非借用棋子的目标格必须在 3-6 行
    pub fn piece_destinations(board: &Board, pos: Position, piece: &Piece) -> Vec<Position> {
        let mut moves = Vec::with_capacity(16);
        let color = piece.color;

        match piece.piece_type {
            PieceType::King => Self::generate_step_moves(board, pos, color, &KING_OFFSETS, &mut moves),
            PieceType::Knight => {
                Self::generate_step_moves(board, pos, color, &KNIGHT_OFFSETS, &mut moves)
            }
            PieceType::Rook => Self::generate_slide_moves(board, pos, color, &ROOK_DIRECTIONS, &mut moves),
            PieceType::Bishop => {
                Self::generate_slide_moves(board, pos, color, &BISHOP_DIRECTIONS, &mut moves)
            }
            PieceType::Queen => {
                Self::generate_slide_moves(board, pos, color, &ROOK_DIRECTIONS, &mut moves);
                Self::generate_slide_moves(board, pos, color, &BISHOP_DIRECTIONS, &mut moves);
            }
            PieceType::Pawn => Self::generate_pawn_moves(board, pos, color, &mut moves),
        }

        if !piece.is_loan() {
            moves.retain(|to| to.in_zone());
        }
        moves
    }

    /// 马和王：固定偏移
    fn generate_step_moves(
        board: &Board,
        pos: Position,
        color: Color,
        offsets: &[(i8, i8)],
        moves: &mut Vec<Position>,
    ) {
        for &(df, dr) in offsets {
            if let Some(to) = pos.offset(df, dr) {
                Self::try_add_move(board, to, color, moves);
            }
        }
    }

    /// 车、象、后：沿射线滑动，遇子即停
    fn generate_slide_moves(
        board: &Board,
        pos: Position,
        color: Color,
        directions: &[(i8, i8)],
        moves: &mut Vec<Position>,
    ) {
        for &(df, dr) in directions {
            let mut current = pos;
            while let Some(to) = current.offset(df, dr) {
                if !Self::try_add_move(board, to, color, moves) {
                    break;
                }
                current = to;
            }
        }
    }

    /// 兵：前进一格（空格），斜前方吃子；无双步、无吃过路兵
    fn generate_pawn_moves(board: &Board, pos: Position, color: Color, moves: &mut Vec<Position>) {
        let forward = color.forward();

        if let Some(to) = pos.offset(0, forward) {
            if board.get(to).is_empty() {
                moves.push(to);
            }
        }

        for df in [-1i8, 1i8] {
            if let Some(to) = pos.offset(df, forward) {
                if board.get(to).color() == Some(color.opponent()) {
                    moves.push(to);
                }
            }
        }
    }

    /// 尝试添加走法，返回目标格是否为空（滑动时用于判断能否继续）
    fn try_add_move(board: &Board, to: Position, color: Color, moves: &mut Vec<Position>) -> bool {
        match board.get(to).color() {
            None => {
                moves.push(to);
                true
            }
            Some(owner) => {
                if owner != color {
                    moves.push(to);
                }
                false
            }
        }
    }

    /// 目标格是否被指定阵营的任一已分化棋子攻击
    pub fn is_attacked(board: &Board, target: Position, by: Color) -> bool {
        board
            .pieces(by)
            .iter()
            .any(|(pos, piece)| Self::piece_destinations(board, *pos, piece).contains(&target))
    }

    /// 指定阵营的王是否被攻击
    pub fn is_king_attacked(board: &Board, color: Color) -> bool {
        match board.find_king(color) {
            Some(king) => Self::is_attacked(board, king, color.opponent()),
            None => false,
        }
    }
}
