//! 完整的对局状态

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::{stock_cap, BOARD_FILES, INITIAL_MOVE_NUMBER};
use crate::moves::MoveGenerator;
use crate::outcome::GameResult;
use crate::piece::{Color, Occupant, PieceType, Position};

/// 每种棋子的计数（库存或阵亡池）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PieceCounts {
    counts: [u8; 6],
}

impl PieceCounts {
    /// 全为 0
    pub fn empty() -> Self {
        Self::default()
    }

    /// 每种棋子都是上限值
    pub fn full() -> Self {
        let mut counts = [0; 6];
        for piece_type in PieceType::ALL {
            counts[piece_type.index()] = stock_cap(piece_type);
        }
        Self { counts }
    }

    pub fn get(&self, piece_type: PieceType) -> u8 {
        self.counts[piece_type.index()]
    }

    pub fn set(&mut self, piece_type: PieceType, value: u8) {
        self.counts[piece_type.index()] = value;
    }

    /// 加一
    pub fn increment(&mut self, piece_type: PieceType) {
        self.counts[piece_type.index()] += 1;
    }

    /// 加一，但不超过上限
    pub fn increment_capped(&mut self, piece_type: PieceType) {
        let slot = &mut self.counts[piece_type.index()];
        *slot = (*slot + 1).min(stock_cap(piece_type));
    }

    /// 减一，为 0 时返回 false
    pub fn take(&mut self, piece_type: PieceType) -> bool {
        let slot = &mut self.counts[piece_type.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// 总数
    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| c as u32).sum()
    }
}

/// 等待选择类型的升变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPromotion {
    pub square: Position,
    pub color: Color,
}

/// 最后一步走法（仅供界面高亮）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    pub from: Position,
    pub to: Position,
    pub mover: Color,
}

/// 对局状态
///
/// 每次走子都会产生一个新的实例，旧实例保持不变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// 棋盘
    pub board: Board,
    /// 当前走子方
    pub turn: Color,
    /// 手数，每走一步 +1
    pub move_number: u32,
    /// 库存 [color]
    pub stock: [PieceCounts; 2],
    /// 阵亡池 [color]
    pub quietus: [PieceCounts; 2],
    /// 王是否在场 [color]
    pub king_on_board: [bool; 2],
    /// 王的保护期截止手数 [color]
    pub king_protected_until: [Option<u32>; 2],
    /// 待选择的升变
    ///
    /// 只有一个槽位：非借用的兵离不开 3-6 行，只有借用兵能走到底线，
    /// 双方同时挂起升变的情况在正常对局中不会出现
    pub promotion: Option<PendingPromotion>,
    /// 对局结果，设置后不再接受走子
    pub result: Option<GameResult>,
    /// 最后一步走法
    pub last_move: Option<LastMove>,
    /// 最近一次软失败的提示信息
    pub message: Option<String>,
}

impl GameState {
    /// 开新局（使用线程随机数）
    pub fn new_game() -> Self {
        Self::new_game_with_rng(&mut rand::thread_rng())
    }

    /// 开新局
    ///
    /// 3-6 行的 32 个格子随机分配两套完整的符号，
    /// 黑方的蛹占满 1-2 行，白方的蛹占满 7-8 行
    pub fn new_game_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut board = Board::empty();

        let mut symbols: Vec<PieceType> = Color::BOTH
            .iter()
            .flat_map(|_| PieceType::ALL)
            .flat_map(|piece_type| std::iter::repeat(piece_type).take(stock_cap(piece_type) as usize))
            .collect();
        symbols.shuffle(rng);

        let zone_squares: Vec<Position> = board
            .squares()
            .map(|sq| sq.position)
            .filter(|pos| pos.in_zone())
            .collect();
        for (pos, symbol) in zone_squares.into_iter().zip(symbols) {
            board.set_symbol(pos, Some(symbol));
        }

        for file in 0..BOARD_FILES {
            for rank in [1, 2] {
                board.set(Position::new_unchecked(file, rank), Occupant::Metamorph(Color::Black));
            }
            for rank in [7, 8] {
                board.set(Position::new_unchecked(file, rank), Occupant::Metamorph(Color::White));
            }
        }

        tracing::debug!("新对局已布置");
        Self::from_board(board, Color::White)
    }

    /// 从棋盘创建状态（满库存、空阵亡池，王是否在场由棋盘推出）
    pub fn from_board(board: Board, turn: Color) -> Self {
        let king_on_board = [
            board.find_king(Color::White).is_some(),
            board.find_king(Color::Black).is_some(),
        ];
        Self {
            board,
            turn,
            move_number: INITIAL_MOVE_NUMBER,
            stock: [PieceCounts::full(), PieceCounts::full()],
            quietus: [PieceCounts::empty(), PieceCounts::empty()],
            king_on_board,
            king_protected_until: [None, None],
            promotion: None,
            result: None,
            last_move: None,
            message: None,
        }
    }

    pub fn stock(&self, color: Color) -> &PieceCounts {
        &self.stock[color.index()]
    }

    pub fn stock_mut(&mut self, color: Color) -> &mut PieceCounts {
        &mut self.stock[color.index()]
    }

    pub fn quietus(&self, color: Color) -> &PieceCounts {
        &self.quietus[color.index()]
    }

    pub fn quietus_mut(&mut self, color: Color) -> &mut PieceCounts {
        &mut self.quietus[color.index()]
    }

    pub fn king_on_board(&self, color: Color) -> bool {
        self.king_on_board[color.index()]
    }

    pub fn set_king_on_board(&mut self, color: Color, on_board: bool) {
        self.king_on_board[color.index()] = on_board;
    }

    /// 设置王的保护期
    pub fn protect_king(&mut self, color: Color, until: u32) {
        self.king_protected_until[color.index()] = Some(until);
    }

    /// 王当前是否处于保护期
    pub fn is_king_protected(&self, color: Color) -> bool {
        self.king_protected_until[color.index()].is_some_and(|until| self.move_number <= until)
    }

    /// 对局是否已结束
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// 胜方
    pub fn winner(&self) -> Option<Color> {
        self.result.as_ref().map(|r| r.winner)
    }

    /// 指定类型的在场数量（含借用棋子）
    pub fn active_count(&self, color: Color, piece_type: PieceType) -> u8 {
        self.board.count(color, piece_type)
    }

    /// 指定格子上棋子的合法目标格（供界面高亮）
    pub fn legal_destinations(&self, pos: Position) -> Vec<Position> {
        MoveGenerator::destinations(&self.board, pos)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seeded_game(seed: u64) -> GameState {
        GameState::new_game_with_rng(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_new_game_metamorphs() {
        let state = seeded_game(1);
        assert_eq!(state.board.metamorph_count(Color::White), 16);
        assert_eq!(state.board.metamorph_count(Color::Black), 16);

        for sq in state.board.squares() {
            match sq.position.rank {
                1 | 2 => assert_eq!(sq.occupant, Occupant::Metamorph(Color::Black)),
                7 | 8 => assert_eq!(sq.occupant, Occupant::Metamorph(Color::White)),
                _ => assert!(sq.occupant.is_empty()),
            }
        }
    }

    #[test]
    fn test_new_game_symbols() {
        let state = seeded_game(7);
        let mut counts = PieceCounts::empty();
        let mut symbol_squares = 0;
        for sq in state.board.squares() {
            match sq.blue_symbol {
                Some(symbol) => {
                    assert!(sq.position.in_zone(), "符号只能在 3-6 行: {}", sq.position);
                    counts.increment(symbol);
                    symbol_squares += 1;
                }
                None => assert!(!sq.position.in_zone()),
            }
        }
        assert_eq!(symbol_squares, 32);
        for piece_type in PieceType::ALL {
            assert_eq!(counts.get(piece_type), 2 * stock_cap(piece_type));
        }
    }

    #[test]
    fn test_new_game_counters() {
        let state = seeded_game(3);
        assert_eq!(state.turn, Color::White);
        assert_eq!(state.move_number, 1);
        for color in Color::BOTH {
            assert_eq!(*state.stock(color), PieceCounts::full());
            assert_eq!(state.quietus(color).total(), 0);
            assert!(!state.king_on_board(color));
        }
        assert!(state.promotion.is_none());
        assert!(!state.is_over());
    }

    #[test]
    fn test_symbols_depend_on_seed() {
        let a = seeded_game(11);
        let b = seeded_game(11);
        let c = seeded_game(12);
        assert_eq!(a, b);
        assert_ne!(a.board, c.board);
    }

    #[test]
    fn test_counts_capped() {
        let mut counts = PieceCounts::full();
        counts.increment_capped(PieceType::Queen);
        assert_eq!(counts.get(PieceType::Queen), 1);
        assert!(counts.take(PieceType::Queen));
        assert!(!counts.take(PieceType::Queen));
        assert_eq!(counts.total(), 15);
    }

    #[test]
    fn test_king_protection_window() {
        let mut state = GameState::from_board(Board::empty(), Color::White);
        assert!(!state.is_king_protected(Color::Black));
        state.protect_king(Color::Black, 4);
        state.move_number = 4;
        assert!(state.is_king_protected(Color::Black));
        state.move_number = 5;
        assert!(!state.is_king_protected(Color::Black));
    }

    #[test]
    fn test_state_json_roundtrip() {
        let state = seeded_game(5);
        let json = serde_json::to_string(&state).unwrap();
        let decoded: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, state);
    }
}
