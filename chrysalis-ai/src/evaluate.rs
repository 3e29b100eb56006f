//! 棋局评估函数

use chrysalis_rules::{Color, GameState, MoveGenerator, Occupant, PieceType};

/// 蛹化区内每个棋子的加分
const ZONE_BONUS: f64 = 4.0;

/// 每个可走目标格的加分
const MOBILITY_WEIGHT: f64 = 0.5;

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 棋子基础分值
    pub fn piece_value(piece_type: PieceType) -> f64 {
        match piece_type {
            PieceType::King => 5000.0,
            PieceType::Queen => 900.0,
            PieceType::Rook => 500.0,
            PieceType::Bishop => 330.0,
            PieceType::Knight => 320.0,
            PieceType::Pawn => 100.0,
        }
    }

    /// 以 `color` 的视角评估局面，正值对 `color` 有利
    ///
    /// 已分出胜负时返回正负无穷
    pub fn evaluate(state: &GameState, color: Color) -> f64 {
        if let Some(result) = state.result {
            return if result.winner == color {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
        }

        Self::evaluate_material(state, color) + Self::evaluate_mobility(state, color)
    }

    /// 子力分（含蛹化区加分）
    pub fn evaluate_material(state: &GameState, color: Color) -> f64 {
        state
            .board
            .squares()
            .filter_map(|sq| match sq.occupant {
                Occupant::Piece(piece) => {
                    let mut value = Self::piece_value(piece.piece_type);
                    if sq.position.in_zone() {
                        value += ZONE_BONUS;
                    }
                    Some(if piece.color == color { value } else { -value })
                }
                _ => None,
            })
            .sum()
    }

    /// 机动性分
    pub fn evaluate_mobility(state: &GameState, color: Color) -> f64 {
        let own = MoveGenerator::mobility(&state.board, color) as f64;
        let opponent = MoveGenerator::mobility(&state.board, color.opponent()) as f64;
        MOBILITY_WEIGHT * (own - opponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrysalis_rules::{Board, GameResult, Piece, Position, WinReason};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn test_initial_evaluation() {
        let state = GameState::new_game_with_rng(&mut ChaCha8Rng::seed_from_u64(1));
        // 开局双方都只有蛹，局面完全对称
        assert_eq!(Evaluator::evaluate(&state, Color::White), 0.0);
        assert_eq!(Evaluator::evaluate(&state, Color::Black), 0.0);
    }

    #[test]
    fn test_lone_queen() {
        let mut board = Board::empty();
        board.put(pos("d4"), Piece::new(Color::White, PieceType::Queen, 1));
        let state = GameState::from_board(board, Color::White);

        // 900 + 4（区内）+ 0.5 * 16（走法数）
        assert_eq!(Evaluator::evaluate(&state, Color::White), 912.0);
        assert_eq!(Evaluator::evaluate(&state, Color::Black), -912.0);
    }

    #[test]
    fn test_zone_bonus_only_inside() {
        let mut board = Board::empty();
        board.put(pos("d1"), Piece::loan(Color::Black, PieceType::Rook, 1, 2));
        let state = GameState::from_board(board, Color::Black);
        assert_eq!(Evaluator::evaluate_material(&state, Color::Black), 500.0);
    }

    #[test]
    fn test_terminal_scores() {
        let mut state = GameState::from_board(Board::empty(), Color::White);
        state.result = Some(GameResult::new(Color::Black, WinReason::KingCaptured));
        assert_eq!(Evaluator::evaluate(&state, Color::Black), f64::INFINITY);
        assert_eq!(Evaluator::evaluate(&state, Color::White), f64::NEG_INFINITY);
    }

    #[test]
    fn test_piece_values() {
        assert_eq!(Evaluator::piece_value(PieceType::King), 5000.0);
        assert_eq!(Evaluator::piece_value(PieceType::Queen), 900.0);
        assert_eq!(Evaluator::piece_value(PieceType::Rook), 500.0);
        assert_eq!(Evaluator::piece_value(PieceType::Bishop), 330.0);
        assert_eq!(Evaluator::piece_value(PieceType::Knight), 320.0);
        assert_eq!(Evaluator::piece_value(PieceType::Pawn), 100.0);
    }
}
