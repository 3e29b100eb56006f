//! 无界面对局驱动
//!
//! 只通过规则库的公开接口推进对局：开局、走子、升变、AI 选步

use std::collections::VecDeque;

use chrysalis_ai::{auto_promote, AiConfig, AiEngine};
use chrysalis_rules::{Color, GameState, PieceType};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::settings::{MatchSettings, PlayerKind};

/// 一方的走棋者
enum Player {
    Ai(AiEngine),
    Scripted {
        moves: VecDeque<(String, String)>,
        promote_to: Option<PieceType>,
    },
}

impl Player {
    fn from_kind(kind: &PlayerKind) -> Self {
        match kind {
            PlayerKind::Ai {
                difficulty,
                depth,
                seed,
            } => {
                let mut config = AiConfig::from_difficulty(*difficulty);
                if let Some(depth) = depth {
                    config.max_depth = *depth;
                }
                config.seed = *seed;
                Player::Ai(AiEngine::new(config))
            }
            PlayerKind::Scripted { moves, promote_to } => {
                let promote_to = (*promote_to).and_then(|letter| {
                    let parsed = PieceType::from_letter(letter);
                    if parsed.is_none() {
                        tracing::warn!("无法识别的升变字母 {:?}，改为自动选择", letter);
                    }
                    parsed
                });
                Player::Scripted {
                    moves: moves.iter().cloned().collect(),
                    promote_to,
                }
            }
        }
    }

    /// 走一步；没有下一步时返回 None
    fn play(&mut self, state: &GameState) -> Option<GameState> {
        match self {
            Player::Ai(engine) => {
                let next = engine.select_move(state);
                (next != *state).then_some(next)
            }
            Player::Scripted { moves, promote_to } => {
                let mut current = state.clone();
                if current.promotion.is_some_and(|p| p.color == current.turn) {
                    current = Self::promote(&current, *promote_to)?;
                }
                let (from, to) = moves.pop_front()?;
                let next = current.apply_ids(&from, &to);
                match &next.message {
                    Some(message) => {
                        tracing::warn!("脚本走法 {}-{} 被拒绝: {}", from, to, message);
                        None
                    }
                    None => Some(next),
                }
            }
        }
    }

    /// 脚本方补选升变
    fn promote(state: &GameState, chosen: Option<PieceType>) -> Option<GameState> {
        let (next, piece_type) = match chosen {
            Some(piece_type) => match state.try_resolve_promotion(piece_type) {
                Ok(next) => (next, piece_type),
                Err(err) => {
                    tracing::warn!("脚本升变 {} 被拒绝: {}", piece_type.letter(), err);
                    return None;
                }
            },
            None => auto_promote(state)?,
        };
        tracing::debug!("{} 方升变为 {}", state.turn, piece_type.letter());
        Some(next)
    }
}

/// 对局报告
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub final_state: GameState,
    pub plies: u32,
}

/// 按设置跑完一局
pub fn run_match(settings: &MatchSettings) -> MatchReport {
    let mut state = match settings.board_seed {
        Some(seed) => GameState::new_game_with_rng(&mut ChaCha8Rng::seed_from_u64(seed)),
        None => GameState::new_game(),
    };
    let mut white = Player::from_kind(&settings.white);
    let mut black = Player::from_kind(&settings.black);

    let mut plies = 0;
    while !state.is_over() && plies < settings.max_plies {
        let player = match state.turn {
            Color::White => &mut white,
            Color::Black => &mut black,
        };
        let Some(next) = player.play(&state) else {
            tracing::info!("{} 方无法继续走棋，对局中止", state.turn);
            break;
        };

        if let Some(last) = next.last_move {
            tracing::debug!("第 {} 手: {} {}-{}", state.move_number, last.mover, last.from, last.to);
        }
        state = next;
        plies += 1;
    }

    match state.result {
        Some(result) => tracing::info!(
            "对局结束: {} 胜 ({})，共 {} 步",
            result.winner,
            result.reason,
            plies
        ),
        None => tracing::info!("对局未分胜负，共 {} 步", plies),
    }

    MatchReport {
        final_state: state,
        plies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrysalis_ai::Difficulty;
    use chrysalis_rules::{Board, Occupant, Piece, Position};

    fn scripted(moves: &[(&str, &str)]) -> PlayerKind {
        scripted_with_promotion(moves, None)
    }

    fn scripted_with_promotion(moves: &[(&str, &str)], promote_to: Option<char>) -> PlayerKind {
        PlayerKind::Scripted {
            moves: moves
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            promote_to,
        }
    }

    #[test]
    fn test_scripted_match() {
        let settings = MatchSettings {
            white: scripted(&[("a7", "a6"), ("h7", "h6")]),
            black: scripted(&[("d2", "d3"), ("e2", "e3")]),
            max_plies: 10,
            board_seed: Some(4),
        };
        let report = run_match(&settings);
        // 四步走完后白方脚本用完，对局中止
        assert_eq!(report.plies, 4);
        assert_eq!(report.final_state.move_number, 5);
        assert!(!report.final_state.is_over());
        assert_eq!(
            report.final_state.last_move.map(|m| (m.from.to_string(), m.to.to_string())),
            Some(("e2".to_string(), "e3".to_string()))
        );
    }

    /// 白方借用兵已走到第 1 行，黑方应了一步，轮到白方补选升变
    fn pending_promotion() -> GameState {
        let mut board = Board::empty();
        board.put(pos("c2"), Piece::loan(Color::White, PieceType::Pawn, 1, 10));
        board.set(pos("h7"), Occupant::Metamorph(Color::White));
        board.set(pos("a2"), Occupant::Metamorph(Color::Black));
        board.set(pos("b2"), Occupant::Metamorph(Color::Black));
        let pending = GameState::from_board(board, Color::White)
            .apply_ids("c2", "c1")
            .apply_ids("a2", "a3");
        assert!(pending.message.is_none());
        assert_eq!(pending.turn, Color::White);
        assert!(pending.promotion.is_some());
        pending
    }

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn test_scripted_promotion_uses_letter() {
        let kind = scripted_with_promotion(&[("c1", "d3")], Some('n'));
        let next = Player::from_kind(&kind).play(&pending_promotion()).unwrap();
        assert!(next.promotion.is_none());
        let knight = next.board.get(pos("d3")).piece().copied().unwrap();
        assert_eq!(knight.piece_type, PieceType::Knight);
        assert!(!knight.is_loan());
    }

    #[test]
    fn test_scripted_promotion_defaults_to_queen() {
        let promoted = Player::promote(&pending_promotion(), None).unwrap();
        assert_eq!(
            promoted.board.get(pos("c1")).piece().map(|p| p.piece_type),
            Some(PieceType::Queen)
        );

        // 无法识别的字母退回自动选择
        let player = Player::from_kind(&scripted_with_promotion(&[], Some('x')));
        assert!(matches!(player, Player::Scripted { promote_to: None, .. }));
    }

    #[test]
    fn test_rejected_scripted_promotion_stops() {
        let kind = scripted_with_promotion(&[("h7", "h6")], Some('P'));
        assert!(Player::from_kind(&kind).play(&pending_promotion()).is_none());
    }

    #[test]
    fn test_rejected_script_stops_match() {
        let settings = MatchSettings {
            white: scripted(&[("a8", "a7")]),
            black: scripted(&[]),
            max_plies: 10,
            board_seed: Some(4),
        };
        let report = run_match(&settings);
        assert_eq!(report.plies, 0);
        assert_eq!(report.final_state.move_number, 1);
    }

    #[test]
    fn test_ai_match_respects_ply_limit() {
        let settings = MatchSettings {
            white: PlayerKind::Ai {
                difficulty: Difficulty::Medium,
                depth: None,
                seed: Some(1),
            },
            black: PlayerKind::Ai {
                difficulty: Difficulty::Easy,
                depth: None,
                seed: Some(2),
            },
            max_plies: 20,
            board_seed: Some(11),
        };
        let report = run_match(&settings);
        assert!(report.plies <= 20);
        if !report.final_state.is_over() && report.plies == 20 {
            assert_eq!(report.final_state.move_number, 21);
        }
    }

    #[test]
    fn test_stock_never_exceeds_cap_in_ai_match() {
        let settings = MatchSettings {
            white: PlayerKind::ai(Difficulty::Easy),
            black: PlayerKind::ai(Difficulty::Easy),
            max_plies: 40,
            board_seed: Some(23),
        };
        let report = run_match(&settings);
        for color in Color::BOTH {
            for piece_type in PieceType::ALL {
                assert!(
                    report.final_state.stock(color).get(piece_type)
                        <= chrysalis_rules::stock_cap(piece_type)
                );
            }
        }
    }
}
