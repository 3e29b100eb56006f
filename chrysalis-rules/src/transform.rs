//! 自动变形
//!
//! 停在带蓝色符号格子上的蛹或棋子，只要库存够，就会变成符号所示的类型

use crate::piece::{Occupant, Piece, PieceType, Position};
use crate::state::GameState;

/// 变形引擎
pub struct Transformer;

impl Transformer {
    /// 对单个格子执行变形
    ///
    /// 变出的王在 `protect_until` 手之前不能被吃。返回是否发生了变形
    pub fn transform_square(state: &mut GameState, pos: Position, protect_until: u32) -> bool {
        let Some(needed) = state.board.symbol(pos) else {
            return false;
        };

        let (color, previous) = match state.board.get(pos) {
            Occupant::Empty => return false,
            Occupant::Metamorph(color) => (color, None),
            Occupant::Piece(piece) if piece.piece_type == needed => return false,
            Occupant::Piece(piece) => (piece.color, Some(piece.piece_type)),
        };

        if state.stock(color).get(needed) == 0 {
            return false;
        }

        if let Some(previous) = previous {
            state.stock_mut(color).increment_capped(previous);
            if previous == PieceType::King {
                state.set_king_on_board(color, false);
            }
        }
        state.stock_mut(color).take(needed);
        state.board.put(pos, Piece::new(color, needed, state.move_number));

        if needed == PieceType::King {
            state.set_king_on_board(color, true);
            state.protect_king(color, protect_until);
        }

        tracing::debug!(
            "{} 变形: {:?} -> {:?} ({} 方)",
            pos,
            previous,
            needed,
            color
        );
        true
    }

    /// 扫描整个棋盘，每个带符号的格子各处理一次
    pub fn sweep(state: &mut GameState) -> usize {
        let targets: Vec<Position> = state
            .board
            .squares()
            .filter(|sq| sq.blue_symbol.is_some() && sq.position.in_zone())
            .map(|sq| sq.position)
            .collect();

        let protect_until = state.move_number;
        targets
            .into_iter()
            .filter(|&pos| Self::transform_square(state, pos, protect_until))
            .count()
    }
}
