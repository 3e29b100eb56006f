//! 候选走法生成
//!
//! 在状态副本上逐个试走，得到每个走法之后的完整局面

use chrysalis_rules::{
    Color, GameState, Move, MoveGenerator, PieceType, WinDetector, PROMOTION_PREFERENCE,
};

/// 一个候选走法及其结果局面
#[derive(Debug, Clone)]
pub struct Candidate {
    pub mv: Move,
    /// 自动选择的升变类型
    pub promotion: Option<PieceType>,
    /// 走完（并完成升变）后的局面
    pub state: GameState,
}

/// 按 Q > R > B > N > K 的顺序选第一个未达上限的类型完成升变
pub fn auto_promote(state: &GameState) -> Option<(GameState, PieceType)> {
    PROMOTION_PREFERENCE.iter().find_map(|&piece_type| {
        state
            .try_resolve_promotion(piece_type)
            .ok()
            .map(|next| (next, piece_type))
    })
}

/// 候选走法生成器
pub struct CandidateGenerator;

impl CandidateGenerator {
    /// 生成指定阵营的候选走法
    ///
    /// 优先保留走完后己方王不受攻击的走法；本来就被攻击时只返回这些走法，
    /// 否则在没有安全走法时退回到全部走法
    pub fn generate(state: &GameState, color: Color) -> Vec<Candidate> {
        if state.is_over() {
            return Vec::new();
        }

        let mut base = state.clone();
        base.turn = color;
        base.message = None;
        if base.promotion.is_some_and(|p| p.color == color) {
            match auto_promote(&base) {
                Some((resolved, _)) if !resolved.is_over() => base = resolved,
                _ => return Vec::new(),
            }
        }

        let in_danger = WinDetector::is_king_in_danger(&base, color);

        let mut all = Vec::new();
        for mv in MoveGenerator::generate_all(&base.board, color) {
            let Ok(next) = base.try_apply(mv.from, mv.to) else {
                continue;
            };

            if next.promotion.is_some_and(|p| p.color == color) {
                match auto_promote(&next) {
                    Some((promoted, piece_type)) => all.push(Candidate {
                        mv,
                        promotion: Some(piece_type),
                        state: promoted,
                    }),
                    None => continue,
                }
            } else {
                all.push(Candidate {
                    mv,
                    promotion: None,
                    state: next,
                });
            }
        }

        let safe: Vec<Candidate> = all
            .iter()
            .filter(|c| Self::leaves_king_safe(c, color))
            .cloned()
            .collect();

        tracing::debug!(
            "{} 方候选走法: 共 {} 个，安全 {} 个，被攻击: {}",
            color,
            all.len(),
            safe.len(),
            in_danger
        );

        if in_danger || !safe.is_empty() {
            safe
        } else {
            all
        }
    }

    /// 走完后己方王不受攻击（直接获胜的走法也算安全）
    fn leaves_king_safe(candidate: &Candidate, color: Color) -> bool {
        candidate.state.winner() == Some(color)
            || !WinDetector::is_king_in_danger(&candidate.state, color)
    }
}
