//! 搜索引擎
//!
//! 三档难度：随机、一层贪心、Minimax + Alpha-Beta 剪枝

use chrysalis_rules::{Color, GameState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::candidates::{auto_promote, Candidate, CandidateGenerator};
use crate::evaluate::Evaluator;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单：在候选走法中均匀随机
    Easy,
    /// 中等：一层贪心
    Medium,
    /// 困难：Minimax + Alpha-Beta
    Hard,
}

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// 搜索层数（含候选走法本身这一层），仅困难难度使用
    pub max_depth: u8,
    /// 随机种子，设置后结果可复现
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                max_depth: 1,
                seed: None,
            },
            Difficulty::Medium => Self {
                difficulty,
                max_depth: 1,
                seed: None,
            },
            Difficulty::Hard => Self {
                difficulty,
                max_depth: 2,
                seed: None,
            },
        }
    }

    /// 设置随机种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    rng: ChaCha8Rng,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            rng,
            nodes_searched: 0,
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 替当前走子方走一步，返回新局面
    ///
    /// 没有可走的棋（或对局已结束）时原样返回
    pub fn select_move(&mut self, state: &GameState) -> GameState {
        let mut current = state.clone();
        if current.promotion.is_some_and(|p| p.color == current.turn) {
            if let Some((resolved, piece_type)) = auto_promote(&current) {
                tracing::info!("AI 补选升变: {:?}", piece_type);
                current = resolved;
            }
        }

        match self.choose(&current) {
            Some(candidate) => candidate.state,
            None => current,
        }
    }

    /// 按难度选择候选走法
    pub fn choose(&mut self, state: &GameState) -> Option<Candidate> {
        self.nodes_searched = 0;
        if state.is_over() {
            return None;
        }

        let color = state.turn;
        let mut candidates = CandidateGenerator::generate(state, color);
        if candidates.is_empty() {
            tracing::warn!("{} 方没有可走的棋", color);
            return None;
        }

        let index = match self.config.difficulty {
            Difficulty::Easy => self.rng.gen_range(0..candidates.len()),
            Difficulty::Medium => self.pick_greedy(&candidates, color),
            Difficulty::Hard => self.pick_minimax(&candidates, color),
        };

        let chosen = candidates.swap_remove(index);
        tracing::info!(
            "AI ({:?}) 走棋: {}，搜索节点 {}",
            self.config.difficulty,
            chosen.mv,
            self.nodes_searched
        );
        Some(chosen)
    }

    /// 一层贪心：取评估最高的候选，平分时取最先出现的
    fn pick_greedy(&mut self, candidates: &[Candidate], color: Color) -> usize {
        let mut best_index = 0;
        let mut best_score = f64::NEG_INFINITY;

        for (index, candidate) in candidates.iter().enumerate() {
            self.nodes_searched += 1;
            let score = Evaluator::evaluate(&candidate.state, color);
            if index == 0 || score > best_score {
                best_score = score;
                best_index = index;
            }
        }

        best_index
    }

    /// 根节点：最大化己方候选，对手回应层取最小
    fn pick_minimax(&mut self, candidates: &[Candidate], color: Color) -> usize {
        let depth = self.config.max_depth.saturating_sub(1);
        let mut best_index = 0;
        let mut best_score = f64::NEG_INFINITY;
        let mut alpha = f64::NEG_INFINITY;

        for (index, candidate) in candidates.iter().enumerate() {
            let score = self.alpha_beta(&candidate.state, depth, alpha, f64::INFINITY, false, color);
            if index == 0 || score > best_score {
                best_score = score;
                best_index = index;
            }
            alpha = alpha.max(best_score);
        }

        best_index
    }

    /// Alpha-Beta 搜索，评估始终以根节点走子方为视角
    fn alpha_beta(
        &mut self,
        state: &GameState,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        root: Color,
    ) -> f64 {
        self.nodes_searched += 1;

        if depth == 0 || state.is_over() {
            return Evaluator::evaluate(state, root);
        }

        let color = if maximizing { root } else { root.opponent() };
        let candidates = CandidateGenerator::generate(state, color);
        if candidates.is_empty() {
            return Evaluator::evaluate(state, root);
        }

        if maximizing {
            let mut best = f64::NEG_INFINITY;
            for candidate in &candidates {
                let score = self.alpha_beta(&candidate.state, depth - 1, alpha, beta, false, root);
                best = best.max(score);
                alpha = alpha.max(best);
                if beta <= alpha {
                    break; // Beta 剪枝
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for candidate in &candidates {
                let score = self.alpha_beta(&candidate.state, depth - 1, alpha, beta, true, root);
                best = best.min(score);
                beta = beta.min(best);
                if beta <= alpha {
                    break; // Alpha 剪枝
                }
            }
            best
        }
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}
