//! 蛹棋 AI 引擎
//!
//! 包含:
//! - 候选走法生成（含自动升变与保王过滤）
//! - 棋局评估函数
//! - 随机 / 一层贪心 / Minimax + Alpha-Beta 三档难度

mod candidates;
mod evaluate;
mod search;

pub use candidates::{auto_promote, Candidate, CandidateGenerator};
pub use evaluate::Evaluator;
pub use search::{AiConfig, AiEngine, Difficulty};
