//! 蛹棋无界面对局工具
//!
//! 读取对局设置，用 AI 或脚本驱动双方走棋并输出日志

pub mod runner;
pub mod settings;

pub use runner::{run_match, MatchReport};
pub use settings::{MatchSettings, PlayerKind};
