//! 对局设置
//!
//! JSON 文件持久化，读取失败时回退到默认设置

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrysalis_ai::Difficulty;
use serde::{Deserialize, Serialize};

/// 一方的控制者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    /// AI 走棋
    Ai {
        difficulty: Difficulty,
        /// 困难难度的搜索层数，不填则用难度预设
        #[serde(default)]
        depth: Option<u8>,
        #[serde(default)]
        seed: Option<u64>,
    },
    /// 按给定的格子标识依次走棋，例如 ("e7", "e6")
    Scripted {
        moves: Vec<(String, String)>,
        /// 升变时选择的棋子字母（K Q R B N），不填则按 AI 的顺序自动选择
        #[serde(default)]
        promote_to: Option<char>,
    },
}

impl PlayerKind {
    pub fn ai(difficulty: Difficulty) -> Self {
        PlayerKind::Ai {
            difficulty,
            depth: None,
            seed: None,
        }
    }
}

/// 对局设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// 白方（先手）
    pub white: PlayerKind,
    /// 黑方
    pub black: PlayerKind,
    /// 最多走多少步，到达后判为未完成
    pub max_plies: u32,
    /// 布置符号用的随机种子
    pub board_seed: Option<u64>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            white: PlayerKind::ai(Difficulty::Medium),
            black: PlayerKind::ai(Difficulty::Easy),
            max_plies: 200,
            board_seed: None,
        }
    }
}

impl MatchSettings {
    /// 获取默认设置文件路径
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("chrysalis-chess");
            path.push("match.json");
            path
        })
    }

    /// 从默认路径加载设置
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            tracing::warn!("无法获取配置目录，使用默认设置");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// 从指定文件加载设置
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("设置文件不存在，使用默认设置: {:?}", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("已加载设置: {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("设置文件格式无效: {}，使用默认设置", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("无法读取设置文件: {}，使用默认设置", e);
                Self::default()
            }
        }
    }

    /// 保存设置到指定文件
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("序列化设置失败")?;
        std::fs::write(path, content).with_context(|| format!("写入设置文件失败: {:?}", path))?;

        tracing::info!("设置已保存: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("match.json");

        let settings = MatchSettings {
            white: PlayerKind::Scripted {
                moves: vec![("a7".to_string(), "a6".to_string())],
                promote_to: Some('R'),
            },
            black: PlayerKind::Ai {
                difficulty: Difficulty::Hard,
                depth: Some(3),
                seed: Some(5),
            },
            max_plies: 12,
            board_seed: Some(77),
        };
        settings.save_to(&path).unwrap();

        assert_eq!(MatchSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = MatchSettings::load_from(&dir.path().join("absent.json"));
        assert_eq!(loaded, MatchSettings::default());
    }

    #[test]
    fn test_malformed_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(MatchSettings::load_from(&path), MatchSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.json");
        std::fs::write(&path, r#"{ "max_plies": 40 }"#).unwrap();

        let loaded = MatchSettings::load_from(&path);
        assert_eq!(loaded.max_plies, 40);
        assert_eq!(loaded.white, PlayerKind::ai(Difficulty::Medium));
    }
}
