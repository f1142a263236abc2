//! 命令行参数与 AI 配置

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use protocol::Side;
use reversi_ai::{AiConfig, Difficulty, Language};

use crate::player::{Player, PlayerKind};

/// 黑白棋 WHY 对局：每一步都给出 DROP / HOLD / REVIVE 的理由
#[derive(Debug, Parser)]
#[command(name = "reversi-why")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 黑方玩家
    #[arg(long, value_enum, default_value = "human")]
    pub black: PlayerKind,

    /// 白方玩家
    #[arg(long, value_enum, default_value = "ai")]
    pub white: PlayerKind,

    /// 先手方
    #[arg(long, value_enum, default_value = "black")]
    pub first: SideArg,

    /// AI 难度
    #[arg(long, value_enum, default_value = "medium")]
    pub difficulty: DifficultyArg,

    /// 覆盖基础搜索深度
    #[arg(long)]
    pub depth: Option<u8>,

    /// 覆盖每步时间预算（毫秒）
    #[arg(long)]
    pub time_ms: Option<u64>,

    /// 关闭搜索，直接取单步评估最高的走法
    #[arg(long)]
    pub no_search: bool,

    /// 从 JSON 文件读取 AI 配置（命令行覆盖项仍然生效）
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 随机玩家的种子
    #[arg(long)]
    pub seed: Option<u64>,

    /// 人类回合自动显示候选提示
    #[arg(long)]
    pub hints: bool,

    /// 说明文字语言
    #[arg(long, value_enum, default_value = "zh")]
    pub lang: LangArg,

    /// 对局结束后保存 WHY 日志
    #[arg(long)]
    pub save_log: bool,

    /// 日志目录（默认使用平台数据目录）
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// 列出已保存的日志后退出
    #[arg(long)]
    pub list_logs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    Black,
    White,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Black => Side::Black,
            SideArg::White => Side::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(difficulty: DifficultyArg) -> Self {
        match difficulty {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LangArg {
    Zh,
    En,
}

impl From<LangArg> for Language {
    fn from(lang: LangArg) -> Self {
        match lang {
            LangArg::Zh => Language::Zh,
            LangArg::En => Language::En,
        }
    }
}

impl Cli {
    /// 合成 AI 配置：配置文件或难度预设，再应用命令行覆盖项
    pub fn ai_config(&self) -> Result<AiConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("读取配置文件失败: {:?}", path))?;
                serde_json::from_str::<AiConfig>(&content)
                    .with_context(|| format!("解析配置文件失败: {:?}", path))?
            }
            None => AiConfig::from_difficulty(self.difficulty.into()),
        };

        if let Some(depth) = self.depth {
            anyhow::ensure!(depth >= 1, "搜索深度至少为 1");
            config.max_depth = depth;
            config.depth_cap = config.depth_cap.max(depth);
        }
        if let Some(time_ms) = self.time_ms {
            config.time_limit_ms = time_ms;
        }
        if self.no_search {
            config.search_enabled = false;
        }

        Ok(config)
    }

    /// 按类型创建玩家；两个随机玩家使用不同的种子
    pub fn make_player(&self, kind: PlayerKind, side: Side, config: &AiConfig) -> Player {
        match kind {
            PlayerKind::Human => Player::human(self.hints),
            PlayerKind::Ai => Player::ai(config.clone()),
            PlayerKind::Random => {
                let seed = self.seed.unwrap_or_else(rand::random);
                let offset = match side {
                    Side::Black => 0,
                    Side::White => 1,
                };
                Player::random(seed.wrapping_add(offset))
            }
        }
    }
}
