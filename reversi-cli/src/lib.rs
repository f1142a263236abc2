//! 黑白棋 WHY 终端对局
//!
//! 包含:
//! - 命令行参数与 AI 配置
//! - 对局控制（回合驱动）
//! - 玩家（人类 / AI / 随机）
//! - WHY 日志存储

pub mod config;
pub mod game;
pub mod player;
pub mod storage;

pub use config::Cli;
pub use game::{GameSession, TurnOutcome};
pub use player::{Decision, Player, PlayerKind};
pub use storage::{LogStorage, SavedLogInfo};
