//! 黑白棋共享规则库
//!
//! 包含:
//! - 阵营、坐标、棋盘等核心数据结构
//! - 翻子计算、合法走法生成和落子
//! - 坐标文本表示法（A1-H8）与棋盘文本格式
//! - 决策日志（JSON Lines）与对局报告

mod board;
mod constants;
mod disc;
mod error;
mod layout;
mod moves;
mod notation;
mod record;

pub use board::{Board, BoardState, Cell};
pub use constants::*;
pub use disc::{Position, Side};
pub use error::{RecordError, Result, ReversiError};
pub use layout::{Layout, INITIAL_LAYOUT};
pub use moves::{Move, MoveGenerator};
pub use notation::Notation;
pub use record::{
    round2, ChosenLabel, GameLog, GameReport, LogKind, SideSummary, Winner, WhyRecord,
    PASS_MOVE, RECORD_VERSION,
};
