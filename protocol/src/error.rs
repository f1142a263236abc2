//! 错误类型定义

use thiserror::Error;

/// 黑白棋规则与文本格式错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReversiError {
    /// 无效的坐标文本
    #[error("Invalid coordinate: {text:?} (expected A1-H8)")]
    InvalidCoordinate { text: String },

    /// 无效的棋盘文本
    #[error("Invalid layout string: {reason}")]
    InvalidLayout { reason: String },

    /// 非法走法（该位置不能翻转任何棋子）
    #[error("Illegal move: {coord}")]
    IllegalMove { coord: String },
}

/// 日志导出错误
#[derive(Error, Debug)]
pub enum RecordError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, ReversiError>;
