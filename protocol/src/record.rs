//! 决策日志与对局报告
//!
//! 每一条 [`WhyRecord`] 描述一次决策（候选手的 DROP/HOLD/REVIVE 标签、
//! 实际落子、停着），按 JSON Lines 格式导出。

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::disc::Side;
use crate::error::RecordError;

/// 日志格式版本
pub const RECORD_VERSION: &str = "1.0";

/// 停着时的走法占位
pub const PASS_MOVE: &str = "-";

/// 记录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogKind {
    /// 放弃的候选
    Drop,
    /// 保留的候选
    Hold,
    /// 重新采用的候选
    Revive,
    /// 实际落子
    Apply,
    /// 停着
    Pass,
}

impl LogKind {
    /// 日志中的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Drop => "DROP",
            LogKind::Hold => "HOLD",
            LogKind::Revive => "REVIVE",
            LogKind::Apply => "APPLY",
            LogKind::Pass => "PASS",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单条决策记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhyRecord {
    /// 记录时间
    pub ts: DateTime<Utc>,
    /// 走法坐标（停着为 `-`）
    #[serde(rename = "move")]
    pub mv: String,
    /// 走子方
    pub side: Side,
    /// 记录类型
    #[serde(rename = "why_kind")]
    pub kind: LogKind,
    /// 原因
    pub reason: String,
    /// 证据（只用于展示）
    #[serde(default)]
    pub evidence: serde_json::Value,
    /// 评估分（保留两位小数）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl WhyRecord {
    /// 创建新记录
    pub fn new(mv: impl Into<String>, side: Side, kind: LogKind, reason: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            mv: mv.into(),
            side,
            kind,
            reason: reason.into(),
            evidence: serde_json::Value::Object(serde_json::Map::new()),
            score: None,
        }
    }

    /// 停着记录
    pub fn pass(side: Side) -> Self {
        Self::new(PASS_MOVE, side, LogKind::Pass, "no_legal_moves")
    }

    /// 附加证据
    pub fn with_evidence(mut self, evidence: serde_json::Value) -> Self {
        self.evidence = evidence;
        self
    }

    /// 附加评估分
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(round2(score));
        self
    }
}

/// 对局日志
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLog {
    records: Vec<WhyRecord>,
}

impl GameLog {
    /// 创建空日志
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加记录
    pub fn push(&mut self, record: WhyRecord) {
        tracing::trace!(kind = %record.kind, mv = %record.mv, reason = %record.reason, "why record");
        self.records.push(record);
    }

    /// 全部记录
    pub fn records(&self) -> &[WhyRecord] {
        &self.records
    }

    /// 记录条数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 转换为 JSON Lines 字符串
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let lines = self
            .records
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }

    /// 写入 JSON Lines
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> Result<(), RecordError> {
        for record in &self.records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 从 JSON Lines 解析（跳过空行）
    pub fn from_jsonl(text: &str) -> Result<Self, RecordError> {
        let records = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<Result<Vec<WhyRecord>, _>>()?;
        Ok(Self { records })
    }
}

/// 已落子的标签（用于对局报告统计）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenLabel {
    pub side: Side,
    #[serde(rename = "move")]
    pub mv: String,
    #[serde(rename = "why_kind")]
    pub kind: LogKind,
    pub score: f64,
}

/// 对局胜负
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Winner {
    Black,
    White,
    Draw,
}

impl Winner {
    /// 按子数判定胜负
    pub fn from_board(board: &Board) -> Self {
        let black = board.count(Side::Black);
        let white = board.count(Side::White);
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Winner::Black,
            std::cmp::Ordering::Less => Winner::White,
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }
}

/// 单方的标签统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideSummary {
    /// 走法数（至少为 1，避免除零）
    pub n: usize,
    #[serde(rename = "DROP")]
    pub drop: usize,
    #[serde(rename = "HOLD")]
    pub hold: usize,
    #[serde(rename = "REVIVE")]
    pub revive: usize,
    pub rate_revive: f64,
    pub rate_hold: f64,
}

impl SideSummary {
    /// 统计指定阵营的已落子标签
    pub fn from_labels(labels: &[ChosenLabel], side: Side) -> Self {
        let rows: Vec<_> = labels.iter().filter(|l| l.side == side).collect();
        let count = |kind: LogKind| rows.iter().filter(|l| l.kind == kind).count();
        let n = rows.len().max(1);
        let drop = count(LogKind::Drop);
        let hold = count(LogKind::Hold);
        let revive = count(LogKind::Revive);

        Self {
            n,
            drop,
            hold,
            revive,
            rate_revive: round2(revive as f64 / n as f64),
            rate_hold: round2(hold as f64 / n as f64),
        }
    }
}

/// 对局报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameReport {
    pub version: String,
    pub winner: Winner,
    pub black_count: usize,
    pub white_count: usize,
    pub black: SideSummary,
    pub white: SideSummary,
}

impl GameReport {
    /// 根据终局棋盘和已落子标签生成报告
    pub fn new(board: &Board, labels: &[ChosenLabel]) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            winner: Winner::from_board(board),
            black_count: board.count(Side::Black),
            white_count: board.count(Side::White),
            black: SideSummary::from_labels(labels, Side::Black),
            white: SideSummary::from_labels(labels, Side::White),
        }
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 简短点评
    pub fn remark(&self) -> String {
        let winner = match self.winner {
            Winner::Black => "黑方",
            Winner::White => "白方",
            Winner::Draw => "平局",
        };
        format!(
            "胜者: {}\n[黑方] REVIVE 率 {:.2}, DROP {}/{}\n[白方] REVIVE 率 {:.2}, DROP {}/{}\n\
             REVIVE 率高的一方往往占优，频繁 DROP 则容易落败（仅为本局概况）。",
            winner,
            self.black.rate_revive,
            self.black.drop,
            self.black.n,
            self.white.rate_revive,
            self.white.drop,
            self.white.n,
        )
    }
}

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
