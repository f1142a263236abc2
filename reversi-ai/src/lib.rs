//! 黑白棋 AI 引擎
//!
//! 包含:
//! - 局面评估函数
//! - Negamax + Alpha-Beta 搜索
//! - 迭代加深与时间限制
//! - 候选手分类（DROP / HOLD / REVIVE）与说明文字

mod classify;
mod evaluate;
mod explain;
mod search;

pub use classify::{
    classify_candidates, Candidate, Classification, Classified, Evidence, Reason, RiskTag,
};
pub use evaluate::{weights, Evaluator, Features, MoveEval};
pub use explain::{explain, Language};
pub use search::{
    move_priority, order_moves, AiConfig, AiEngine, Difficulty, SearchInfo, SearchResult,
};
