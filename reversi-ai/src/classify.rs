//! 候选手分类（DROP / HOLD / REVIVE）
//!
//! 先用单步评估划出分数带，带内的走法再经过一组按优先级排列的战术规则：
//! 占角、送角、两步后送角、最佳分、压缩对手行动力、对手已占角的邻格。

use protocol::{round2, Board, LogKind, Move, MoveGenerator, Position, Side};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::evaluate::{Evaluator, MoveEval};
use crate::explain::{explain, Language};
use crate::search::wins_tie;

/// 分数相等的容差
const SCORE_EPSILON: f64 = 1e-9;

/// 分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    /// 放弃
    Drop,
    /// 保留
    Hold,
    /// 采用
    Revive,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Drop => "DROP",
            Classification::Hold => "HOLD",
            Classification::Revive => "REVIVE",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Classification> for LogKind {
    fn from(kind: Classification) -> Self {
        match kind {
            Classification::Drop => LogKind::Drop,
            Classification::Hold => LogKind::Hold,
            Classification::Revive => LogKind::Revive,
        }
    }
}

/// 分类理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reason {
    #[serde(rename = "inferior_score")]
    InferiorScore,
    #[serde(rename = "x_square_risk")]
    XSquareRisk,
    #[serde(rename = "corner_priority")]
    CornerPriority,
    #[serde(rename = "gives opponent corner (2-ply risk)")]
    GivesCorner,
    #[serde(rename = "leads to corner in 2 plies")]
    CornerInTwoPlies,
    #[serde(rename = "best_score")]
    BestScore,
    #[serde(rename = "1-ply reduces opp mobility")]
    ReducesOppMobility,
    #[serde(rename = "corner already controlled by opponent (trap risk)")]
    CornerOwned,
    #[serde(rename = "close_to_best")]
    CloseToBest,
}

impl Reason {
    /// 日志中的理由文本
    pub fn code(&self) -> &'static str {
        match self {
            Reason::InferiorScore => "inferior_score",
            Reason::XSquareRisk => "x_square_risk",
            Reason::CornerPriority => "corner_priority",
            Reason::GivesCorner => "gives opponent corner (2-ply risk)",
            Reason::CornerInTwoPlies => "leads to corner in 2 plies",
            Reason::BestScore => "best_score",
            Reason::ReducesOppMobility => "1-ply reduces opp mobility",
            Reason::CornerOwned => "corner already controlled by opponent (trap risk)",
            Reason::CloseToBest => "close_to_best",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// 风险标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTag {
    /// 对手可以（立即或两步后）占角
    CornerCapture,
    /// 相邻的角已被对手占据
    CornerOwned,
}

/// 分类依据，只用于展示和日志
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best: Option<f64>,
    /// 分数带宽度
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opp_mob_before: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opp_mob_after: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_risk: Option<u32>,
}

impl Evidence {
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// 带分类的候选手
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub mv: Move,
    pub eval: MoveEval,
    pub kind: Classification,
    pub reason: Reason,
    pub evidence: Evidence,
}

impl Candidate {
    pub fn pos(&self) -> Position {
        self.mv.pos
    }

    pub fn score(&self) -> f64 {
        self.eval.score
    }

    /// 自然语言说明
    pub fn explain(&self, lang: Language) -> &'static str {
        explain(self.kind, self.reason, lang)
    }
}

/// 分类结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classified {
    /// 按分数降序
    pub list: Vec<Candidate>,
    /// 分数最高的候选（同分时角优先、X 格和角邻格靠后，再取先出现的）
    pub best: Option<Candidate>,
}

/// 单条规则的判定
#[derive(Debug, Clone, PartialEq)]
struct Verdict {
    kind: Classification,
    reason: Reason,
    evidence: Evidence,
}

/// 规则检查所需的局面信息
struct Probe<'a> {
    side: Side,
    board: &'a Board,
    mv: &'a Move,
    delta: f64,
    /// 落子后的局面
    next: Board,
    /// 对手在 `next` 上的应手
    replies: Vec<Move>,
}

type Rule = fn(&Probe<'_>, &Evidence) -> Option<Verdict>;

/// 战术风险：命中即定论
const RISK_RULES: [Rule; 2] = [gives_corner, corner_in_two_plies];

/// 乐观判定：命中第一条
const PROMOTE_RULES: [Rule; 2] = [exact_best, reduces_opp_mobility];

/// 结构风险：覆盖乐观判定
const STRUCTURE_RULES: [Rule; 1] = [corner_owned];

/// 对 `side` 的全部合法走法分类
pub fn classify_candidates(side: Side, board: &Board, moves: &[Move]) -> Classified {
    if moves.is_empty() {
        return Classified::default();
    }

    let evals: Vec<(&Move, MoveEval)> = moves
        .iter()
        .map(|mv| (mv, Evaluator::evaluate_move(side, board, mv)))
        .collect();

    let best_score = evals
        .iter()
        .map(|(_, e)| e.score)
        .fold(f64::NEG_INFINITY, f64::max);
    let band = (best_score.abs() * 0.25).max(1.0);

    let mut best: Option<Candidate> = None;
    let mut list = Vec::with_capacity(evals.len());

    for (mv, eval) in evals {
        let verdict = classify_one(side, board, mv, &eval, best_score, band);
        trace!(
            side = %side,
            mv = %mv.pos,
            kind = %verdict.kind,
            reason = %verdict.reason,
            score = eval.score,
            "classified"
        );

        let candidate = Candidate {
            mv: mv.clone(),
            eval,
            kind: verdict.kind,
            reason: verdict.reason,
            evidence: verdict.evidence,
        };

        let better = best.as_ref().map_or(true, |b| {
            candidate.score() > b.score()
                || (candidate.score() == b.score() && wins_tie(candidate.pos(), b.pos()))
        });
        if better {
            best = Some(candidate.clone());
        }
        list.push(candidate);
    }

    list.sort_by(|a, b| b.score().total_cmp(&a.score()));

    Classified { list, best }
}

fn classify_one(
    side: Side,
    board: &Board,
    mv: &Move,
    eval: &MoveEval,
    best_score: f64,
    band: f64,
) -> Verdict {
    let delta = best_score - eval.score;
    let base = Evidence {
        delta: Some(round2(delta)),
        score: Some(round2(eval.score)),
        best: Some(round2(best_score)),
        band: Some(round2(band)),
        ..Evidence::default()
    };

    // 占角无条件采用
    if mv.pos.is_corner() {
        return Verdict {
            kind: Classification::Revive,
            reason: Reason::CornerPriority,
            evidence: base,
        };
    }

    if delta > band {
        return if eval.features.x_risk > 0 {
            Verdict {
                kind: Classification::Drop,
                reason: Reason::XSquareRisk,
                evidence: Evidence {
                    x_risk: Some(eval.features.x_risk),
                    ..Evidence::default()
                },
            }
        } else {
            Verdict {
                kind: Classification::Drop,
                reason: Reason::InferiorScore,
                evidence: Evidence {
                    delta: Some(round2(delta)),
                    ..Evidence::default()
                },
            }
        };
    }

    let next = MoveGenerator::apply(board, mv, side);
    let replies = MoveGenerator::generate_legal(&next, side.opponent());
    let probe = Probe {
        side,
        board,
        mv,
        delta,
        next,
        replies,
    };

    if let Some(verdict) = RISK_RULES.iter().find_map(|rule| rule(&probe, &base)) {
        return verdict;
    }

    let mut verdict = PROMOTE_RULES
        .iter()
        .find_map(|rule| rule(&probe, &base))
        .unwrap_or(Verdict {
            kind: Classification::Hold,
            reason: Reason::CloseToBest,
            evidence: base,
        });

    if let Some(overridden) = STRUCTURE_RULES
        .iter()
        .find_map(|rule| rule(&probe, &verdict.evidence))
    {
        verdict = overridden;
    }

    verdict
}

fn corner_capture(evidence: &Evidence, reason: Reason) -> Verdict {
    Verdict {
        kind: Classification::Drop,
        reason,
        evidence: Evidence {
            risk: Some(RiskTag::CornerCapture),
            ..evidence.clone()
        },
    }
}

/// 对手的应手中有占角
fn gives_corner(probe: &Probe<'_>, evidence: &Evidence) -> Option<Verdict> {
    probe
        .replies
        .iter()
        .any(|r| r.pos.is_corner())
        .then(|| corner_capture(evidence, Reason::GivesCorner))
}

/// 对手下 X 格或角邻格后，我方某个应手会让对手占角
fn corner_in_two_plies(probe: &Probe<'_>, evidence: &Evidence) -> Option<Verdict> {
    let side = probe.side;
    let opp = side.opponent();

    let trapped = probe
        .replies
        .iter()
        .filter(|r| r.pos.is_x_square() || r.pos.is_corner_adjacent())
        .any(|reply| {
            let after_reply = MoveGenerator::apply(&probe.next, reply, opp);
            MoveGenerator::generate_legal(&after_reply, side)
                .iter()
                .any(|ours| {
                    let after_ours = MoveGenerator::apply(&after_reply, ours, side);
                    MoveGenerator::generate_legal(&after_ours, opp)
                        .iter()
                        .any(|z| z.pos.is_corner())
                })
        });

    trapped.then(|| corner_capture(evidence, Reason::CornerInTwoPlies))
}

fn exact_best(probe: &Probe<'_>, evidence: &Evidence) -> Option<Verdict> {
    (probe.delta.abs() < SCORE_EPSILON).then(|| Verdict {
        kind: Classification::Revive,
        reason: Reason::BestScore,
        evidence: evidence.clone(),
    })
}

fn reduces_opp_mobility(probe: &Probe<'_>, evidence: &Evidence) -> Option<Verdict> {
    let before = MoveGenerator::mobility(probe.board, probe.side.opponent()) as u32;
    let after = probe.replies.len() as u32;

    (after < before).then(|| Verdict {
        kind: Classification::Revive,
        reason: Reason::ReducesOppMobility,
        evidence: Evidence {
            opp_mob_before: Some(before),
            opp_mob_after: Some(after),
            ..evidence.clone()
        },
    })
}

/// 任一角已被对手占据且本手落在角邻格
fn corner_owned(probe: &Probe<'_>, evidence: &Evidence) -> Option<Verdict> {
    let opp = probe.side.opponent();
    let owned = Position::corners()
        .iter()
        .any(|&c| probe.board.get(c) == Some(opp));

    (owned && probe.mv.pos.is_corner_adjacent()).then(|| Verdict {
        kind: Classification::Drop,
        reason: Reason::CornerOwned,
        evidence: Evidence {
            risk: Some(RiskTag::CornerOwned),
            ..evidence.clone()
        },
    })
}
