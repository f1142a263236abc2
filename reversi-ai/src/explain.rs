//! 分类结果的自然语言说明

use serde::{Deserialize, Serialize};

use crate::classify::{Classification, Reason};

/// 说明文字的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

/// 理由的大类，决定使用哪条模板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Corner,
    XSquare,
    Score,
    Mobility,
    Best,
    Close,
}

impl From<Reason> for Category {
    fn from(reason: Reason) -> Self {
        match reason {
            Reason::CornerPriority
            | Reason::GivesCorner
            | Reason::CornerInTwoPlies
            | Reason::CornerOwned => Category::Corner,
            Reason::XSquareRisk => Category::XSquare,
            Reason::InferiorScore => Category::Score,
            Reason::ReducesOppMobility => Category::Mobility,
            Reason::BestScore => Category::Best,
            Reason::CloseToBest => Category::Close,
        }
    }
}

/// 按 (分类, 理由) 给出一句说明
pub fn explain(kind: Classification, reason: Reason, lang: Language) -> &'static str {
    let category = Category::from(reason);
    match lang {
        Language::Zh => zh(kind, category),
        Language::En => en(kind, category),
    }
}

fn zh(kind: Classification, category: Category) -> &'static str {
    match (kind, category) {
        (Classification::Drop, Category::Corner) => "这步棋很可能让对手拿到角，因此放弃。",
        (Classification::Drop, Category::XSquare) => "落在 X 格而对应的角仍然空着，风险太大，因此放弃。",
        (Classification::Drop, Category::Score) => "评估低于其他候选，因此放弃。",
        (Classification::Drop, _) => "当前局面下判断不利，因此放弃。",
        (Classification::Hold, _) => "评估与最佳手相差无几，难分优劣，暂且保留。",
        (Classification::Revive, Category::Corner) => "抓住占角的机会，采用此手。",
        (Classification::Revive, Category::Mobility) => "这步能压缩对手的行动力，预计有利，采用此手。",
        (Classification::Revive, Category::Best) => "这是评估最高的一手，采用。",
        (Classification::Revive, _) => "判断比其他候选更有前途，采用此手。",
    }
}

fn en(kind: Classification, category: Category) -> &'static str {
    match (kind, category) {
        (Classification::Drop, Category::Corner) => {
            "Dropped: this move is likely to hand a corner to the opponent."
        }
        (Classification::Drop, Category::XSquare) => {
            "Dropped: it sits on an X-square while the corner is still open."
        }
        (Classification::Drop, Category::Score) => "Dropped: it scores below the other candidates.",
        (Classification::Drop, _) => "Dropped: judged unfavourable in the current position.",
        (Classification::Hold, _) => "Held: the score is close to the best, no clear preference.",
        (Classification::Revive, Category::Corner) => "Revived: a chance to secure a corner.",
        (Classification::Revive, Category::Mobility) => {
            "Revived: it restricts the opponent's mobility."
        }
        (Classification::Revive, Category::Best) => "Revived: this is the best-scoring move.",
        (Classification::Revive, _) => "Revived: more promising than the alternatives.",
    }
}
