//! 局面评估函数
//!
//! 线性组合四个手工特征：己方角数、边上连续子（稳定边近似）、
//! 己方行动力、对方行动力。

use protocol::{Board, Move, MoveGenerator, Position, Side, BOARD_SIZE};
use serde::{Deserialize, Serialize};

/// 评估器
pub struct Evaluator;

/// 特征权重（固定常量，改动会改变选点与分类结果）
pub mod weights {
    /// 己方角数
    pub const CORNER: f64 = 2.2;
    /// 稳定边近似
    pub const STABLE_EDGE: f64 = 1.2;
    /// 己方行动力
    pub const MOBILITY: f64 = 0.4;
    /// 对方行动力
    pub const OPP_MOBILITY: f64 = -0.5;
    /// 占角奖励
    pub const CORNER_MOVE_BONUS: f64 = 6.0;
    /// X 格风险惩罚
    pub const X_SQUARE_PENALTY: f64 = 1.6;
}

/// 单步走法的特征分解
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Features {
    /// 落子后己方占角数
    pub my_corners: u32,
    /// 落子后稳定边近似
    pub stable_edges: u32,
    /// 落子后己方行动力
    pub my_mobility: u32,
    /// 落子后对方行动力
    pub opp_mobility: u32,
    /// X 格风险（0 或 1，按落子前的棋盘计算）
    pub x_risk: u32,
}

/// 单步走法评估结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveEval {
    pub score: f64,
    pub features: Features,
}

impl Evaluator {
    /// 评估局面（`side` 视角）
    pub fn board_score(side: Side, board: &Board) -> f64 {
        let my_corners = Self::corner_count(board, side);
        let stable = Self::stable_edges(board, side);
        let my_mob = MoveGenerator::mobility(board, side);
        let opp_mob = MoveGenerator::mobility(board, side.opponent());

        Self::linear(my_corners as f64, stable as f64, my_mob as f64, opp_mob as f64)
    }

    /// 评估单步走法：落子后的局面分 + 占角奖励 − X 格风险
    pub fn evaluate_move(side: Side, board: &Board, mv: &Move) -> MoveEval {
        let next = MoveGenerator::apply(board, mv, side);

        let features = Features {
            my_corners: Self::corner_count(&next, side) as u32,
            stable_edges: Self::stable_edges(&next, side) as u32,
            my_mobility: MoveGenerator::mobility(&next, side) as u32,
            opp_mobility: MoveGenerator::mobility(&next, side.opponent()) as u32,
            x_risk: Self::x_square_risk(mv.pos, board),
        };

        let score = Self::linear(
            features.my_corners as f64,
            features.stable_edges as f64,
            features.my_mobility as f64,
            features.opp_mobility as f64,
        ) + Self::move_bonus(mv.pos, board);

        MoveEval { score, features }
    }

    /// 只取决于落点的附加分（占角奖励与 X 格惩罚）
    pub fn move_bonus(pos: Position, board: &Board) -> f64 {
        let mut bonus = -weights::X_SQUARE_PENALTY * Self::x_square_risk(pos, board) as f64;
        if pos.is_corner() {
            bonus += weights::CORNER_MOVE_BONUS;
        }
        bonus
    }

    /// X 格风险：落点是 X 格且对应角仍为空时为 1
    pub fn x_square_risk(pos: Position, board: &Board) -> u32 {
        match pos.x_square_corner() {
            Some(corner) if board.is_empty_at(corner) => 1,
            _ => 0,
        }
    }

    /// 己方占角数
    pub fn corner_count(board: &Board, side: Side) -> usize {
        Position::corners()
            .iter()
            .filter(|&&p| board.get(p) == Some(side))
            .count()
    }

    /// 稳定边近似
    ///
    /// 四条边各从两端向内走，遇到非己方子即停，累计走过的格子数。
    /// 整条边都是己方时会计两次，角在行和列上各计一次。
    pub fn stable_edges(board: &Board, side: Side) -> usize {
        let last = (BOARD_SIZE - 1) as u8;
        let mut count = 0;

        for edge in [0u8, last] {
            // 横边
            count += Self::streak(board, side, (0..=last).map(|c| Position::new_unchecked(edge, c)));
            count += Self::streak(
                board,
                side,
                (0..=last).rev().map(|c| Position::new_unchecked(edge, c)),
            );
        }

        for edge in [0u8, last] {
            // 竖边
            count += Self::streak(board, side, (0..=last).map(|r| Position::new_unchecked(r, edge)));
            count += Self::streak(
                board,
                side,
                (0..=last).rev().map(|r| Position::new_unchecked(r, edge)),
            );
        }

        count
    }

    fn streak(board: &Board, side: Side, cells: impl Iterator<Item = Position>) -> usize {
        cells.take_while(|&p| board.get(p) == Some(side)).count()
    }

    fn linear(corners: f64, stable: f64, my_mob: f64, opp_mob: f64) -> f64 {
        weights::CORNER * corners
            + weights::STABLE_EDGE * stable
            + weights::MOBILITY * my_mob
            + weights::OPP_MOBILITY * opp_mob
    }
}
