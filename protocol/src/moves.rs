//! 走法生成与落子

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::DIRECTIONS;
use crate::disc::{Position, Side};

/// 走法
///
/// 只对生成它的棋盘和阵营有效。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 落子位置
    pub pos: Position,
    /// 会被翻转的对方棋子
    pub flips: Vec<Position>,
}

impl Move {
    /// 创建新走法
    pub fn new(pos: Position, flips: Vec<Position>) -> Self {
        Self { pos, flips }
    }

    /// 是否为合法走法（至少翻转一子）
    pub fn is_legal(&self) -> bool {
        !self.flips.is_empty()
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pos)
    }
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 计算 `side` 在 `pos` 落子会翻转的棋子；非法时返回空
    pub fn flips_for_move(board: &Board, pos: Position, side: Side) -> Vec<Position> {
        if !pos.is_valid() || !board.is_empty_at(pos) {
            return Vec::new();
        }

        let opp = side.opponent();
        let mut flips = Vec::new();

        for (dr, dc) in DIRECTIONS {
            let mut run = Vec::new();
            let mut current = pos.offset(dr, dc);

            while let Some(p) = current {
                if board.get(p) != Some(opp) {
                    break;
                }
                run.push(p);
                current = p.offset(dr, dc);
            }

            // 连续的对方棋子必须由己方棋子封口
            if let Some(end) = current {
                if board.get(end) == Some(side) && !run.is_empty() {
                    flips.extend(run);
                }
            }
        }

        flips
    }

    /// 生成指定阵营的所有合法走法（行优先顺序）
    pub fn generate_legal(board: &Board, side: Side) -> Vec<Move> {
        Position::all()
            .filter_map(|pos| {
                let flips = Self::flips_for_move(board, pos, side);
                if flips.is_empty() {
                    None
                } else {
                    Some(Move::new(pos, flips))
                }
            })
            .collect()
    }

    /// 是否存在合法走法
    pub fn has_legal(board: &Board, side: Side) -> bool {
        Position::all().any(|pos| !Self::flips_for_move(board, pos, side).is_empty())
    }

    /// 行动力（合法走法数）
    pub fn mobility(board: &Board, side: Side) -> usize {
        Position::all()
            .filter(|pos| !Self::flips_for_move(board, *pos, side).is_empty())
            .count()
    }

    /// 双方都无子可下
    pub fn is_terminal(board: &Board) -> bool {
        !Self::has_legal(board, Side::Black) && !Self::has_legal(board, Side::White)
    }

    /// 落子，返回新棋盘
    ///
    /// `flips` 为空时返回原棋盘的副本。不重新校验走法，调用方只应传入
    /// 由 [`MoveGenerator::generate_legal`] 针对同一棋盘和阵营生成的走法。
    pub fn apply(board: &Board, mv: &Move, side: Side) -> Board {
        let mut next = *board;
        if mv.flips.is_empty() {
            return next;
        }

        next.set(mv.pos, Some(side));
        for &p in &mv.flips {
            next.set(p, Some(side));
        }
        next
    }
}
