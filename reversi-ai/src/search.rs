//! 搜索引擎
//!
//! 实现 Negamax + Alpha-Beta 剪枝 + 迭代加深 + 时间限制

use std::time::{Duration, Instant};

use protocol::{round2, Board, Move, MoveGenerator, Notation, Position, Side};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::evaluate::Evaluator;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 简单：depth=1
    Easy,
    /// 中等（均衡）：depth=3，残局 +1
    #[default]
    Medium,
    /// 困难：depth=5，残局 +1
    Hard,
}

/// AI 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// 基础搜索深度
    pub max_depth: u8,
    /// 每步时间预算（毫秒）
    pub time_limit_ms: u64,
    /// 空格数不超过此值时进入残局，深度 +1
    pub endgame_empties: usize,
    /// 残局加深后的深度上限
    pub depth_cap: u8,
    /// 关闭时直接取单步评估最高的走法
    pub search_enabled: bool,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                max_depth: 1,
                time_limit_ms: 100,
                endgame_empties: 14,
                depth_cap: 2,
                search_enabled: true,
            },
            Difficulty::Medium => Self {
                difficulty,
                max_depth: 3,
                time_limit_ms: 250,
                endgame_empties: 14,
                depth_cap: 4,
                search_enabled: true,
            },
            Difficulty::Hard => Self {
                difficulty,
                max_depth: 5,
                time_limit_ms: 1000,
                endgame_empties: 16,
                depth_cap: 6,
                search_enabled: true,
            },
        }
    }

    /// 按局面决定搜索深度：残局时加一层（不超过上限，也不低于基础深度）
    pub fn depth_for(&self, board: &Board) -> u8 {
        if board.empty_count() <= self.endgame_empties {
            self.max_depth
                .saturating_add(1)
                .min(self.depth_cap.max(self.max_depth))
        } else {
            self.max_depth
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// 搜索结果
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// 选中的走法
    pub best: Move,
    /// 根节点分数（走子方视角）
    pub score: f64,
    /// 主要变例
    pub pv: Vec<Move>,
    /// 搜索节点数
    pub nodes: u64,
    /// 完成的最深迭代（0 表示未完成任何迭代）
    pub depth: u8,
    /// 是否因超时提前结束
    pub timed_out: bool,
}

impl SearchResult {
    /// 日志用的摘要
    pub fn info(&self) -> SearchInfo {
        SearchInfo {
            depth: self.depth,
            nodes: self.nodes,
            score: round2(self.score),
            pv: Notation::line_to_text(&self.pv),
            timed_out: self.timed_out,
        }
    }
}

/// 搜索摘要（写入 APPLY 记录的证据）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchInfo {
    pub depth: u8,
    pub nodes: u64,
    pub score: f64,
    pub pv: Vec<String>,
    pub timed_out: bool,
}

/// 单个节点的搜索结果
#[derive(Debug, Clone)]
struct Line {
    score: f64,
    pv: Vec<Move>,
}

impl Line {
    fn leaf(score: f64) -> Self {
        Self { score, pv: Vec::new() }
    }
}

/// 落点优先级：角 0，普通格 1，X 格和角邻格 2
///
/// 走法排序和同分取舍都用它，保证不搜索、一层搜索和分类器在同分时选同一步。
pub fn move_priority(pos: Position) -> u8 {
    if pos.is_corner() {
        0
    } else if pos.is_x_square() || pos.is_corner_adjacent() {
        2
    } else {
        1
    }
}

/// 同分时 `a` 是否排在 `b` 前面（优先级相同时保持输入顺序）
pub(crate) fn wins_tie(a: Position, b: Position) -> bool {
    move_priority(a) < move_priority(b)
}

/// 走法排序（仅用于提高剪枝效率，不是候选手排名）
///
/// 角优先，其次不碰 X 格和角邻格的走法，再按单步评估分降序；
/// 同分保持输入顺序。
pub fn order_moves(side: Side, board: &Board, moves: &[Move]) -> Vec<Move> {
    let mut keyed: Vec<(u8, f64, &Move)> = moves
        .iter()
        .map(|mv| {
            let score = Evaluator::evaluate_move(side, board, mv).score;
            (move_priority(mv.pos), score, mv)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.total_cmp(&a.1)));

    keyed.into_iter().map(|(_, _, mv)| mv.clone()).collect()
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            nodes_searched: 0,
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 为 `side` 选择走法（按配置决定深度和时间），无合法走法时返回 None
    pub fn choose_move(&mut self, board: &Board, side: Side) -> Option<SearchResult> {
        let moves = MoveGenerator::generate_legal(board, side);
        if moves.is_empty() {
            return None;
        }

        if !self.config.search_enabled {
            return Self::static_choice(side, board, &moves);
        }

        let depth = self.config.depth_for(board);
        self.search_best_move(side, board, &moves, depth, self.config.time_limit_ms)
    }

    /// 迭代加深搜索最佳走法
    ///
    /// 截止时间在入口处确定。保留截止前最后一次完成的迭代；一次都没有完成时，
    /// 取排序后的第一个走法并用单步评估重新计分。`moves` 为空时返回 None。
    pub fn search_best_move(
        &mut self,
        side: Side,
        board: &Board,
        moves: &[Move],
        max_depth: u8,
        time_budget_ms: u64,
    ) -> Option<SearchResult> {
        let deadline = Instant::now() + Duration::from_millis(time_budget_ms);
        self.search_until(side, board, moves, max_depth, deadline)
    }

    /// 同 [`AiEngine::search_best_move`]，直接给定截止时间
    pub fn search_until(
        &mut self,
        side: Side,
        board: &Board,
        moves: &[Move],
        max_depth: u8,
        deadline: Instant,
    ) -> Option<SearchResult> {
        if moves.is_empty() {
            return None;
        }

        self.nodes_searched = 0;
        let mut completed: Option<(Line, u8)> = None;
        let mut timed_out = false;

        for depth in 1..=max_depth {
            let line = self.search_root(side, board, moves, depth, deadline);
            if Instant::now() >= deadline {
                timed_out = true;
                break;
            }

            debug!(
                depth,
                score = line.score,
                nodes = self.nodes_searched,
                best = ?line.pv.first().map(|m| m.pos.to_string()),
                "iteration complete"
            );
            completed = Some((line, depth));
        }

        match completed {
            Some((line, depth)) if !line.pv.is_empty() => Some(SearchResult {
                best: line.pv[0].clone(),
                score: line.score,
                pv: line.pv,
                nodes: self.nodes_searched,
                depth,
                timed_out,
            }),
            _ => {
                let ordered = order_moves(side, board, moves);
                let best = ordered.into_iter().next()?;
                let score = Evaluator::evaluate_move(side, board, &best).score;
                warn!(
                    best = %best.pos,
                    nodes = self.nodes_searched,
                    "no iteration completed, falling back to move ordering"
                );
                Some(SearchResult {
                    pv: vec![best.clone()],
                    best,
                    score,
                    nodes: self.nodes_searched,
                    depth: 0,
                    timed_out,
                })
            }
        }
    }

    /// 不搜索，取单步评估最高的走法（同分按 [`move_priority`]，再取先出现的）
    fn static_choice(side: Side, board: &Board, moves: &[Move]) -> Option<SearchResult> {
        let mut best: Option<(f64, &Move)> = None;
        for mv in moves {
            let score = Evaluator::evaluate_move(side, board, mv).score;
            let better = best.map_or(true, |(s, b)| {
                score > s || (score == s && wins_tie(mv.pos, b.pos))
            });
            if better {
                best = Some((score, mv));
            }
        }

        best.map(|(score, mv)| SearchResult {
            best: mv.clone(),
            score,
            pv: vec![mv.clone()],
            nodes: 0,
            depth: 0,
            timed_out: false,
        })
    }

    /// 根节点：使用调用方给出的走法列表
    fn search_root(
        &mut self,
        root: Side,
        board: &Board,
        moves: &[Move],
        depth: u8,
        deadline: Instant,
    ) -> Line {
        self.nodes_searched += 1;
        if Instant::now() >= deadline {
            return Line::leaf(Self::static_score(root, board, root));
        }

        let ordered = order_moves(root, board, moves);
        self.search_moves(
            root,
            board,
            root,
            ordered,
            depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
            deadline,
        )
    }

    /// Negamax + Alpha-Beta
    ///
    /// 返回 `side` 视角的分数。叶子分数按根方视角计算，再按走子方取正负。
    fn negamax(
        &mut self,
        root: Side,
        board: &Board,
        side: Side,
        depth: u8,
        alpha: f64,
        beta: f64,
        deadline: Instant,
    ) -> Line {
        self.nodes_searched += 1;

        // 超时：当作叶子返回静态评估
        if Instant::now() >= deadline {
            return Line::leaf(Self::static_score(root, board, side));
        }

        if depth == 0 {
            return Line::leaf(Self::static_score(root, board, side));
        }

        let moves = MoveGenerator::generate_legal(board, side);

        if moves.is_empty() {
            if !MoveGenerator::has_legal(board, side.opponent()) {
                // 终局：按子数差
                let mine = board.count(side) as f64;
                let theirs = board.count(side.opponent()) as f64;
                return Line::leaf((mine - theirs) * 10.0);
            }

            // 停着：同一深度由对方继续
            let line = self.negamax(root, board, side.opponent(), depth, -beta, -alpha, deadline);
            return Line {
                score: -line.score,
                pv: line.pv,
            };
        }

        let ordered = order_moves(side, board, &moves);
        self.search_moves(root, board, side, ordered, depth, alpha, beta, deadline)
    }

    /// 依次展开走法。每条边计入走子方的落点附加分（占角奖励、X 格惩罚），
    /// 子节点窗口随之平移。
    #[allow(clippy::too_many_arguments)]
    fn search_moves(
        &mut self,
        root: Side,
        board: &Board,
        side: Side,
        moves: Vec<Move>,
        depth: u8,
        mut alpha: f64,
        beta: f64,
        deadline: Instant,
    ) -> Line {
        let mut best = Line::leaf(f64::NEG_INFINITY);

        for mv in moves {
            let bonus = Evaluator::move_bonus(mv.pos, board);
            let next = MoveGenerator::apply(board, &mv, side);
            let child = self.negamax(
                root,
                &next,
                side.opponent(),
                depth - 1,
                bonus - beta,
                bonus - alpha,
                deadline,
            );
            let score = bonus - child.score;

            if score > best.score {
                let mut pv = Vec::with_capacity(child.pv.len() + 1);
                pv.push(mv);
                pv.extend(child.pv);
                best = Line { score, pv };
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break; // 剪枝
            }
            if Instant::now() >= deadline {
                break;
            }
        }

        best
    }

    /// 静态评估：根方视角，按走子方调整符号
    fn static_score(root: Side, board: &Board, side: Side) -> f64 {
        let score = Evaluator::board_score(root, board);
        if side == root {
            score
        } else {
            -score
        }
    }

    /// 获取上一次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::Layout;

    const EPS: f64 = 1e-9;
    const LONG: u64 = 60_000;

    fn pos(text: &str) -> Position {
        text.parse().unwrap()
    }

    fn max_eval(side: Side, board: &Board, moves: &[Move]) -> f64 {
        moves
            .iter()
            .map(|m| Evaluator::evaluate_move(side, board, m).score)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// 黑方可以 A1 占角，另有四个普通走法
    fn corner_position() -> Board {
        Layout::parse("8/1W6/2B5/3WB3/3BW3/8/8/8 b").unwrap().board
    }

    #[test]
    fn test_difficulty_config() {
        let easy = AiConfig::from_difficulty(Difficulty::Easy);
        assert_eq!(easy.max_depth, 1);

        let medium = AiConfig::from_difficulty(Difficulty::Medium);
        assert_eq!(medium.max_depth, 3);
        assert_eq!(medium.time_limit_ms, 250);
        assert_eq!(medium.endgame_empties, 14);
        assert_eq!(medium.depth_cap, 4);

        let hard = AiConfig::from_difficulty(Difficulty::Hard);
        assert_eq!(hard.max_depth, 5);
        assert_eq!(AiConfig::default(), medium);
    }

    #[test]
    fn test_config_partial_json() {
        let config: AiConfig = serde_json::from_str(r#"{ "max_depth": 2 }"#).unwrap();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.time_limit_ms, 250);
        assert!(config.search_enabled);

        let config: AiConfig = serde_json::from_str(r#"{ "difficulty": "hard" }"#).unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_depth_policy() {
        let config = AiConfig::default();
        assert_eq!(config.depth_for(&Board::initial()), 3);

        let endgame = Layout::parse("BBBBBBBB/WWWWWWWW/BBBBBBBB/WWWWWWWW/BBBBBBBB/WWWWWW2/8/8 b")
            .unwrap()
            .board;
        assert_eq!(endgame.empty_count(), 18);
        assert_eq!(config.depth_for(&endgame), 3);

        // 只剩 14 个空格
        let endgame = Layout::parse("BBBBBBBB/WWWWWWWW/BBBBBBBB/WWWWWWWW/BBBBBBBB/WWWWWWWW/BB6/8 b")
            .unwrap()
            .board;
        assert_eq!(endgame.empty_count(), 14);
        assert_eq!(config.depth_for(&endgame), 4);

        // 上限不会压低基础深度
        let deep = AiConfig {
            max_depth: 6,
            depth_cap: 4,
            ..AiConfig::default()
        };
        assert_eq!(deep.depth_for(&endgame), 6);

        // 最大深度表示“搜到截止时间为止”，残局加深不会溢出
        let unbounded = AiConfig {
            max_depth: u8::MAX,
            depth_cap: u8::MAX,
            ..AiConfig::default()
        };
        assert_eq!(unbounded.depth_for(&endgame), u8::MAX);
        assert_eq!(unbounded.depth_for(&Board::initial()), u8::MAX);
    }

    #[test]
    fn test_order_moves_corner_first() {
        let board = corner_position();
        let moves = MoveGenerator::generate_legal(&board, Side::Black);
        let ordered = order_moves(Side::Black, &board, &moves);

        assert_eq!(ordered.len(), moves.len());
        assert_eq!(ordered[0].pos, pos("A1"));
    }

    #[test]
    fn test_order_moves_risky_last() {
        // 靠近左上角的局面，部分走法落在 X 格或角邻格
        let board = Layout::parse("8/2W5/2WB4/3WB3/3BW3/8/8/8 b").unwrap().board;
        let moves = MoveGenerator::generate_legal(&board, Side::Black);
        let ordered = order_moves(Side::Black, &board, &moves);

        let first_risky = ordered
            .iter()
            .position(|m| m.pos.is_x_square() || m.pos.is_corner_adjacent());
        if let Some(i) = first_risky {
            assert!(ordered[i..]
                .iter()
                .all(|m| m.pos.is_x_square() || m.pos.is_corner_adjacent()));
        }

        // 安全走法之间按评估分降序
        let safe: Vec<f64> = ordered
            .iter()
            .filter(|m| !m.pos.is_corner() && !m.pos.is_x_square() && !m.pos.is_corner_adjacent())
            .map(|m| Evaluator::evaluate_move(Side::Black, &board, m).score)
            .collect();
        assert!(safe.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_search_initial_position() {
        let board = Board::initial();
        let moves = MoveGenerator::generate_legal(&board, Side::Black);
        let mut engine = AiEngine::from_difficulty(Difficulty::Medium);

        let result = engine
            .search_best_move(Side::Black, &board, &moves, 3, LONG)
            .unwrap();
        assert!(moves.contains(&result.best));
        assert_eq!(result.depth, 3);
        assert!(!result.timed_out);
        assert_eq!(result.pv[0], result.best);
        assert!(result.nodes > 0);
        assert_eq!(engine.nodes_searched(), result.nodes);
    }

    #[test]
    fn test_depth_one_matches_static_evaluation() {
        for board in [Board::initial(), corner_position()] {
            let moves = MoveGenerator::generate_legal(&board, Side::Black);
            let mut engine = AiEngine::from_difficulty(Difficulty::Medium);
            let result = engine
                .search_best_move(Side::Black, &board, &moves, 1, LONG)
                .unwrap();

            let best_eval = max_eval(Side::Black, &board, &moves);
            let chosen = Evaluator::evaluate_move(Side::Black, &board, &result.best).score;
            assert!((chosen - best_eval).abs() < EPS);
            assert!((result.score - best_eval).abs() < EPS);
        }
    }

    #[test]
    fn test_search_takes_corner() {
        let board = corner_position();
        let moves = MoveGenerator::generate_legal(&board, Side::Black);
        let mut engine = AiEngine::from_difficulty(Difficulty::Medium);

        for depth in [1, 3] {
            let result = engine
                .search_best_move(Side::Black, &board, &moves, depth, LONG)
                .unwrap();
            assert_eq!(result.best.pos, pos("A1"), "depth {}", depth);
        }
    }

    #[test]
    fn test_expired_deadline_falls_back() {
        let board = Board::initial();
        let moves = MoveGenerator::generate_legal(&board, Side::Black);
        let mut engine = AiEngine::from_difficulty(Difficulty::Medium);

        let result = engine
            .search_best_move(Side::Black, &board, &moves, 4, 0)
            .unwrap();
        assert!(result.timed_out);
        assert_eq!(result.depth, 0);
        assert!(moves.contains(&result.best));

        let expected = order_moves(Side::Black, &board, &moves)[0].clone();
        assert_eq!(result.best, expected);
        let score = Evaluator::evaluate_move(Side::Black, &board, &expected).score;
        assert!((result.score - score).abs() < EPS);
    }

    #[test]
    fn test_search_deterministic() {
        let board = corner_position();
        let moves = MoveGenerator::generate_legal(&board, Side::Black);

        let mut a = AiEngine::from_difficulty(Difficulty::Medium);
        let mut b = AiEngine::from_difficulty(Difficulty::Medium);
        let ra = a.search_best_move(Side::Black, &board, &moves, 3, LONG).unwrap();
        let rb = b.search_best_move(Side::Black, &board, &moves, 3, LONG).unwrap();

        assert_eq!(ra.best, rb.best);
        assert_eq!(ra.pv, rb.pv);
        assert_eq!(ra.nodes, rb.nodes);
        assert_eq!(ra.score, rb.score);
    }

    #[test]
    fn test_empty_moves_returns_none() {
        let mut engine = AiEngine::from_difficulty(Difficulty::Medium);
        assert!(engine
            .search_best_move(Side::Black, &Board::initial(), &[], 3, LONG)
            .is_none());

        let mut lone = Board::empty();
        lone.set(pos("A1"), Some(Side::Black));
        assert!(engine.choose_move(&lone, Side::White).is_none());
    }

    #[test]
    fn test_terminal_score() {
        // 双方都无子可下，棋盘未满
        let mut board = Board::empty();
        board.set(pos("A1"), Some(Side::Black));
        board.set(pos("B1"), Some(Side::Black));
        board.set(pos("H8"), Some(Side::White));

        let deadline = Instant::now() + Duration::from_millis(LONG);
        let mut engine = AiEngine::from_difficulty(Difficulty::Medium);

        let line = engine.negamax(Side::Black, &board, Side::Black, 3, f64::NEG_INFINITY, f64::INFINITY, deadline);
        assert!((line.score - 10.0).abs() < EPS);
        assert!(line.pv.is_empty());

        let line = engine.negamax(Side::White, &board, Side::White, 3, f64::NEG_INFINITY, f64::INFINITY, deadline);
        assert!((line.score + 10.0).abs() < EPS);
    }

    #[test]
    fn test_pass_continues_with_opponent() {
        // 黑方无子可下，白方可下 C1
        let board = Layout::parse("WB6/8/8/8/8/8/8/8 b").unwrap().board;
        assert!(MoveGenerator::generate_legal(&board, Side::Black).is_empty());

        let deadline = Instant::now() + Duration::from_millis(LONG);
        let mut engine = AiEngine::from_difficulty(Difficulty::Medium);
        let line = engine.negamax(Side::Black, &board, Side::Black, 1, f64::NEG_INFINITY, f64::INFINITY, deadline);

        assert_eq!(line.pv.len(), 1);
        assert_eq!(line.pv[0].pos, pos("C1"));

        let after = MoveGenerator::apply(&board, &line.pv[0], Side::White);
        let expected = Evaluator::board_score(Side::Black, &after)
            - Evaluator::move_bonus(pos("C1"), &board);
        assert!((line.score - expected).abs() < EPS);
    }

    #[test]
    fn test_choose_move_without_search() {
        let config = AiConfig {
            search_enabled: false,
            ..AiConfig::default()
        };
        let mut engine = AiEngine::new(config);
        let board = corner_position();

        let result = engine.choose_move(&board, Side::Black).unwrap();
        assert_eq!(result.best.pos, pos("A1"));
        assert_eq!(result.depth, 0);
        assert_eq!(result.nodes, 0);
    }

    #[test]
    fn test_tie_prefers_safe_square() {
        // A2（角邻格）与 B5 同分，A2 在输入中靠前
        let state = Layout::parse("8/2B1W3/1BBWWW2/1WBWW1W1/2BBWW2/2BBW3/2B5/2B5 w").unwrap();
        let (board, side) = (state.board, state.current_turn);
        let moves = MoveGenerator::generate_legal(&board, side);
        let a2 = moves.iter().find(|m| m.pos == pos("A2")).unwrap();
        let b5 = moves.iter().find(|m| m.pos == pos("B5")).unwrap();
        assert_eq!(
            Evaluator::evaluate_move(side, &board, a2).score,
            Evaluator::evaluate_move(side, &board, b5).score
        );
        assert_eq!(move_priority(a2.pos), 2);
        assert_eq!(move_priority(b5.pos), 1);

        let mut static_engine = AiEngine::new(AiConfig {
            search_enabled: false,
            ..AiConfig::default()
        });
        let fixed = static_engine.choose_move(&board, side).unwrap();
        assert_eq!(fixed.best.pos, pos("B5"));

        let mut engine = AiEngine::from_difficulty(Difficulty::Medium);
        let searched = engine.search_best_move(side, &board, &moves, 1, LONG).unwrap();
        assert_eq!(searched.best.pos, pos("B5"));
        assert_eq!(searched.score, fixed.score);
    }

    #[test]
    fn test_search_info() {
        let board = corner_position();
        let mut engine = AiEngine::from_difficulty(Difficulty::Medium);
        let result = engine.choose_move(&board, Side::Black).unwrap();
        let info = result.info();

        assert_eq!(info.pv[0], "A1");
        assert_eq!(info.depth, result.depth);
        let json = serde_json::to_value(&info).unwrap();
        assert!(json["nodes"].is_u64());
    }
}
