//! 对局控制
//!
//! 回合驱动：停着处理、候选手分类、落子、WHY 日志与对局报告

use std::io::{BufRead, Write};

use anyhow::Result;
use protocol::{
    round2, BoardState, ChosenLabel, GameLog, GameReport, LogKind, MoveGenerator, Position, Side,
    WhyRecord,
};
use reversi_ai::{classify_candidates, Classification, Language};
use tracing::{debug, info};

use crate::player::{Decision, Player, PlayerKind};

/// 单个回合的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// 落子
    Moved(Position),
    /// 停着
    Passed,
    /// 对局已结束
    GameOver,
    /// 玩家退出
    Quit,
}

/// 一局对局
pub struct GameSession {
    state: BoardState,
    black: Player,
    white: Player,
    log: GameLog,
    labels: Vec<ChosenLabel>,
    lang: Language,
}

impl GameSession {
    pub fn new(black: Player, white: Player, first_player: Side, lang: Language) -> Self {
        Self::from_state(BoardState::new(first_player), black, white, lang)
    }

    /// 从指定局面开始
    pub fn from_state(state: BoardState, black: Player, white: Player, lang: Language) -> Self {
        Self {
            state,
            black,
            white,
            log: GameLog::new(),
            labels: Vec::new(),
            lang,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn log(&self) -> &GameLog {
        &self.log
    }

    /// 已落子的分类标签
    pub fn labels(&self) -> &[ChosenLabel] {
        &self.labels
    }

    fn player_mut(&mut self, side: Side) -> &mut Player {
        match side {
            Side::Black => &mut self.black,
            Side::White => &mut self.white,
        }
    }

    fn player_kind(&self, side: Side) -> PlayerKind {
        match side {
            Side::Black => self.black.kind(),
            Side::White => self.white.kind(),
        }
    }

    /// 双方都无子可下或棋盘已满
    pub fn is_over(&self) -> bool {
        self.state.board.is_full() || MoveGenerator::is_terminal(&self.state.board)
    }

    /// 对局报告
    pub fn report(&self) -> GameReport {
        GameReport::new(&self.state.board, &self.labels)
    }

    /// 进行一个回合
    pub fn play_turn<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<TurnOutcome> {
        if self.is_over() {
            return Ok(TurnOutcome::GameOver);
        }

        let side = self.state.current_turn;
        let moves = MoveGenerator::generate_legal(&self.state.board, side);

        if moves.is_empty() {
            info!(side = %side, "no legal moves, passing");
            self.log.push(WhyRecord::pass(side));
            self.state.pass();
            writeln!(out, "{} 无子可下，停一手", side.display_name())?;
            return Ok(TurnOutcome::Passed);
        }

        let classified = classify_candidates(side, &self.state.board, &moves);
        let kind = self.player_kind(side);
        let lang = self.lang;
        let state = self.state.clone();

        let decision = self
            .player_mut(side)
            .decide(&state, &moves, &classified, lang, input, out)?;

        let (mv, search) = match decision {
            Decision::Play { mv, search } => (mv, search),
            Decision::Quit => {
                info!(side = %side, "player quit");
                return Ok(TurnOutcome::Quit);
            }
        };

        // AI 的候选理由（放弃的不记录）
        if kind == PlayerKind::Ai {
            for c in classified
                .list
                .iter()
                .filter(|c| c.kind != Classification::Drop)
            {
                self.log.push(
                    WhyRecord::new(c.pos().to_string(), side, c.kind.into(), c.reason.code())
                        .with_evidence(c.evidence.to_value())
                        .with_score(c.score()),
                );
            }
        }

        if let Some(c) = classified.list.iter().find(|c| c.pos() == mv.pos) {
            self.labels.push(ChosenLabel {
                side,
                mv: mv.pos.to_string(),
                kind: c.kind.into(),
                score: round2(c.score()),
            });
        }

        let reason = self.player_mut(side).apply_reason();
        let mut record = WhyRecord::new(mv.pos.to_string(), side, LogKind::Apply, reason);
        if let Some(result) = &search {
            record = record
                .with_evidence(serde_json::to_value(result.info())?)
                .with_score(result.score);
            debug!(
                side = %side,
                mv = %mv.pos,
                depth = result.depth,
                nodes = result.nodes,
                "search chose move"
            );
        }
        self.log.push(record);

        let next = MoveGenerator::apply(&self.state.board, &mv, side);
        self.state.commit(next);

        match &search {
            Some(result) => writeln!(
                out,
                "{} 落子 {} (depth {}, nodes {}, score {:.2})",
                side.display_name(),
                mv.pos,
                result.depth,
                result.nodes,
                result.score
            )?,
            None => writeln!(out, "{} 落子 {}", side.display_name(), mv.pos)?,
        }

        Ok(TurnOutcome::Moved(mv.pos))
    }

    /// 进行到终局或玩家退出；正常终局时返回报告
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<Option<GameReport>> {
        write!(out, "{}", self.state.board)?;

        loop {
            match self.play_turn(input, out)? {
                TurnOutcome::Moved(_) => write!(out, "{}", self.state.board)?,
                TurnOutcome::Passed => {}
                TurnOutcome::Quit => return Ok(None),
                TurnOutcome::GameOver => break,
            }
        }

        let report = self.report();
        info!(
            winner = ?report.winner,
            black = report.black_count,
            white = report.white_count,
            "game over"
        );
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::{Layout, Winner};
    use reversi_ai::{AiConfig, Difficulty};
    use std::io::Cursor;

    fn fast_ai() -> Player {
        Player::ai(AiConfig {
            max_depth: 1,
            depth_cap: 1,
            ..AiConfig::from_difficulty(Difficulty::Easy)
        })
    }

    fn no_input() -> Cursor<Vec<u8>> {
        Cursor::new(Vec::new())
    }

    #[test]
    fn test_random_vs_ai_full_game() {
        let mut session = GameSession::new(Player::random(7), fast_ai(), Side::Black, Language::Zh);
        let mut out = Vec::new();

        let report = session.run(&mut no_input(), &mut out).unwrap().unwrap();
        assert!(session.is_over());
        assert_eq!(
            report.black_count + report.white_count,
            session.state().board.disc_count()
        );

        // 每次落子都有一条 APPLY 和一个标签
        let applies = session
            .log()
            .records()
            .iter()
            .filter(|r| r.kind == LogKind::Apply)
            .count();
        assert_eq!(applies, session.labels().len());
        assert_eq!(applies as u32, session.state().ply);
    }

    #[test]
    fn test_ai_logs_non_drop_candidates() {
        let mut session = GameSession::new(fast_ai(), Player::random(1), Side::Black, Language::Zh);
        let mut out = Vec::new();

        let outcome = session.play_turn(&mut no_input(), &mut out).unwrap();
        assert!(matches!(outcome, TurnOutcome::Moved(_)));

        let records = session.log().records();
        // 开局四手同分，全部 REVIVE/best_score，随后一条 APPLY
        assert_eq!(records.len(), 5);
        assert!(records[..4]
            .iter()
            .all(|r| r.kind == LogKind::Revive && r.reason == "best_score"));

        let apply = &records[4];
        assert_eq!(apply.kind, LogKind::Apply);
        assert_eq!(apply.reason, "search_chosen");
        assert_eq!(apply.evidence["depth"], 1);
        assert!(apply.evidence["pv"].is_array());

        assert_eq!(session.state().current_turn, Side::White);
        assert_eq!(session.labels()[0].kind, LogKind::Revive);
    }

    #[test]
    fn test_human_turn_and_quit() {
        let mut session =
            GameSession::new(Player::human(false), fast_ai(), Side::Black, Language::Zh);
        let mut input = Cursor::new(b"F5\nquit\n".to_vec());
        let mut out = Vec::new();

        let outcome = session.play_turn(&mut input, &mut out).unwrap();
        assert_eq!(outcome, TurnOutcome::Moved("F5".parse().unwrap()));
        assert_eq!(session.log().records()[0].reason, "human_move");

        // 白方 AI
        session.play_turn(&mut input, &mut out).unwrap();
        assert_eq!(session.play_turn(&mut input, &mut out).unwrap(), TurnOutcome::Quit);
    }

    #[test]
    fn test_pass_is_logged() {
        // 黑方无子可下，白方可下 C1
        let state = Layout::parse("WB6/8/8/8/8/8/8/8 b").unwrap();
        let mut session = GameSession::from_state(state, fast_ai(), fast_ai(), Language::Zh);
        let mut out = Vec::new();

        assert_eq!(session.play_turn(&mut no_input(), &mut out).unwrap(), TurnOutcome::Passed);
        let pass = &session.log().records()[0];
        assert_eq!(pass.kind, LogKind::Pass);
        assert_eq!(pass.mv, "-");
        assert_eq!(pass.reason, "no_legal_moves");
        assert_eq!(session.state().current_turn, Side::White);

        assert_eq!(
            session.play_turn(&mut no_input(), &mut out).unwrap(),
            TurnOutcome::Moved("C1".parse().unwrap())
        );
        assert!(session.is_over());
        assert_eq!(session.play_turn(&mut no_input(), &mut out).unwrap(), TurnOutcome::GameOver);
        assert_eq!(session.report().winner, Winner::White);
    }

    #[test]
    fn test_white_first() {
        let mut session = GameSession::new(fast_ai(), fast_ai(), Side::White, Language::Zh);
        let mut out = Vec::new();
        session.play_turn(&mut no_input(), &mut out).unwrap();
        assert_eq!(session.log().records().last().unwrap().side, Side::White);
    }
}
