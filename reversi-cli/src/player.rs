//! 玩家
//!
//! 人类（从输入读坐标）、AI（搜索）、随机

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use protocol::{BoardState, Move, Notation, ReversiError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use reversi_ai::{AiConfig, AiEngine, Classified, Language, SearchResult};

/// 玩家类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    Human,
    Ai,
    Random,
}

/// 本回合的决定
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// 落子；AI 附带搜索结果
    Play {
        mv: Move,
        search: Option<SearchResult>,
    },
    /// 退出对局
    Quit,
}

/// 玩家
pub enum Player {
    Human { show_hints: bool },
    Ai(AiEngine),
    Random(ChaCha8Rng),
}

impl Player {
    pub fn human(show_hints: bool) -> Self {
        Player::Human { show_hints }
    }

    pub fn ai(config: AiConfig) -> Self {
        Player::Ai(AiEngine::new(config))
    }

    pub fn random(seed: u64) -> Self {
        Player::Random(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn kind(&self) -> PlayerKind {
        match self {
            Player::Human { .. } => PlayerKind::Human,
            Player::Ai(_) => PlayerKind::Ai,
            Player::Random(_) => PlayerKind::Random,
        }
    }

    /// APPLY 记录中的理由
    pub fn apply_reason(&self) -> &'static str {
        match self {
            Player::Human { .. } => "human_move",
            Player::Ai(engine) if engine.config().search_enabled => "search_chosen",
            Player::Ai(_) => "best_candidate",
            Player::Random(_) => "random_move",
        }
    }

    /// 做出本回合的决定（`moves` 非空）
    pub fn decide<R: BufRead, W: Write>(
        &mut self,
        state: &BoardState,
        moves: &[Move],
        classified: &Classified,
        lang: Language,
        input: &mut R,
        out: &mut W,
    ) -> Result<Decision> {
        match self {
            Player::Human { show_hints } => {
                if *show_hints {
                    write_hints(classified, lang, out)?;
                }
                read_human_move(state, moves, classified, lang, input, out)
            }
            Player::Ai(engine) => {
                let result = engine
                    .choose_move(&state.board, state.current_turn)
                    .context("AI 没有可选的走法")?;
                Ok(Decision::Play {
                    mv: result.best.clone(),
                    search: Some(result),
                })
            }
            Player::Random(rng) => {
                let mv = moves.choose(rng).context("没有合法走法")?;
                Ok(Decision::Play {
                    mv: mv.clone(),
                    search: None,
                })
            }
        }
    }
}

/// 打印候选手提示
pub fn write_hints<W: Write>(classified: &Classified, lang: Language, out: &mut W) -> Result<()> {
    for c in &classified.list {
        writeln!(
            out,
            "  {:<6} score: {:>6.2}  move: {}  {}",
            c.kind.as_str(),
            c.score(),
            c.pos(),
            c.explain(lang)
        )?;
    }
    Ok(())
}

/// 读取人类输入直到得到合法走法或退出
fn read_human_move<R: BufRead, W: Write>(
    state: &BoardState,
    moves: &[Move],
    classified: &Classified,
    lang: Language,
    input: &mut R,
    out: &mut W,
) -> Result<Decision> {
    let side = state.current_turn;
    let mut line = String::new();

    loop {
        write!(
            out,
            "{} 请输入坐标 (如 D3)，hint 查看候选，board 显示棋盘，quit 退出: ",
            side.display_name()
        )?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).context("读取输入失败")? == 0 {
            return Ok(Decision::Quit);
        }

        let text = line.trim();
        match text.to_lowercase().as_str() {
            "" => continue,
            "quit" | "q" | "exit" => return Ok(Decision::Quit),
            "hint" | "h" | "?" => {
                write_hints(classified, lang, out)?;
                continue;
            }
            "board" | "b" => {
                write!(out, "{}", state.board)?;
                continue;
            }
            _ => {}
        }

        let pos = match Notation::parse(text) {
            Ok(pos) => pos,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        match moves.iter().find(|m| m.pos == pos) {
            Some(mv) => {
                return Ok(Decision::Play {
                    mv: mv.clone(),
                    search: None,
                })
            }
            None => {
                let err = ReversiError::IllegalMove {
                    coord: Notation::to_text(pos),
                };
                writeln!(out, "{}", err)?;
            }
        }
    }
}
