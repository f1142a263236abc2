//! 自对弈演示：每一步打印候选手分类与搜索结果
//!
//! 运行方式:
//! ```bash
//! RUST_LOG=reversi_ai=debug cargo run -p reversi-ai --example self_play
//! ```

use protocol::{BoardState, MoveGenerator, Side};
use reversi_ai::{classify_candidates, AiEngine, Difficulty, Language};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== 自对弈演示 ===\n");

    let mut state = BoardState::new(Side::Black);
    let mut engine = AiEngine::from_difficulty(Difficulty::Easy);

    loop {
        let side = state.current_turn;
        let moves = MoveGenerator::generate_legal(&state.board, side);

        if moves.is_empty() {
            if !MoveGenerator::has_legal(&state.board, side.opponent()) {
                break;
            }
            println!("{} 无子可下，停一手\n", side.display_name());
            state.pass();
            continue;
        }

        let classified = classify_candidates(side, &state.board, &moves);
        println!("第 {} 手 {}:", state.ply + 1, side.display_name());
        for c in &classified.list {
            println!(
                "  {:<3} {:<6} {:>6.2}  {}",
                c.pos().to_string(),
                c.kind.as_str(),
                c.score(),
                c.explain(Language::Zh)
            );
        }

        let Some(result) = engine.choose_move(&state.board, side) else {
            break;
        };
        println!(
            "  => {} (depth {}, nodes {}, score {:.2})\n",
            result.best, result.depth, result.nodes, result.score
        );

        let next = MoveGenerator::apply(&state.board, &result.best, side);
        state.commit(next);
    }

    println!("{}", state.board);
    println!(
        "终局: 黑 {} / 白 {}",
        state.board.count(Side::Black),
        state.board.count(Side::White)
    );

    Ok(())
}
