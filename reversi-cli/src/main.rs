use std::io;

use anyhow::Result;
use clap::Parser;
use protocol::Side;
use reversi_cli::{Cli, GameSession, LogStorage};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志（输出到 stderr，不干扰棋盘）
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("reversi_cli=info".parse()?))
        .init();

    if cli.list_logs {
        let storage = LogStorage::new(cli.log_dir.clone())?;
        for log in storage.list_logs()? {
            println!(
                "{}  {}  {} 条记录",
                log.saved_at.format("%Y-%m-%d %H:%M:%S"),
                log.file_name,
                log.record_count
            );
        }
        return Ok(());
    }

    let config = cli.ai_config()?;
    info!(?config, black = ?cli.black, white = ?cli.white, "黑白棋对局开始");

    let black = cli.make_player(cli.black, Side::Black, &config);
    let white = cli.make_player(cli.white, Side::White, &config);
    let mut session = GameSession::new(black, white, cli.first.into(), cli.lang.into());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    match session.run(&mut input, &mut out)? {
        Some(report) => {
            println!("{}", report.to_json()?);
            println!("{}", report.remark());
        }
        None => println!("对局中止"),
    }

    if cli.save_log {
        let storage = LogStorage::new(cli.log_dir.clone())?;
        let name = storage.save_log(session.log())?;
        println!("日志已保存: {}", storage.logs_directory().join(name).display());
    }

    Ok(())
}
