use std::path::PathBuf;

use anyhow::Result;
use chrysalis_cli::{run_match, MatchSettings};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("chrysalis_cli=info".parse()?))
        .init();

    info!("蛹棋对局工具启动");

    let settings = match std::env::args().nth(1) {
        Some(path) => MatchSettings::load_from(&PathBuf::from(path)),
        None => MatchSettings::load(),
    };

    let report = run_match(&settings);
    match report.final_state.result {
        Some(result) => info!("{} 胜 ({})", result.winner, result.reason),
        None => info!("未分胜负"),
    }

    Ok(())
}
