//! # TSW Bridge CLI
//!
//! 在没有游戏进程的情况下运行完整的桥接回路：WebSocket 传输 + 帧循环 + 模拟驾驶室。
//!
//! ```bash
//! # 使用默认地址（ws://127.0.0.1:63241 / ws://127.0.0.1:63242）
//! tsw-bridge-cli run
//!
//! # 自定义驾驶室和帧频率
//! tsw-bridge-cli run --cab "Throttle,BrakeF,BrakeB,HornF:momentary" --tick-hz 60 --side back
//!
//! # 打印默认配置
//! tsw-bridge-cli config show > bridge.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod app_config;
mod cab;
mod commands;

use commands::{ConfigCommand, RunCommand};

/// TSW Bridge CLI - 外部控制器桥接工具
#[derive(Parser, Debug)]
#[command(name = "tsw-bridge-cli")]
#[command(about = "Run the TSW controller bridge against a simulated cab", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 运行桥接（dry-run）
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tsw_bridge=info,tsw_transport=info,tsw_bridge_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { args } => args.execute(),
        Commands::Config(cmd) => cmd.execute(),
    }
}
