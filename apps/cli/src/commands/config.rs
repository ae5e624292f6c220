//! 配置管理命令

use crate::app_config::AppConfig;
use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印配置（未指定文件时打印默认配置）
    Show {
        /// 配置文件路径
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// 检查配置文件
    Check {
        /// 配置文件路径
        config: PathBuf,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Show { config } => {
                let config = AppConfig::load(config.as_deref())?;
                print!("{}", config.to_toml_string()?);
                Ok(())
            },

            ConfigCommand::Check { config: path } => {
                let config = AppConfig::load(Some(&path))?;
                println!("✅ 配置有效: {}", path.display());
                println!("  direct_control: {}", config.transport.direct_control_url);
                println!("  sync_control:   {}", config.transport.sync_control_url);
                println!("  tick event:     {}", config.bridge.tick_event_name);
                Ok(())
            },
        }
    }
}
