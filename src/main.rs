//! rcs: 相对收敛速度评测［命令行版］
//!
//! `rcs` 是一个使用 Rust 编写的命令行程序。用户提供实验配置文件以及每次运行的变化周期表、全局最优表和适应度表，本程序能够检查数据并计算各个算法的相对收敛速度。

use clap::Parser;
use rcs::experiment::{evaluate, validate_all};
use rcs::interfaces::command_line::{命令, 命令行, 命令行参数};
use rcs::Error;
use tracing::info;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let args = 命令行参数::parse();
    let command_line = 命令行::新建(args.clone());
    let (config, runs) = command_line.准备()?;
    info!("共读取 {} 次运行", runs.len());
    match args.command {
        命令::Evaluate => {
            let metric = evaluate(&config, &runs, &command_line)?;
            command_line.输出评测指标(&metric)?;
        }
        命令::Validate => {
            let invalid = validate_all(&config.options, &runs, &command_line);
            if invalid > 0 {
                return Err(format!("{} 次运行的数据有误", invalid).into());
            }
        }
    }
    Ok(())
}
