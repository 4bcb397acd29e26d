use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process;

use runtime_purge_lib::commands;
use runtime_purge_lib::modules::common::logging;

#[derive(Parser, Debug)]
#[command(name = "runtime-purge")]
#[command(about = "Windows 运行时清除工具", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 将日志写入文件 (默认写到本地数据目录)
    #[arg(long, global = true)]
    log_file: bool,

    /// 日志文件目录
    #[arg(long, global = true, env = logging::LOG_DIR_ENV)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| cli.log_file.then(logging::default_log_dir));
    logging::init_logging(cli.verbose, log_dir.as_deref());

    let result = match cli.command {
        commands::Command::Purge(cmd) => commands::purge::execute(cmd).await,
        commands::Command::Config(cmd) => commands::config::execute(cmd).await,
    };

    if let Err(e) = result {
        if cli.verbose {
            tracing::error!("错误: {:#}", e);
        } else {
            eprintln!("错误: {:#}", e);
        }
        process::exit(1);
    }

    Ok(())
}
