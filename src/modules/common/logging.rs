use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 日志目录环境变量 (未设置时不写日志文件)
pub const LOG_DIR_ENV: &str = "RUNTIME_PURGE_LOG_DIR";

pub fn init_logging(verbose: bool, log_dir: Option<&Path>) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // RUST_LOG 优先
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "runtime_purge={level},runtime_purge_lib={level},warn"
        ))
    });

    let file_layer = log_dir.and_then(|dir| {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("无法创建日志目录 {}: {}", dir.display(), e);
            return None;
        }

        let file_appender = tracing_appender::rolling::daily(dir, "runtime-purge.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // 保持 guard 存活
        std::mem::forget(guard);

        Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// 默认日志目录，仅在用户显式要求持久化日志时使用
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("runtime-purge")
        .join("logs")
}
