use thiserror::Error;

#[derive(Error, Debug)]
pub enum PurgeError {
    #[error("注册表错误: {0}")]
    Registry(String),

    #[error("文件系统错误: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("应用包错误: {0}")]
    Package(String),

    #[error("进程错误: {0}")]
    Process(String),

    #[error("超时: {0}")]
    Timeout(String),

    #[error("环境变量错误: {0}")]
    Environment(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("关键系统项: {0}")]
    CriticalSystemItem(String),

    #[error("当前平台不支持: {0}")]
    Unsupported(String),
}
