//! 信号通道错误类型定义

use thiserror::Error;

/// 信号通道错误类型
#[derive(Error, Debug)]
pub enum SignalError {
    /// socket 错误（bind/connect/send/recv）
    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    /// 端点地址无法解析
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// 对端已关闭（进程内通道）
    #[error("Signal channel disconnected")]
    Disconnected,
}
