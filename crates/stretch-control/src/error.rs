//! 控制层错误类型定义

use crate::robot::Joint;
use stretch_signal::SignalError;
use thiserror::Error;

/// 机器人能力接口错误
///
/// 控制循环不做任何重试：一次读取或写入失败就会终止所在线程。
#[derive(Error, Debug)]
pub enum RobotError {
    /// 该机器人没有此关节
    #[error("Joint not available: {0}")]
    UnsupportedJoint(Joint),

    /// 状态读取失败
    #[error("Status read failed for {joint}: {reason}")]
    StatusRead { joint: Joint, reason: String },

    /// 命令写入失败
    #[error("Command write failed: {0}")]
    CommandWrite(String),

    /// 已调用 stop()，不再接受运动命令
    #[error("Robot is stopped")]
    Stopped,
}

/// 控制层错误类型
#[derive(Error, Debug)]
pub enum ControlError {
    /// 配置错误（启动前检测，致命）
    #[error("Configuration error: {0}")]
    Config(String),

    /// 机器人读写错误
    #[error("Robot error: {0}")]
    Robot(#[from] RobotError),

    /// 停止信号通道错误
    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    /// 控制线程创建失败
    #[error("Failed to spawn control worker: {0}")]
    Spawn(std::io::Error),

    /// 控制线程 panic
    #[error("Control worker panicked: {0}")]
    WorkerPanicked(String),
}
