//! # Stretch Signal - 控制循环停止信号通道
//!
//! 操作员（发布端）与控制循环（订阅端）之间的单向文本通道。
//!
//! ## 模型
//!
//! - 一个发布端，一个订阅端，尽力而为投递，无 ack
//! - 订阅端每个控制周期调用一次 [`SignalSubscriber::recv_timeout`]，
//!   超时不是错误，返回 `Ok(None)`
//! - 只有 [`STOP_TOKEN`] 会终止控制循环，其它非空文本只记录日志
//!
//! ## 传输实现
//!
//! - [`UdpSubscriber`] / [`UdpPublisher`]: 本地回环 UDP，订阅端 bind，发布端 connect
//! - [`ChannelSubscriber`] / [`ChannelPublisher`]: 进程内 crossbeam 通道（测试、嵌入式使用）

mod channel;
mod error;
mod udp;

pub use channel::{ChannelPublisher, ChannelSubscriber, channel};
pub use error::SignalError;
pub use udp::{DEFAULT_ENDPOINT, UdpPublisher, UdpSubscriber};

use std::time::Duration;

/// 终止控制循环的唯一文本
pub const STOP_TOKEN: &str = "q";

/// 订阅端：有限时间等待下一条消息
pub trait SignalSubscriber: Send {
    /// 最多阻塞 `timeout`
    ///
    /// - `Ok(Some(text))`: 收到消息
    /// - `Ok(None)`: 超时，没有新输入
    /// - `Err(e)`: 传输层故障
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<String>, SignalError>;
}

/// 发布端：原样转发文本
pub trait SignalPublisher {
    fn publish(&self, message: &str) -> Result<(), SignalError>;
}

/// 订阅端对收到文本的解释
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// 终止控制循环
    Stop,
    /// 其它文本：记录后忽略
    Other(String),
}

impl Signal {
    /// 解析一条消息，空文本返回 `None`
    ///
    /// 订阅端只接受精确匹配的 [`STOP_TOKEN`]。
    pub fn parse(message: &str) -> Option<Signal> {
        if message.is_empty() {
            None
        } else if message == STOP_TOKEN {
            Some(Signal::Stop)
        } else {
            Some(Signal::Other(message.to_string()))
        }
    }
}

/// 操作员端的停止判断（忽略大小写与首尾空白）
pub fn is_stop_request(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(STOP_TOKEN)
}
