//! 进程内传输（crossbeam 通道）
//!
//! 语义与 UDP 传输一致：单发布端、单订阅端、FIFO、超时返回 `None`。

use crate::{SignalError, SignalPublisher, SignalSubscriber};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use std::time::Duration;

/// 创建一对进程内发布端/订阅端
pub fn channel() -> (ChannelPublisher, ChannelSubscriber) {
    let (tx, rx) = unbounded();
    (ChannelPublisher { tx }, ChannelSubscriber { rx })
}

/// 进程内发布端
#[derive(Clone)]
pub struct ChannelPublisher {
    tx: Sender<String>,
}

impl SignalPublisher for ChannelPublisher {
    fn publish(&self, message: &str) -> Result<(), SignalError> {
        self.tx
            .send(message.to_string())
            .map_err(|_| SignalError::Disconnected)
    }
}

/// 进程内订阅端
pub struct ChannelSubscriber {
    rx: Receiver<String>,
}

impl SignalSubscriber for ChannelSubscriber {
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<String>, SignalError> {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => Ok(Some(message)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(SignalError::Disconnected),
        }
    }
}
