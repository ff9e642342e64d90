//! 本地回环 UDP 传输
//!
//! 订阅端 bind 固定端点，发布端 connect 到该端点；每个数据报是一条 UTF-8 文本。
//! 订阅端的超时通过 `set_read_timeout` 实现，因此一次 `recv_timeout` 就是控制
//! 循环唯一的等待点。

use crate::{SignalError, SignalPublisher, SignalSubscriber};
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;
use tracing::{debug, trace};

/// 默认端点（本地回环）
pub const DEFAULT_ENDPOINT: &str = "127.0.0.1:5555";

/// 单条消息的最大字节数
const MAX_MESSAGE_LEN: usize = 4096;

/// `set_read_timeout` 不接受零时长
const MIN_TIMEOUT: Duration = Duration::from_micros(1);

fn resolve(endpoint: &str) -> Result<SocketAddr, SignalError> {
    endpoint
        .to_socket_addrs()
        .map_err(|e| SignalError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?
        .next()
        .ok_or_else(|| SignalError::InvalidEndpoint(endpoint.to_string()))
}

/// UDP 订阅端（控制循环侧）
pub struct UdpSubscriber {
    socket: UdpSocket,
    current_timeout: Option<Duration>,
    buf: Vec<u8>,
}

impl UdpSubscriber {
    /// 绑定端点，绑定成功后发送的消息都不会丢失（在缓冲区容量内）
    pub fn bind(endpoint: &str) -> Result<Self, SignalError> {
        let addr = resolve(endpoint)?;
        let socket = UdpSocket::bind(addr)?;
        debug!("Signal subscriber bound to {}", socket.local_addr()?);

        Ok(Self {
            socket,
            current_timeout: None,
            buf: vec![0u8; MAX_MESSAGE_LEN],
        })
    }

    /// 实际绑定的地址（bind 端口 0 时用于获取系统分配的端口）
    pub fn local_addr(&self) -> Result<SocketAddr, SignalError> {
        Ok(self.socket.local_addr()?)
    }
}

impl SignalSubscriber for UdpSubscriber {
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<String>, SignalError> {
        let timeout = timeout.max(MIN_TIMEOUT);
        if self.current_timeout != Some(timeout) {
            self.socket.set_read_timeout(Some(timeout))?;
            self.current_timeout = Some(timeout);
        }

        match self.socket.recv(&mut self.buf) {
            Ok(len) => {
                let message = String::from_utf8_lossy(&self.buf[..len]).into_owned();
                trace!("Signal received: {:?}", message);
                Ok(Some(message))
            },
            // Unix 上超时报告为 WouldBlock，Windows 上为 TimedOut
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            },
            Err(e) => Err(SignalError::Io(e)),
        }
    }
}

/// UDP 发布端（操作员侧）
pub struct UdpPublisher {
    socket: UdpSocket,
}

impl UdpPublisher {
    /// 连接到订阅端的端点
    pub fn connect(endpoint: &str) -> Result<Self, SignalError> {
        let addr = resolve(endpoint)?;
        let local = if addr.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(addr)?;
        debug!("Signal publisher connected to {}", addr);

        Ok(Self { socket })
    }
}

impl SignalPublisher for UdpPublisher {
    fn publish(&self, message: &str) -> Result<(), SignalError> {
        self.socket.send(message.as_bytes())?;
        Ok(())
    }
}
