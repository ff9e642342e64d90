//! UDP 信号通道集成测试
//!
//! 验证：
//! 1. 订阅端 bind 之后发送的消息，即使订阅端稍后才轮询也能收到
//! 2. 端点被占用时 bind 失败（致命错误，不重试）
//! 3. 跨线程发布/订阅

use stretch_signal::{
    STOP_TOKEN, Signal, SignalError, SignalPublisher, SignalSubscriber, UdpPublisher,
    UdpSubscriber,
};
use std::thread;
use std::time::Duration;

#[test]
fn test_message_sent_before_first_poll_is_observed() {
    let mut subscriber = UdpSubscriber::bind("127.0.0.1:0").unwrap();
    let endpoint = subscriber.local_addr().unwrap().to_string();
    let publisher = UdpPublisher::connect(&endpoint).unwrap();

    publisher.publish(STOP_TOKEN).unwrap();
    thread::sleep(Duration::from_millis(20));

    let message = subscriber.recv_timeout(Duration::from_millis(500)).unwrap();
    assert_eq!(message.as_deref().and_then(Signal::parse), Some(Signal::Stop));
}

#[test]
fn test_bind_fails_when_endpoint_taken() {
    let first = UdpSubscriber::bind("127.0.0.1:0").unwrap();
    let endpoint = first.local_addr().unwrap().to_string();

    let second = UdpSubscriber::bind(&endpoint);
    assert!(matches!(second, Err(SignalError::Io(_))));
}

#[test]
fn test_cross_thread_publish() {
    let mut subscriber = UdpSubscriber::bind("127.0.0.1:0").unwrap();
    let endpoint = subscriber.local_addr().unwrap().to_string();

    let sender = thread::spawn(move || {
        let publisher = UdpPublisher::connect(&endpoint).unwrap();
        for message in ["status", "hello", STOP_TOKEN] {
            publisher.publish(message).unwrap();
        }
    });
    sender.join().unwrap();

    let mut received = Vec::new();
    while let Some(message) = subscriber.recv_timeout(Duration::from_millis(200)).unwrap() {
        let stop = Signal::parse(&message) == Some(Signal::Stop);
        received.push(message);
        if stop {
            break;
        }
    }

    assert_eq!(received, vec!["status", "hello", "q"]);
}
