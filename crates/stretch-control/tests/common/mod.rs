//! 测试辅助：脚本化订阅端与带偏移的机器人

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use stretch_control::{Joint, Robot, RobotError, SimHandle, SimRobot, VelocityCommand};
use stretch_signal::{STOP_TOKEN, SignalError, SignalSubscriber};

/// 脚本化订阅端
///
/// 按顺序返回脚本中的结果，脚本用完后返回停止信号。记录每次请求的超时，
/// 代替墙钟验证循环定时。
pub struct ScriptedSubscriber {
    script: VecDeque<Option<String>>,
    pub timeouts: Vec<Duration>,
    on_poll: Option<Box<dyn FnMut(usize) + Send>>,
}

impl ScriptedSubscriber {
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            script: script.into_iter().map(|m| m.map(Into::into)).collect(),
            timeouts: Vec::new(),
            on_poll: None,
        }
    }

    /// `n` 次超时后停止
    pub fn idle(n: usize) -> Self {
        Self::new(std::iter::repeat_n(None::<String>, n))
    }

    /// 每次轮询时回调（参数为轮询序号，从 0 开始）
    pub fn with_on_poll(mut self, f: impl FnMut(usize) + Send + 'static) -> Self {
        self.on_poll = Some(Box::new(f));
        self
    }
}

impl SignalSubscriber for ScriptedSubscriber {
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<String>, SignalError> {
        let index = self.timeouts.len();
        self.timeouts.push(timeout);
        if let Some(f) = self.on_poll.as_mut() {
            f(index);
        }

        match self.script.pop_front() {
            Some(message) => Ok(message),
            None => Ok(Some(STOP_TOKEN.to_string())),
        }
    }
}

/// 首次采样返回仿真读数，之后每次读数加上固定偏移
///
/// 用于制造恒定的力矩误差：基线 = 仿真读数，之后误差 = 偏移。
pub struct OffsetRobot {
    inner: SimRobot,
    offsets: Vec<(Joint, f64)>,
    baseline_reads: usize,
    reads: Arc<AtomicUsize>,
}

impl OffsetRobot {
    /// `baseline_reads` 为一次采样的关节数
    pub fn new(inner: SimRobot, baseline_reads: usize, offsets: Vec<(Joint, f64)>) -> Self {
        Self {
            inner,
            offsets,
            baseline_reads,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn handle(&self) -> SimHandle {
        self.inner.handle()
    }
}

impl Robot for OffsetRobot {
    fn joint_effort(&self, joint: Joint) -> Result<f64, RobotError> {
        let effort = self.inner.joint_effort(joint)?;
        if self.reads.fetch_add(1, Ordering::SeqCst) < self.baseline_reads {
            return Ok(effort);
        }
        let offset = self
            .offsets
            .iter()
            .find(|(j, _)| *j == joint)
            .map(|(_, o)| *o)
            .unwrap_or(0.0);
        Ok(effort + offset)
    }

    fn joint_position(&self, joint: Joint) -> Result<f64, RobotError> {
        self.inner.joint_position(joint)
    }

    fn set_velocity(&mut self, command: VelocityCommand) -> Result<(), RobotError> {
        self.inner.set_velocity(command)
    }

    fn move_to(&mut self, joint: Joint, position: f64) -> Result<(), RobotError> {
        self.inner.move_to(joint, position)
    }

    fn push_command(&mut self) -> Result<(), RobotError> {
        self.inner.push_command()
    }

    fn stop(&mut self) -> Result<(), RobotError> {
        self.inner.stop()
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {}, got {}",
        expected,
        actual
    );
}
