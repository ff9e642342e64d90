//! Loop Runner - 定频控制循环
//!
//! 一个参数化的控制循环，服务所有演示（由 [`DemoDescriptor`] 区分）。
//!
//! # 每个周期
//!
//! 1. 读取采样关节的当前力矩
//! 2. 误差 = 当前 − 基线（逐元素）
//! 3. 死区比例控制器计算速度
//! 4. 设置执行轴速度
//! 5. `push_command()` 提交一次
//! 6. 在停止信号通道上最多等待 `max_wait_time`
//!
//! # 定时
//!
//! 第 6 步的有限时间等待就是循环唯一的等待点，同时充当限速：没有消息时每个周期
//! 至少为 `1000 / control_rate` 毫秒，再加上读写耗时。因此控制频率是软上限，
//! 不是精确值。
//!
//! # 错误
//!
//! 不重试。任何机器人读写或传输错误都直接返回，由调用方（控制线程）终止。
//!
//! # 示例
//!
//! ```rust,no_run
//! use stretch_control::{ControlLoop, DemoDescriptor, LoopConfig, SimRobot};
//! use stretch_signal::UdpSubscriber;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let control_loop = ControlLoop::new(DemoDescriptor::lift_control(), LoopConfig::default())?;
//! let mut robot = SimRobot::new();
//! let mut subscriber = UdpSubscriber::bind(stretch_signal::DEFAULT_ENDPOINT)?;
//!
//! let report = control_loop.run(&mut robot, &mut subscriber)?;
//! println!("{} iterations", report.iterations);
//! # Ok(())
//! # }
//! ```

use crate::controller::DeadbandController;
use crate::demo::DemoDescriptor;
use crate::error::ControlError;
use crate::robot::{Robot, VelocityCommand};
use smallvec::SmallVec;
use std::time::{Duration, Instant};
use stretch_signal::{Signal, SignalSubscriber};
use tracing::{debug, info, warn};

/// 默认控制频率（Hz）
pub const DEFAULT_CONTROL_RATE_HZ: f64 = 50.0;

/// 一次采样的力矩向量，顺序与描述符的 `sensed` 一致
pub type EffortSample = SmallVec<[f64; 4]>;

/// 控制循环配置
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// 目标控制频率（Hz）
    ///
    /// 例如：50.0 表示每个周期至少等待 20ms
    pub control_rate_hz: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            control_rate_hz: DEFAULT_CONTROL_RATE_HZ,
        }
    }
}

impl LoopConfig {
    pub fn new(control_rate_hz: f64) -> Self {
        Self { control_rate_hz }
    }

    pub fn validate(&self) -> Result<(), ControlError> {
        if !self.control_rate_hz.is_finite() || self.control_rate_hz <= 0.0 {
            return Err(ControlError::Config(format!(
                "Invalid control rate: {} Hz (must be > 0)",
                self.control_rate_hz
            )));
        }
        // 周期必须能表示为 Duration，否则等待时间无法计算
        if Duration::try_from_secs_f64(1.0 / self.control_rate_hz).is_err() {
            return Err(ControlError::Config(format!(
                "Invalid control rate: {} Hz (period too long)",
                self.control_rate_hz
            )));
        }
        if self.control_rate_hz > 1000.0 {
            warn!(
                "Very high control rate: {} Hz. Sensor and command latency will dominate the period.",
                self.control_rate_hz
            );
        }
        Ok(())
    }

    /// 每个周期的最长等待时间（`1000 / control_rate` 毫秒）
    ///
    /// 未经 [`validate`](Self::validate) 的无效频率返回 `Duration::MAX`
    pub fn max_wait_time(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.control_rate_hz).unwrap_or(Duration::MAX)
    }
}

/// 循环状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// 终止状态
    Stopped,
}

/// 循环结束时的统计
#[derive(Debug, Clone, PartialEq)]
pub struct LoopReport {
    /// 完成的周期数（包括收到停止信号的那个周期）
    pub iterations: u64,
    /// 收到但被忽略的非停止消息数
    pub ignored_tokens: u64,
    /// 从进入运行态到停止的耗时
    pub elapsed: Duration,
}

impl LoopReport {
    /// 实际平均频率（Hz）
    pub fn achieved_rate_hz(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.iterations as f64 / secs
    }
}

/// 定频控制循环
#[derive(Debug, Clone)]
pub struct ControlLoop {
    descriptor: DemoDescriptor,
    controller: DeadbandController,
    config: LoopConfig,
}

impl ControlLoop {
    /// 创建控制循环，所有配置错误都在这里报告（任何机器人 I/O 之前）
    pub fn new(descriptor: DemoDescriptor, config: LoopConfig) -> Result<Self, ControlError> {
        config.validate()?;
        descriptor.validate()?;
        let controller =
            DeadbandController::new(descriptor.params.clone(), descriptor.sensed.len())?;

        Ok(Self {
            descriptor,
            controller,
            config,
        })
    }

    pub fn descriptor(&self) -> &DemoDescriptor {
        &self.descriptor
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn max_wait_time(&self) -> Duration {
        self.config.max_wait_time()
    }

    /// 读取所有采样关节的力矩
    pub fn sample<R: Robot + ?Sized>(&self, robot: &R) -> Result<EffortSample, ControlError> {
        let mut sample = EffortSample::new();
        for &joint in &self.descriptor.sensed {
            sample.push(robot.joint_effort(joint)?);
        }
        Ok(sample)
    }

    /// 启动准备：保持关节位置，然后采集基线
    pub fn prepare<R: Robot + ?Sized>(&self, robot: &mut R) -> Result<EffortSample, ControlError> {
        if let Some(joint) = self.descriptor.hold {
            let position = robot.joint_position(joint)?;
            robot.move_to(joint, position)?;
            debug!("Holding {} at {:.4}", joint, position);
        }

        self.sample(robot)
    }

    /// 单个周期的感知→计算→执行部分（步骤 1-5）
    pub fn step<R: Robot + ?Sized>(
        &self,
        robot: &mut R,
        baseline: &[f64],
    ) -> Result<VelocityCommand, ControlError> {
        let current = self.sample(robot)?;
        let error: EffortSample = current.iter().zip(baseline).map(|(c, b)| c - b).collect();

        let velocities = self.controller.compute(&error);
        let command = self.descriptor.actuation.command(&velocities);

        robot.set_velocity(command)?;
        robot.push_command()?;

        debug!(?error, ?command, "control step");
        Ok(command)
    }

    /// 运行控制循环，直到收到停止信号或发生错误
    ///
    /// # 返回
    ///
    /// - `Ok(report)`: 收到停止信号，正常结束
    /// - `Err(e)`: 机器人或传输错误（不重试）
    pub fn run<R, S>(&self, robot: &mut R, subscriber: &mut S) -> Result<LoopReport, ControlError>
    where
        R: Robot + ?Sized,
        S: SignalSubscriber + ?Sized,
    {
        let max_wait_time = self.max_wait_time();
        let baseline = self.prepare(robot)?;

        info!(
            demo = %self.descriptor.kind,
            rate_hz = self.config.control_rate_hz,
            ?baseline,
            "Control loop running"
        );

        let start = Instant::now();
        let mut state = LoopState::Running;
        let mut iterations = 0u64;
        let mut ignored_tokens = 0u64;

        while state == LoopState::Running {
            self.step(robot, &baseline)?;
            iterations += 1;

            if let Some(message) = subscriber.recv_timeout(max_wait_time)? {
                match Signal::parse(&message) {
                    Some(Signal::Stop) => {
                        info!("Received: {}", message);
                        state = LoopState::Stopped;
                    },
                    Some(Signal::Other(text)) => {
                        info!("Received: {}", text);
                        ignored_tokens += 1;
                    },
                    None => {},
                }
            }
        }

        let report = LoopReport {
            iterations,
            ignored_tokens,
            elapsed: start.elapsed(),
        };
        info!(
            demo = %self.descriptor.kind,
            iterations = report.iterations,
            ignored = report.ignored_tokens,
            achieved_hz = report.achieved_rate_hz(),
            "Control loop stopped"
        );
        Ok(report)
    }
}
