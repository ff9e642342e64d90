//! # Stretch Control - 力矩驱动的演示控制循环
//!
//! 在 Stretch 移动机械臂上运行两个演示：
//!
//! - `lift_control`: 手推/手压腕部（wrist_pitch 力矩），升降关节跟随
//! - `follow_me`: 拉动腕部/伸缩臂（wrist_yaw、arm 力矩），底盘跟随
//!
//! 两个演示共用一个定频控制循环：启动时采集力矩基线，之后每个周期
//! 读取力矩 → 死区比例律 → 速度命令 → 提交，并在停止信号通道上有限时间等待。
//!
//! ## 模块
//!
//! - [`controller`]: 死区比例控制器（纯函数）
//! - [`loop_runner`]: 定频控制循环
//! - [`demo`]: 演示描述符
//! - [`robot`]: 机器人能力接口
//! - [`sim`]: 仿真机器人
//! - [`worker`]: 控制线程与停机
//! - [`config`]: TOML 配置文件
//!
//! ## 非目标
//!
//! 路径规划、轨迹生成、安全联锁、多关节协调、稳定性保证都不在范围内。
//! 这些控制器只是围绕手动采集的基线做开环比例微调，仅用于演示。

pub mod config;
pub mod controller;
pub mod demo;
mod error;
pub mod loop_runner;
pub mod robot;
pub mod sim;
pub mod worker;

pub use config::{DemoConfig, SignalConfig};
pub use controller::{Channel, ControlParameters, DeadbandController, deadband_velocity};
pub use demo::{Actuation, DemoDescriptor, DemoKind};
pub use error::{ControlError, RobotError};
pub use loop_runner::{ControlLoop, EffortSample, LoopConfig, LoopReport, LoopState};
pub use robot::{Joint, Robot, VelocityCommand};
pub use sim::{SimHandle, SimRobot};
pub use worker::{ControlWorker, WorkerOutcome, shutdown};
