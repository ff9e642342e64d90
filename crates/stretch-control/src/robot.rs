//! 机器人能力接口
//!
//! 控制循环只通过 [`Robot`] trait 访问硬件。电机驱动 SDK 是外部协作者，
//! 本模块只规定最小能力集合：
//!
//! - 按关节读取力矩（effort）与位置
//! - 设置目标速度（升降关节单轴，或底盘平移+旋转）
//! - 位置保持（move-to）
//! - 每周期一次的 `push_command()` 提交
//! - 停止/失能
//!
//! # 所有权
//!
//! 机器人句柄以所有权方式移入控制线程，join 后交还给操作员线程做最终停机写入。
//! 同一时刻只有一个写入者，由 join 的先后顺序保证，不需要锁。

use crate::error::RobotError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 演示用到的关节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    /// 升降关节
    Lift,
    /// 伸缩臂
    Arm,
    WristYaw,
    WristPitch,
    WristRoll,
}

impl Joint {
    /// 关节名称（与驱动状态表中的键一致）
    pub fn name(&self) -> &'static str {
        match self {
            Joint::Lift => "lift",
            Joint::Arm => "arm",
            Joint::WristYaw => "wrist_yaw",
            Joint::WristPitch => "wrist_pitch",
            Joint::WristRoll => "wrist_roll",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 速度命令
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VelocityCommand {
    /// 升降关节速度
    Lift(f64),
    /// 底盘速度
    Base { translation: f64, rotation: f64 },
}

impl VelocityCommand {
    /// 同一执行轴上的零速度命令
    pub fn zeroed(&self) -> VelocityCommand {
        match self {
            VelocityCommand::Lift(_) => VelocityCommand::Lift(0.0),
            VelocityCommand::Base { .. } => VelocityCommand::Base {
                translation: 0.0,
                rotation: 0.0,
            },
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            VelocityCommand::Lift(v) => v == 0.0,
            VelocityCommand::Base {
                translation,
                rotation,
            } => translation == 0.0 && rotation == 0.0,
        }
    }
}

/// 伸缩臂驱动只上报编码器刻度形式的力矩，换算到与腕部关节同量级
pub fn arm_effort_from_ticks(effort_ticks: f64) -> f64 {
    effort_ticks / 10.0
}

/// 机器人能力接口
///
/// 实现者负责把驱动的原始状态映射为按关节的数值读数。
pub trait Robot: Send {
    /// 读取关节当前力矩（驱动单位，未标定）
    fn joint_effort(&self, joint: Joint) -> Result<f64, RobotError>;

    /// 读取关节当前位置
    fn joint_position(&self, joint: Joint) -> Result<f64, RobotError>;

    /// 设置目标速度（挂起，直到 `push_command()`）
    fn set_velocity(&mut self, command: VelocityCommand) -> Result<(), RobotError>;

    /// 位置命令（挂起，直到 `push_command()`）
    fn move_to(&mut self, joint: Joint, position: f64) -> Result<(), RobotError>;

    /// 提交所有挂起的命令，每周期调用一次，幂等
    fn push_command(&mut self) -> Result<(), RobotError>;

    /// 停止并失能
    fn stop(&mut self) -> Result<(), RobotError>;
}
