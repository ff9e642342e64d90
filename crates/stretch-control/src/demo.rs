//! 演示描述符
//!
//! 两个演示共用同一个控制循环，区别只在于：
//!
//! | 演示           | 采样关节                                  | 执行轴 | 启动保持 |
//! |----------------|-------------------------------------------|--------|----------|
//! | `lift_control` | wrist_pitch                               | 升降   | 无       |
//! | `follow_me`    | wrist_yaw, wrist_pitch, wrist_roll, arm   | 底盘   | arm      |
//!
//! `follow_me` 的通道映射：平移 ← wrist_yaw 误差 × Kp_v，旋转 ← arm 误差 × Kp_w。

use crate::controller::{Channel, ControlParameters, DEFAULT_DEADBAND};
use crate::error::ControlError;
use crate::robot::{Joint, VelocityCommand};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 演示名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoKind {
    LiftControl,
    FollowMe,
}

impl DemoKind {
    pub fn name(&self) -> &'static str {
        match self {
            DemoKind::LiftControl => "lift_control",
            DemoKind::FollowMe => "follow_me",
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DemoKind {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lift_control" => Ok(DemoKind::LiftControl),
            "follow_me" => Ok(DemoKind::FollowMe),
            _ => Err(ControlError::Config(format!(
                "Invalid demo: {} (expected lift_control or follow_me)",
                s
            ))),
        }
    }
}

/// 执行轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actuation {
    /// 升降关节，一个速度分量
    Lift,
    /// 底盘，两个速度分量（平移，旋转）
    Base,
}

impl Actuation {
    /// 速度命令分量个数
    pub fn arity(&self) -> usize {
        match self {
            Actuation::Lift => 1,
            Actuation::Base => 2,
        }
    }

    /// 把控制器输出组装为速度命令
    ///
    /// `velocities.len()` 必须等于 [`Actuation::arity`]（由描述符校验保证）。
    pub fn command(&self, velocities: &[f64]) -> VelocityCommand {
        match self {
            Actuation::Lift => VelocityCommand::Lift(velocities[0]),
            Actuation::Base => VelocityCommand::Base {
                translation: velocities[0],
                rotation: velocities[1],
            },
        }
    }

    /// 该轴上的零速度命令
    pub fn zero(&self) -> VelocityCommand {
        match self {
            Actuation::Lift => VelocityCommand::Lift(0.0),
            Actuation::Base => VelocityCommand::Base {
                translation: 0.0,
                rotation: 0.0,
            },
        }
    }
}

/// 演示描述符：采样哪些关节、命令哪个轴、使用哪组参数
#[derive(Debug, Clone, PartialEq)]
pub struct DemoDescriptor {
    pub kind: DemoKind,
    /// 采样关节，顺序即误差向量的轴顺序
    pub sensed: Vec<Joint>,
    pub actuation: Actuation,
    /// 启动时在当前位置保持的关节
    pub hold: Option<Joint>,
    pub params: ControlParameters,
}

impl DemoDescriptor {
    /// 升降演示：wrist_pitch 力矩驱动升降关节
    pub fn lift_control() -> Self {
        Self {
            kind: DemoKind::LiftControl,
            sensed: vec![Joint::WristPitch],
            actuation: Actuation::Lift,
            hold: None,
            params: ControlParameters::new(DEFAULT_DEADBAND, vec![Channel::new(0, 0.01)]),
        }
    }

    /// 跟随演示：腕部/伸缩臂力矩驱动底盘
    pub fn follow_me() -> Self {
        Self {
            kind: DemoKind::FollowMe,
            sensed: vec![Joint::WristYaw, Joint::WristPitch, Joint::WristRoll, Joint::Arm],
            actuation: Actuation::Base,
            hold: Some(Joint::Arm),
            params: ControlParameters::new(
                DEFAULT_DEADBAND,
                vec![Channel::new(0, 0.02), Channel::new(3, 0.1)],
            ),
        }
    }

    pub fn for_kind(kind: DemoKind) -> Self {
        match kind {
            DemoKind::LiftControl => Self::lift_control(),
            DemoKind::FollowMe => Self::follow_me(),
        }
    }

    /// 替换控制参数
    pub fn with_params(mut self, params: ControlParameters) -> Self {
        self.params = params;
        self
    }

    pub fn validate(&self) -> Result<(), ControlError> {
        if self.sensed.is_empty() {
            return Err(ControlError::Config(format!(
                "Demo {} samples no joints",
                self.kind
            )));
        }
        if self.params.channels.len() != self.actuation.arity() {
            return Err(ControlError::Config(format!(
                "Demo {} has {} channels but {:?} takes {}",
                self.kind,
                self.params.channels.len(),
                self.actuation,
                self.actuation.arity()
            )));
        }
        self.params.validate(self.sensed.len())
    }
}
