//! 仿真机器人
//!
//! 不需要硬件的 [`Robot`] 实现，供 CLI 在没有驱动后端时运行以及测试使用。
//! 通过可克隆的 [`SimHandle`] 从外部设置力矩读数、注入故障、检查已提交的命令。
//!
//! 挂起/提交语义与真实驱动一致：`set_velocity` 只记录挂起命令，
//! `push_command` 才把它写入已提交历史。

use crate::error::RobotError;
use crate::robot::{Joint, Robot, VelocityCommand, arm_effort_from_ticks};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct SimState {
    efforts: HashMap<Joint, f64>,
    positions: HashMap<Joint, f64>,
    pending_velocity: Option<VelocityCommand>,
    pending_moves: Vec<(Joint, f64)>,
    committed: Vec<VelocityCommand>,
    moves: Vec<(Joint, f64)>,
    pushes: u64,
    stopped: bool,
    fail_reads: bool,
    fail_writes: bool,
}

/// 仿真机器人
#[derive(Debug)]
pub struct SimRobot {
    state: Arc<Mutex<SimState>>,
}

/// 仿真机器人的外部控制句柄
#[derive(Debug, Clone)]
pub struct SimHandle {
    state: Arc<Mutex<SimState>>,
}

impl Default for SimRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl SimRobot {
    /// 所有关节力矩、位置为 0
    pub fn new() -> Self {
        let mut state = SimState::default();
        for joint in [
            Joint::Lift,
            Joint::Arm,
            Joint::WristYaw,
            Joint::WristPitch,
            Joint::WristRoll,
        ] {
            state.efforts.insert(joint, 0.0);
            state.positions.insert(joint, 0.0);
        }

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn handle(&self) -> SimHandle {
        SimHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl SimHandle {
    pub fn set_effort(&self, joint: Joint, effort: f64) {
        self.state.lock().efforts.insert(joint, effort);
    }

    /// 以驱动原始刻度设置伸缩臂力矩
    pub fn set_arm_effort_ticks(&self, effort_ticks: f64) {
        self.set_effort(Joint::Arm, arm_effort_from_ticks(effort_ticks));
    }

    pub fn set_position(&self, joint: Joint, position: f64) {
        self.state.lock().positions.insert(joint, position);
    }

    /// 之后的状态读取全部失败
    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    /// 之后的命令写入全部失败
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    /// 已提交的速度命令（按时间顺序）
    pub fn committed(&self) -> Vec<VelocityCommand> {
        self.state.lock().committed.clone()
    }

    pub fn last_command(&self) -> Option<VelocityCommand> {
        self.state.lock().committed.last().copied()
    }

    /// 已提交的位置命令
    pub fn moves(&self) -> Vec<(Joint, f64)> {
        self.state.lock().moves.clone()
    }

    pub fn push_count(&self) -> u64 {
        self.state.lock().pushes
    }

    pub fn is_stopped(&self) -> bool {
        self.state.lock().stopped
    }
}

impl Robot for SimRobot {
    fn joint_effort(&self, joint: Joint) -> Result<f64, RobotError> {
        let state = self.state.lock();
        if state.fail_reads {
            return Err(RobotError::StatusRead {
                joint,
                reason: "simulated read failure".to_string(),
            });
        }
        state
            .efforts
            .get(&joint)
            .copied()
            .ok_or(RobotError::UnsupportedJoint(joint))
    }

    fn joint_position(&self, joint: Joint) -> Result<f64, RobotError> {
        let state = self.state.lock();
        if state.fail_reads {
            return Err(RobotError::StatusRead {
                joint,
                reason: "simulated read failure".to_string(),
            });
        }
        state
            .positions
            .get(&joint)
            .copied()
            .ok_or(RobotError::UnsupportedJoint(joint))
    }

    fn set_velocity(&mut self, command: VelocityCommand) -> Result<(), RobotError> {
        let mut state = self.state.lock();
        if state.stopped {
            return Err(RobotError::Stopped);
        }
        if state.fail_writes {
            return Err(RobotError::CommandWrite("simulated write failure".to_string()));
        }
        state.pending_velocity = Some(command);
        Ok(())
    }

    fn move_to(&mut self, joint: Joint, position: f64) -> Result<(), RobotError> {
        let mut state = self.state.lock();
        if state.stopped {
            return Err(RobotError::Stopped);
        }
        if state.fail_writes {
            return Err(RobotError::CommandWrite("simulated write failure".to_string()));
        }
        state.pending_moves.push((joint, position));
        Ok(())
    }

    fn push_command(&mut self) -> Result<(), RobotError> {
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(RobotError::CommandWrite("simulated push failure".to_string()));
        }
        if let Some(command) = state.pending_velocity.take() {
            state.committed.push(command);
        }
        let moves = std::mem::take(&mut state.pending_moves);
        for (joint, position) in moves {
            state.positions.insert(joint, position);
            state.moves.push((joint, position));
        }
        state.pushes += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RobotError> {
        let mut state = self.state.lock();
        state.pending_velocity = None;
        state.pending_moves.clear();
        state.stopped = true;
        Ok(())
    }
}
