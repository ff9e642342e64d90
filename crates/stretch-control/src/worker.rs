//! 控制线程与停机
//!
//! 机器人句柄以所有权方式移入控制线程，线程结束时连同循环结果一起交还。
//! 操作员线程只有在 `join()` 拿回句柄之后才做最终写入（零速度 + stop），
//! 因此任何时刻只有一个写入者。
//!
//! 控制线程出错退出不会通知操作员线程；操作员线程可以用
//! [`ControlWorker::is_finished`] 检查存活状态。

use crate::demo::Actuation;
use crate::error::ControlError;
use crate::loop_runner::{ControlLoop, LoopReport};
use crate::robot::Robot;
use std::any::Any;
use std::thread::{self, JoinHandle};
use stretch_signal::SignalSubscriber;
use tracing::{error, info};

/// 控制线程结束时交还的机器人句柄和循环结果
pub type WorkerOutcome<R> = (R, Result<LoopReport, ControlError>);

/// 运行控制循环的工作线程
pub struct ControlWorker<R> {
    handle: JoinHandle<WorkerOutcome<R>>,
    actuation: Actuation,
}

impl<R: Robot + 'static> ControlWorker<R> {
    /// 启动控制线程
    ///
    /// `subscriber` 必须已经完成订阅（bind），这样之后发送的停止信号不会丢失。
    pub fn spawn<S>(control_loop: ControlLoop, robot: R, subscriber: S) -> Result<Self, ControlError>
    where
        S: SignalSubscriber + 'static,
    {
        let actuation = control_loop.descriptor().actuation;
        let demo = control_loop.descriptor().kind;

        let handle = thread::Builder::new()
            .name(format!("control-{}", demo))
            .spawn(move || {
                let mut robot = robot;
                let mut subscriber = subscriber;
                let result = control_loop.run(&mut robot, &mut subscriber);
                if let Err(e) = &result {
                    error!("Control loop for {} terminated: {}", demo, e);
                }
                (robot, result)
            })
            .map_err(ControlError::Spawn)?;

        Ok(Self { handle, actuation })
    }
}

impl<R> ControlWorker<R> {
    /// 控制线程是否已经退出（正常停止、出错或 panic）
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn actuation(&self) -> Actuation {
        self.actuation
    }

    /// 等待控制线程退出，拿回机器人句柄
    pub fn join(self) -> Result<WorkerOutcome<R>, ControlError> {
        self.handle
            .join()
            .map_err(|payload| ControlError::WorkerPanicked(panic_message(payload.as_ref())))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// 停机：零速度并提交，然后 stop
///
/// 零速度写入失败时仍然调用 `stop()`，再返回写入错误。
pub fn shutdown<R: Robot + ?Sized>(robot: &mut R, actuation: Actuation) -> Result<(), ControlError> {
    let zeroed = robot
        .set_velocity(actuation.zero())
        .and_then(|()| robot.push_command());
    robot.stop()?;
    zeroed?;

    info!("Robot stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::VelocityCommand;
    use crate::sim::SimRobot;

    #[test]
    fn test_shutdown_zeroes_then_stops() {
        let mut robot = SimRobot::new();
        let handle = robot.handle();

        robot
            .set_velocity(VelocityCommand::Base {
                translation: 0.2,
                rotation: 0.1,
            })
            .unwrap();
        robot.push_command().unwrap();

        shutdown(&mut robot, Actuation::Base).unwrap();

        assert!(handle.last_command().unwrap().is_zero());
        assert!(handle.is_stopped());
    }

    #[test]
    fn test_shutdown_stops_even_if_zeroing_fails() {
        let mut robot = SimRobot::new();
        let handle = robot.handle();
        handle.fail_writes(true);

        let result = shutdown(&mut robot, Actuation::Lift);
        assert!(matches!(result, Err(ControlError::Robot(_))));
        assert!(handle.is_stopped());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");

        let payload: Box<dyn Any + Send> = Box::new(42u32);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
