//! 操作员控制台
//!
//! 主线程读取操作员输入，原样转发到信号通道；控制循环在工作线程中运行。
//!
//! - 输入 `q`（忽略大小写）：发送停止信号 → join 控制线程 → 零速度 + stop → 退出
//! - 其它文本：原样转发（控制循环记录后忽略）
//! - Ctrl+C 等同于 `q`，Ctrl+D（输入结束）同样触发停机
//!
//! 每行输入后检查控制线程是否已经退出（例如传感器读取失败），
//! 退出了就立即停机并报告错误，而不是继续接收输入。
//! 检测只在每行输入之后进行：控制线程退出时若操作员没有输入，提示符会一直等待，
//! 直到下一行输入（或 Ctrl+C / Ctrl+D）。

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use stretch_control::{ControlWorker, LoopReport, Robot, shutdown};
use stretch_signal::{STOP_TOKEN, SignalPublisher, is_stop_request};
use tracing::{error, info, warn};

/// 交互式输入行（rustyline，保留会话内历史）
pub struct PromptLines {
    editor: DefaultEditor,
    prompt: String,
}

impl PromptLines {
    pub fn new(prompt: impl Into<String>) -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|e| anyhow::anyhow!("Failed to initialize readline: {}", e))?;
        Ok(Self {
            editor,
            prompt: prompt.into(),
        })
    }
}

impl Iterator for PromptLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Some(line)
            },
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C：按停止处理
                println!("^C");
                Some(STOP_TOKEN.to_string())
            },
            Err(ReadlineError::Eof) => None,
            Err(err) => {
                error!("Input error: {}", err);
                None
            },
        }
    }
}

fn publish<P: SignalPublisher + ?Sized>(publisher: &P, message: &str) {
    // 尽力而为：控制线程已退出时发送可能失败
    if let Err(e) = publisher.publish(message) {
        warn!("Failed to publish {:?}: {}", message, e);
    }
}

/// 运行操作员循环，直到停止请求、输入结束或控制线程退出
pub fn run<I, P, R>(lines: I, publisher: &P, worker: ControlWorker<R>) -> Result<LoopReport>
where
    I: IntoIterator<Item = String>,
    P: SignalPublisher + ?Sized,
    R: Robot + 'static,
{
    for line in lines {
        publish(publisher, &line);

        if is_stop_request(&line) {
            // 订阅端只认精确的停止信号
            if line != STOP_TOKEN {
                publish(publisher, STOP_TOKEN);
            }
            return finish(worker);
        }

        if worker.is_finished() {
            error!("Control worker exited; stopping the robot");
            return finish(worker);
        }
    }

    info!("Input closed, stopping the control loop");
    publish(publisher, STOP_TOKEN);
    finish(worker)
}

/// join 控制线程，拿回机器人句柄后停机
fn finish<R: Robot + 'static>(worker: ControlWorker<R>) -> Result<LoopReport> {
    let actuation = worker.actuation();
    let (mut robot, result) = worker.join()?;

    let stopped = shutdown(&mut robot, actuation);
    let report = result?;
    stopped?;

    info!(
        "Demo finished after {} iterations ({:.1} Hz)",
        report.iterations,
        report.achieved_rate_hz()
    );
    Ok(report)
}
