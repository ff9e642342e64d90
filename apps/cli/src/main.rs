//! # Stretch Demo CLI
//!
//! 力矩驱动演示的启动器和操作员控制台。
//!
//! ```bash
//! # 升降演示（默认），50Hz
//! stretch-demo --demo lift_control
//!
//! # 跟随演示，100Hz
//! stretch-demo --demo follow_me --control-rate 100
//! stretch> hello      # 原样转发，控制循环记录后忽略
//! stretch> q          # 停止：join 控制线程 → 零速度 → stop
//! ```
//!
//! 日志级别通过 `RUST_LOG` 调整，例如 `RUST_LOG=stretch_control=debug`。

use anyhow::{Context, Result};
use clap::Parser;
use stretch_control::loop_runner::DEFAULT_CONTROL_RATE_HZ;
use stretch_control::{ControlLoop, ControlWorker, DemoKind, LoopConfig, SimRobot};
use stretch_signal::{UdpPublisher, UdpSubscriber};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod operator;

use operator::PromptLines;

/// Stretch 力矩驱动演示
#[derive(Parser, Debug)]
#[command(name = "stretch-demo")]
#[command(about = "Effort-driven demos for the Stretch mobile manipulator", long_about = None)]
#[command(version)]
struct Cli {
    /// 演示名称（lift_control | follow_me）
    #[arg(long, default_value = "lift_control")]
    demo: DemoKind,

    /// 控制频率（Hz）
    #[arg(long, default_value_t = DEFAULT_CONTROL_RATE_HZ, allow_negative_numbers = true)]
    control_rate: f64,
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("stretch_cli=info".parse()?)
                .add_directive("stretch_control=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    // 配置错误在任何机器人 I/O 之前报告
    let demo_config = config::load()?;
    let descriptor = demo_config.descriptor(cli.demo);
    let control_loop = ControlLoop::new(descriptor, LoopConfig::new(cli.control_rate))?;

    // 还没有接入硬件驱动后端，使用仿真机器人
    let robot = SimRobot::new();
    info!("Running {} on the simulated robot", cli.demo);

    // 先订阅，再启动控制线程
    let endpoint = demo_config.signal.endpoint.as_str();
    let subscriber = UdpSubscriber::bind(endpoint)
        .with_context(|| format!("无法绑定信号端点 {}", endpoint))?;
    let publisher = UdpPublisher::connect(endpoint)
        .with_context(|| format!("无法连接信号端点 {}", endpoint))?;

    let worker = ControlWorker::spawn(control_loop, robot, subscriber)?;

    println!("Stretch demo: {} @ {} Hz", cli.demo, cli.control_rate);
    println!("输入 'q' 停止，其它文本会转发给控制循环");

    let lines = PromptLines::new("stretch> ")?;
    operator::run(lines, &publisher, worker)?;
    Ok(())
}
