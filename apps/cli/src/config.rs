//! 配置文件定位
//!
//! 查找顺序：
//! 1. 环境变量 `STRETCH_DEMO_CONFIG` 指定的文件（必须存在）
//! 2. `<config_dir>/stretch/demos.toml`（不存在时使用内置默认值）
//!    - Linux: `~/.config/stretch/demos.toml`
//!    - macOS: `~/Library/Application Support/stretch/demos.toml`

use anyhow::{Context, Result};
use std::path::PathBuf;
use stretch_control::DemoConfig;
use tracing::debug;

/// 显式指定配置文件的环境变量
pub const CONFIG_ENV: &str = "STRETCH_DEMO_CONFIG";

/// 默认配置文件路径
fn default_config_file() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("stretch");
    path.push("demos.toml");
    Some(path)
}

/// 加载演示配置
pub fn load() -> Result<DemoConfig> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        let path = PathBuf::from(path);
        debug!("Loading demo config from {} ({})", path.display(), CONFIG_ENV);
        return DemoConfig::load(&path)
            .with_context(|| format!("加载配置文件失败: {}", path.display()));
    }

    match default_config_file() {
        Some(path) => {
            debug!("Loading demo config from {}", path.display());
            DemoConfig::load_or_default(&path)
                .with_context(|| format!("加载配置文件失败: {}", path.display()))
        },
        None => Ok(DemoConfig::default()),
    }
}
