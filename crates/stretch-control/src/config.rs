//! 演示配置文件
//!
//! 可选的 TOML 文件，覆盖内置的控制参数和信号端点：
//!
//! ```toml
//! [signal]
//! endpoint = "127.0.0.1:5555"
//!
//! [lift_control]
//! deadband = 2.0
//! channels = [{ axis = 0, gain = 0.01 }]
//!
//! [follow_me]
//! deadband = 2.0
//! channels = [{ axis = 0, gain = 0.02 }, { axis = 3, gain = 0.1 }]
//! ```
//!
//! 缺省的表使用内置默认值；文件不存在时整个配置都是默认值。

use crate::controller::ControlParameters;
use crate::demo::{DemoDescriptor, DemoKind};
use crate::error::ControlError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use stretch_signal::DEFAULT_ENDPOINT;

/// 信号通道配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalConfig {
    /// 订阅端 bind / 发布端 connect 的端点
    pub endpoint: String,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// 演示配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub signal: SignalConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lift_control: Option<ControlParameters>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_me: Option<ControlParameters>,
}

impl DemoConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ControlError> {
        toml::from_str(content)
            .map_err(|e| ControlError::Config(format!("Invalid demo config: {}", e)))
    }

    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ControlError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ControlError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// 文件不存在时返回默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ControlError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn to_toml_string(&self) -> Result<String, ControlError> {
        toml::to_string_pretty(self)
            .map_err(|e| ControlError::Config(format!("Failed to serialize demo config: {}", e)))
    }

    /// 演示描述符，应用文件中的参数覆盖
    pub fn descriptor(&self, kind: DemoKind) -> DemoDescriptor {
        let descriptor = DemoDescriptor::for_kind(kind);
        let overrides = match kind {
            DemoKind::LiftControl => self.lift_control.as_ref(),
            DemoKind::FollowMe => self.follow_me.as_ref(),
        };

        match overrides {
            Some(params) => descriptor.with_params(params.clone()),
            None => descriptor,
        }
    }
}
