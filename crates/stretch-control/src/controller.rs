//! Deadband Controller - 死区比例控制器
//!
//! 把力矩误差映射为速度命令。
//!
//! # 算法
//!
//! ```text
//! v = Kp * e    if |e| > deadband
//! v = 0         otherwise
//! ```
//!
//! 每个输出通道读取误差向量中的一个轴，各通道相互独立，没有交叉耦合。
//! `|e| == deadband` 落在死区内（输出 0）。
//!
//! # 特性
//!
//! - **无状态**: 没有积分/微分项，同样的输入总是得到同样的输出
//! - **无饱和**: 输出就是 `Kp * e`，不做钳位
//!
//! # 示例
//!
//! ```rust
//! use stretch_control::controller::{Channel, ControlParameters, DeadbandController};
//!
//! let params = ControlParameters::new(2.0, vec![Channel::new(0, 0.02), Channel::new(3, 0.1)]);
//! let controller = DeadbandController::new(params, 4).unwrap();
//!
//! let v = controller.compute(&[3.0, 0.0, 0.0, 10.0]);
//! assert_eq!(v.len(), 2);
//! ```

use crate::error::ControlError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// 默认死区（驱动力矩单位）
pub const DEFAULT_DEADBAND: f64 = 2.0;

/// 速度输出（一或两个通道）
pub type Velocities = SmallVec<[f64; 2]>;

/// 单轴死区比例律
///
/// `|error| > deadband` 时返回 `gain * error`，否则返回 0。
#[inline]
pub fn deadband_velocity(error: f64, deadband: f64, gain: f64) -> f64 {
    if error.abs() > deadband {
        gain * error
    } else {
        0.0
    }
}

/// 输出通道：读取误差向量的 `axis` 分量，乘以 `gain`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Channel {
    pub axis: usize,
    pub gain: f64,
}

impl Channel {
    pub fn new(axis: usize, gain: f64) -> Self {
        Self { axis, gain }
    }
}

fn default_deadband() -> f64 {
    DEFAULT_DEADBAND
}

/// 控制参数（运行期间不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlParameters {
    /// 死区，必须 >= 0
    #[serde(default = "default_deadband")]
    pub deadband: f64,

    /// 输出通道，顺序即速度命令分量的顺序
    pub channels: Vec<Channel>,
}

impl ControlParameters {
    pub fn new(deadband: f64, channels: Vec<Channel>) -> Self {
        Self { deadband, channels }
    }

    /// 检查参数是否适用于 `axes` 维误差向量
    pub fn validate(&self, axes: usize) -> Result<(), ControlError> {
        if !self.deadband.is_finite() || self.deadband < 0.0 {
            return Err(ControlError::Config(format!(
                "Invalid deadband: {} (must be finite and >= 0)",
                self.deadband
            )));
        }
        if self.channels.is_empty() {
            return Err(ControlError::Config("No control channels configured".to_string()));
        }
        for channel in &self.channels {
            if channel.axis >= axes {
                return Err(ControlError::Config(format!(
                    "Channel axis {} out of range (error vector has {} axes)",
                    channel.axis, axes
                )));
            }
            if !channel.gain.is_finite() {
                return Err(ControlError::Config(format!(
                    "Invalid gain {} on axis {}",
                    channel.gain, channel.axis
                )));
            }
        }
        Ok(())
    }
}

/// 死区比例控制器
#[derive(Debug, Clone)]
pub struct DeadbandController {
    params: ControlParameters,
    axes: usize,
}

impl DeadbandController {
    /// 创建控制器，`axes` 为误差向量维数
    pub fn new(params: ControlParameters, axes: usize) -> Result<Self, ControlError> {
        params.validate(axes)?;
        Ok(Self { params, axes })
    }

    pub fn params(&self) -> &ControlParameters {
        &self.params
    }

    /// 误差向量维数
    pub fn axes(&self) -> usize {
        self.axes
    }

    /// 计算速度命令，每个通道一个分量
    ///
    /// # Panics
    ///
    /// `error.len()` 小于构造时的 `axes` 时 panic。
    pub fn compute(&self, error: &[f64]) -> Velocities {
        let deadband = self.params.deadband;
        self.params
            .channels
            .iter()
            .map(|c| deadband_velocity(error[c.axis], deadband, c.gain))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_inside_deadband_is_zero() {
        assert_eq!(deadband_velocity(1.5, 2.0, 0.01), 0.0);
        assert_eq!(deadband_velocity(-1.5, 2.0, -100.0), 0.0);
        assert_eq!(deadband_velocity(0.0, 0.0, 5.0), 0.0);
    }

    #[test]
    fn test_boundary_is_inside_deadband() {
        assert_eq!(deadband_velocity(2.0, 2.0, 0.01), 0.0);
        assert_eq!(deadband_velocity(-2.0, 2.0, 0.01), 0.0);
        assert_ne!(deadband_velocity(2.0 + 1e-9, 2.0, 0.01), 0.0);
    }

    #[test]
    fn test_outside_deadband_is_proportional() {
        assert_close(deadband_velocity(5.0, 2.0, 0.01), 0.05);
        assert_close(deadband_velocity(-5.0, 2.0, 0.01), -0.05);
    }

    #[test]
    fn test_vector_channels() {
        let params = ControlParameters::new(2.0, vec![Channel::new(0, 0.02), Channel::new(3, 0.1)]);
        let controller = DeadbandController::new(params.clone(), 4).unwrap();
        assert_eq!(controller.params(), &params);
        assert_eq!(controller.axes(), 4);

        let v = controller.compute(&[3.0, 0.0, 0.0, 10.0]);
        assert_eq!(v.len(), 2);
        assert_close(v[0], 0.06);
        assert_close(v[1], 1.0);
    }

    #[test]
    fn test_axes_are_independent() {
        let params = ControlParameters::new(2.0, vec![Channel::new(0, 0.02), Channel::new(3, 0.1)]);
        let controller = DeadbandController::new(params, 4).unwrap();

        // 只有轴 3 超出死区；轴 1、2 不参与任何通道
        let v = controller.compute(&[1.0, 50.0, -50.0, -4.0]);
        assert_eq!(v[0], 0.0);
        assert_close(v[1], -0.4);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let out_of_range = ControlParameters::new(2.0, vec![Channel::new(1, 0.01)]);
        assert!(matches!(
            DeadbandController::new(out_of_range, 1),
            Err(ControlError::Config(_))
        ));

        let negative = ControlParameters::new(-1.0, vec![Channel::new(0, 0.01)]);
        assert!(negative.validate(1).is_err());

        let nan_gain = ControlParameters::new(2.0, vec![Channel::new(0, f64::NAN)]);
        assert!(nan_gain.validate(1).is_err());

        let empty = ControlParameters::new(2.0, vec![]);
        assert!(empty.validate(1).is_err());
    }

    #[test]
    fn test_parameters_deserialize_with_default_deadband() {
        let params: ControlParameters =
            toml::from_str("channels = [{ axis = 0, gain = 0.01 }]").unwrap();
        assert_eq!(params.deadband, DEFAULT_DEADBAND);
        assert_eq!(params.channels, vec![Channel::new(0, 0.01)]);
    }

    #[test]
    fn test_parameters_reject_misspelled_keys() {
        let deadband_typo = toml::from_str::<ControlParameters>(
            "deadbnd = 0.5\nchannels = [{ axis = 0, gain = 0.01 }]",
        );
        assert!(deadband_typo.is_err());

        let gain_typo = toml::from_str::<ControlParameters>(
            "channels = [{ axis = 0, gain = 0.01, gian = 9.0 }]",
        );
        assert!(gain_typo.is_err());
    }
}
