//! 死区比例控制器的属性测试
//!
//! 使用 proptest 验证：死区内输出为零、死区外输出严格等于 `gain * error`、
//! 边界值落在死区内、纯函数。

use proptest::prelude::*;
use stretch_control::{Channel, ControlParameters, DeadbandController, deadband_velocity};

proptest! {
    /// |e| <= deadband 时输出为零，与增益无关
    #[test]
    fn inside_deadband_is_zero(
        deadband in 0.0..100.0f64,
        fraction in -1.0..=1.0f64,
        gain in -1000.0..1000.0f64,
    ) {
        let error = deadband * fraction;
        prop_assert!(error.abs() <= deadband);
        prop_assert_eq!(deadband_velocity(error, deadband, gain), 0.0);
    }

    /// |e| > deadband 时输出严格等于 gain * e（无钳位）
    #[test]
    fn outside_deadband_is_exactly_proportional(
        deadband in 0.0..100.0f64,
        excess in 1e-6..1e6f64,
        negative in any::<bool>(),
        gain in -1000.0..1000.0f64,
    ) {
        let magnitude = deadband + excess;
        let error = if negative { -magnitude } else { magnitude };
        prop_assert_eq!(deadband_velocity(error, deadband, gain), gain * error);
    }

    /// 边界值在死区内
    #[test]
    fn boundary_is_zero(deadband in 0.0..100.0f64, gain in -10.0..10.0f64) {
        prop_assert_eq!(deadband_velocity(deadband, deadband, gain), 0.0);
        prop_assert_eq!(deadband_velocity(-deadband, deadband, gain), 0.0);
    }

    /// 同样的输入总是得到同样的输出
    #[test]
    fn controller_is_idempotent(
        errors in prop::collection::vec(-50.0..50.0f64, 4),
        g0 in -1.0..1.0f64,
        g1 in -1.0..1.0f64,
    ) {
        let params = ControlParameters::new(2.0, vec![Channel::new(0, g0), Channel::new(3, g1)]);
        let controller = DeadbandController::new(params, 4).unwrap();

        let first = controller.compute(&errors);
        let second = controller.compute(&errors);
        prop_assert_eq!(first, second);
    }

    /// 每个通道只看自己的轴
    #[test]
    fn channels_are_independent(
        e0 in -50.0..50.0f64,
        e3 in -50.0..50.0f64,
        noise1 in -50.0..50.0f64,
        noise2 in -50.0..50.0f64,
    ) {
        let params = ControlParameters::new(2.0, vec![Channel::new(0, 0.02), Channel::new(3, 0.1)]);
        let controller = DeadbandController::new(params, 4).unwrap();

        let v = controller.compute(&[e0, noise1, noise2, e3]);
        prop_assert_eq!(v[0], deadband_velocity(e0, 2.0, 0.02));
        prop_assert_eq!(v[1], deadband_velocity(e3, 2.0, 0.1));
    }
}
