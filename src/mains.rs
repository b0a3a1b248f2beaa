//! Mains frequency strategies
//!
//! Selects the half-cycle length used by phase-delay mapping and the fitted
//! power curve used by power-linearized mapping.

use embassy_time::Duration;
use libm::pow;

use crate::backend::FiringBackend;

/// Half-cycle length of 50 Hz mains
pub const SEMI_PERIOD_50HZ: Duration = Duration::from_micros(10_000);
/// Half-cycle length of 60 Hz mains
pub const SEMI_PERIOD_60HZ: Duration = Duration::from_micros(8_333);

/// How the mains frequency is known to the firing controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainsFrequency {
    /// Built for 50 Hz mains
    Fixed50Hz,
    /// Built for 60 Hz mains
    Fixed60Hz,
    /// Frequency is measured (or set) at runtime and read on every update
    RuntimeDetected,
}

impl MainsFrequency {
    /// Half-cycle length under this strategy.
    ///
    /// Runtime detection asks the backend on every call.
    pub fn semi_period<B: FiringBackend>(self, backend: &B) -> Duration {
        match self {
            Self::Fixed50Hz => SEMI_PERIOD_50HZ,
            Self::Fixed60Hz => SEMI_PERIOD_60HZ,
            Self::RuntimeDetected => backend.semi_period(),
        }
    }

    /// Power curve calibrated for the current frequency.
    ///
    /// Returns `None` when a runtime-detected frequency is neither exactly
    /// 50 Hz nor exactly 60 Hz, since the fits are undefined elsewhere.
    #[allow(clippy::float_cmp)]
    pub fn power_curve<B: FiringBackend>(self, backend: &B) -> Option<&'static PowerCurve> {
        match self {
            Self::Fixed50Hz => Some(&POWER_CURVE_50HZ),
            Self::Fixed60Hz => Some(&POWER_CURVE_60HZ),
            Self::RuntimeDetected => {
                let frequency = backend.frequency();
                if frequency == 50.0 {
                    Some(&POWER_CURVE_50HZ)
                } else if frequency == 60.0 {
                    Some(&POWER_CURVE_60HZ)
                } else {
                    None
                }
            }
        }
    }
}

/// Quintic fit of the firing delay (ms) that delivers a given share of power.
///
/// Coefficients are ordered from x⁵ down to the constant term, x being the
/// hardware brightness in 0-255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerCurve {
    coefficients: [f64; 6],
}

/// Fit for 50 Hz mains
pub const POWER_CURVE_50HZ: PowerCurve = PowerCurve::new([
    -1.5034e-10,
    9.5843e-08,
    -2.2953e-05,
    0.0025471,
    -0.14965,
    9.9846,
]);

/// Fit for 60 Hz mains
pub const POWER_CURVE_60HZ: PowerCurve = PowerCurve::new([
    -1.2528e-10,
    7.9866e-08,
    -1.9126e-05,
    0.0021225,
    -0.12471,
    8.3201,
]);

impl PowerCurve {
    pub const fn new(coefficients: [f64; 6]) -> Self {
        Self { coefficients }
    }

    /// Firing delay in milliseconds for a hardware brightness
    pub fn delay_ms(&self, brightness: u8) -> f64 {
        let x = f64::from(brightness);
        let [c5, c4, c3, c2, c1, c0] = self.coefficients;
        c5 * pow(x, 5.0) + c4 * pow(x, 4.0) + c3 * pow(x, 3.0) + c2 * pow(x, 2.0) + c1 * x + c0
    }

    /// Firing delay in whole microseconds, truncated.
    ///
    /// Values outside `u16` saturate, so an overshooting fit never wraps.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn delay_us(&self, brightness: u8) -> u16 {
        (self.delay_ms(brightness) * 1000.0) as u16
    }
}
