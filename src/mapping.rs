//! Hardware brightness to firing command.
//!
//! [`PhaseDelay`] makes brightness linear in firing time, [`PowerLinearized`]
//! makes it linear in delivered power through the fitted [`PowerCurve`].
//!
//! [`PowerCurve`]: crate::mains::PowerCurve

use crate::backend::{FiringBackend, FiringChannel};
use crate::range::HARDWARE_MAX;

/// What the firing controller should do on each half-cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FiringCommand {
    /// Fire this many microseconds after the zero crossing
    Delay(u16),
    /// Conduct for the whole half-cycle
    On,
    /// Never fire
    Off,
}

impl FiringCommand {
    /// Forward the command to a firing channel
    pub fn apply<C: FiringChannel>(self, channel: &mut C) {
        match self {
            Self::Delay(delay_us) => channel.set_delay(delay_us),
            Self::On => channel.turn_on(),
            Self::Off => channel.turn_off(),
        }
    }
}

/// Strategy turning a hardware brightness into a firing command
pub trait Mapping {
    fn command<B: FiringBackend>(brightness: u8, backend: &B) -> FiringCommand;
}

/// Brightness proportional to conduction time
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseDelay;

impl Mapping for PhaseDelay {
    fn command<B: FiringBackend>(brightness: u8, backend: &B) -> FiringCommand {
        let semi_period = B::MAINS.semi_period(backend).as_micros();
        FiringCommand::Delay(phase_delay_us(brightness, semi_period))
    }
}

/// `semi - brightness * semi / 255`, truncated
pub fn phase_delay_us(brightness: u8, semi_period_us: u64) -> u16 {
    let on_time = u64::from(brightness) * semi_period_us / u64::from(HARDWARE_MAX);
    let delay = semi_period_us - on_time;
    u16::try_from(delay).unwrap_or(u16::MAX)
}

/// Brightness proportional to delivered power
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerLinearized;

impl Mapping for PowerLinearized {
    fn command<B: FiringBackend>(brightness: u8, backend: &B) -> FiringCommand {
        match B::MAINS.power_curve(backend) {
            Some(curve) => FiringCommand::Delay(curve.delay_us(brightness)),
            // No calibrated curve: only on or off
            None if brightness > 0 => FiringCommand::On,
            None => FiringCommand::Off,
        }
    }
}
