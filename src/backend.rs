//! Boundary to the firing controller.
//!
//! The firing controller owns the timers, the zero-cross interrupt and the
//! actual triac triggering. This crate only hands it a delay or an on/off
//! command per channel and reads the mains frequency back.

use core::fmt;

use embassy_time::Duration;

use crate::mains::MainsFrequency;

/// Edge of the zero-cross signal that starts a half-cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncEdge {
    #[default]
    Rising,
    Falling,
    Change,
}

/// Error returned when a pin cannot be bound to a firing channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindError {
    /// The pin does not exist or cannot drive a triac gate
    InvalidPin(u8),
    /// The pin is already driven by another channel
    PinInUse(u8),
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin(pin) => write!(f, "pin {} can not drive a thyristor", pin),
            Self::PinInUse(pin) => write!(f, "pin {} is already bound", pin),
        }
    }
}

/// Handle to one scheduled output of the firing controller.
///
/// The controller's interrupt reads whatever was written last, so each call
/// must carry a complete value.
pub trait FiringChannel {
    /// Fire `delay_us` microseconds after each zero crossing
    fn set_delay(&mut self, delay_us: u16);

    /// Conduct for the whole half-cycle
    fn turn_on(&mut self);

    /// Never fire
    fn turn_off(&mut self);
}

/// The firing controller itself.
///
/// Methods take `&self`: the controller state is global on real hardware and
/// implementations are expected to guard it with a critical section.
pub trait FiringBackend {
    /// Per-pin handle type
    type Channel: FiringChannel;

    /// Number of outputs the controller can schedule
    const MAX_CHANNELS: u8;

    /// Mains frequency strategy this controller was built for
    const MAINS: MainsFrequency;

    /// Bind a firing channel to `pin`
    fn bind(&self, pin: u8) -> Result<Self::Channel, BindError>;

    /// Mains frequency in Hz the controller currently works with
    fn frequency(&self) -> f32;

    /// Override the mains frequency (runtime detection builds only)
    fn set_frequency(&self, _frequency: f32) {}

    /// Length of one mains half-cycle
    fn semi_period(&self) -> Duration;

    /// Frequency measured by the monitor, if the controller has one
    fn detected_frequency(&self) -> Option<f32> {
        None
    }

    /// Whether the frequency monitor keeps running after start-up
    fn frequency_monitor_always_on(&self) -> bool {
        false
    }

    fn set_frequency_monitor_always_on(&self, _enable: bool) {}

    /// Set up timers and the zero-cross interrupt
    fn begin(&self);

    /// Pin receiving the zero-cross signal
    fn set_sync_pin(&self, pin: u8);

    fn set_sync_edge(&self, edge: SyncEdge);

    /// Enable the internal pullup on the sync pin, where the platform has one
    fn set_sync_pullup(&self, pullup: bool);
}

/// Zero-cross input configuration applied once at start-up
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    pub pin: u8,
    pub edge: SyncEdge,
    pub pullup: bool,
}

impl SyncConfig {
    /// Rising edge without pullup on `pin`
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            edge: SyncEdge::Rising,
            pullup: false,
        }
    }
}

/// Configure the zero-cross input and start the firing controller.
pub fn begin<B: FiringBackend>(backend: &B, config: &SyncConfig) {
    backend.set_sync_pin(config.pin);
    backend.set_sync_edge(config.edge);
    backend.set_sync_pullup(config.pullup);
    backend.begin();
}
