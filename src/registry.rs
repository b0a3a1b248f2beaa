//! Bounded registry of live dimmer channels.
//!
//! The firing controller can only schedule a fixed number of outputs. Every
//! [`Dimmer`](crate::Dimmer) reserves a slot here before binding a pin and
//! gives it back when dropped. The counter lives behind a critical section so
//! the compare-and-increment is indivisible even with interrupts enabled.

use core::cell::Cell;
use core::fmt;

use critical_section::Mutex;

use crate::backend::FiringBackend;

/// Error returned when every slot of the registry is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryFull {
    /// Capacity of the registry that refused the reservation
    pub capacity: u8,
}

impl fmt::Display for RegistryFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "max lights number reached ({})", self.capacity)
    }
}

/// Process-wide counter of live channels, capped at a fixed capacity.
///
/// Usually declared as a `static` next to the firing backend:
///
/// ```ignore
/// static LIGHTS: ChannelRegistry = ChannelRegistry::for_backend::<Thyristors>();
/// ```
pub struct ChannelRegistry {
    capacity: u8,
    live: Mutex<Cell<u8>>,
}

impl ChannelRegistry {
    /// Create an empty registry with the given capacity.
    pub const fn new(capacity: u8) -> Self {
        Self {
            capacity,
            live: Mutex::new(Cell::new(0)),
        }
    }

    /// Create an empty registry sized for a firing backend.
    pub const fn for_backend<B: FiringBackend>() -> Self {
        Self::new(B::MAX_CHANNELS)
    }

    /// Maximum number of simultaneously live channels
    pub const fn capacity(&self) -> u8 {
        self.capacity
    }

    /// Number of currently reserved slots
    pub fn live(&self) -> u8 {
        critical_section::with(|cs| self.live.borrow(cs).get())
    }

    /// Try to reserve one slot.
    ///
    /// The returned lease releases the slot when dropped. Returns
    /// `Err(RegistryFull)` without touching the counter if the registry is
    /// already at capacity.
    pub fn try_reserve(&self) -> Result<SlotLease<'_>, RegistryFull> {
        critical_section::with(|cs| {
            let live = self.live.borrow(cs);
            if live.get() >= self.capacity {
                return Err(RegistryFull {
                    capacity: self.capacity,
                });
            }
            live.set(live.get() + 1);
            Ok(SlotLease { registry: self })
        })
    }

    fn release(&self) {
        critical_section::with(|cs| {
            let live = self.live.borrow(cs);
            live.set(live.get().saturating_sub(1));
        });
    }
}

/// A reserved registry slot.
///
/// Only obtainable through [`ChannelRegistry::try_reserve`], so every lease
/// corresponds to exactly one increment.
#[derive(Debug)]
pub struct SlotLease<'a> {
    registry: &'a ChannelRegistry,
}

impl Drop for SlotLease<'_> {
    fn drop(&mut self) {
        self.registry.release();
    }
}

impl fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelRegistry")
            .field("capacity", &self.capacity)
            .field("live", &self.live())
            .finish()
    }
}
