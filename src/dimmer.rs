use core::fmt;
use core::marker::PhantomData;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::backend::{BindError, FiringBackend};
use crate::mains::MainsFrequency;
use crate::mapping::{FiringCommand, Mapping, PhaseDelay, PowerLinearized};
use crate::range::{BrightnessRange, LegacyRange, RestrictedRange};
use crate::registry::{ChannelRegistry, RegistryFull, SlotLease};

/// Brightness linear in firing time, restricted 0-200 input
pub type DimmableLight<'a, B> = Dimmer<'a, B, PhaseDelay, RestrictedRange>;

/// Brightness linear in delivered power, restricted 0-200 input
pub type DimmableLightLinearized<'a, B> = Dimmer<'a, B, PowerLinearized, RestrictedRange>;

/// Brightness linear in firing time, legacy 0-255 input with min/max
pub type LegacyDimmableLight<'a, B> = Dimmer<'a, B, PhaseDelay, LegacyRange>;

/// Brightness linear in delivered power, legacy 0-255 input with min/max
pub type LegacyDimmableLightLinearized<'a, B> = Dimmer<'a, B, PowerLinearized, LegacyRange>;

/// Error returned by [`Dimmer::try_new`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimmerError {
    /// Every firing channel is already in use
    RegistryFull(RegistryFull),
    /// The firing controller refused the pin
    Bind(BindError),
}

impl From<RegistryFull> for DimmerError {
    fn from(err: RegistryFull) -> Self {
        Self::RegistryFull(err)
    }
}

impl From<BindError> for DimmerError {
    fn from(err: BindError) -> Self {
        Self::Bind(err)
    }
}

impl fmt::Display for DimmerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegistryFull(err) => err.fmt(f),
            Self::Bind(err) => err.fmt(f),
        }
    }
}

/// Construction parameters for a [`Dimmer`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DimmerConfig<R: BrightnessRange> {
    /// Hardware range the input is mapped onto
    pub range: R,
}

impl DimmerConfig<RestrictedRange> {
    /// Restricted range with a minimum brightness hint (capped at 55)
    pub const fn with_min_brightness(min: u8) -> Self {
        Self {
            range: RestrictedRange::new(min),
        }
    }
}

impl DimmerConfig<LegacyRange> {
    /// Legacy range with independent bounds
    pub const fn with_bounds(min: u8, max: u8) -> Self {
        Self {
            range: LegacyRange::new(min, max),
        }
    }
}

/// A bound firing channel together with the registry slot it occupies
struct Binding<'a, B: FiringBackend> {
    channel: B::Channel,
    _lease: SlotLease<'a>,
}

/// One dimmer output.
///
/// `M` selects how brightness turns into a firing delay, `R` selects the
/// range contract. A channel constructed while the registry is full (or on a
/// pin the controller refuses) is inert: it keeps tracking brightness but
/// never talks to the controller.
pub struct Dimmer<'a, B: FiringBackend, M: Mapping, R: BrightnessRange> {
    backend: &'a B,
    registry: &'a ChannelRegistry,
    binding: Option<Binding<'a, B>>,
    brightness: u8,
    range: R,
    _mapping: PhantomData<M>,
}

impl<'a, B: FiringBackend, M: Mapping, R: BrightnessRange> Dimmer<'a, B, M, R> {
    /// Create a dimmer on `pin`.
    ///
    /// Never fails: if no slot is left or the pin cannot be bound, a
    /// diagnostic is emitted and an inert channel is returned. Use
    /// [`is_active`](Self::is_active) to check.
    pub fn new(
        registry: &'a ChannelRegistry,
        backend: &'a B,
        pin: u8,
        config: &DimmerConfig<R>,
    ) -> Self {
        let binding = match Self::bind(registry, backend, pin) {
            Ok(binding) => Some(binding),
            Err(_err) => {
                #[cfg(feature = "esp32-log")]
                println!("[Dimmer.new] light on pin {} is not created: {}", pin, _err);
                None
            }
        };
        Self::from_parts(registry, backend, binding, config)
    }

    /// Create a dimmer on `pin`, reporting why it could not be bound.
    pub fn try_new(
        registry: &'a ChannelRegistry,
        backend: &'a B,
        pin: u8,
        config: &DimmerConfig<R>,
    ) -> Result<Self, DimmerError> {
        let binding = Self::bind(registry, backend, pin)?;
        Ok(Self::from_parts(registry, backend, Some(binding), config))
    }

    fn bind(
        registry: &'a ChannelRegistry,
        backend: &'a B,
        pin: u8,
    ) -> Result<Binding<'a, B>, DimmerError> {
        // Reserve first so a full registry never touches the controller.
        // On bind failure the lease drops and the slot is released.
        let lease = registry.try_reserve()?;
        let channel = backend.bind(pin)?;
        Ok(Binding {
            channel,
            _lease: lease,
        })
    }

    fn from_parts(
        registry: &'a ChannelRegistry,
        backend: &'a B,
        binding: Option<Binding<'a, B>>,
        config: &DimmerConfig<R>,
    ) -> Self {
        Self {
            backend,
            registry,
            binding,
            brightness: 0,
            range: config.range,
            _mapping: PhantomData,
        }
    }

    /// Set the brightness, 0 turns the light off.
    ///
    /// Inputs above the range's `INPUT_MAX` are clamped to it.
    pub fn set_brightness(&mut self, brightness: u8) {
        let brightness = R::clamp_input(brightness);
        self.brightness = brightness;
        let hardware = self.range.to_hardware(brightness);
        let command = M::command(hardware, self.backend);
        self.fire(command);
    }

    /// Last brightness set, in the input scale
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Hardware brightness the current input maps to
    pub fn hardware_brightness(&self) -> u8 {
        self.range.to_hardware(self.brightness)
    }

    pub fn min_brightness(&self) -> u8 {
        self.range.min_brightness()
    }

    /// Update the minimum hardware brightness and reapply the current level
    pub fn set_min_brightness(&mut self, min: u8) {
        self.range.set_min_brightness(min);
        self.reapply();
    }

    pub fn turn_off(&mut self) {
        self.set_brightness(0);
    }

    /// Whether the dimmer is bound to a firing channel
    pub const fn is_active(&self) -> bool {
        self.binding.is_some()
    }

    /// Number of dimmers currently holding a firing channel
    pub fn light_count(&self) -> u8 {
        self.registry.live()
    }

    pub fn frequency(&self) -> f32 {
        self.backend.frequency()
    }

    /// Override the mains frequency.
    ///
    /// Only meaningful when the controller detects the frequency at runtime,
    /// ignored otherwise.
    pub fn set_frequency(&self, frequency: f32) {
        if B::MAINS != MainsFrequency::RuntimeDetected {
            #[cfg(feature = "esp32-log")]
            println!(
                "[Dimmer.set_frequency] fixed mains frequency, ignoring {}",
                frequency
            );
            return;
        }
        self.backend.set_frequency(frequency);
    }

    pub fn detected_frequency(&self) -> Option<f32> {
        self.backend.detected_frequency()
    }

    pub fn frequency_monitor_always_on(&self) -> bool {
        self.backend.frequency_monitor_always_on()
    }

    pub fn set_frequency_monitor_always_on(&self, enable: bool) {
        self.backend.set_frequency_monitor_always_on(enable);
    }

    fn reapply(&mut self) {
        if self.brightness > 0 {
            self.set_brightness(self.brightness);
        }
    }

    fn fire(&mut self, command: FiringCommand) {
        if let Some(binding) = self.binding.as_mut() {
            command.apply(&mut binding.channel);
        }
    }
}

impl<B: FiringBackend, R: BrightnessRange> Dimmer<'_, B, PhaseDelay, R> {
    /// Full brightness
    pub fn turn_on(&mut self) {
        self.set_brightness(R::INPUT_MAX);
    }
}

impl<B: FiringBackend, M: Mapping> Dimmer<'_, B, M, LegacyRange> {
    pub fn max_brightness(&self) -> u8 {
        self.range.max_brightness()
    }

    /// Update the maximum hardware brightness and reapply the current level
    pub fn set_max_brightness(&mut self, max: u8) {
        self.range.set_max_brightness(max);
        self.reapply();
    }
}

impl<B: FiringBackend, M: Mapping, R: BrightnessRange + fmt::Debug> fmt::Debug
    for Dimmer<'_, B, M, R>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dimmer")
            .field("active", &self.is_active())
            .field("brightness", &self.brightness)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}
