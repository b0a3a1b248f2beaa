//! Input to hardware brightness remapping.
//!
//! Two generations of the range contract exist and differ observably:
//!
//! - [`LegacyRange`]: input 0-255, independent `min`/`max` hardware bounds.
//! - [`RestrictedRange`]: input 0-200, only `min` is configurable and capped so
//!   that the output keeps at least 200 distinct levels.
//!
//! In both, input 0 maps to hardware 0: off is never reinterpreted as the
//! dimmest level. All divisions truncate.

/// Top of the hardware brightness scale consumed by the mappers
pub const HARDWARE_MAX: u8 = 255;

/// Input ceiling of the legacy generation
pub const LEGACY_INPUT_MAX: u8 = 255;

/// Input ceiling of the restricted generation
pub const RESTRICTED_INPUT_MAX: u8 = 200;

/// Largest minimum accepted by the restricted generation
pub const RESTRICTED_MIN_CAP: u8 = HARDWARE_MAX - RESTRICTED_INPUT_MAX;

/// A range contract mapping user input onto hardware brightness
pub trait BrightnessRange: Copy {
    /// Largest accepted input, anything above is clamped to it
    const INPUT_MAX: u8;

    /// Clamp a raw input into the valid input domain
    fn clamp_input(input: u8) -> u8 {
        input.min(Self::INPUT_MAX)
    }

    /// Lower hardware bound used for the dimmest non-zero input
    fn min_brightness(&self) -> u8;

    /// Update the lower hardware bound, clamping where the generation demands
    fn set_min_brightness(&mut self, min: u8);

    /// Hardware brightness for an already clamped input
    fn to_hardware(&self, input: u8) -> u8;
}

/// Legacy contract: full-width input with independent bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyRange {
    min: u8,
    max: u8,
}

impl LegacyRange {
    /// Both bounds are taken as given. An inverted range (`max < min`) maps
    /// downward instead of being rejected.
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub const fn max_brightness(&self) -> u8 {
        self.max
    }

    pub fn set_max_brightness(&mut self, max: u8) {
        self.max = max;
    }
}

impl Default for LegacyRange {
    fn default() -> Self {
        Self::new(0, HARDWARE_MAX)
    }
}

impl BrightnessRange for LegacyRange {
    const INPUT_MAX: u8 = LEGACY_INPUT_MAX;

    fn min_brightness(&self) -> u8 {
        self.min
    }

    fn set_min_brightness(&mut self, min: u8) {
        self.min = min;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn to_hardware(&self, input: u8) -> u8 {
        if input == 0 {
            return 0;
        }
        if self.min == 0 && self.max == HARDWARE_MAX {
            return input;
        }
        // Signed span, division truncates toward zero
        let span = i32::from(self.max) - i32::from(self.min);
        let offset = (i32::from(input) - 1) * span / 254;
        (i32::from(self.min) + offset) as u8
    }
}

/// Restricted-precision contract: input 0-200 and a single capped minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestrictedRange {
    min: u8,
}

impl RestrictedRange {
    /// `min` above [`RESTRICTED_MIN_CAP`] is clamped to it
    pub const fn new(min: u8) -> Self {
        let min = if min > RESTRICTED_MIN_CAP {
            RESTRICTED_MIN_CAP
        } else {
            min
        };
        Self { min }
    }
}

impl BrightnessRange for RestrictedRange {
    const INPUT_MAX: u8 = RESTRICTED_INPUT_MAX;

    fn min_brightness(&self) -> u8 {
        self.min
    }

    fn set_min_brightness(&mut self, min: u8) {
        *self = Self::new(min);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn to_hardware(&self, input: u8) -> u8 {
        if input == 0 {
            return 0;
        }
        let input = u16::from(input);
        let hardware_max = u16::from(HARDWARE_MAX);
        let input_max = u16::from(Self::INPUT_MAX);
        if self.min == 0 {
            return (input * hardware_max / input_max) as u8;
        }
        let min = u16::from(self.min);
        (min + (input - 1) * (hardware_max - min) / (input_max - 1)) as u8
    }
}
