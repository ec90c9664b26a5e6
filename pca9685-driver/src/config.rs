//! Controller and servo configuration.
//!
//! Both structs are plain data with [`Default`] impls; override individual
//! fields with struct update syntax:
//!
//! ```
//! use pca9685_driver::{Pca9685Config, ServoConfig};
//!
//! let pwm = Pca9685Config {
//!     frequency_hz: 60.0,
//!     ..Pca9685Config::default()
//! };
//! let servo = ServoConfig {
//!     actuation_range: 180,
//!     min_pulse_us: 500.0,
//!     max_pulse_us: 2500.0,
//! };
//! # let _ = (pwm, servo);
//! ```

use crate::registers::INTERNAL_OSCILLATOR_HZ;

/// Default PWM output frequency in Hz (standard hobby servo frame rate).
pub const DEFAULT_FREQUENCY_HZ: f32 = 50.0;

/// Configuration for a [`Pca9685`](crate::Pca9685) controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pca9685Config {
    /// PWM frequency applied by `init()`. Default: 50 Hz.
    pub frequency_hz: f32,
    /// Oscillator frequency used for prescale computation. Default: 25 MHz.
    ///
    /// The internal oscillator drifts with temperature and between parts;
    /// a measured value improves frequency and servo pulse accuracy.
    pub oscillator_hz: f32,
    /// Name used in log output. `None` derives `Controller-0x<addr>`.
    pub label: Option<&'static str>,
    /// Set the MODE2 output-invert bit during `init()`. Default: `false`.
    pub invert_outputs: bool,
}

impl Default for Pca9685Config {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            oscillator_hz: INTERNAL_OSCILLATOR_HZ,
            label: None,
            invert_outputs: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Servo
// ---------------------------------------------------------------------------

/// Pulse-width mapping for a [`Servo`](crate::Servo).
///
/// Hobby servos were historically specified as 1000–2000 µs for 90° of
/// travel, but most modern parts turn 170–180° and accept pulses well outside
/// that window. The defaults of 750–2250 µs typically give about 135°; set
/// `actuation_range` to the travel you actually observe for your pulse limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServoConfig {
    /// Total angular travel in degrees. Default: 135.
    pub actuation_range: u16,
    /// Pulse width at 0° in microseconds. Default: 750.
    pub min_pulse_us: f32,
    /// Pulse width at `actuation_range` in microseconds. Default: 2250.
    pub max_pulse_us: f32,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            actuation_range: 135,
            min_pulse_us: 750.0,
            max_pulse_us: 2250.0,
        }
    }
}

impl ServoConfig {
    /// Check the pulse limits and actuation range.
    ///
    /// Requires `0 <= min_pulse_us < max_pulse_us`, both finite, and a
    /// non-zero actuation range.
    pub fn is_valid(&self) -> bool {
        self.actuation_range > 0
            && self.min_pulse_us.is_finite()
            && self.max_pulse_us.is_finite()
            && self.min_pulse_us >= 0.0
            && self.min_pulse_us < self.max_pulse_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_defaults() {
        let config = Pca9685Config::default();
        assert_eq!(config.frequency_hz, 50.0);
        assert_eq!(config.oscillator_hz, 25_000_000.0);
        assert!(config.label.is_none());
        assert!(!config.invert_outputs);
    }

    #[test]
    fn servo_defaults_are_valid() {
        let config = ServoConfig::default();
        assert_eq!(config.actuation_range, 135);
        assert_eq!(config.min_pulse_us, 750.0);
        assert_eq!(config.max_pulse_us, 2250.0);
        assert!(config.is_valid());
    }

    #[test]
    fn servo_rejects_inverted_or_empty_ranges() {
        let inverted = ServoConfig {
            min_pulse_us: 2000.0,
            max_pulse_us: 1000.0,
            ..ServoConfig::default()
        };
        let equal = ServoConfig {
            min_pulse_us: 1500.0,
            max_pulse_us: 1500.0,
            ..ServoConfig::default()
        };
        let no_travel = ServoConfig {
            actuation_range: 0,
            ..ServoConfig::default()
        };
        let negative = ServoConfig {
            min_pulse_us: -10.0,
            ..ServoConfig::default()
        };
        let nan = ServoConfig {
            max_pulse_us: f32::NAN,
            ..ServoConfig::default()
        };

        for config in [inverted, equal, no_travel, negative, nan] {
            assert!(!config.is_valid(), "{:?} should be rejected", config);
        }
    }
}
