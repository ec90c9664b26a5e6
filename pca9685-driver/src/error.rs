//! Error types for the PCA9685 driver.

use core::fmt;

/// Errors that can occur when driving the PWM controller or a servo.
///
/// `E` is the error type of the underlying [`RegisterBus`](crate::RegisterBus).
/// Every validation variant is reported before any bus traffic is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError<E> {
    /// Underlying bus transaction failed. Passed through unchanged.
    Bus(E),

    /// The bus reports device address 0 (not configured).
    DeviceNotReady,

    /// The requested frequency maps to a prescale outside 3–255.
    UnsupportedFrequency,

    /// Channel index out of valid range (must be 0–15).
    InvalidChannel,

    /// On or off count out of valid range (must be 0–4095).
    InvalidDutyValue,

    /// Servo angle exceeds the configured actuation range.
    AngleOutOfRange,

    /// Servo fraction outside 0.0–1.0.
    FractionOutOfRange,

    /// Servo pulse limits or actuation range are unusable.
    InvalidServoConfig,
}

// Allow ergonomic `?` propagation from raw bus errors.
impl<E> From<E> for PwmError<E> {
    fn from(error: E) -> Self {
        PwmError::Bus(error)
    }
}

impl<E: fmt::Debug> fmt::Display for PwmError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PwmError::Bus(e) => write!(f, "Bus error: {:?}", e),
            PwmError::DeviceNotReady => write!(f, "Device not ready (address not configured)"),
            PwmError::UnsupportedFrequency => write!(f, "Unsupported PWM frequency"),
            PwmError::InvalidChannel => write!(f, "Invalid channel index (must be 0-15)"),
            PwmError::InvalidDutyValue => write!(f, "Invalid on/off count (must be 0-4095)"),
            PwmError::AngleOutOfRange => write!(f, "Servo angle out of range"),
            PwmError::FractionOutOfRange => {
                write!(f, "Servo fraction out of range (must be 0.0-1.0)")
            }
            PwmError::InvalidServoConfig => write!(f, "Invalid servo configuration"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for PwmError<E> {}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for PwmError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            PwmError::Bus(e) => defmt::write!(f, "Bus error: {}", e),
            PwmError::DeviceNotReady => defmt::write!(f, "Device not ready"),
            PwmError::UnsupportedFrequency => defmt::write!(f, "Unsupported PWM frequency"),
            PwmError::InvalidChannel => defmt::write!(f, "Invalid channel index"),
            PwmError::InvalidDutyValue => defmt::write!(f, "Invalid on/off count"),
            PwmError::AngleOutOfRange => defmt::write!(f, "Servo angle out of range"),
            PwmError::FractionOutOfRange => defmt::write!(f, "Servo fraction out of range"),
            PwmError::InvalidServoConfig => defmt::write!(f, "Invalid servo configuration"),
        }
    }
}
