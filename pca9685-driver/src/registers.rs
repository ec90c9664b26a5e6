//! PCA9685 register map, mode bits and chip constants.
//!
//! Each PWM channel owns a 4-byte block starting at `LED0_ON_L + 4 * channel`:
//!
//! ```text
//! +0  ON_L   on-count bits 7..0
//! +1  ON_H   on-count bits 11..8
//! +2  OFF_L  off-count bits 7..0
//! +3  OFF_H  off-count bits 11..8
//! ```
//!
//! The all-channels block at `ALL_LED_ON_L` has the same layout and is
//! applied to every output in one transaction.

// ---------------------------------------------------------------------------
// Registers
// ---------------------------------------------------------------------------

/// Mode register 1: restart, auto-increment, sleep and all-call bits.
pub const MODE1: u8 = 0x00;

/// Mode register 2: output driver configuration.
pub const MODE2: u8 = 0x01;

/// First register of channel 0's on/off block.
pub const LED0_ON_L: u8 = 0x06;

/// First register of the all-channels on/off block.
pub const ALL_LED_ON_L: u8 = 0xFA;

/// PWM frequency prescaler. Writable only while the oscillator sleeps.
pub const PRESCALE: u8 = 0xFE;

// ---------------------------------------------------------------------------
// MODE1 bits
// ---------------------------------------------------------------------------

/// Resume channels that were running before the last sleep.
pub const MODE1_RESTART: u8 = 0x80;

/// Register address auto-increments after each byte of a burst.
pub const MODE1_AUTO_INCREMENT: u8 = 0x20;

/// Low-power mode; oscillator off.
pub const MODE1_SLEEP: u8 = 0x10;

/// Respond to the LED all-call I2C address.
pub const MODE1_ALL_CALL: u8 = 0x01;

/// Mode1 value written by [`Pca9685::reset`](crate::Pca9685::reset).
pub const MODE1_DEFAULT: u8 = 0x00;

// ---------------------------------------------------------------------------
// MODE2 bits
// ---------------------------------------------------------------------------

/// Invert output logic state.
pub const MODE2_OUTPUT_INVERT: u8 = 0x10;

/// Totem-pole output structure (open-drain when cleared).
pub const MODE2_OUTPUT_DRIVER: u8 = 0x04;

// ---------------------------------------------------------------------------
// Chip constants
// ---------------------------------------------------------------------------

/// Default 7-bit I2C address with all address straps low.
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Number of PWM outputs on the chip.
pub const CHANNEL_COUNT: u8 = 16;

/// Ticks per PWM period (12-bit counter).
pub const STEP_COUNT: f32 = 4096.0;

/// Largest on/off count a channel register accepts.
pub const MAX_COUNT: u16 = 4095;

/// Nominal frequency of the internal oscillator in Hz.
pub const INTERNAL_OSCILLATOR_HZ: f32 = 25_000_000.0;

/// Smallest prescale value the hardware accepts.
pub const PRESCALE_MIN: f32 = 3.0;

/// Largest prescale value (8-bit register).
pub const PRESCALE_MAX: f32 = 255.0;

/// Oscillator settle time after waking, in milliseconds.
pub const OSCILLATOR_SETTLE_MS: u32 = 5;

/// Byte offset between consecutive channel blocks.
pub(crate) const CHANNEL_STRIDE: u8 = 4;
