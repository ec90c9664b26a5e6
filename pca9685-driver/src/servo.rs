//! Hobby servo on one PCA9685 channel.
//!
//! A [`Servo`] borrows the controller and maps an angle or a 0.0–1.0
//! fraction onto the channel's off-count. The pulse always starts at tick 0
//! of the period, so only the off-count varies.

use embedded_hal_async::delay::DelayNs;

use crate::config::ServoConfig;
use crate::driver::RegisterBus;
use crate::error::PwmError;
use crate::pca9685::Pca9685;
use crate::registers::CHANNEL_COUNT;

/// Full scale of the intermediate duty value. Folded to 12 bits with `>> 4`.
const DUTY_FULL_SCALE: f32 = 65535.0;

const MICROS_PER_SECOND: f32 = 1_000_000.0;

/// Servo bound to one controller channel.
///
/// Holds no bus resources of its own; create one whenever a channel needs
/// moving and drop it afterwards.
///
/// # Example
///
/// ```no_run
/// use pca9685_driver::{I2cRegisterBus, Pca9685, Pca9685Config, Servo, ServoConfig};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let bus = I2cRegisterBus::new(i2c, 0x40);
/// let mut pwm = Pca9685::new(bus, Pca9685Config::default());
/// pwm.init().await.unwrap();
///
/// let mut servo = Servo::new(&mut pwm, 0, ServoConfig::default()).unwrap();
/// servo.set_angle(90).await.unwrap();
/// servo.set_fraction(0.25).await.unwrap();
/// # }
/// ```
pub struct Servo<'a, BUS, D> {
    pwm: &'a mut Pca9685<BUS, D>,
    channel: u8,
    config: ServoConfig,
}

impl<'a, BUS, D> Servo<'a, BUS, D>
where
    BUS: RegisterBus,
    D: DelayNs,
{
    /// Bind a servo to `channel` of `pwm`.
    ///
    /// # Errors
    /// * [`PwmError::InvalidChannel`] if `channel >= 16`
    /// * [`PwmError::InvalidServoConfig`] if the pulse limits are not
    ///   `0 <= min < max` or the actuation range is zero
    pub fn new(
        pwm: &'a mut Pca9685<BUS, D>,
        channel: u8,
        config: ServoConfig,
    ) -> Result<Self, PwmError<BUS::Error>> {
        if channel >= CHANNEL_COUNT {
            return Err(PwmError::InvalidChannel);
        }
        if !config.is_valid() {
            return Err(PwmError::InvalidServoConfig);
        }

        Ok(Self {
            pwm,
            channel,
            config,
        })
    }

    /// Move to `degrees` within `0..=actuation_range`.
    ///
    /// # Errors
    /// * [`PwmError::AngleOutOfRange`] if `degrees > actuation_range`
    /// * [`PwmError::InvalidDutyValue`] if the pulse does not fit one period
    ///   at the controller's current frequency
    /// * [`PwmError::Bus`] on communication failure
    pub async fn set_angle(&mut self, degrees: u16) -> Result<(), PwmError<BUS::Error>> {
        if degrees > self.config.actuation_range {
            return Err(PwmError::AngleOutOfRange);
        }

        let fraction = f32::from(degrees) / f32::from(self.config.actuation_range);
        self.set_fraction(fraction).await
    }

    /// Set the pulse width as a fraction between `min_pulse_us` (0.0) and
    /// `max_pulse_us` (1.0).
    ///
    /// For positional servos this is the position as a fraction of the
    /// actuation range.
    ///
    /// # Errors
    /// * [`PwmError::FractionOutOfRange`] if `fraction` is outside 0.0–1.0
    ///   or NaN
    /// * [`PwmError::InvalidDutyValue`] if the pulse does not fit one period
    /// * [`PwmError::Bus`] on communication failure
    pub async fn set_fraction(&mut self, fraction: f32) -> Result<(), PwmError<BUS::Error>> {
        let off = self.off_count(fraction)?;
        self.pwm.set_channel(self.channel, 0, off).await
    }

    /// Off-count that [`set_fraction()`](Self::set_fraction) would write,
    /// without touching the bus.
    ///
    /// Pulse limits are scaled to a 16-bit intermediate at the controller's
    /// current frequency, interpolated, then folded into the 12-bit counter:
    ///
    /// ```text
    /// min  = min_pulse_us * freq / 1e6 * 65535
    /// max  = max_pulse_us * freq / 1e6 * 65535
    /// off  = (trunc(min + fraction * (max - min)) + 1) >> 4
    /// ```
    ///
    /// # Errors
    /// * [`PwmError::FractionOutOfRange`] if `fraction` is outside 0.0–1.0
    ///   or NaN
    pub fn off_count(&self, fraction: f32) -> Result<u16, PwmError<BUS::Error>> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(PwmError::FractionOutOfRange);
        }

        let frequency_hz = self.pwm.frequency();
        let min_duty =
            self.config.min_pulse_us * frequency_hz / MICROS_PER_SECOND * DUTY_FULL_SCALE;
        let max_duty =
            self.config.max_pulse_us * frequency_hz / MICROS_PER_SECOND * DUTY_FULL_SCALE;
        let duty = (min_duty + fraction * (max_duty - min_duty)) as u32;

        // Out-of-range results saturate and are rejected by `set_channel`.
        Ok(u16::try_from(duty.saturating_add(1) >> 4).unwrap_or(u16::MAX))
    }

    /// Controller channel this servo drives.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Pulse-width mapping in use.
    pub fn config(&self) -> &ServoConfig {
        &self.config
    }
}
