//! High-level interface for the PCA9685 16-channel, 12-bit PWM controller.
//!
//! [`Pca9685`] wraps a [`RegisterBus`] with input validation, prescale
//! computation and the MODE1 sleep/wake sequencing the chip requires when
//! its frequency changes.

use core::fmt::Write;

use embedded_hal_async::delay::DelayNs;
use heapless::String;

use crate::config::Pca9685Config;
use crate::driver::RegisterBus;
use crate::error::PwmError;
use crate::registers::{
    ALL_LED_ON_L, CHANNEL_COUNT, CHANNEL_STRIDE, LED0_ON_L, MAX_COUNT, MODE1, MODE1_ALL_CALL,
    MODE1_AUTO_INCREMENT, MODE1_DEFAULT, MODE1_RESTART, MODE1_SLEEP, MODE2, MODE2_OUTPUT_DRIVER,
    MODE2_OUTPUT_INVERT, OSCILLATOR_SETTLE_MS, PRESCALE, PRESCALE_MAX, PRESCALE_MIN, STEP_COUNT,
};

/// Capacity of the device label used in log output.
pub const LABEL_CAPACITY: usize = 32;

/// Compute the PRESCALE register value for a PWM frequency.
///
/// Uses the datasheet formula `round(oscillator_hz / 4096 / frequency_hz) - 1`,
/// evaluated as `round(oscillator_hz / 4096 / frequency_hz - 1)`.
///
/// Returns `None` when `frequency_hz` is not a positive finite number, when
/// the unrounded value is below the hardware floor of 3 (frequency too high),
/// or when the rounded value does not fit the 8-bit register (frequency too
/// low).
///
/// # Example
/// ```
/// use pca9685_driver::prescale_for;
///
/// assert_eq!(prescale_for(25_000_000.0, 50.0), Some(121));
/// assert_eq!(prescale_for(25_000_000.0, 2_000.0), None);
/// ```
pub fn prescale_for(oscillator_hz: f32, frequency_hz: f32) -> Option<u8> {
    if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
        return None;
    }

    let raw = oscillator_hz / STEP_COUNT / frequency_hz - 1.0;
    if raw.is_nan() || raw < PRESCALE_MIN {
        return None;
    }

    let prescale = libm::roundf(raw);
    if prescale > PRESCALE_MAX {
        return None;
    }

    Some(prescale as u8)
}

/// Driver for one PCA9685 chip.
///
/// Owns its register bus for the lifetime of the driver; every method that
/// touches the chip takes `&mut self`, so the read-modify-write sequences on
/// MODE1 cannot interleave with other calls on the same controller. To share
/// one physical I2C bus with other devices, give the controller a
/// mutex-guarded bus device.
///
/// # Lifecycle
///
/// 1. [`Pca9685::new()`] — constructs the driver without any bus traffic.
/// 2. [`Pca9685::init()`] — wakes the chip and applies the configured
///    frequency.
/// 3. [`set_channel()`](Self::set_channel) /
///    [`set_all_channels()`](Self::set_all_channels) /
///    [`Servo`](crate::Servo) — drive outputs.
/// 4. [`reset()`](Self::reset) — return MODE1 to its default on shutdown.
///
/// # Example
///
/// ```no_run
/// use pca9685_driver::{I2cRegisterBus, Pca9685, Pca9685Config, DEFAULT_ADDRESS};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let bus = I2cRegisterBus::new(i2c, DEFAULT_ADDRESS);
/// let mut pwm = Pca9685::new(bus, Pca9685Config::default());
/// pwm.init().await.unwrap();
///
/// // 25% duty on channel 0
/// pwm.set_channel(0, 0, 1024).await.unwrap();
/// # }
/// ```
pub struct Pca9685<BUS, D> {
    bus: BUS,
    delay: D,
    /// Last successfully commanded frequency (or the configured one before
    /// any frequency change).
    frequency_hz: f32,
    oscillator_hz: f32,
    invert_outputs: bool,
    /// Last value written to PRESCALE by this driver.
    prescale: Option<u8>,
    label: String<LABEL_CAPACITY>,
}

impl<BUS> Pca9685<BUS, embassy_time::Delay>
where
    BUS: RegisterBus,
{
    /// Construct a driver that pauses with [`embassy_time::Delay`].
    ///
    /// No bus traffic is generated. Call [`init()`](Self::init) before use.
    pub fn new(bus: BUS, config: Pca9685Config) -> Self {
        Self::with_delay(bus, embassy_time::Delay, config)
    }
}

impl<BUS, D> Pca9685<BUS, D>
where
    BUS: RegisterBus,
    D: DelayNs,
{
    /// Construct a driver with a caller-supplied delay provider.
    ///
    /// No bus traffic is generated.
    pub fn with_delay(bus: BUS, delay: D, config: Pca9685Config) -> Self {
        let label = make_label(config.label, bus.device_address());

        Self {
            bus,
            delay,
            frequency_hz: config.frequency_hz,
            oscillator_hz: config.oscillator_hz,
            invert_outputs: config.invert_outputs,
            prescale: None,
            label,
        }
    }

    // -----------------------------------------------------------------------
    // Chip state
    // -----------------------------------------------------------------------

    /// Run the power-up sequence and apply the configured frequency.
    ///
    /// 1. Zero every output through the all-channels block, one register
    ///    at a time since auto-increment may still be off.
    /// 2. MODE2: totem-pole outputs (inverted if configured).
    /// 3. MODE1: respond to all-call.
    /// 4. Wait for the oscillator, clear SLEEP, wait again.
    /// 5. [`set_frequency()`](Self::set_frequency) with the configured value.
    ///
    /// # Errors
    /// * [`PwmError::DeviceNotReady`] if the bus reports address 0
    /// * [`PwmError::UnsupportedFrequency`] if the configured frequency is
    ///   out of range (checked before any bus traffic)
    /// * [`PwmError::Bus`] on communication failure
    pub async fn init(&mut self) -> Result<(), PwmError<BUS::Error>> {
        if self.bus.device_address() == 0 {
            return Err(PwmError::DeviceNotReady);
        }

        let frequency_hz = self.frequency_hz;
        let prescale = self.prescale_for(frequency_hz)?;

        for register in ALL_LED_ON_L..ALL_LED_ON_L + CHANNEL_STRIDE {
            self.bus.write_register(register, 0).await?;
        }

        let mode2 = if self.invert_outputs {
            MODE2_OUTPUT_DRIVER | MODE2_OUTPUT_INVERT
        } else {
            MODE2_OUTPUT_DRIVER
        };
        self.bus.write_register(MODE2, mode2).await?;
        self.bus.write_register(MODE1, MODE1_ALL_CALL).await?;
        self.settle().await;

        let mode1 = self.bus.read_register(MODE1).await?;
        self.bus.write_register(MODE1, mode1 & !MODE1_SLEEP).await?;
        self.settle().await;

        self.apply_prescale(frequency_hz, prescale).await?;

        #[cfg(feature = "defmt")]
        defmt::info!("{}: initialised at {} Hz", self.label.as_str(), frequency_hz);

        Ok(())
    }

    /// Change the PWM output frequency.
    ///
    /// The prescaler can only be written while the oscillator sleeps, so the
    /// chip is put to sleep, reprogrammed, woken, given 5 ms to settle and
    /// then restarted with auto-increment enabled.
    ///
    /// # Errors
    /// * [`PwmError::UnsupportedFrequency`] if `frequency_hz` maps to a
    ///   prescale outside 3–255; nothing is written
    /// * [`PwmError::Bus`] on communication failure. The chip may be left
    ///   asleep; re-run [`init()`](Self::init) to recover.
    ///
    /// # Example
    /// ```no_run
    /// # use pca9685_driver::{I2cRegisterBus, Pca9685, Pca9685Config, DEFAULT_ADDRESS};
    /// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
    /// # let bus = I2cRegisterBus::new(i2c, DEFAULT_ADDRESS);
    /// # let mut pwm = Pca9685::new(bus, Pca9685Config::default());
    /// pwm.set_frequency(60.0).await.unwrap();
    /// assert_eq!(pwm.frequency(), 60.0);
    /// # }
    /// ```
    pub async fn set_frequency(
        &mut self,
        frequency_hz: f32,
    ) -> Result<(), PwmError<BUS::Error>> {
        let prescale = self.prescale_for(frequency_hz)?;
        self.apply_prescale(frequency_hz, prescale).await
    }

    /// Return MODE1 to its default value.
    ///
    /// Channel registers are untouched. Silence outputs with
    /// [`set_all_channels(0, 0)`](Self::set_all_channels) before resetting:
    /// bursts rely on the auto-increment bit this clears.
    pub async fn reset(&mut self) -> Result<(), PwmError<BUS::Error>> {
        self.bus.write_register(MODE1, MODE1_DEFAULT).await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("{}: mode reset", self.label.as_str());

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Outputs
    // -----------------------------------------------------------------------

    /// Set the on and off counts of one channel.
    ///
    /// The output goes high at tick `on` and low at tick `off` of each
    /// 4096-tick period. Takes effect at the next period boundary.
    ///
    /// # Arguments
    /// * `channel` — Channel index (0–15)
    /// * `on` — Tick at which the output turns on (0–4095)
    /// * `off` — Tick at which the output turns off (0–4095)
    ///
    /// # Errors
    /// * [`PwmError::InvalidChannel`] if `channel >= 16`
    /// * [`PwmError::InvalidDutyValue`] if `on` or `off` exceeds 4095
    /// * [`PwmError::Bus`] on communication failure
    pub async fn set_channel(
        &mut self,
        channel: u8,
        on: u16,
        off: u16,
    ) -> Result<(), PwmError<BUS::Error>> {
        if channel >= CHANNEL_COUNT {
            return Err(PwmError::InvalidChannel);
        }

        self.write_counts(LED0_ON_L + CHANNEL_STRIDE * channel, on, off)
            .await
    }

    /// Set the on and off counts of every channel in one transaction.
    ///
    /// Uses the chip's all-channels register block, so all 16 outputs
    /// change together.
    ///
    /// # Errors
    /// * [`PwmError::InvalidDutyValue`] if `on` or `off` exceeds 4095
    /// * [`PwmError::Bus`] on communication failure
    pub async fn set_all_channels(
        &mut self,
        on: u16,
        off: u16,
    ) -> Result<(), PwmError<BUS::Error>> {
        self.write_counts(ALL_LED_ON_L, on, off).await
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Last commanded PWM frequency in Hz.
    ///
    /// Cached rather than read back: the prescaler is rounded, so the chip
    /// cannot reproduce the requested value.
    pub fn frequency(&self) -> f32 {
        self.frequency_hz
    }

    /// Last value this driver wrote to PRESCALE, if any.
    pub fn prescale(&self) -> Option<u8> {
        self.prescale
    }

    /// Oscillator frequency used for prescale computation.
    pub fn oscillator_frequency(&self) -> f32 {
        self.oscillator_hz
    }

    /// 7-bit bus address of the chip.
    pub fn address(&self) -> u8 {
        self.bus.device_address()
    }

    /// Name used in log output.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Consume the driver and give back the bus and delay.
    pub fn release(self) -> (BUS, D) {
        (self.bus, self.delay)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn prescale_for(&self, frequency_hz: f32) -> Result<u8, PwmError<BUS::Error>> {
        prescale_for(self.oscillator_hz, frequency_hz).ok_or(PwmError::UnsupportedFrequency)
    }

    /// Sleep, reprogram PRESCALE, restore MODE1, settle, restart.
    async fn apply_prescale(
        &mut self,
        frequency_hz: f32,
        prescale: u8,
    ) -> Result<(), PwmError<BUS::Error>> {
        let old_mode = self.bus.read_register(MODE1).await?;
        let sleep_mode = (old_mode & !MODE1_RESTART) | MODE1_SLEEP;

        self.bus.write_register(MODE1, sleep_mode).await?;
        self.bus.write_register(PRESCALE, prescale).await?;
        self.bus.write_register(MODE1, old_mode).await?;
        self.settle().await;
        self.bus
            .write_register(MODE1, old_mode | MODE1_RESTART | MODE1_AUTO_INCREMENT)
            .await?;

        self.frequency_hz = frequency_hz;
        self.prescale = Some(prescale);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "{}: prescale {} for {} Hz",
            self.label.as_str(),
            prescale,
            frequency_hz
        );

        Ok(())
    }

    /// Burst-write an on/off pair to the 4-byte block at `register`.
    async fn write_counts(
        &mut self,
        register: u8,
        on: u16,
        off: u16,
    ) -> Result<(), PwmError<BUS::Error>> {
        if on > MAX_COUNT || off > MAX_COUNT {
            return Err(PwmError::InvalidDutyValue);
        }

        let [on_l, on_h] = on.to_le_bytes();
        let [off_l, off_h] = off.to_le_bytes();
        self.bus
            .write_burst(register, &[on_l, on_h, off_l, off_h])
            .await?;

        Ok(())
    }

    async fn settle(&mut self) {
        self.delay.delay_ms(OSCILLATOR_SETTLE_MS).await;
    }
}

fn make_label(name: Option<&str>, address: u8) -> String<LABEL_CAPACITY> {
    let mut label = String::new();
    match name {
        Some(name) => {
            for c in name.chars() {
                if label.push(c).is_err() {
                    break;
                }
            }
        }
        // Always fits: "Controller-0x" plus at most two hex digits.
        None => {
            let _ = write!(label, "Controller-0x{:x}", address);
        }
    }
    label
}
