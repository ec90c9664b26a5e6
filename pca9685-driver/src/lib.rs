//! Async driver for the PCA9685 16-channel, 12-bit PWM controller.
//!
//! This crate provides an Embassy-compatible async driver for the NXP PCA9685
//! (as found on the Adafruit 16-Channel PWM/Servo breakout), plus a thin
//! servo layer on top of it.
//!
//! # Architecture
//!
//! The crate is split into three layers:
//!
//! - **[`RegisterBus`]** — byte-level register access. [`I2cRegisterBus`]
//!   implements it for any `embedded-hal-async` I2C peripheral; tests and
//!   other transports can supply their own.
//! - **[`Pca9685`]** — validated chip control: prescale computation, the
//!   MODE1 sleep/restart sequence, per-channel and all-channel on/off counts.
//! - **[`Servo`]** — maps an angle or 0.0–1.0 fraction to a pulse width on
//!   one channel.
//!
//! # Quick start
//!
//! ```no_run
//! use pca9685_driver::{
//!     I2cRegisterBus, Pca9685, Pca9685Config, Servo, ServoConfig, DEFAULT_ADDRESS,
//! };
//!
//! # async fn example(i2c: impl embedded_hal_async::i2c::I2c) -> Result<(), ()> {
//! let bus = I2cRegisterBus::new(i2c, DEFAULT_ADDRESS);
//! let mut pwm = Pca9685::new(bus, Pca9685Config::default());
//! pwm.init().await.map_err(|_| ())?;
//!
//! let mut servo = Servo::new(&mut pwm, 0, ServoConfig::default()).map_err(|_| ())?;
//! servo.set_angle(90).await.map_err(|_| ())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on error types
//!   and log controller state changes.

#![cfg_attr(not(test), no_std)]

pub use config::{Pca9685Config, ServoConfig, DEFAULT_FREQUENCY_HZ};
pub use driver::{I2cRegisterBus, RegisterBus};
pub use error::PwmError;
pub use pca9685::{prescale_for, Pca9685, LABEL_CAPACITY};
pub use registers::{CHANNEL_COUNT, DEFAULT_ADDRESS, INTERNAL_OSCILLATOR_HZ, MAX_COUNT};
pub use servo::Servo;

mod config;
mod driver;
mod error;
#[cfg(test)]
mod mock;
mod pca9685;
pub mod registers;
mod servo;
