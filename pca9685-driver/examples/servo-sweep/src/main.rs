//! Servo sweep example
//!
//! Demonstrates basic usage of the pca9685-driver crate on the Raspberry Pi
//! Pico 2. Initialises the PCA9685 at 50 Hz, then sweeps a servo on
//! channel 0 between its limits and pulses an LED on channel 15.
//!
//! The I2C bus sits behind a mutex so further devices can be added with
//! their own `I2cDevice` handles.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes                        |
//! |-----------|------------|------------------------------|
//! | I2C0 SDA  | GP20       |                              |
//! | I2C0 SCL  | GP21       |                              |
//! | OE        | GND        | Outputs always enabled       |

#![no_std]
#![no_main]

use defmt::*;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pca9685_driver::{
    I2cRegisterBus, Pca9685, Pca9685Config, Servo, ServoConfig, DEFAULT_ADDRESS, MAX_COUNT,
};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the I2C0 interrupt to Embassy's handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// One mutex per physical bus.
static I2C_BUS: StaticCell<Mutex<CriticalSectionRawMutex, I2c<'static, I2C0, i2c::Async>>> =
    StaticCell::new();

const SERVO_CHANNEL: u8 = 0;
const LED_CHANNEL: u8 = 15;
const SWEEP_STEP_DEGREES: u16 = 5;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // --- I2C bus (GP20 = SDA, GP21 = SCL) ---
    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );
    let i2c_bus = I2C_BUS.init(Mutex::new(i2c));

    // --- PWM controller ---
    let bus = I2cRegisterBus::new(I2cDevice::new(i2c_bus), DEFAULT_ADDRESS);
    let config = Pca9685Config {
        label: Some("servo-board"),
        ..Pca9685Config::default()
    };
    let mut pwm = Pca9685::new(bus, config);

    if let Err(e) = pwm.init().await {
        error!("PCA9685 init failed: {}", e);
        return;
    }
    info!("{} running at {} Hz", pwm.label(), pwm.frequency());

    let servo_config = ServoConfig::default();
    let mut angle: u16 = 0;
    let mut rising = true;

    // Main loop: step the servo, mirror its position on the LED, repeat.
    loop {
        {
            let mut servo = unwrap!(Servo::new(&mut pwm, SERVO_CHANNEL, servo_config));
            if let Err(e) = servo.set_angle(angle).await {
                error!("Servo move failed: {}", e);
            }
        }

        let brightness = u32::from(angle) * u32::from(MAX_COUNT)
            / u32::from(servo_config.actuation_range);
        if let Err(e) = pwm.set_channel(LED_CHANNEL, 0, brightness as u16).await {
            error!("LED update failed: {}", e);
        }

        if rising {
            angle = (angle + SWEEP_STEP_DEGREES).min(servo_config.actuation_range);
            rising = angle < servo_config.actuation_range;
        } else {
            angle = angle.saturating_sub(SWEEP_STEP_DEGREES);
            rising = angle == 0;
        }

        Timer::after(Duration::from_millis(50)).await;
    }
}
