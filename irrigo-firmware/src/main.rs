//! Irrigo - Smart Irrigation Controller Firmware
//!
//! Main firmware binary for RP2040-based (Pico / Pico W) irrigation
//! controllers. Reads a capacitive soil sensor and a DHT22, drives a pump
//! relay with hysteresis and a minimum run time, sounds a buzzer on
//! critical conditions and shows live status on an SSD1306 OLED.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::{Flex, Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::pwm::{self, Pwm};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use irrigo_core::config::{parse_config, IrrigationConfig};
use irrigo_core::scheduler::{CadenceScheduler, Drivers};
use irrigo_display::StatusScreen;
use irrigo_drivers::alert::PwmBuzzer;
use irrigo_drivers::display::Ssd1306;
use irrigo_drivers::relay::GpioRelay;
use irrigo_drivers::sensor::{AdcSoilSensor, Dht22};
use irrigo_hal::I2cConfig;
use irrigo_hal_rp2040::{
    check_pins, PwmChannel, RpAnalogInput, RpI2c, RpOpenDrain, RpOutput, RpPwm,
};

use crate::clock::EmbassyClock;

/// Embedded configuration (compiled into firmware)
/// Edit irrigation.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../irrigation.toml");

/// Soil sensor samples averaged per reading
const SOIL_OVERSAMPLING: u8 = 4;

mod board;
mod channels;
mod clock;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Irrigo firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    check_wiring(&config);
    let hw = config.hardware;

    // Pump relay (board: GPIO13), starts off for either polarity
    let off_level = if hw.relay_pin.inverted {
        Level::High
    } else {
        Level::Low
    };
    let relay = GpioRelay::new(
        RpOutput::new(Output::new(p.PIN_13, off_level)),
        hw.relay_pin.inverted,
    );

    // Passive buzzer (board: GPIO18 = PWM slice 1, channel A)
    let pwm = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, pwm::Config::default());
    let buzzer = PwmBuzzer::new(
        RpPwm::new(pwm, PwmChannel::A),
        Delay,
        config.alerts.frequency_hz,
    );

    // Soil sensor (board: GPIO27 = ADC1)
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let soil_channel = Channel::new_pin(p.PIN_27, Pull::None);
    let soil = AdcSoilSensor::with_oversampling(
        RpAnalogInput::new(adc, soil_channel),
        SOIL_OVERSAMPLING,
        config.calibration.dry_raw,
    );

    // DHT22 (board: GPIO2)
    let climate = Dht22::new(RpOpenDrain::new(Flex::new(p.PIN_2)), Delay);

    info!("Sensors and actuators initialized");

    // OLED on I2C0 (board: SDA GPIO0, SCL GPIO1)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2cConfig::FAST.frequency;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_1, p.PIN_0, i2c_config);
    let mut panel = Ssd1306::new(RpI2c::new(i2c));
    match panel.init() {
        Ok(()) => info!("Display initialized"),
        // Keep running headless; every render reports NotInitialized
        Err(e) => warn!("Display init failed, continuing without it: {:?}", e),
    }
    let display = StatusScreen::new(panel, EmbassyClock);

    // Stop button (board: GPIO15)
    let stop_pull = if hw.stop_pin.pull_up {
        Pull::Up
    } else {
        Pull::None
    };
    let stop_button = Input::new(p.PIN_15, stop_pull);

    let scheduler: tasks::Scheduler = CadenceScheduler::new(
        config,
        Drivers {
            soil,
            environment: climate,
            pump: relay,
            alert: buzzer,
            display,
            clock: EmbassyClock,
        },
    );

    // Spawn tasks
    spawner.spawn(tasks::irrigation_task(scheduler)).unwrap();
    spawner
        .spawn(tasks::stop_button_task(stop_button, hw.stop_pin.inverted))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse and validate the embedded configuration
///
/// build.rs already rejects a broken irrigation.toml, so the fallbacks here
/// only guard against a mismatch between the build check and the parser.
fn load_config() -> IrrigationConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("irrigation.toml line {}: {:?}", e.line, e.kind);
            error!("Using default configuration");
            return IrrigationConfig::default();
        }
    };

    match config.validate() {
        Ok(warnings) => {
            for w in &warnings {
                warn!("Config warning: {:?}", w);
            }
            config
        }
        Err(e) => {
            error!("Config rejected: {:?}", e);
            error!("Using default configuration");
            IrrigationConfig::default()
        }
    }
}

/// Log pin map problems
///
/// The firmware drives the board pins regardless; this only surfaces a
/// config that describes different wiring.
fn check_wiring(config: &IrrigationConfig) {
    if let Err(e) = check_pins(&config.hardware) {
        warn!("Configured pin map is not valid on RP2040: {:?}", e);
    }

    for m in board::wiring_mismatches(&config.hardware) {
        warn!(
            "pins.{} = gpio{} but the board wires gpio{}",
            m.name, m.configured, m.wired
        );
    }
}
