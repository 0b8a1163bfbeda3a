//! Irrigation control task
//!
//! Runs control cycles through the scheduler loop, sleeping for the idle
//! time each cycle leaves. The sleep races the stop signal so a button
//! press is handled without waiting out the period; a cycle in progress
//! always completes.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Timer};

use irrigo_core::scheduler::{CadenceScheduler, CycleFault, CycleReport};
use irrigo_display::StatusScreen;
use irrigo_drivers::alert::PwmBuzzer;
use irrigo_drivers::display::Ssd1306;
use irrigo_drivers::relay::GpioRelay;
use irrigo_drivers::sensor::{AdcSoilSensor, Dht22};
use irrigo_hal_rp2040::{RpAnalogInput, RpI2c, RpOpenDrain, RpOutput, RpPwm};

use crate::channels::STOP;
use crate::clock::EmbassyClock;

/// Scheduler wired to the board drivers
pub type Scheduler = CadenceScheduler<
    AdcSoilSensor<RpAnalogInput<'static>>,
    Dht22<RpOpenDrain<'static>, Delay>,
    GpioRelay<RpOutput<'static>>,
    PwmBuzzer<RpPwm<'static>, Delay>,
    StatusScreen<Ssd1306<RpI2c<'static, I2C0>>, EmbassyClock>,
    EmbassyClock,
>;

/// Irrigation task - owns every driver through the scheduler
#[embassy_executor::task]
pub async fn irrigation_task(mut scheduler: Scheduler) {
    info!(
        "Irrigation task started (period {}ms, min-on {}ms)",
        scheduler.config().timing.sensor_period_ms,
        scheduler.config().timing.min_on_ms
    );

    let mut soil_failures = 0u32;
    let report = scheduler
        .run_until(
            |idle_ms| async move {
                match select(Timer::after_millis(idle_ms as u64), STOP.wait()).await {
                    Either::First(()) => false,
                    Either::Second(()) => true,
                }
            },
            |scheduler, report| {
                log_report(report);

                let failures = scheduler.drivers().soil.failures();
                if failures > soil_failures {
                    warn!(
                        "Soil ADC read failed, holding last value ({} failures total)",
                        failures
                    );
                    soil_failures = failures;
                }
            },
        )
        .await;

    info!("Stop requested, pump and buzzer shut down");
    if report.is_clean() {
        info!("Pump off, buzzer silent");
    } else {
        if let Err(e) = report.pump_off {
            error!("Pump did not confirm off: {:?}", e);
        }
        if let Err(e) = report.silenced {
            warn!("Buzzer silence failed: {:?}", e);
        }
    }

    // Parked; a reset restarts the controller
    core::future::pending::<()>().await;
}

fn log_report(report: &CycleReport) {
    let snap = &report.snapshot;
    debug!(
        "soil={}/1000 raw={} env={:?} action={:?} pump_on={}",
        snap.soil_pct_x10, snap.soil_raw, snap.environment, report.action, report.pump_on
    );

    if let Some(e) = report.environment_error {
        warn!("Climate sensor read failed: {:?}", e);
    }

    if let Some(cause) = report.critical {
        warn!("Critical condition: {:?}", cause);
    }

    if report.action.is_transition() && report.applied {
        info!("Pump {}", if report.pump_on { "started" } else { "stopped" });
    }

    for fault in &report.faults {
        match fault {
            CycleFault::Actuator(e) => error!("Pump actuator fault: {:?}", e),
            CycleFault::Alert(e) => warn!("Buzzer fault: {:?}", e),
            CycleFault::Display(e) => warn!("Display fault: {:?}", e),
        }
    }

    if report.idle.overrun {
        warn!("Cycle overran its period, yielding {}ms", report.idle.idle_ms);
    }
}
