//! Stop button task
//!
//! Waits for the button to reach its pressed level, confirms it after a
//! short debounce and raises the stop signal once.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::channels::STOP;

/// Debounce time before a press counts
const DEBOUNCE_MS: u64 = 50;

/// Stop button task
///
/// `inverted` means the button pulls the line low when pressed.
#[embassy_executor::task]
pub async fn stop_button_task(mut button: Input<'static>, inverted: bool) {
    info!("Stop button task started (active {})", if inverted { "low" } else { "high" });

    loop {
        if inverted {
            button.wait_for_low().await;
        } else {
            button.wait_for_high().await;
        }

        Timer::after_millis(DEBOUNCE_MS).await;

        let pressed = if inverted { button.is_low() } else { button.is_high() };
        if pressed {
            info!("Stop button pressed");
            STOP.signal(());
            return;
        }
    }
}
