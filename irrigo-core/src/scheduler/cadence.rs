//! Control cycle orchestration

use core::future::Future;

use heapless::Vec;

use super::budget::{CycleBudget, IdlePlan};
use crate::alert::{evaluate_critical, pump_pulse, AlertPattern, AlertPulse, CriticalCause};
use crate::config::IrrigationConfig;
use crate::control::{PumpAction, PumpController};
use crate::sensor::{capture, Capture, SensorSnapshot};
use crate::traits::{
    ActuatorError, AlertError, AlertOutput, Clock, DisplayError, EnvironmentError,
    EnvironmentSensor, PumpActuator, SoilSensor, StatusDisplay,
};

/// Maximum number of driver faults a single cycle can produce
pub const MAX_FAULTS: usize = 4;

/// A driver call that failed during a cycle
///
/// Fatal to the step that made the call, never to the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleFault {
    /// Pump actuator rejected a transition
    Actuator(ActuatorError),
    /// Buzzer failed
    Alert(AlertError),
    /// Display refresh failed
    Display(DisplayError),
}

/// Outcome of one control cycle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Readings the cycle decided on
    pub snapshot: SensorSnapshot,
    /// Why the climate reading is missing, if it is
    pub environment_error: Option<EnvironmentError>,
    /// Critical condition seen this cycle
    pub critical: Option<CriticalCause>,
    /// Pump decision
    pub action: PumpAction,
    /// A transition was driven to the actuator and committed
    pub applied: bool,
    /// Pump state after the cycle
    pub pump_on: bool,
    /// The display was refreshed
    pub display_rendered: bool,
    /// Driver failures, in the order they happened
    pub faults: Vec<CycleFault, MAX_FAULTS>,
    /// Idle time before the next cycle
    pub idle: IdlePlan,
}

/// Outcome of a shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShutdownReport {
    /// Result of commanding the pump off
    pub pump_off: Result<(), ActuatorError>,
    /// Result of silencing the buzzer
    pub silenced: Result<(), AlertError>,
}

impl ShutdownReport {
    /// Both outputs reached their safe state
    pub fn is_clean(&self) -> bool {
        self.pump_off.is_ok() && self.silenced.is_ok()
    }
}

/// Collaborators the scheduler drives
pub struct Drivers<S, E, P, A, D, C> {
    /// Soil moisture sensor
    pub soil: S,
    /// Temperature/humidity sensor
    pub environment: E,
    /// Pump relay
    pub pump: P,
    /// Buzzer
    pub alert: A,
    /// Status screen
    pub display: D,
    /// Monotonic clock
    pub clock: C,
}

/// Cooperative single-owner control loop
///
/// Owns the configuration, the drivers and the pump state for its whole
/// lifetime. Nothing else may touch the pump.
pub struct CadenceScheduler<S, E, P, A, D, C> {
    config: IrrigationConfig,
    drivers: Drivers<S, E, P, A, D, C>,
    controller: PumpController,
    last_display_ms: Option<u64>,
}

impl<S, E, P, A, D, C> CadenceScheduler<S, E, P, A, D, C>
where
    S: SoilSensor,
    E: EnvironmentSensor,
    P: PumpActuator,
    A: AlertOutput,
    D: StatusDisplay,
    C: Clock,
{
    /// Create a scheduler with the pump off
    ///
    /// The actuator is assumed to already be off; the firmware drives it
    /// off when it is constructed.
    pub fn new(config: IrrigationConfig, drivers: Drivers<S, E, P, A, D, C>) -> Self {
        Self {
            controller: PumpController::from_config(&config),
            config,
            drivers,
            last_display_ms: None,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &IrrigationConfig {
        &self.config
    }

    /// Pump state machine
    pub fn controller(&self) -> &PumpController {
        &self.controller
    }

    /// Drivers
    pub fn drivers(&self) -> &Drivers<S, E, P, A, D, C> {
        &self.drivers
    }

    /// Drivers, mutably
    pub fn drivers_mut(&mut self) -> &mut Drivers<S, E, P, A, D, C> {
        &mut self.drivers
    }

    /// Run one control cycle
    pub fn run_cycle(&mut self) -> CycleReport {
        let started_ms = self.drivers.clock.now_ms();
        let mut budget = CycleBudget::new(self.config.timing.sensor_period_ms);
        let mut faults = Vec::new();
        let mut fault = |f: CycleFault| {
            // Capacity covers one fault per step
            let _ = faults.push(f);
        };

        // 1. Sample
        let Capture {
            snapshot,
            environment_error,
        } = capture(
            &mut self.drivers.soil,
            &mut self.drivers.environment,
            &self.config.calibration,
            started_ms,
        );

        // 2. Critical overlay, no access to the controller
        let critical = evaluate_critical(&self.config.thresholds, &snapshot);
        if critical.is_some() && self.config.alerts.enabled {
            let pattern = AlertPattern::critical(&self.config.alerts);
            match pattern.play(&mut self.drivers.alert) {
                Ok(ms) => budget.charge(ms),
                Err(e) => {
                    budget.charge(e.spent_ms);
                    fault(CycleFault::Alert(e.error));
                }
            }
        }

        // 3. Pump
        let now_ms = self.drivers.clock.now_ms();
        let action = self.controller.decide(&snapshot, now_ms);
        let applied = match action.commanded_level() {
            Some(level) => match self.drivers.pump.set_on(level) {
                Ok(()) => self.controller.commit(action, now_ms),
                Err(e) => {
                    fault(CycleFault::Actuator(e));
                    false
                }
            },
            None => false,
        };

        // A failed transition gets no confirmation pulse
        let pulse = if action.is_transition() && !applied {
            None
        } else {
            pump_pulse(&self.config.alerts, action)
        };
        if let Some(pulse) = pulse.filter(|_| self.config.alerts.enabled) {
            match self.play(&pulse) {
                Ok(ms) => budget.charge(ms),
                Err(e) => fault(CycleFault::Alert(e)),
            }
        }

        // 4. Display, at its own cadence
        let now_ms = self.drivers.clock.now_ms();
        let display_due = self
            .last_display_ms
            .map_or(true, |t| now_ms.saturating_sub(t) >= self.config.timing.display_period_ms as u64);
        if display_due {
            // Timer resets on every attempt so a dead panel is not hammered
            self.last_display_ms = Some(now_ms);
            match self
                .drivers
                .display
                .render(&snapshot, self.controller.is_on())
            {
                Ok(ms) => budget.charge(ms),
                Err(e) => fault(CycleFault::Display(e)),
            }
        }

        // 5. Idle budget
        let elapsed_ms = self.drivers.clock.now_ms().saturating_sub(started_ms);
        let idle = budget.settle(elapsed_ms, self.config.timing.overrun_yield_ms);

        CycleReport {
            snapshot,
            environment_error,
            critical,
            action,
            applied,
            pump_on: self.controller.is_on(),
            display_rendered: display_due,
            faults,
            idle,
        }
    }

    fn play(&mut self, pulse: &AlertPulse) -> Result<u32, AlertError> {
        self.drivers.alert.pulse(pulse)
    }

    /// Drive every output to its safe state
    ///
    /// The pump is commanded off and the buzzer silenced. Both are always
    /// attempted, whatever the first one returns, and the pump state is
    /// forced off without waiting for the minimum-on time.
    pub fn shutdown(&mut self) -> ShutdownReport {
        let pump_off = self.drivers.pump.set_on(false);
        let silenced = self.drivers.alert.silence();
        self.controller.force_off(self.drivers.clock.now_ms());

        ShutdownReport { pump_off, silenced }
    }

    /// Run cycles until the idle future asks to stop, then shut down
    ///
    /// After every cycle `on_cycle` sees the scheduler and the report, then
    /// `idle` is awaited with the idle time. It resolves to `true` when the
    /// loop should stop, which lets the caller race the idle wait against a
    /// stop request on whatever executor it runs.
    pub async fn run_until<I, Fut, R>(&mut self, mut idle: I, mut on_cycle: R) -> ShutdownReport
    where
        I: FnMut(u32) -> Fut,
        Fut: Future<Output = bool>,
        R: FnMut(&Self, &CycleReport),
    {
        loop {
            let report = self.run_cycle();
            on_cycle(&*self, &report);

            if idle(report.idle.idle_ms).await {
                break;
            }
        }

        self.shutdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MoistureCalibration;
    use crate::control::{PumpState, RunReason};
    use crate::traits::EnvironmentReading;
    use core::cell::Cell;
    use embassy_futures::block_on;

    const SECOND: u64 = 1000;

    struct FakeClock(Cell<u64>);

    impl FakeClock {
        fn new() -> Self {
            Self(Cell::new(0))
        }

        fn advance(&self, ms: u64) {
            self.0.set(self.0.get() + ms);
        }

        fn set(&self, ms: u64) {
            self.0.set(ms);
        }
    }

    impl Clock for FakeClock {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }

    struct MockSoil {
        raw: u16,
    }

    impl SoilSensor for MockSoil {
        fn read_raw(&mut self) -> u16 {
            self.raw
        }
    }

    struct MockClimate {
        result: Result<EnvironmentReading, EnvironmentError>,
    }

    impl EnvironmentSensor for MockClimate {
        fn read(&mut self) -> Result<EnvironmentReading, EnvironmentError> {
            self.result
        }
    }

    #[derive(Default)]
    struct MockPump {
        on: bool,
        fail: bool,
        commands: Vec<bool, 16>,
    }

    impl PumpActuator for MockPump {
        fn set_on(&mut self, on: bool) -> Result<(), ActuatorError> {
            self.commands.push(on).unwrap();
            if self.fail {
                return Err(ActuatorError::OutputFault);
            }
            self.on = on;
            Ok(())
        }

        fn is_on(&self) -> bool {
            self.on
        }
    }

    /// Buzzer that blocks by advancing the shared clock
    struct MockBuzzer<'a> {
        clock: &'a FakeClock,
        pulses: Vec<AlertPulse, 32>,
        silenced: bool,
        fail: bool,
        fail_after: Option<usize>,
        /// Report time without moving the clock
        frozen: bool,
    }

    impl MockBuzzer<'_> {
        fn wait(&self, ms: u32) {
            if !self.frozen {
                self.clock.advance(ms as u64);
            }
        }
    }

    impl AlertOutput for MockBuzzer<'_> {
        fn pulse(&mut self, pulse: &AlertPulse) -> Result<u32, AlertError> {
            if self.fail || self.fail_after.is_some_and(|n| self.pulses.len() >= n) {
                return Err(AlertError::OutputFault);
            }
            self.pulses.push(*pulse).unwrap();
            self.wait(pulse.duration_ms);
            Ok(pulse.duration_ms)
        }

        fn rest(&mut self, ms: u32) -> u32 {
            self.wait(ms);
            ms
        }

        fn silence(&mut self) -> Result<(), AlertError> {
            if self.fail {
                return Err(AlertError::OutputFault);
            }
            self.silenced = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockScreen {
        renders: u32,
        last_pump_on: Option<bool>,
        fail: bool,
    }

    impl StatusDisplay for MockScreen {
        fn render(&mut self, _snapshot: &SensorSnapshot, pump_on: bool) -> Result<u32, DisplayError> {
            self.renders += 1;
            if self.fail {
                return Err(DisplayError::Communication);
            }
            self.last_pump_on = Some(pump_on);
            Ok(0)
        }
    }

    type TestScheduler<'a> =
        CadenceScheduler<MockSoil, MockClimate, MockPump, MockBuzzer<'a>, MockScreen, &'a FakeClock>;

    fn mild() -> Result<EnvironmentReading, EnvironmentError> {
        Ok(EnvironmentReading {
            temperature_x10: 220,
            humidity_x10: 600,
        })
    }

    /// Raw value for a moisture percentage with default calibration
    fn raw_for(pct: u16) -> u16 {
        let cal = MoistureCalibration::default();
        cal.dry_raw - ((cal.dry_raw - cal.wet_raw) as u32 * pct as u32 / 100) as u16
    }

    fn scheduler_with(config: IrrigationConfig, clock: &FakeClock, soil_pct: u16) -> TestScheduler<'_> {
        CadenceScheduler::new(
            config,
            Drivers {
                soil: MockSoil {
                    raw: raw_for(soil_pct),
                },
                environment: MockClimate { result: mild() },
                pump: MockPump::default(),
                alert: MockBuzzer {
                    clock,
                    pulses: Vec::new(),
                    silenced: false,
                    fail: false,
                    fail_after: None,
                    frozen: false,
                },
                display: MockScreen::default(),
                clock,
            },
        )
    }

    fn scheduler(clock: &FakeClock, soil_pct: u16) -> TestScheduler<'_> {
        scheduler_with(IrrigationConfig::default(), clock, soil_pct)
    }

    #[test]
    fn test_dry_soil_starts_pump() {
        let clock = FakeClock::new();
        clock.set(7 * SECOND);
        let mut s = scheduler(&clock, 0);
        s.drivers_mut().soil.raw = 56_000;

        let report = s.run_cycle();
        assert_eq!(report.snapshot.soil_pct_x10, 0);
        assert_eq!(report.action, PumpAction::Start);
        assert!(report.applied);
        assert!(report.pump_on);
        assert_eq!(s.drivers().pump.commands.as_slice(), &[true]);
        assert_eq!(s.controller().last_change_ms(), Some(7 * SECOND + 1280));

        // Critical pattern (0 % < 20 %) then the start confirmation
        let pulses = &s.drivers().alert.pulses;
        assert_eq!(pulses.len(), 5);
        assert_eq!(pulses[4], AlertPulse::new(50, 30_000));
    }

    #[test]
    fn test_min_on_then_stop() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 30);

        let report = s.run_cycle();
        assert_eq!(report.action, PumpAction::Start);
        let started = s.controller().last_change_ms().unwrap();

        // Soil recovers to 60 % three seconds later
        s.drivers_mut().soil.raw = raw_for(60);
        clock.set(started + 3 * SECOND);
        let report = s.run_cycle();
        assert!(matches!(
            report.action,
            PumpAction::KeepRunning(RunReason::MinOnPending { .. })
        ));
        assert!(report.pump_on);
        assert_eq!(
            s.drivers().alert.pulses.last(),
            Some(&AlertPulse::new(40, 15_000))
        );

        clock.set(started + 11 * SECOND);
        let report = s.run_cycle();
        assert_eq!(report.action, PumpAction::Stop);
        assert!(report.applied);
        assert!(!report.pump_on);
        assert_eq!(s.drivers().pump.commands.as_slice(), &[true, false]);
        assert_eq!(
            s.drivers().alert.pulses.last(),
            Some(&AlertPulse::new(80, 30_000))
        );
    }

    #[test]
    fn test_critical_does_not_touch_pump_state() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 30);
        s.run_cycle();
        let started = s.controller().last_change_ms();

        // 15 % is below critical while running
        s.drivers_mut().soil.raw = raw_for(15);
        clock.advance(20 * SECOND);
        let report = s.run_cycle();

        assert_eq!(report.critical, Some(CriticalCause::LowMoisture));
        assert_eq!(report.action, PumpAction::KeepRunning(RunReason::Demand));
        assert_eq!(s.controller().state(), PumpState::On);
        assert_eq!(s.controller().last_change_ms(), started);
    }

    #[test]
    fn test_critical_heat_and_stop_in_same_cycle() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 30);
        s.run_cycle();

        // Wet soil, very hot but humid air
        s.drivers_mut().soil.raw = raw_for(70);
        s.drivers_mut().environment.result = Ok(EnvironmentReading {
            temperature_x10: 420,
            humidity_x10: 600,
        });
        clock.advance(20 * SECOND);
        let report = s.run_cycle();

        assert_eq!(report.critical, Some(CriticalCause::HighTemperature));
        assert_eq!(report.action, PumpAction::Stop);
        assert!(report.applied);
        assert!(!report.pump_on);
    }

    #[test]
    fn test_climate_failure_falls_back_to_soil() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 30);
        s.drivers_mut().environment.result = Err(EnvironmentError::Timeout);

        let report = s.run_cycle();
        assert_eq!(report.environment_error, Some(EnvironmentError::Timeout));
        assert_eq!(report.snapshot.environment, None);
        assert_eq!(report.action, PumpAction::Start);
        assert!(report.faults.is_empty());
    }

    #[test]
    fn test_actuator_failure_not_committed() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 30);
        s.drivers_mut().pump.fail = true;

        let report = s.run_cycle();
        assert_eq!(report.action, PumpAction::Start);
        assert!(!report.applied);
        assert!(!report.pump_on);
        assert_eq!(
            report.faults.as_slice(),
            &[CycleFault::Actuator(ActuatorError::OutputFault)]
        );
        assert_eq!(s.controller().last_change_ms(), None);
        // No confirmation for a transition that did not happen
        assert!(s.drivers().alert.pulses.is_empty());

        // Retried on the next cycle
        s.drivers_mut().pump.fail = false;
        clock.advance(5 * SECOND);
        let report = s.run_cycle();
        assert!(report.applied);
        assert!(s.drivers().pump.on);
    }

    #[test]
    fn test_display_cadence() {
        let clock = FakeClock::new();
        let mut config = IrrigationConfig::default();
        config.timing.display_period_ms = 12_000;
        let mut s = scheduler_with(config, &clock, 70);

        let mut rendered = [false; 4];
        for r in rendered.iter_mut() {
            let report = s.run_cycle();
            *r = report.display_rendered;
            clock.advance(report.idle.idle_ms as u64);
        }

        // Cycles at 0, 5, 10, 15 s
        assert_eq!(rendered, [true, false, false, true]);
        assert_eq!(s.drivers().display.renders, 2);
    }

    #[test]
    fn test_display_shows_committed_state() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 30);
        s.run_cycle();
        assert_eq!(s.drivers().display.last_pump_on, Some(true));
    }

    #[test]
    fn test_display_failure_is_not_fatal() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 30);
        s.drivers_mut().display.fail = true;

        let report = s.run_cycle();
        assert!(report.applied);
        assert_eq!(
            report.faults.as_slice(),
            &[CycleFault::Display(DisplayError::Communication)]
        );

        // Timer was reset by the failed attempt
        clock.advance(1000);
        let report = s.run_cycle();
        assert!(!report.display_rendered);
    }

    #[test]
    fn test_idle_accounts_for_alerts() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 10);

        // 4 × (120 + 200) critical + 50 start pulse
        let report = s.run_cycle();
        assert_eq!(report.critical, Some(CriticalCause::LowMoisture));
        assert_eq!(
            report.idle,
            IdlePlan {
                idle_ms: 5000 - 1330,
                overrun: false
            }
        );
    }

    #[test]
    fn test_overrun_yields() {
        let clock = FakeClock::new();
        let mut config = IrrigationConfig::default();
        config.timing.sensor_period_ms = 1000;
        let mut s = scheduler_with(config, &clock, 10);

        let report = s.run_cycle();
        assert_eq!(
            report.idle,
            IdlePlan {
                idle_ms: 50,
                overrun: true
            }
        );
    }

    #[test]
    fn test_alerts_disabled() {
        let clock = FakeClock::new();
        let mut config = IrrigationConfig::default();
        config.alerts.enabled = false;
        let mut s = scheduler_with(config, &clock, 10);

        let report = s.run_cycle();
        assert_eq!(report.critical, Some(CriticalCause::LowMoisture));
        assert!(report.applied);
        assert!(s.drivers().alert.pulses.is_empty());
        assert_eq!(report.idle.idle_ms, 5000);
    }

    #[test]
    fn test_alert_failure_does_not_block_pump() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 10);
        s.drivers_mut().alert.fail = true;

        let report = s.run_cycle();
        assert!(report.applied);
        assert_eq!(
            report.faults.as_slice(),
            &[
                CycleFault::Alert(AlertError::OutputFault),
                CycleFault::Alert(AlertError::OutputFault)
            ]
        );
    }

    #[test]
    fn test_interrupted_pattern_still_charges_idle() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 10);
        s.drivers_mut().alert.frozen = true;
        s.drivers_mut().alert.fail_after = Some(2);

        // Two critical repetitions of 120 + 200 ms, then every pulse fails
        let report = s.run_cycle();
        assert_eq!(report.critical, Some(CriticalCause::LowMoisture));
        assert_eq!(s.drivers().alert.pulses.len(), 2);
        assert_eq!(
            report.faults.as_slice(),
            &[
                CycleFault::Alert(AlertError::OutputFault),
                CycleFault::Alert(AlertError::OutputFault)
            ]
        );
        assert_eq!(report.idle.idle_ms, 5000 - 640);
    }

    #[test]
    fn test_shutdown_forces_off() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 30);
        s.run_cycle();
        assert!(s.controller().is_on());

        // Well within the minimum-on time
        let report = s.shutdown();
        assert!(report.is_clean());
        assert!(!s.drivers().pump.on);
        assert!(s.drivers().alert.silenced);
        assert_eq!(s.controller().state(), PumpState::Off);
    }

    #[test]
    fn test_shutdown_attempts_both_outputs() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 70);
        s.drivers_mut().pump.fail = true;

        let report = s.shutdown();
        assert_eq!(report.pump_off, Err(ActuatorError::OutputFault));
        assert_eq!(report.silenced, Ok(()));
        assert!(s.drivers().alert.silenced);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_run_until_stops_and_shuts_down() {
        let clock = FakeClock::new();
        let mut s = scheduler(&clock, 30);
        let cycles = Cell::new(0u32);

        let report = block_on(s.run_until(
            |ms| {
                clock.advance(ms as u64);
                core::future::ready(cycles.get() >= 3)
            },
            |_, _| cycles.set(cycles.get() + 1),
        ));

        assert_eq!(cycles.get(), 3);
        assert!(report.is_clean());
        assert_eq!(s.drivers().pump.commands.last(), Some(&false));
        assert!(!s.controller().is_on());
    }
}
