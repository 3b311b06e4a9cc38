//! Drives the polling loop against in-memory collaborators.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};
use landslide_alert::rendering::{TelemetrySink, SEPARATOR, SILENCED_NOTICE, STOPPED_NOTICE};
use landslide_alert::sensors::{AnalogInput, SensorError, Thermometer};
use landslide_alert::{
    AlertProfile, Buzzer, Monitor, MonitorError, Preferences, RainSensor, RiskLevel, StopSignal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Write {
    Duty(u16),
    Freq(u32),
}

#[derive(Default)]
struct BuzzerState {
    writes: Vec<Write>,
    fail_write: Option<usize>,
}

#[derive(Clone, Default)]
struct MockBuzzer(Rc<RefCell<BuzzerState>>);

impl MockBuzzer {
    fn failing_on_write(n: usize) -> Self {
        let buzzer = Self::default();
        buzzer.0.borrow_mut().fail_write = Some(n);
        buzzer
    }

    fn record(&self, write: Write) -> Result<(), &'static str> {
        let mut state = self.0.borrow_mut();
        if state.fail_write == Some(state.writes.len()) {
            state.fail_write = None;
            return Err("pwm");
        }
        state.writes.push(write);
        Ok(())
    }

    fn writes(&self) -> Vec<Write> {
        self.0.borrow().writes.clone()
    }

    fn final_duty(&self) -> Option<u16> {
        self.0.borrow().writes.iter().rev().find_map(|w| match w {
            Write::Duty(d) => Some(*d),
            Write::Freq(_) => None,
        })
    }
}

impl Buzzer for MockBuzzer {
    type Error = &'static str;

    fn set_duty_u16(&mut self, duty: u16) -> Result<(), &'static str> {
        self.record(Write::Duty(duty))
    }

    fn set_frequency(&mut self, hz: u32) -> Result<(), &'static str> {
        self.record(Write::Freq(hz))
    }
}

/// Plays back raw ADC values; `None` entries fail the read, and the last value repeats
struct ScriptedAdc(VecDeque<Option<u16>>);

impl ScriptedAdc {
    fn new(values: &[Option<u16>]) -> Self {
        Self(values.iter().copied().collect())
    }
}

impl AnalogInput for ScriptedAdc {
    type Error = &'static str;

    fn read_u16(&mut self) -> Result<u16, &'static str> {
        let next = if self.0.len() > 1 {
            self.0.pop_front().flatten()
        } else {
            self.0.front().copied().flatten()
        };
        next.ok_or("adc")
    }
}

struct RainPin {
    low: bool,
}

impl ErrorType for RainPin {
    type Error = Infallible;
}

impl InputPin for RainPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.low)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.low)
    }
}

struct FixedThermometer;

impl Thermometer for FixedThermometer {
    fn temperature_c(&mut self) -> f64 {
        23.5
    }
}

/// Requests a stop on the n-th check (0 based), or fails that check
#[derive(Clone)]
struct StopOnCheck {
    checks: Rc<Cell<usize>>,
    stop_at: usize,
    fail: bool,
}

impl StopOnCheck {
    fn new(stop_at: usize) -> Self {
        Self {
            checks: Rc::new(Cell::new(0)),
            stop_at,
            fail: false,
        }
    }

    fn failing(stop_at: usize) -> Self {
        Self {
            fail: true,
            ..Self::new(stop_at)
        }
    }
}

impl StopSignal for StopOnCheck {
    type Error = &'static str;

    fn stop_requested(&mut self) -> Result<bool, &'static str> {
        let n = self.checks.get();
        self.checks.set(n + 1);
        if n == self.stop_at && self.fail {
            return Err("button");
        }
        Ok(n >= self.stop_at)
    }
}

#[derive(Clone, Default)]
struct FakeDelay(Rc<Cell<u64>>);

impl FakeDelay {
    fn elapsed_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + ns as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.set(self.0.get() + ms as u64 * 1_000_000);
    }
}

#[derive(Clone, Default)]
struct Lines(Rc<RefCell<Vec<String>>>);

impl Lines {
    fn all(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl TelemetrySink for Lines {
    fn emit(&mut self, line: &str) {
        self.0.borrow_mut().push(line.to_string());
    }
}

type TestSensor = RainSensor<ScriptedAdc, RainPin, FixedThermometer>;

fn sensor(values: &[Option<u16>]) -> TestSensor {
    RainSensor::new(
        ScriptedAdc::new(values),
        RainPin { low: true },
        FixedThermometer,
    )
}

// Five stop checks per pause keeps the interleaving sweep small
fn preferences() -> Preferences {
    Preferences::default()
        .with_poll_interval(50)
        .with_stop_poll_step(10)
}

#[test]
fn stop_before_the_first_poll_only_silences() {
    let buzzer = MockBuzzer::default();
    let lines = Lines::default();
    let monitor = Monitor::new(
        preferences(),
        sensor(&[Some(31_000)]),
        buzzer.clone(),
        StopOnCheck::new(0),
        FakeDelay::default(),
        lines.clone(),
    );

    assert_eq!(monitor.run(), Ok(()));
    assert_eq!(buzzer.writes(), [Write::Duty(0)]);
    assert_eq!(lines.all(), [STOPPED_NOTICE, SILENCED_NOTICE]);
}

#[test]
fn one_cycle_sounds_reports_and_waits_the_interval() {
    let buzzer = MockBuzzer::default();
    let lines = Lines::default();
    let delay = FakeDelay::default();
    // check 0 before the cycle, checks 1..=5 during the pause, stop on the next loop
    let monitor = Monitor::new(
        preferences(),
        sensor(&[Some(31_000)]),
        buzzer.clone(),
        StopOnCheck::new(6),
        delay.clone(),
        lines.clone(),
    );

    assert_eq!(monitor.run(), Ok(()));
    assert_eq!(delay.elapsed_ms(), 50);
    assert_eq!(
        buzzer.writes(),
        [Write::Duty(16384), Write::Freq(500), Write::Duty(0)]
    );
    assert_eq!(
        lines.all(),
        [
            "Rain Sensor Status: rain detected",
            "Rain Percentage: 52.70%",
            "Current Temperature: 23.50°C",
            "Landslide Chance: Low chance of landslide",
            SEPARATOR,
            STOPPED_NOTICE,
            SILENCED_NOTICE,
        ]
    );
}

#[test]
fn poll_once_reports_the_cycle() {
    let mut monitor = Monitor::new(
        preferences(),
        sensor(&[Some(10_000), Some(31_000)]),
        MockBuzzer::default(),
        StopOnCheck::new(0),
        FakeDelay::default(),
        Lines::default(),
    );

    let first = monitor.poll_once().unwrap();
    assert_eq!(first.level, RiskLevel::None);
    assert_eq!(first.profile, AlertProfile::SILENT);

    let second = monitor.poll_once().unwrap();
    assert_eq!(second.level, RiskLevel::Low);
    assert_eq!(
        second.profile,
        AlertProfile {
            duty_cycle: 16384,
            frequency_hz: 500
        }
    );
}

#[test]
fn stop_at_any_point_leaves_the_buzzer_silent() {
    for stop_at in 0..40 {
        let buzzer = MockBuzzer::default();
        let lines = Lines::default();
        let monitor = Monitor::new(
            preferences(),
            sensor(&[Some(31_000), Some(40_000), Some(10_000), Some(35_000)]),
            buzzer.clone(),
            StopOnCheck::new(stop_at),
            FakeDelay::default(),
            lines.clone(),
        );

        assert_eq!(monitor.run(), Ok(()), "stop on check {stop_at}");
        assert_eq!(buzzer.final_duty(), Some(0), "stop on check {stop_at}");
        let lines = lines.all();
        assert_eq!(lines[lines.len() - 2], STOPPED_NOTICE);
        assert_eq!(lines[lines.len() - 1], SILENCED_NOTICE);
    }
}

#[test]
fn sensor_failure_still_silences() {
    let buzzer = MockBuzzer::default();
    let lines = Lines::default();
    let monitor = Monitor::new(
        preferences(),
        sensor(&[Some(31_000), None]),
        buzzer.clone(),
        StopOnCheck::new(usize::MAX),
        FakeDelay::default(),
        lines.clone(),
    );

    assert_eq!(
        monitor.run(),
        Err(MonitorError::Sensor(SensorError::Analog("adc")))
    );
    assert_eq!(buzzer.final_duty(), Some(0));
    let lines = lines.all();
    assert_eq!(lines.last().map(String::as_str), Some(SILENCED_NOTICE));
    assert!(!lines.iter().any(|l| l == STOPPED_NOTICE));
}

#[test]
fn buzzer_failure_still_silences() {
    // write 0 is the low-risk duty, write 1 the frequency
    let buzzer = MockBuzzer::failing_on_write(1);
    let monitor = Monitor::new(
        preferences(),
        sensor(&[Some(31_000)]),
        buzzer.clone(),
        StopOnCheck::new(usize::MAX),
        FakeDelay::default(),
        Lines::default(),
    );

    assert_eq!(monitor.run(), Err(MonitorError::Buzzer("pwm")));
    assert_eq!(buzzer.writes(), [Write::Duty(16384), Write::Duty(0)]);
}

#[test]
fn stop_signal_failure_still_silences() {
    let buzzer = MockBuzzer::default();
    let monitor = Monitor::new(
        preferences(),
        sensor(&[Some(31_000)]),
        buzzer.clone(),
        StopOnCheck::failing(3),
        FakeDelay::default(),
        Lines::default(),
    );

    assert_eq!(monitor.run(), Err(MonitorError::Stop("button")));
    assert_eq!(buzzer.final_duty(), Some(0));
}

#[test]
fn dropping_the_monitor_silences_the_buzzer() {
    let buzzer = MockBuzzer::default();
    {
        let mut monitor = Monitor::new(
            preferences(),
            sensor(&[Some(31_000)]),
            buzzer.clone(),
            StopOnCheck::new(usize::MAX),
            FakeDelay::default(),
            Lines::default(),
        );
        monitor.poll_once().unwrap();
        assert_eq!(buzzer.final_duty(), Some(16384));
    }
    assert_eq!(buzzer.final_duty(), Some(0));
}
