//! The polling loop: read the sensors, classify, sound the buzzer, report, wait.
//!
//! The [`Monitor`] owns every hardware handle. Whatever ends the loop, an
//! operator stop or a failing collaborator, the alarm is silenced before
//! [`Monitor::run`] returns.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::alert::{profile_for, Alarm, AlertProfile, Buzzer};
use crate::preferences::Preferences;
use crate::rendering::{
    render_report, TelemetryOverflow, TelemetrySink, SILENCED_NOTICE, STOPPED_NOTICE,
};
use crate::risk::RiskLevel;
use crate::sensors::{ReadingSource, SensorReading};
use crate::timer::CountDownTimer;

/// An operator request to stop monitoring
pub trait StopSignal {
    type Error;

    fn stop_requested(&mut self) -> Result<bool, Self::Error>;
}

/// Push button wired with a pull-down, pressed reads high
pub struct StopButton<P> {
    pin: P,
}

impl<P: InputPin> StopButton<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> StopSignal for StopButton<P> {
    type Error = P::Error;

    fn stop_requested(&mut self) -> Result<bool, P::Error> {
        self.pin.is_high()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitorError<SE, BE, KE> {
    /// Acquiring a reading failed
    Sensor(SE),
    /// Driving the buzzer failed
    Buzzer(BE),
    /// Checking the stop request failed
    Stop(KE),
    /// A telemetry line overflowed its buffer
    Telemetry(TelemetryOverflow),
}

pub type Error<R, B, K> =
    MonitorError<<R as ReadingSource>::Error, <B as Buzzer>::Error, <K as StopSignal>::Error>;

/// What one poll cycle saw and did
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cycle {
    pub reading: SensorReading,
    pub level: RiskLevel,
    pub profile: AlertProfile,
}

pub struct Monitor<R, B, K, D, S>
where
    R: ReadingSource,
    B: Buzzer,
    K: StopSignal,
    D: DelayNs,
    S: TelemetrySink,
{
    preferences: Preferences,
    source: R,
    alarm: Alarm<B>,
    stop: K,
    delay: D,
    sink: S,
    timer: CountDownTimer,
}

impl<R, B, K, D, S> Monitor<R, B, K, D, S>
where
    R: ReadingSource,
    B: Buzzer,
    K: StopSignal,
    D: DelayNs,
    S: TelemetrySink,
{
    pub fn new(preferences: Preferences, source: R, buzzer: B, stop: K, delay: D, sink: S) -> Self {
        Self {
            preferences,
            source,
            alarm: Alarm::new(buzzer),
            stop,
            delay,
            sink,
            timer: CountDownTimer::new(0),
        }
    }

    /// Runs one acquire, classify, actuate, report pass
    pub fn poll_once(&mut self) -> Result<Cycle, Error<R, B, K>> {
        let reading = self.source.acquire().map_err(MonitorError::Sensor)?;
        let level = self.preferences.thresholds.classify(&reading);
        let profile = profile_for(level);

        self.alarm.sound(profile).map_err(MonitorError::Buzzer)?;
        render_report(&mut self.sink, &reading, level).map_err(MonitorError::Telemetry)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("risk {} -> duty {}", level, profile.duty_cycle);

        Ok(Cycle {
            reading,
            level,
            profile,
        })
    }

    /// Polls until the stop button is pressed or something fails.
    /// The alarm is silenced on the way out either way; the first error wins.
    pub fn run(mut self) -> Result<(), Error<R, B, K>> {
        let outcome = self.poll_until_stopped();
        if outcome.is_ok() {
            self.sink.emit(STOPPED_NOTICE);
        }

        // A failed disarm drops the alarm, which tries to silence it once more
        let Monitor {
            alarm, mut sink, ..
        } = self;
        let silenced = alarm.disarm().map_err(MonitorError::Buzzer);
        if silenced.is_ok() {
            sink.emit(SILENCED_NOTICE);
        }

        outcome.and(silenced)
    }

    fn poll_until_stopped(&mut self) -> Result<(), Error<R, B, K>> {
        loop {
            if self.stop_requested()? {
                return Ok(());
            }

            self.poll_once()?;

            if self.pause()? {
                return Ok(());
            }
        }
    }

    /// Sleeps out the poll interval in small steps
    /// returns true if a stop was requested while sleeping
    fn pause(&mut self) -> Result<bool, Error<R, B, K>> {
        let step_ms = self.preferences.stop_poll_step_ms.max(1);
        self.timer.set_time(self.preferences.poll_interval_ms);
        while !self.timer.is_finished() {
            let step = self.timer.tick(step_ms);
            self.delay.delay_ms(step);
            if self.stop_requested()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn stop_requested(&mut self) -> Result<bool, Error<R, B, K>> {
        self.stop.stop_requested().map_err(MonitorError::Stop)
    }
}
