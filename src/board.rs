//! Raspberry Pi Pico adapters for the monitor's hardware traits.
//!
//! Wiring:
//! - GPIO27 (ADC1): rain sensor analog output
//! - GPIO16: rain sensor digital output, low when rain is detected
//! - GPIO15 (PWM7 B): buzzer
//! - GPIO14: stop button to 3V3, pulled down

use core::convert::Infallible;

use embedded_hal::pwm::SetDutyCycle;
use embedded_hal_0_2::adc::OneShot;
use rp_pico::hal::adc::{Adc, AdcPin};
use rp_pico::hal::gpio::bank0::Gpio27;
use rp_pico::hal::gpio::{FunctionSio, Pin, PullNone, SioInput};
use rp_pico::hal::pwm::{FreeRunning, Pwm7, Slice};

use crate::alert::Buzzer;
use crate::pwm::{scale_duty, timing_for, IDLE_TOP};
use crate::rendering::TelemetrySink;
use crate::sensors::{scale_12_to_16, AnalogInput};

pub type RainAnalogPin = AdcPin<Pin<Gpio27, FunctionSio<SioInput>, PullNone>>;
pub type BuzzerSlice = Slice<Pwm7, FreeRunning>;

/// The ADC could not produce a sample
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub struct AdcError;

/// The on-chip ADC sampling the rain sensor
pub struct PicoAdc {
    adc: Adc,
    pin: RainAnalogPin,
}

impl PicoAdc {
    pub fn new(adc: Adc, pin: RainAnalogPin) -> Self {
        Self { adc, pin }
    }
}

impl AnalogInput for PicoAdc {
    type Error = AdcError;

    /// Samples the 12-bit ADC and widens it to 16 bits
    fn read_u16(&mut self) -> Result<u16, AdcError> {
        let counts: u16 =
            nb::block!(OneShot::<Adc, u16, RainAnalogPin>::read(&mut self.adc, &mut self.pin))
                .map_err(|_| AdcError)?;
        Ok(scale_12_to_16(counts))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub enum PwmError {
    /// The slice divider cannot produce this frequency from the system clock
    UnsupportedFrequency(u32),
}

/// Buzzer on channel B of PWM slice 7.
/// The requested 16-bit duty is kept so it can be rescaled whenever the wrap value changes.
pub struct PicoBuzzer {
    slice: BuzzerSlice,
    sys_hz: u32,
    duty_u16: u16,
    top: u16,
}

impl PicoBuzzer {
    /// Takes over a slice whose channel B is already routed to the buzzer pin
    /// param slice: PWM slice 7
    /// param sys_hz: system clock frequency feeding the slice
    pub fn new(mut slice: BuzzerSlice, sys_hz: u32) -> Self {
        slice.set_div_int(1);
        slice.set_div_frac(0);
        slice.set_top(IDLE_TOP);
        let _ = slice.channel_b.set_duty_cycle(0);
        slice.enable();

        Self {
            slice,
            sys_hz,
            duty_u16: 0,
            top: IDLE_TOP,
        }
    }

    fn write_compare(&mut self) -> Result<(), PwmError> {
        let compare = scale_duty(self.duty_u16, self.top);
        self.slice
            .channel_b
            .set_duty_cycle(compare)
            .map_err(|never: Infallible| match never {})
    }
}

impl Buzzer for PicoBuzzer {
    type Error = PwmError;

    fn set_duty_u16(&mut self, duty: u16) -> Result<(), PwmError> {
        self.duty_u16 = duty;
        self.write_compare()
    }

    fn set_frequency(&mut self, hz: u32) -> Result<(), PwmError> {
        let timing = timing_for(self.sys_hz, hz).ok_or(PwmError::UnsupportedFrequency(hz))?;
        self.slice.set_div_int(timing.div_int);
        self.slice.set_div_frac(0);
        self.slice.set_top(timing.top);
        self.top = timing.top;
        self.write_compare()
    }
}

/// Prints telemetry over RTT
pub struct RttTelemetry;

impl TelemetrySink for RttTelemetry {
    fn emit(&mut self, line: &str) {
        defmt::println!("{=str}", line);
    }
}
