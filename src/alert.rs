//! Buzzer output for each risk level.
//!
//! Volume is the PWM duty cycle and pitch is the PWM frequency. The [`Alarm`]
//! owns the buzzer while the monitor runs and drives it silent when released,
//! on every path out of the loop.

use crate::risk::RiskLevel;

/// A buzzer setting
/// duty_cycle: 0 - 65535, where 0 is silent
/// frequency_hz: tone pitch, 0 means no tone
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertProfile {
    pub duty_cycle: u16,
    pub frequency_hz: u32,
}

impl AlertProfile {
    pub const SILENT: AlertProfile = AlertProfile {
        duty_cycle: 0,
        frequency_hz: 0,
    };

    pub const fn is_silent(&self) -> bool {
        self.duty_cycle == 0
    }
}

/// Gets the buzzer setting for a risk level
pub const fn profile_for(level: RiskLevel) -> AlertProfile {
    match level {
        RiskLevel::High => AlertProfile {
            duty_cycle: 65535, // Full volume
            frequency_hz: 1000,
        },
        RiskLevel::Moderate => AlertProfile {
            duty_cycle: 32768, // Half volume
            frequency_hz: 1000,
        },
        RiskLevel::Low => AlertProfile {
            duty_cycle: 16384, // Quarter volume, lower pitch
            frequency_hz: 500,
        },
        RiskLevel::None => AlertProfile::SILENT,
    }
}

/// A PWM-driven buzzer
pub trait Buzzer {
    type Error;

    fn set_duty_u16(&mut self, duty: u16) -> Result<(), Self::Error>;

    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error>;
}

/// Drives the buzzer to a profile: duty first, then frequency
/// A silent profile leaves the frequency where it was
pub fn apply<B: Buzzer>(buzzer: &mut B, profile: AlertProfile) -> Result<(), B::Error> {
    buzzer.set_duty_u16(profile.duty_cycle)?;
    if !profile.is_silent() {
        buzzer.set_frequency(profile.frequency_hz)?;
    }
    Ok(())
}

/// Owns the buzzer for as long as alerts may sound.
/// Dropping an alarm that was not disarmed silences the buzzer.
pub struct Alarm<B: Buzzer> {
    buzzer: B,
    armed: bool,
}

impl<B: Buzzer> Alarm<B> {
    pub fn new(buzzer: B) -> Self {
        Self {
            buzzer,
            armed: true,
        }
    }

    pub fn sound(&mut self, profile: AlertProfile) -> Result<(), B::Error> {
        apply(&mut self.buzzer, profile)
    }

    pub fn silence(&mut self) -> Result<(), B::Error> {
        self.sound(AlertProfile::SILENT)
    }

    /// Silences the buzzer and releases it.
    /// If silencing fails the alarm stays armed, so dropping it tries once more.
    pub fn disarm(mut self) -> Result<(), B::Error> {
        self.silence()?;
        self.armed = false;
        Ok(())
    }
}

impl<B: Buzzer> Drop for Alarm<B> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.buzzer.set_duty_u16(0);
        }
    }
}
