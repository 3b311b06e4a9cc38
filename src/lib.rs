#![cfg_attr(not(test), no_std)]

//! # landslide-alert
//! ## A landslide early-warning buzzer for the Raspberry Pi Pico
//!
//! Features:
//! - Rain and soil moisture monitoring from a single analog rain sensor
//! - Active-low digital rain detection
//! - Four-band landslide risk classification
//! - Buzzer volume and pitch proportional to the risk
//! - Stop button that always leaves the buzzer silent
//!
//! Everything except [`board`] is hardware independent and runs in host tests.

pub mod alert;
pub mod monitor;
pub mod preferences;
pub mod pwm;
pub mod rendering;
pub mod risk;
pub mod sensors;
pub mod timer;

#[cfg(feature = "rp2040")]
pub mod board;

pub use alert::{profile_for, Alarm, AlertProfile, Buzzer};
pub use monitor::{Cycle, Monitor, MonitorError, StopButton, StopSignal};
pub use preferences::{Preferences, Thresholds};
pub use risk::{classify, RiskLevel};
pub use sensors::{RainDetection, RainSensor, ReadingSource, SensorReading, SoilStatus};
