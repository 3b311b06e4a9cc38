use embedded_hal::digital::InputPin;

use crate::preferences::SOIL_WET_THRESHOLD;

/// Full scale of the 16-bit analog reading
pub const ADC_FULL_SCALE: u16 = u16::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoilStatus {
    Wet,
    Dry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RainDetection {
    Detected,
    NotDetected,
}

impl RainDetection {
    pub const fn label(self) -> &'static str {
        match self {
            RainDetection::Detected => "rain detected",
            RainDetection::NotDetected => "no rain",
        }
    }
}

/// One poll worth of sensor data.
/// rain_percentage: 0 - 100, derived from the inverted analog rain sensor
/// soil_status: Whether the raw analog value is above the wet threshold
/// rain_detected: Active-low digital rain detector
/// temperature_c: Informational only, never used for decisions
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    pub rain_percentage: f64,
    pub soil_status: SoilStatus,
    pub rain_detected: RainDetection,
    pub temperature_c: f64,
}

impl SensorReading {
    /// Derives a reading from raw pin values
    /// param raw: 16-bit analog value; higher means less rain on this sensor
    /// param pin_low: whether the digital rain pin reads low (rain present)
    /// param temperature_c: ambient temperature to report
    pub fn from_raw(raw: u16, pin_low: bool, temperature_c: f64) -> Self {
        Self {
            rain_percentage: rain_percentage(raw),
            soil_status: soil_status(raw),
            rain_detected: if pin_low {
                RainDetection::Detected
            } else {
                RainDetection::NotDetected
            },
            temperature_c,
        }
    }
}

/// Converts the raw analog value to a rain percentage
/// The sensor reads high when dry, so the scale is inverted
pub fn rain_percentage(raw: u16) -> f64 {
    let pct = 100.0 - (raw as f64 / ADC_FULL_SCALE as f64) * 100.0;
    pct.clamp(0.0, 100.0)
}

/// The same analog channel doubles as the soil probe
pub fn soil_status(raw: u16) -> SoilStatus {
    if raw > SOIL_WET_THRESHOLD {
        SoilStatus::Wet
    } else {
        SoilStatus::Dry
    }
}

/// Widens a 12-bit ADC count to the 16-bit scale by repeating the top bits
/// param counts: 12-bit value, anything above 0xFFF is saturated
pub fn scale_12_to_16(counts: u16) -> u16 {
    let counts = counts.min(0x0FFF);
    (counts << 4) | (counts >> 8)
}

/// Placeholder ambient temperature: 23°C plus a sub-degree wobble from the tick counter
/// param ticks_us: microseconds since boot
pub fn placeholder_temperature(ticks_us: u64) -> f64 {
    23.0 + (ticks_us % 1000) as f64 / 1000.0
}

/// A 16-bit analog channel
pub trait AnalogInput {
    type Error;

    fn read_u16(&mut self) -> Result<u16, Self::Error>;
}

pub trait Thermometer {
    fn temperature_c(&mut self) -> f64;
}

/// Simulated thermometer fed by a microsecond tick source
pub struct SimulatedThermometer<F> {
    ticks_us: F,
}

impl<F: FnMut() -> u64> SimulatedThermometer<F> {
    pub fn new(ticks_us: F) -> Self {
        Self { ticks_us }
    }
}

impl<F: FnMut() -> u64> Thermometer for SimulatedThermometer<F> {
    fn temperature_c(&mut self) -> f64 {
        placeholder_temperature((self.ticks_us)())
    }
}

/// Anything that can hand the monitor a fresh reading each cycle
pub trait ReadingSource {
    type Error;

    fn acquire(&mut self) -> Result<SensorReading, Self::Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError<AE, DE> {
    /// The analog rain channel could not be sampled
    Analog(AE),
    /// The digital rain-detect pin could not be read
    Digital(DE),
}

/// The rain sensor module: analog output, digital detect output and a thermometer
pub struct RainSensor<A, D, T> {
    analog: A,
    detect: D,
    thermometer: T,
}

impl<A, D, T> RainSensor<A, D, T>
where
    A: AnalogInput,
    D: InputPin,
    T: Thermometer,
{
    pub fn new(analog: A, detect: D, thermometer: T) -> Self {
        Self {
            analog,
            detect,
            thermometer,
        }
    }
}

impl<A, D, T> ReadingSource for RainSensor<A, D, T>
where
    A: AnalogInput,
    D: InputPin,
    T: Thermometer,
{
    type Error = SensorError<A::Error, D::Error>;

    fn acquire(&mut self) -> Result<SensorReading, Self::Error> {
        let raw = self.analog.read_u16().map_err(SensorError::Analog)?;
        let pin_low = self.detect.is_low().map_err(SensorError::Digital)?;
        let temperature_c = self.thermometer.temperature_c();
        Ok(SensorReading::from_raw(raw, pin_low, temperature_c))
    }
}
