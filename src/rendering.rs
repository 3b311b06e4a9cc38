use core::fmt::Write;

use heapless::String;
use ufmt::uwrite;

use crate::risk::RiskLevel;
use crate::sensors::SensorReading;

/// Capacity of one telemetry line; the longest line is the moderate risk label
pub const LINE_CAPACITY: usize = 64;

pub const SEPARATOR: &str = "------------------------------";
pub const STOPPED_NOTICE: &str = "Someone stopped the program manually.";
pub const SILENCED_NOTICE: &str = "Buzzer has been turned off.";

pub type Line = String<LINE_CAPACITY>;

/// A telemetry line did not fit in its buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryOverflow;

/// Somewhere to print telemetry lines
pub trait TelemetrySink {
    fn emit(&mut self, line: &str);
}

/// Renders the telemetry block for one poll cycle, one line at a time
/// param sink: where the lines go
/// param reading: the reading that was classified
/// param level: the resulting risk
pub fn render_report<S: TelemetrySink>(
    sink: &mut S,
    reading: &SensorReading,
    level: RiskLevel,
) -> Result<(), TelemetryOverflow> {
    let mut line = Line::new();

    uwrite!(line, "Rain Sensor Status: {}", reading.rain_detected.label())
        .map_err(|_| TelemetryOverflow)?;
    emit_line(sink, &mut line);

    // ufmt has no float support; core formatting rounds the exact binary value
    write!(line, "Rain Percentage: {:.2}%", reading.rain_percentage)
        .map_err(|_| TelemetryOverflow)?;
    emit_line(sink, &mut line);

    write!(line, "Current Temperature: {:.2}°C", reading.temperature_c)
        .map_err(|_| TelemetryOverflow)?;
    emit_line(sink, &mut line);

    uwrite!(line, "Landslide Chance: {}", level.label()).map_err(|_| TelemetryOverflow)?;
    emit_line(sink, &mut line);

    sink.emit(SEPARATOR);
    Ok(())
}

/// Sends the buffered line and clears it for the next one
fn emit_line<S: TelemetrySink>(sink: &mut S, line: &mut Line) {
    sink.emit(line.as_str());
    line.clear();
}
