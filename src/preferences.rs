/// Rain percentage at or above which wet, rainy ground is a moderate risk
pub const LOW_LANDSLIDE_THRESHOLD: f64 = 55.0;
/// Rain percentage at or above which wet, rainy ground is a high risk
pub const MODERATE_LANDSLIDE_THRESHOLD: f64 = 65.0;
/// Raw 16-bit ADC value above which the soil counts as wet
pub const SOIL_WET_THRESHOLD: u16 = 30_000;

/// Thresholds defines the decision boundaries used by the risk classifier.
/// low_landslide: Lower rain percentage bound of the moderate band
/// moderate_landslide: Lower rain percentage bound of the high band
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    pub low_landslide: f64,
    pub moderate_landslide: f64,
}

impl Thresholds {
    pub const DEFAULT: Thresholds = Thresholds {
        low_landslide: LOW_LANDSLIDE_THRESHOLD,
        moderate_landslide: MODERATE_LANDSLIDE_THRESHOLD,
    };
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Preferences bundles everything the monitor needs to know before it starts.
/// thresholds: Risk classification boundaries
/// poll_interval_ms: Pause between two sensor polls
/// stop_poll_step_ms: Granularity at which the stop button is checked while pausing
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Preferences {
    pub thresholds: Thresholds,
    pub poll_interval_ms: u32,
    pub stop_poll_step_ms: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            thresholds: Thresholds::DEFAULT,
            poll_interval_ms: crate::timer::SENSOR_DELAY, // 2s between polls
            stop_poll_step_ms: crate::timer::STOP_POLL_STEP,
        }
    }
}

impl Preferences {
    /// Sets how long the monitor sleeps between polls
    /// param ms: interval in milliseconds
    pub fn with_poll_interval(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Sets how often the stop button is sampled while sleeping
    /// A step of 0 would never advance the timer, so it is raised to 1ms
    /// param ms: step in milliseconds
    pub fn with_stop_poll_step(mut self, ms: u32) -> Self {
        self.stop_poll_step_ms = ms.max(1);
        self
    }
}
