//! RP2040 PWM slice arithmetic.
//!
//! A free-running slice counts from 0 to `top` and is clocked at
//! `sys_clk / div`, so the output frequency is `sys_clk / (div * (top + 1))`.
//! Keeping these calculations free of HAL types lets them run in host tests.

/// Largest integer clock divider a slice accepts
pub const MAX_DIV_INT: u32 = 255;

/// Largest wrap value used, one short of the counter's range so a full duty
/// compare of `top + 1` still fits in 16 bits
pub const IDLE_TOP: u16 = u16::MAX - 1;

/// Divider and wrap value producing a given frequency
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliceTiming {
    pub div_int: u8,
    pub top: u16,
}

/// Finds the smallest integer divider that fits a period into the counter
/// with `top <= IDLE_TOP`, which keeps the duty resolution as high as possible
/// param sys_hz: system clock feeding the PWM block
/// param freq_hz: wanted output frequency
/// returns None when the frequency is 0, above sys_hz, or too low to reach
pub fn timing_for(sys_hz: u32, freq_hz: u32) -> Option<SliceTiming> {
    if freq_hz == 0 {
        return None;
    }
    let cycles = sys_hz / freq_hz;
    if cycles == 0 {
        return None;
    }

    let div = cycles.div_ceil(IDLE_TOP as u32 + 1).max(1);
    if div > MAX_DIV_INT {
        return None;
    }
    let top = cycles / div - 1;

    Some(SliceTiming {
        div_int: div as u8,
        top: top as u16,
    })
}

/// Maps a 16-bit duty onto a slice's compare range
/// 0 is always off. u16::MAX is always on for any `top` up to `IDLE_TOP`;
/// at `top == u16::MAX` the compare saturates at `top` and misses one count.
pub fn scale_duty(duty_u16: u16, top: u16) -> u16 {
    let period = top as u32 + 1;
    let compare = duty_u16 as u32 * period / u16::MAX as u32;
    compare.min(u16::MAX as u32) as u16
}
