//! Raw-unit ↔ Hz conversion for frame pitch and operator frequencies.
//!
//! The device stores frequencies as 14-bit values on an exponential scale:
//! `hz = exp(-12.1104 + 0.0013538 * raw)`, spanning roughly 5.5 µHz at
//! raw 1 up to about 23.6 kHz at raw 16383.

use alloc::format;
use alloc::string::String;

use crate::MAX_FREQUENCY;

/// Highest frequency (Hz) accepted when assigning pitch directly.
pub const MAX_FREQUENCY_HZ: f64 = 23597.0;

const OFFSET: f64 = -12.1104;
const SLOPE: f64 = 0.0013538;
const INVERSE_SCALE: f64 = 738.662;
const INVERSE_FACTOR: f64 = 181752.0;

/// Convert a raw frequency value (0-16383) to Hz. Strictly increasing.
pub fn int_to_frequency(raw: u16) -> f64 {
    libm::exp(OFFSET + SLOPE * raw as f64)
}

/// Convert Hz back to raw units: `round(738.662 * ln(181752 * hz))`.
///
/// Not clamped: out-of-domain input yields out-of-range (or saturated)
/// results. Pass the result through [`clamp_frequency`] before storing it.
pub fn frequency_to_int(hz: f64) -> i32 {
    libm::round(INVERSE_SCALE * libm::log(INVERSE_FACTOR * hz)) as i32
}

/// Clamp a raw value into `[0, 16383]`.
pub fn clamp_frequency(raw: i32) -> u16 {
    raw.clamp(0, MAX_FREQUENCY as i32) as u16
}

/// Format a raw frequency for display.
///
/// Precision shrinks as the value grows so the label stays about six
/// characters wide. Values below 0.01 Hz fall back to scientific notation;
/// with `compact` set that label is wrapped in a small-font marker for
/// narrow widgets.
pub fn format_frequency(raw: u16, compact: bool) -> String {
    if raw == 0 {
        return String::from("0");
    }
    let hz = int_to_frequency(raw);
    if hz >= 10000.0 {
        format!("{}", hz as u32)
    } else if hz >= 1000.0 {
        format!("{:.1}", hz)
    } else if hz >= 100.0 {
        format!("{:.2}", hz)
    } else if hz >= 10.0 {
        format!("{:.3}", hz)
    } else if hz >= 1.0 {
        format!("{:.4}", hz)
    } else if hz >= 0.01 {
        let s = format!("{:.5}", hz);
        String::from(&s[1..])
    } else if compact {
        format!("<html><font size=-2>{}</font></html>", scientific(hz))
    } else {
        scientific(hz)
    }
}

/// Two-decimal scientific notation with a signed two-digit exponent
/// (`6.30e-06`).
fn scientific(value: f64) -> String {
    let s = format!("{:.2e}", value);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => s,
    }
}
