//! Display formatting for snapshot metrics.
//!
//! Every helper takes an `Option` and renders [`PLACEHOLDER`] for `None`
//! (and for non-finite floats).

/// Shown in place of any metric the snapshot did not carry.
pub const PLACEHOLDER: &str = "-";

/// Format a millisecond duration as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_time(milliseconds: Option<f64>) -> String {
    match milliseconds {
        Some(ms) if ms.is_finite() => hms(whole_units(ms / 1000.0)),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Format a duration in seconds as `HH:MM:SS`. Fractional seconds are dropped.
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s.is_finite() => hms(whole_units(s)),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Format a percentage with two decimals and a trailing `%`.
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}%"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Format a plain count.
pub fn format_count(value: Option<u64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

/// Floor to whole units; negative values clamp to zero.
fn whole_units(value: f64) -> u64 {
    value.floor().max(0.0) as u64
}

fn hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
