//! Display rounding shared by the PDF report and the terminal client.

/// Flow averages are shown as whole numbers, truncated toward zero.
pub fn flow_display(avg: f64) -> i64 {
    avg.trunc() as i64
}

/// Round to one decimal place, half away from zero.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Pressure averages are shown with exactly one decimal place.
pub fn pressure_display(avg: f64) -> String {
    format!("{:.1}", round_tenths(avg))
}
