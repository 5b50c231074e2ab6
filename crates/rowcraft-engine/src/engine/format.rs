//! Result-to-text formatting.

/// Format a computed value: integral results display without a decimal
/// point, everything else with the shortest f64 representation.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Two-decimal formatting, used by AVERAGE and fractional expression results.
pub fn format_fixed2(n: f64) -> String {
    format!("{:.2}", n)
}
