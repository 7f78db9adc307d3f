pub mod panels;
pub mod plot;
pub mod tables;

/// Render a total for display: whole numbers without decimals, anything else
/// with two.
pub fn format_total(value: f64) -> String {
    // Fold -0.0 into 0.0.
    let value = value + 0.0;
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
