use std::time::Duration;

/// Renders a request duration the way responses report it:
/// seconds above one second, fractional milliseconds above one
/// millisecond, whole microseconds otherwise.
pub fn format_duration(duration: Duration) -> String {
    if duration >= Duration::from_secs(1) {
        format!("{:.2} s", duration.as_secs_f64())
    } else if duration >= Duration::from_millis(1) {
        format!("{:.2} ms", duration.as_micros() as f64 / 1000.0)
    } else {
        format!("{} μs", duration.as_micros())
    }
}
