/// Render seconds as `M:SS`. Minutes are not capped at an hour.
///
/// Negative, NaN and infinite inputs render as `0:00`.
pub fn format_duration(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::format_duration;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(5.0), "0:05");
        assert_eq!(format_duration(65.0), "1:05");
        assert_eq!(format_duration(59.99), "0:59");
        assert_eq!(format_duration(3725.0), "62:05");
    }

    #[test]
    fn invalid_input_is_zero() {
        assert_eq!(format_duration(-1.0), "0:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
        assert_eq!(format_duration(f64::INFINITY), "0:00");
    }
}
